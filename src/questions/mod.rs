use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};
use serde::Serialize;

use crate::{
    schema::{evaluation_details, evaluation_questions},
    store::Deletion,
};

#[derive(
    Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize,
)]
#[diesel(table_name = evaluation_questions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Question {
    pub id: i32,
    pub text: String,
    pub display_order: i32,
}

impl Question {
    /// All registered questions, in the order they are shown to students.
    pub fn all_ordered(
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<Vec<Question>> {
        evaluation_questions::table
            .order_by((
                evaluation_questions::display_order.asc(),
                evaluation_questions::id.asc(),
            ))
            .select(Question::as_select())
            .load(conn)
    }

    /// New questions go after every existing question.
    #[tracing::instrument(skip(conn))]
    pub fn add(
        text: &str,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<i32> {
        let max_order = evaluation_questions::table
            .select(diesel::dsl::max(evaluation_questions::display_order))
            .first::<Option<i32>>(conn)?;

        diesel::insert_into(evaluation_questions::table)
            .values((
                evaluation_questions::text.eq(text),
                evaluation_questions::display_order
                    .eq(max_order.unwrap_or(0) + 1),
            ))
            .returning(evaluation_questions::id)
            .get_result(conn)
    }

    /// Replaces the text of each given question. Blank texts are skipped, and
    /// either every update is applied or none is.
    #[tracing::instrument(skip(texts, conn), fields(n = texts.len()))]
    pub fn update_texts(
        texts: &[(i32, String)],
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<usize> {
        conn.transaction(|conn| {
            let mut updated = 0;
            for (id, text) in texts {
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                updated += diesel::update(evaluation_questions::table.find(*id))
                    .set(evaluation_questions::text.eq(text))
                    .execute(conn)?;
            }
            Ok(updated)
        })
    }

    /// Questions which have been answered cannot be deleted.
    #[tracing::instrument(skip(conn))]
    pub fn delete(
        id: i32,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<Deletion> {
        let answered = diesel::select(diesel::dsl::exists(
            evaluation_details::table
                .filter(evaluation_details::question_id.eq(id)),
        ))
        .get_result::<bool>(conn)?;

        if answered {
            return Ok(Deletion::InUse);
        }

        let n = diesel::delete(evaluation_questions::table.find(id))
            .execute(conn)?;
        Ok(if n == 0 {
            Deletion::NotFound
        } else {
            Deletion::Deleted
        })
    }
}
