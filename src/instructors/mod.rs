//! Instructors are the people students evaluate. Each may be assigned to a
//! teacher account, which is then allowed to see their results.

use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};
use serde::Serialize;

use crate::{
    schema::{evaluations, instructors, teachers},
    store::Deletion,
};

#[derive(
    Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize,
)]
#[diesel(table_name = instructors)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Instructor {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub course: String,
    pub teacher_id: Option<i32>,
}

/// An instructor together with the name of the teacher they are assigned
/// to, as shown on the management page.
#[derive(Debug, Clone)]
pub struct InstructorListing {
    pub instructor: Instructor,
    pub teacher_name: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum AssignOutcome {
    Assigned,
    NoSuchInstructor,
    NoSuchTeacher,
}

impl Instructor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    #[tracing::instrument(skip(conn))]
    pub fn fetch(
        id: i32,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<Option<Instructor>> {
        instructors::table
            .find(id)
            .select(Instructor::as_select())
            .first(conn)
            .optional()
    }

    pub fn count(
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<i64> {
        instructors::table.count().get_result(conn)
    }

    pub fn of_teacher(
        teacher_id: i32,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<Vec<Instructor>> {
        instructors::table
            .filter(instructors::teacher_id.eq(teacher_id))
            .order_by((instructors::last_name.asc(), instructors::id.asc()))
            .select(Instructor::as_select())
            .load(conn)
    }

    pub fn listing(
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<Vec<InstructorListing>> {
        let rows = instructors::table
            .left_join(teachers::table)
            .order_by((instructors::last_name.asc(), instructors::id.asc()))
            .select((
                Instructor::as_select(),
                (teachers::first_name, teachers::last_name).nullable(),
            ))
            .load::<(Instructor, Option<(String, String)>)>(conn)?;

        Ok(rows
            .into_iter()
            .map(|(instructor, teacher)| InstructorListing {
                instructor,
                teacher_name: teacher
                    .map(|(first, last)| format!("{first} {last}")),
            })
            .collect())
    }

    /// New instructors are not assigned to any teacher.
    #[tracing::instrument(skip(conn))]
    pub fn add(
        first_name: &str,
        last_name: &str,
        course: &str,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<i32> {
        diesel::insert_into(instructors::table)
            .values((
                instructors::first_name.eq(first_name),
                instructors::last_name.eq(last_name),
                instructors::course.eq(course),
                instructors::teacher_id.eq(None::<i32>),
            ))
            .returning(instructors::id)
            .get_result(conn)
    }

    /// Instructors which have been evaluated cannot be deleted.
    #[tracing::instrument(skip(conn))]
    pub fn delete(
        id: i32,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<Deletion> {
        let evaluated = diesel::select(diesel::dsl::exists(
            evaluations::table.filter(evaluations::instructor_id.eq(id)),
        ))
        .get_result::<bool>(conn)?;

        if evaluated {
            return Ok(Deletion::InUse);
        }

        let n = diesel::delete(instructors::table.find(id)).execute(conn)?;
        Ok(if n == 0 {
            Deletion::NotFound
        } else {
            Deletion::Deleted
        })
    }

    #[tracing::instrument(skip(conn))]
    pub fn assign_teacher(
        id: i32,
        teacher_id: Option<i32>,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<AssignOutcome> {
        if let Some(teacher_id) = teacher_id {
            let exists = diesel::select(diesel::dsl::exists(
                teachers::table.find(teacher_id),
            ))
            .get_result::<bool>(conn)?;
            if !exists {
                return Ok(AssignOutcome::NoSuchTeacher);
            }
        }

        let n = diesel::update(instructors::table.find(id))
            .set(instructors::teacher_id.eq(teacher_id))
            .execute(conn)?;

        Ok(if n == 0 {
            AssignOutcome::NoSuchInstructor
        } else {
            AssignOutcome::Assigned
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::test::fixtures::{
        add_instructor, add_question, add_teacher, evaluate, memory_conn,
        register_student,
    };

    use super::*;

    #[test]
    fn unevaluated_instructor_can_be_deleted() {
        let mut conn = memory_conn();
        let id = add_instructor(&mut conn, "Grace", "Hopper", "COBOL");

        assert_eq!(Instructor::delete(id, &mut conn).unwrap(), Deletion::Deleted);
        assert_eq!(Instructor::fetch(id, &mut conn).unwrap(), None);
        assert!(Instructor::listing(&mut conn).unwrap().is_empty());
        assert_eq!(
            Instructor::delete(id, &mut conn).unwrap(),
            Deletion::NotFound
        );
    }

    #[test]
    fn evaluated_instructor_cannot_be_deleted() {
        let mut conn = memory_conn();
        register_student(&mut conn, "s1", true);
        let q = add_question(&mut conn, "Clarity");
        let id = add_instructor(&mut conn, "Grace", "Hopper", "COBOL");
        evaluate(&mut conn, "s1", id, &[(q, 4)]);

        assert_eq!(Instructor::delete(id, &mut conn).unwrap(), Deletion::InUse);
        assert!(Instructor::fetch(id, &mut conn).unwrap().is_some());
        assert_eq!(Instructor::count(&mut conn).unwrap(), 1);
    }

    #[test]
    fn assignment_shows_in_listing_and_can_be_undone() {
        let mut conn = memory_conn();
        let teacher = add_teacher(&mut conn, "tlovelace", "Ada", "Lovelace");
        let id = add_instructor(&mut conn, "Grace", "Hopper", "COBOL");

        assert_eq!(
            Instructor::assign_teacher(id, Some(teacher), &mut conn).unwrap(),
            AssignOutcome::Assigned
        );
        let listing = Instructor::listing(&mut conn).unwrap();
        assert_eq!(listing[0].teacher_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(Instructor::of_teacher(teacher, &mut conn).unwrap().len(), 1);

        assert_eq!(
            Instructor::assign_teacher(id, None, &mut conn).unwrap(),
            AssignOutcome::Assigned
        );
        assert_eq!(Instructor::listing(&mut conn).unwrap()[0].teacher_name, None);

        assert_eq!(
            Instructor::assign_teacher(id, Some(teacher + 100), &mut conn)
                .unwrap(),
            AssignOutcome::NoSuchTeacher
        );
        assert_eq!(
            Instructor::assign_teacher(id + 100, None, &mut conn).unwrap(),
            AssignOutcome::NoSuchInstructor
        );
    }
}
