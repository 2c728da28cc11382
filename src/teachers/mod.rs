//! Teacher accounts. A teacher logs in to see the results of the instructors
//! an administrator has assigned to them.

use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};
use serde::Serialize;

use crate::{
    auth::password::hash_password,
    schema::{instructors, teachers},
    store::{self, Deletion},
};

pub mod dashboard;
pub mod login;
pub mod results;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize)]
#[diesel(table_name = teachers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Teacher {
    pub id: i32,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug)]
pub enum AddTeacherError {
    UsernameTaken,
    Hash(argon2::password_hash::Error),
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for AddTeacherError {
    fn from(e: diesel::result::Error) -> Self {
        if store::is_unique_violation(&e) {
            AddTeacherError::UsernameTaken
        } else {
            AddTeacherError::Database(e)
        }
    }
}

impl Teacher {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn by_username(
        username: &str,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<Option<Teacher>> {
        teachers::table
            .filter(teachers::username.eq(username))
            .select(Teacher::as_select())
            .first(conn)
            .optional()
    }

    pub fn all(
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<Vec<Teacher>> {
        teachers::table
            .order_by((teachers::last_name.asc(), teachers::id.asc()))
            .select(Teacher::as_select())
            .load(conn)
    }

    pub fn count(
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<i64> {
        teachers::table.count().get_result(conn)
    }

    #[tracing::instrument(skip(password, conn))]
    pub fn add(
        username: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> Result<i32, AddTeacherError> {
        let password_hash =
            hash_password(password).map_err(AddTeacherError::Hash)?;

        let id = diesel::insert_into(teachers::table)
            .values((
                teachers::username.eq(username),
                teachers::password_hash.eq(password_hash),
                teachers::first_name.eq(first_name),
                teachers::last_name.eq(last_name),
            ))
            .returning(teachers::id)
            .get_result(conn)?;

        Ok(id)
    }

    /// Teachers with assigned instructors cannot be deleted; the instructors
    /// have to be unassigned first.
    #[tracing::instrument(skip(conn))]
    pub fn delete(
        id: i32,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<Deletion> {
        let assigned = diesel::select(diesel::dsl::exists(
            instructors::table.filter(instructors::teacher_id.eq(id)),
        ))
        .get_result::<bool>(conn)?;

        if assigned {
            return Ok(Deletion::InUse);
        }

        let n = diesel::delete(teachers::table.find(id)).execute(conn)?;
        Ok(if n == 0 {
            Deletion::NotFound
        } else {
            Deletion::Deleted
        })
    }
}
