//! Administrator accounts and the administration pages.
//!
//! Administrators approve student registrations, and manage the teacher
//! accounts, instructors and evaluation questions.

use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};

use crate::{auth::password::hash_password, schema::admins, store};

pub mod dashboard;
pub mod evaluations;
pub mod instructors;
pub mod login;
pub mod questions;
pub mod setup;
pub mod teachers;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = admins)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Admin {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug)]
pub enum CreateAdminError {
    UsernameTaken,
    Hash(argon2::password_hash::Error),
    Database(diesel::result::Error),
}

impl std::fmt::Display for CreateAdminError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateAdminError::UsernameTaken => {
                f.write_str("an administrator with that username already exists")
            }
            CreateAdminError::Hash(e) => write!(f, "could not hash password: {e}"),
            CreateAdminError::Database(e) => write!(f, "database error: {e}"),
        }
    }
}

impl std::error::Error for CreateAdminError {}

impl From<diesel::result::Error> for CreateAdminError {
    fn from(e: diesel::result::Error) -> Self {
        if store::is_unique_violation(&e) {
            CreateAdminError::UsernameTaken
        } else {
            CreateAdminError::Database(e)
        }
    }
}

impl Admin {
    pub fn by_username(
        username: &str,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<Option<Admin>> {
        admins::table
            .filter(admins::username.eq(username))
            .select(Admin::as_select())
            .first(conn)
            .optional()
    }

    #[tracing::instrument(skip(password, conn))]
    pub fn create(
        username: &str,
        password: &str,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> Result<i32, CreateAdminError> {
        let password_hash =
            hash_password(password).map_err(CreateAdminError::Hash)?;

        let id = diesel::insert_into(admins::table)
            .values((
                admins::username.eq(username),
                admins::password_hash.eq(password_hash),
            ))
            .returning(admins::id)
            .get_result(conn)?;

        Ok(id)
    }
}
