use std::{fmt, str::FromStr};

use chrono::{NaiveDateTime, Utc};
use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};
use serde::Serialize;

use crate::{auth::password::hash_password, schema::students, store};

pub mod dashboard;
pub mod evaluate;
pub mod landing;

#[derive(Queryable, Selectable, Debug, Clone, Serialize)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Student {
    pub school_id: String,
    #[serde(skip)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub year_level: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentStatus {
    Pending,
    Approved,
}

impl StudentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StudentStatus::Pending => "Pending",
            StudentStatus::Approved => "Approved",
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(StudentStatus::Pending),
            "Approved" => Ok(StudentStatus::Approved),
            _ => Err(()),
        }
    }
}

/// Fields collected by the registration form, already validated.
#[derive(Debug, Clone)]
pub struct Registration<'a> {
    pub school_id: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub year_level: &'a str,
}

#[derive(Debug)]
pub enum RegisterError {
    AlreadyRegistered,
    Hash(argon2::password_hash::Error),
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for RegisterError {
    fn from(e: diesel::result::Error) -> Self {
        if store::is_unique_violation(&e) {
            RegisterError::AlreadyRegistered
        } else {
            RegisterError::Database(e)
        }
    }
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Unrecognised values are treated as pending, so that they can never
    /// log in.
    pub fn status(&self) -> StudentStatus {
        self.status.parse().unwrap_or(StudentStatus::Pending)
    }

    #[tracing::instrument(skip(conn))]
    pub fn fetch(
        school_id: &str,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<Option<Student>> {
        students::table
            .filter(students::school_id.eq(school_id))
            .select(Student::as_select())
            .first(conn)
            .optional()
    }

    /// New accounts start out pending, and cannot log in until an
    /// administrator approves them.
    #[tracing::instrument(skip(registration, conn), fields(school_id = registration.school_id))]
    pub fn register(
        registration: &Registration<'_>,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> Result<(), RegisterError> {
        let password_hash =
            hash_password(registration.password).map_err(RegisterError::Hash)?;

        diesel::insert_into(students::table)
            .values((
                students::school_id.eq(registration.school_id),
                students::password_hash.eq(password_hash),
                students::first_name.eq(registration.first_name),
                students::last_name.eq(registration.last_name),
                students::email.eq(registration.email),
                students::year_level.eq(registration.year_level),
                students::status.eq(StudentStatus::Pending.as_str()),
                students::created_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        Ok(())
    }

    /// Returns false if no such student exists.
    #[tracing::instrument(skip(conn))]
    pub fn approve(
        school_id: &str,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<bool> {
        let n = diesel::update(
            students::table.filter(students::school_id.eq(school_id)),
        )
        .set(students::status.eq(StudentStatus::Approved.as_str()))
        .execute(conn)?;

        Ok(n > 0)
    }

    pub fn pending(
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<Vec<Student>> {
        students::table
            .filter(students::status.eq(StudentStatus::Pending.as_str()))
            .order_by(students::school_id.asc())
            .select(Student::as_select())
            .load(conn)
    }

    pub fn count_with_status(
        status: StudentStatus,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<i64> {
        students::table
            .filter(students::status.eq(status.as_str()))
            .count()
            .get_result(conn)
    }

    pub fn count_all(
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<i64> {
        students::table.count().get_result(conn)
    }
}
