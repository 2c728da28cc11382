//! Destructive database (re)initialisation.

use std::fmt;

use axum::extract::State;
use diesel::SqliteConnection;
use diesel_migrations::MigrationHarness;

use crate::{
    MIGRATIONS,
    admin::{Admin, CreateAdminError},
    auth::Session,
    flash::Flash,
    state::AppState,
    util_resp::{FailureResponse, FlashResponse, err_not_found, see_other_ok},
};

#[derive(Debug)]
pub enum SetupError {
    Migration(Box<dyn std::error::Error + Send + Sync>),
    Admin(CreateAdminError),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::Migration(e) => write!(f, "could not apply schema: {e}"),
            SetupError::Admin(e) => write!(f, "could not create administrator: {e}"),
        }
    }
}

impl std::error::Error for SetupError {}

/// Drops every table, recreates the schema and adds a single administrator.
/// All other data is lost.
#[tracing::instrument(skip(password, conn))]
pub fn reset_database(
    admin_username: &str,
    password: &str,
    conn: &mut SqliteConnection,
) -> Result<(), SetupError> {
    conn.revert_all_migrations(MIGRATIONS)
        .map_err(SetupError::Migration)?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(SetupError::Migration)?;

    Admin::create(admin_username, password, conn).map_err(SetupError::Admin)?;

    tracing::warn!("database has been reset");
    Ok(())
}

/// Only available when `allow_init_db` is set; otherwise the route does not
/// exist as far as clients can tell.
pub async fn init_db(
    State(state): State<AppState>,
    flash: Flash,
) -> FlashResponse {
    if !state.settings.allow_init_db {
        return err_not_found();
    }

    let settings = state.settings.clone();
    let pool = state.pool.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(|e| {
            tracing::error!("could not acquire a connection: {e}");
            FailureResponse::ServerError(())
        })?;

        reset_database(
            &settings.seed_admin_username,
            &settings.seed_admin_password,
            &mut conn,
        )
        .map_err(|e| {
            tracing::error!("database reset failed: {e}");
            FailureResponse::ServerError(())
        })
    })
    .await
    .map_err(|e| {
        tracing::error!("database reset task failed: {e}");
        FailureResponse::ServerError(())
    })?;
    result?;

    let flash = Session::default().store(flash);
    see_other_ok(
        flash.info(format!(
            "Database setup complete. Log in as administrator \"{}\".",
            state.settings.seed_admin_username
        )),
        "/",
    )
}

#[cfg(test)]
mod tests {
    use diesel::prelude::*;

    use crate::{
        instructors::Instructor,
        test::fixtures::{add_instructor, memory_conn},
    };

    use super::*;

    #[test]
    fn reset_wipes_data_and_seeds_an_admin() {
        let mut conn = memory_conn();
        add_instructor(&mut conn, "Grace", "Hopper", "COBOL");
        Admin::create("someone", "secret", &mut conn).unwrap();

        reset_database("admin", "password", &mut conn).unwrap();

        assert_eq!(Instructor::count(&mut conn).unwrap(), 0);
        assert!(Admin::by_username("someone", &mut conn).unwrap().is_none());
        assert!(Admin::by_username("admin", &mut conn).unwrap().is_some());

        let admins = crate::schema::admins::table
            .count()
            .get_result::<i64>(&mut conn)
            .unwrap();
        assert_eq!(admins, 1);
    }
}
