use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use rand::Rng;
use tower_http::trace::TraceLayer;

use crate::{
    admin::{
        dashboard::{admin_dashboard, approve_student},
        evaluations::admin_view_evaluations,
        instructors::{do_manage_instructors, manage_instructors_page},
        login::{admin_login_page, admin_logout, do_admin_login},
        questions::{do_manage_questions, manage_questions_page},
        setup::init_db,
        teachers::{do_manage_teachers, manage_teachers_page},
    },
    settings::Settings,
    state::{AppState, DbPool, commit_transactions},
    students::{
        dashboard::dashboard,
        evaluate::{do_evaluate, evaluate_page},
        landing::{do_landing, landing_page, logout},
    },
    teachers::{
        dashboard::teacher_dashboard,
        login::{do_teacher_login, teacher_login_page, teacher_logout},
        results::teacher_view_results,
    },
};

#[derive(Debug)]
pub struct InvalidSecretKey;

impl std::fmt::Display for InvalidSecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "the secret key must be at least 64 bytes long")
    }
}

impl std::error::Error for InvalidSecretKey {}

/// Cookies are encrypted with the configured secret. Without one, a fresh
/// key is generated and every session ends when the process exits.
pub fn cookie_key(settings: &Settings) -> Result<Key, InvalidSecretKey> {
    match &settings.secret_key {
        Some(secret) => {
            Key::try_from(secret.as_bytes()).map_err(|_| InvalidSecretKey)
        }
        None => {
            tracing::warn!(
                "no secret key configured, sessions will not survive a restart"
            );
            Ok(random_key())
        }
    }
}

fn random_key() -> Key {
    let mut bytes = [0u8; 64];
    rand::rng().fill(&mut bytes[..]);
    Key::from(&bytes[..])
}

/// The application with default settings and a random cookie key.
pub fn create_app(pool: DbPool) -> Router {
    create_app_with(AppState {
        pool,
        key: random_key(),
        settings: Arc::new(Settings::default()),
    })
}

pub fn create_app_with(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing_page).post(do_landing))
        .route("/dashboard", get(dashboard))
        .route("/evaluate", get(evaluate_page).post(do_evaluate))
        .route("/logout", get(logout))
        .route(
            "/teacher_login",
            get(teacher_login_page).post(do_teacher_login),
        )
        .route("/teacher_dashboard", get(teacher_dashboard))
        .route(
            "/teacher_view_results/:instructor_id",
            get(teacher_view_results),
        )
        .route("/teacher_logout", get(teacher_logout))
        .route("/admin_login", get(admin_login_page).post(do_admin_login))
        .route("/admin_dashboard", get(admin_dashboard))
        .route(
            "/approve_student/:school_id",
            get(approve_student).post(approve_student),
        )
        .route(
            "/admin_manage_teachers",
            get(manage_teachers_page).post(do_manage_teachers),
        )
        .route(
            "/admin_manage_instructors",
            get(manage_instructors_page).post(do_manage_instructors),
        )
        .route(
            "/admin_view_evaluations/:instructor_id",
            get(admin_view_evaluations),
        )
        .route(
            "/admin_manage_questions",
            get(manage_questions_page).post(do_manage_questions),
        )
        .route("/admin_logout", get(admin_logout))
        .route("/init_db", post(init_db).get(init_db))
        .layer(axum::middleware::from_fn(commit_transactions))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
