//! Shared setup for the tests: an in-memory database with the schema
//! applied, shortcuts for creating rows, and a small cookie-tracking client
//! for driving the router.

use std::collections::HashMap;

use axum::{
    Router,
    body::Body,
    extract::Request,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
    },
    response::Response,
};
use axum_extra::extract::cookie::Cookie;
use diesel::{SqliteConnection, connection::SimpleConnection, prelude::*};
use diesel_migrations::MigrationHarness;
use tower::ServiceExt;

use crate::{
    MIGRATIONS,
    admin::Admin,
    config::create_app,
    evaluations::submit::{EvaluationSubmission, submit_evaluation},
    instructors::Instructor,
    questions::Question,
    state::{DbPool, make_pool},
    students::{Registration, Student},
    teachers::Teacher,
};

pub const PASSWORD: &str = "password";

pub fn memory_conn() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:").unwrap();
    conn.batch_execute("PRAGMA foreign_keys = ON;").unwrap();
    conn.run_pending_migrations(MIGRATIONS).unwrap();
    conn
}

/// Registers a student in year 1 whose password is [`PASSWORD`].
pub fn register_student(
    conn: &mut SqliteConnection,
    school_id: &str,
    approved: bool,
) {
    let email = format!("{school_id}@example.com");
    Student::register(
        &Registration {
            school_id,
            password: PASSWORD,
            first_name: "Test",
            last_name: school_id,
            email: &email,
            year_level: "1",
        },
        conn,
    )
    .unwrap();

    if approved {
        assert!(Student::approve(school_id, conn).unwrap());
    }
}

pub fn add_instructor(
    conn: &mut SqliteConnection,
    first_name: &str,
    last_name: &str,
    course: &str,
) -> i32 {
    Instructor::add(first_name, last_name, course, conn).unwrap()
}

pub fn add_question(conn: &mut SqliteConnection, text: &str) -> i32 {
    Question::add(text, conn).unwrap()
}

/// Adds a teacher whose password is [`PASSWORD`].
pub fn add_teacher(
    conn: &mut SqliteConnection,
    username: &str,
    first_name: &str,
    last_name: &str,
) -> i32 {
    Teacher::add(username, PASSWORD, first_name, last_name, conn).unwrap()
}

pub fn evaluate(
    conn: &mut SqliteConnection,
    student: &str,
    instructor: i32,
    ratings: &[(i32, i32)],
) -> i32 {
    evaluate_with(conn, student, instructor, ratings, None)
}

pub fn evaluate_with(
    conn: &mut SqliteConnection,
    student: &str,
    instructor: i32,
    ratings: &[(i32, i32)],
    remarks: Option<&str>,
) -> i32 {
    let instructor = instructor.to_string();
    let ratings = ratings
        .iter()
        .map(|(q, r)| (q.to_string(), r.to_string()))
        .collect::<HashMap<_, _>>();

    submit_evaluation(
        EvaluationSubmission {
            student_id: student,
            instructor: Some(&instructor),
            ratings: &ratings,
            remarks,
        },
        conn,
    )
    .unwrap()
}

/// Drives the router like a browser would, keeping hold of the cookies it
/// is given.
pub struct Client {
    pub app: Router,
    pub pool: DbPool,
    cookies: HashMap<String, String>,
}

impl Client {
    /// A fresh application backed by an empty in-memory database, with an
    /// administrator account `admin` / [`PASSWORD`].
    pub fn new() -> Self {
        let pool = make_pool(":memory:").unwrap();
        {
            let mut conn = pool.get().unwrap();
            conn.run_pending_migrations(MIGRATIONS).unwrap();
            Admin::create("admin", PASSWORD, &mut conn).unwrap();
        }

        Client {
            app: create_app(pool.clone()),
            pool,
            cookies: HashMap::new(),
        }
    }

    /// Runs `f` against the application's database. Must not be called
    /// while a response is outstanding.
    pub fn db<T>(&self, f: impl FnOnce(&mut SqliteConnection) -> T) -> T {
        let mut conn = self.pool.get().unwrap();
        f(&mut conn)
    }

    pub fn forget_cookies(&mut self) {
        self.cookies.clear();
    }

    async fn send(&mut self, req: Request) -> Response {
        let res = self.app.clone().oneshot(req).await.unwrap();

        for value in res.headers().get_all(SET_COOKIE) {
            let cookie =
                Cookie::parse(value.to_str().unwrap().to_string()).unwrap();
            let removed = cookie.value().is_empty()
                || cookie
                    .max_age()
                    .is_some_and(|age| age.whole_seconds() <= 0);
            if removed {
                self.cookies.remove(cookie.name());
            } else {
                self.cookies
                    .insert(cookie.name().to_string(), cookie.value().to_string());
            }
        }

        res
    }

    fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub async fn get(&mut self, uri: &str) -> Response {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .header(COOKIE, self.cookie_header())
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }

    pub async fn post(&mut self, uri: &str, form: &[(&str, &str)]) -> Response {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(COOKIE, self.cookie_header())
            .body(Body::from(serde_urlencoded::to_string(form).unwrap()))
            .unwrap();
        self.send(req).await
    }

    /// Fetches the page a redirect points at, returning its body.
    pub async fn follow(&mut self, res: Response) -> String {
        assert_redirect(&res);
        let to = location(&res);
        drop(res);
        let res = self.get(&to).await;
        assert_eq!(res.status(), StatusCode::OK, "GET {to}");
        body_text(res).await
    }

    pub async fn login_student(&mut self, school_id: &str) -> Response {
        self.post(
            "/",
            &[
                ("action", "login"),
                ("login_school_id", school_id),
                ("login_password", PASSWORD),
            ],
        )
        .await
    }

    pub async fn login_teacher(&mut self, username: &str) -> Response {
        self.post(
            "/teacher_login",
            &[("username", username), ("password", PASSWORD)],
        )
        .await
    }

    pub async fn login_admin(&mut self) -> Response {
        self.post(
            "/admin_login",
            &[("username", "admin"), ("password", PASSWORD)],
        )
        .await
    }
}

pub fn assert_redirect(res: &Response) {
    assert_eq!(
        res.status(),
        StatusCode::SEE_OTHER,
        "expected a redirect, got {:?}",
        res.status()
    );
}

pub fn location(res: &Response) -> String {
    res.headers()
        .get(LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

pub async fn body_text(res: Response) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&bytes).to_string()
}
