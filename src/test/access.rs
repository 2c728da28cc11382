use axum::http::StatusCode;

use crate::test::fixtures::{Client, assert_redirect, location, register_student};

#[tokio::test]
async fn protected_pages_send_visitors_to_the_right_login() {
    let mut client = Client::new();

    for (page, login) in [
        ("/dashboard", "/"),
        ("/evaluate", "/"),
        ("/teacher_dashboard", "/teacher_login"),
        ("/teacher_view_results/1", "/teacher_login"),
        ("/admin_dashboard", "/admin_login"),
        ("/admin_manage_questions", "/admin_login"),
        ("/admin_view_evaluations/1", "/admin_login"),
    ] {
        let res = client.get(page).await;
        assert_redirect(&res);
        assert_eq!(location(&res), login, "GET {page}");
    }
}

#[tokio::test]
async fn rejected_visitors_are_told_to_log_in() {
    let mut client = Client::new();

    let res = client.get("/dashboard").await;
    let body = client.follow(res).await;
    assert!(body.contains("Please log in to access this page."));

    let res = client.get("/admin_dashboard").await;
    let body = client.follow(res).await;
    assert!(body.contains("Please log in as an administrator."));
}

#[tokio::test]
async fn a_student_session_does_not_open_staff_pages() {
    let mut client = Client::new();
    client.db(|conn| register_student(conn, "S1", true));

    let res = client.login_student("S1").await;
    assert_eq!(location(&res), "/dashboard");

    let res = client.get("/admin_dashboard").await;
    assert_eq!(location(&res), "/admin_login");
    let res = client.get("/teacher_dashboard").await;
    assert_eq!(location(&res), "/teacher_login");
}

#[tokio::test]
async fn roles_are_held_independently() {
    let mut client = Client::new();
    client.db(|conn| register_student(conn, "S1", true));

    client.login_student("S1").await;
    client.login_admin().await;

    assert_eq!(client.get("/dashboard").await.status(), StatusCode::OK);
    assert_eq!(client.get("/admin_dashboard").await.status(), StatusCode::OK);

    // leaving the admin area keeps the student logged in
    client.get("/admin_logout").await;
    assert_eq!(location(&client.get("/admin_dashboard").await), "/admin_login");
    assert_eq!(client.get("/dashboard").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn logged_in_students_skip_the_landing_page() {
    let mut client = Client::new();
    client.db(|conn| register_student(conn, "S1", true));
    client.login_student("S1").await;

    let res = client.get("/").await;
    assert_eq!(location(&res), "/dashboard");

    let res = client.get("/logout").await;
    let body = client.follow(res).await;
    assert!(body.contains("You have been logged out."));
    assert_eq!(location(&client.get("/dashboard").await), "/");
}

#[tokio::test]
async fn bad_credentials_are_rejected() {
    let mut client = Client::new();
    client.db(|conn| register_student(conn, "S1", true));

    let res = client
        .post(
            "/",
            &[
                ("action", "login"),
                ("login_school_id", "S1"),
                ("login_password", "wrong"),
            ],
        )
        .await;
    assert_eq!(location(&res), "/?tab=login");
    let body = client.follow(res).await;
    assert!(body.contains("Invalid School ID or Password."));

    let res = client
        .post("/admin_login", &[("username", "admin"), ("password", "wrong")])
        .await;
    assert_eq!(location(&res), "/admin_login");
    let body = client.follow(res).await;
    assert!(body.contains("Invalid Username or Password."));
}

#[tokio::test]
async fn sessions_do_not_survive_a_different_key() {
    let mut client = Client::new();
    client.db(|conn| register_student(conn, "S1", true));
    client.login_student("S1").await;

    // a new router gets a new random cookie key
    client.app = crate::config::create_app(client.pool.clone());
    assert_eq!(location(&client.get("/dashboard").await), "/");
}

#[tokio::test]
async fn database_reset_is_hidden_unless_enabled() {
    let mut client = Client::new();
    client.login_admin().await;

    assert_eq!(client.get("/init_db").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        client.post("/init_db", &[]).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn losing_the_session_cookie_ends_the_session() {
    let mut client = Client::new();
    client.db(|conn| register_student(conn, "S1", true));
    client.login_student("S1").await;
    assert_eq!(client.get("/dashboard").await.status(), StatusCode::OK);

    client.forget_cookies();

    let res = client.get("/evaluate").await;
    assert_eq!(location(&res), "/");
    let body = client.follow(res).await;
    assert!(body.contains("Please log in to access this page."));
}
