use diesel::prelude::*;

use crate::{
    instructors::Instructor,
    questions::Question,
    schema::teachers,
    test::fixtures::{
        Client, add_instructor, add_question, add_teacher, evaluate,
        location, register_student,
    },
};

#[tokio::test]
async fn teachers_can_be_added_and_log_in() {
    let mut client = Client::new();
    client.login_admin().await;

    let res = client
        .post(
            "/admin_manage_teachers",
            &[
                ("action", "add"),
                ("t_username", "grace"),
                ("t_password", "cobol"),
                ("t_first_name", "Grace"),
                ("t_last_name", "Hopper"),
            ],
        )
        .await;
    assert_eq!(location(&res), "/admin_manage_teachers");
    let body = client.follow(res).await;
    assert!(body.contains("New teacher account added successfully!"));
    assert!(body.contains("Grace Hopper"));

    let res = client
        .post(
            "/admin_manage_teachers",
            &[
                ("action", "add"),
                ("t_username", "grace"),
                ("t_password", "other"),
                ("t_first_name", "Grace"),
                ("t_last_name", "Kelly"),
            ],
        )
        .await;
    let body = client.follow(res).await;
    assert!(body.contains("Username already exists."));

    let res = client
        .post(
            "/teacher_login",
            &[("username", "grace"), ("password", "cobol")],
        )
        .await;
    assert_eq!(location(&res), "/teacher_dashboard");
}

#[tokio::test]
async fn teachers_with_instructors_cannot_be_deleted() {
    let mut client = Client::new();
    let (teacher, instructor) = client.db(|conn| {
        let teacher = add_teacher(conn, "grace", "Grace", "Hopper");
        let instructor = add_instructor(conn, "Ada", "Lovelace", "Engines");
        Instructor::assign_teacher(instructor, Some(teacher), conn).unwrap();
        (teacher.to_string(), instructor.to_string())
    });
    client.login_admin().await;

    let delete = [("action", "delete"), ("t_id", teacher.as_str())];
    let res = client.post("/admin_manage_teachers", &delete).await;
    let body = client.follow(res).await;
    assert!(body.contains(
        "Cannot delete teacher. Please unassign all instructors first."
    ));

    let res = client
        .post(
            "/admin_manage_instructors",
            &[
                ("action", "assign_teacher"),
                ("i_id", instructor.as_str()),
                ("t_id", "none"),
            ],
        )
        .await;
    let body = client.follow(res).await;
    assert!(body.contains("Teacher assignment updated successfully!"));

    let res = client.post("/admin_manage_teachers", &delete).await;
    let body = client.follow(res).await;
    assert!(body.contains("Teacher account deleted successfully!"));
    let remaining = client.db(|conn| {
        teachers::table.count().get_result::<i64>(conn).unwrap()
    });
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn evaluated_instructors_cannot_be_deleted() {
    let mut client = Client::new();
    let (evaluated, fresh) = client.db(|conn| {
        let q = add_question(conn, "Explains clearly");
        let evaluated = add_instructor(conn, "Ada", "Lovelace", "Engines");
        let fresh = add_instructor(conn, "Alan", "Turing", "Computability");
        register_student(conn, "S1", true);
        evaluate(conn, "S1", evaluated, &[(q, 5)]);
        (evaluated.to_string(), fresh.to_string())
    });
    client.login_admin().await;

    let res = client
        .post(
            "/admin_manage_instructors",
            &[("action", "delete"), ("i_id", evaluated.as_str())],
        )
        .await;
    let body = client.follow(res).await;
    assert!(body.contains("Cannot delete instructor. Evaluations exist."));

    let res = client
        .post(
            "/admin_manage_instructors",
            &[("action", "delete"), ("i_id", fresh.as_str())],
        )
        .await;
    let body = client.follow(res).await;
    assert!(body.contains("Instructor deleted successfully!"));
    assert_eq!(client.db(|conn| Instructor::count(conn).unwrap()), 1);
}

#[tokio::test]
async fn instructors_can_be_added_and_assigned() {
    let mut client = Client::new();
    let teacher = client
        .db(|conn| add_teacher(conn, "grace", "Grace", "Hopper"))
        .to_string();
    client.login_admin().await;

    let res = client
        .post(
            "/admin_manage_instructors",
            &[
                ("action", "add"),
                ("i_first_name", "Ada"),
                ("i_last_name", "Lovelace"),
                ("i_course", "Engines"),
            ],
        )
        .await;
    let body = client.follow(res).await;
    assert!(body.contains("New instructor added successfully!"));

    let res = client
        .post("/admin_manage_instructors", &[("action", "add"), ("i_course", "X")])
        .await;
    let body = client.follow(res).await;
    assert!(body.contains("All fields are required to add an instructor."));

    let id = client.db(|conn| Instructor::listing(conn).unwrap()[0].instructor.id);
    let id = id.to_string();

    let res = client
        .post(
            "/admin_manage_instructors",
            &[("action", "assign_teacher"), ("i_id", id.as_str()), ("t_id", "9999")],
        )
        .await;
    let body = client.follow(res).await;
    assert!(body.contains("Teacher not found."));

    let res = client
        .post(
            "/admin_manage_instructors",
            &[
                ("action", "assign_teacher"),
                ("i_id", id.as_str()),
                ("t_id", teacher.as_str()),
            ],
        )
        .await;
    client.follow(res).await;

    client.get("/admin_logout").await;
    let res = client.login_teacher("grace").await;
    let body = client.follow(res).await;
    assert!(body.contains("Lovelace"));
}

#[tokio::test]
async fn questions_can_be_edited_in_bulk() {
    let mut client = Client::new();
    let (q1, q2) = client.db(|conn| {
        (add_question(conn, "Old one"), add_question(conn, "Old two"))
    });
    client.login_admin().await;

    let (t1, t2) = (format!("text[{q1}]"), format!("text[{q2}]"));
    let res = client
        .post(
            "/admin_manage_questions",
            &[
                ("action", "update_questions"),
                (t1.as_str(), "New one"),
                (t2.as_str(), "New two"),
            ],
        )
        .await;
    assert_eq!(location(&res), "/admin_manage_questions");
    let body = client.follow(res).await;
    assert!(body.contains("Evaluation questions updated successfully!"));

    let texts = client.db(|conn| {
        Question::all_ordered(conn)
            .unwrap()
            .into_iter()
            .map(|q| q.text)
            .collect::<Vec<_>>()
    });
    assert_eq!(texts, ["New one", "New two"]);
}

#[tokio::test]
async fn questions_in_use_cannot_be_deleted() {
    let mut client = Client::new();
    let (used, unused) = client.db(|conn| {
        let used = add_question(conn, "Explains clearly");
        let instructor = add_instructor(conn, "Ada", "Lovelace", "Engines");
        register_student(conn, "S1", true);
        evaluate(conn, "S1", instructor, &[(used, 4)]);
        let unused = add_question(conn, "Added later");
        (used.to_string(), unused.to_string())
    });
    client.login_admin().await;

    let res = client
        .post(
            "/admin_manage_questions",
            &[("action", "delete_question"), ("question_id", used.as_str())],
        )
        .await;
    let body = client.follow(res).await;
    assert!(body.contains("Cannot delete question. Existing evaluations use it."));

    let res = client
        .post(
            "/admin_manage_questions",
            &[("action", "delete_question"), ("question_id", unused.as_str())],
        )
        .await;
    let body = client.follow(res).await;
    assert!(body.contains("Question deleted successfully!"));

    let res = client
        .post(
            "/admin_manage_questions",
            &[("action", "add_question"), ("new_text", "  ")],
        )
        .await;
    let body = client.follow(res).await;
    assert!(body.contains("Please enter the text of the new question."));

    let res = client
        .post(
            "/admin_manage_questions",
            &[("action", "add_question"), ("new_text", "Fair grading")],
        )
        .await;
    let body = client.follow(res).await;
    assert!(body.contains("New question added successfully!"));
    assert!(body.contains("Fair grading"));
}

#[tokio::test]
async fn approving_an_unknown_student_is_reported() {
    let mut client = Client::new();
    client.login_admin().await;

    let res = client.get("/approve_student/nobody").await;
    assert_eq!(location(&res), "/admin_dashboard");
    let body = client.follow(res).await;
    assert!(body.contains("Student nobody was not found."));
}
