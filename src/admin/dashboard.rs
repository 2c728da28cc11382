use axum::extract::Path;
use hypertext::prelude::*;

use crate::{
    auth::{AdminLogin, Gate, Session},
    flash::Flash,
    instructors::Instructor,
    state::Conn,
    students::{Student, StudentStatus},
    teachers::Teacher,
    template::Page,
    util_resp::{FlashResponse, see_other_ok, success},
    widgets::actions::Actions,
};

pub async fn admin_dashboard(
    Gate(_): Gate<AdminLogin>,
    session: Session,
    flash: Flash,
    mut conn: Conn<false>,
) -> FlashResponse {
    let pending =
        Student::count_with_status(StudentStatus::Pending, &mut *conn)?;
    let total_students = Student::count_all(&mut *conn)?;
    let total_teachers = Teacher::count(&mut *conn)?;
    let total_instructors = Instructor::count(&mut *conn)?;
    let students = Student::pending(&mut *conn)?;

    let (flash, notices) = flash.take();
    success(
        flash,
        Page::new()
            .title("Administration")
            .session(session)
            .notices(notices)
            .body(maud! {
                h1 class="h2" { "Administration" }
                Actions options=(&[
                    ("/admin_manage_teachers", "Manage teachers"),
                    ("/admin_manage_instructors", "Manage instructors"),
                    ("/admin_manage_questions", "Manage questions"),
                ]);
                div class="row mb-4" {
                    @for (label, count) in [
                        ("Pending students", pending),
                        ("Total students", total_students),
                        ("Teachers", total_teachers),
                        ("Instructors", total_instructors),
                    ] {
                        div class="col-md-3" {
                            div class="card text-center" {
                                div class="card-body" {
                                    h2 class="card-title" { (count) }
                                    p class="card-text" { (label) }
                                }
                            }
                        }
                    }
                }
                h2 class="h4" { "Pending registrations" }
                @if students.is_empty() {
                    p { "No students are waiting for approval." }
                } @else {
                    table class="table table-striped" {
                        thead {
                            tr {
                                th scope="col" { "School ID" }
                                th scope="col" { "Name" }
                                th scope="col" { "Email" }
                                th scope="col" { "Year level" }
                                th scope="col" {}
                            }
                        }
                        tbody {
                            @for student in &students {
                                tr {
                                    td { (student.school_id) }
                                    td { (student.full_name()) }
                                    td { (student.email) }
                                    td { (student.year_level) }
                                    td {
                                        form method="post"
                                            action=(format!("/approve_student/{}", student.school_id)) {
                                            button type="submit" class="btn btn-sm btn-success" { "Approve" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            })
            .render(),
    )
}

pub async fn approve_student(
    Gate(_): Gate<AdminLogin>,
    flash: Flash,
    Path(school_id): Path<String>,
    mut conn: Conn<true>,
) -> FlashResponse {
    let flash = if Student::approve(&school_id, &mut *conn)? {
        tracing::info!(%school_id, "student approved");
        flash.success(format!("Student {school_id} has been approved."))
    } else {
        flash.error(format!("Student {school_id} was not found."))
    };

    see_other_ok(flash, "/admin_dashboard")
}
