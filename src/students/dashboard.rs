use hypertext::prelude::*;

use crate::{
    auth::{Gate, Role, Session, StudentLogin},
    evaluations::progress::Progress,
    flash::Flash,
    state::Conn,
    students::Student,
    template::Page,
    util_resp::{FlashResponse, see_other_ok, success},
};

pub async fn dashboard(
    Gate(login): Gate<StudentLogin>,
    session: Session,
    flash: Flash,
    mut conn: Conn<false>,
) -> FlashResponse {
    let Some(student) = Student::fetch(&login.school_id, &mut *conn)? else {
        // the account was removed while the session was still live
        tracing::warn!(school_id = %login.school_id, "session for unknown student");
        let flash = session.clear(Role::Student).store(flash);
        return see_other_ok(flash.info(Role::Student.login_notice()), "/");
    };

    let progress = Progress::of_student(&student.school_id, &mut *conn)?;

    let (flash, notices) = flash.take();
    success(
        flash,
        Page::new()
            .title("Dashboard")
            .session(session)
            .notices(notices)
            .body(maud! {
                h1 class="h2 mb-3" { (format!("Welcome, {}", student.full_name())) }
                div class="row" {
                    div class="col-md-5 mb-3" {
                        div class="card" {
                            div class="card-header" { "Profile" }
                            ul class="list-group list-group-flush" {
                                li class="list-group-item" { "School ID: " (student.school_id) }
                                li class="list-group-item" { "Status: " (student.status().as_str()) }
                                li class="list-group-item" { "Email: " (student.email) }
                                li class="list-group-item" { "Year level: " (student.year_level) }
                            }
                        }
                    }
                    div class="col-md-7 mb-3" {
                        div class="card" {
                            div class="card-header" { "Progress" }
                            div class="card-body" {
                                p {
                                    (format!(
                                        "You have evaluated {} of {} instructors.",
                                        progress.evaluated_count,
                                        progress.total_instructors
                                    ))
                                }
                                @if progress.total_instructors == 0 {
                                    p class="text-muted" { "There are no instructors to evaluate yet." }
                                } @else if progress.is_complete() {
                                    p class="text-success" { "You have evaluated every instructor. Thank you!" }
                                } @else {
                                    p { (format!("Remaining: {}", progress.remaining_count)) }
                                    ul {
                                        @for instructor in &progress.remaining_instructors {
                                            li { (format!("{} ({})", instructor.full_name(), instructor.course)) }
                                        }
                                    }
                                    a class="btn btn-primary" href="/evaluate" { "Evaluate an instructor" }
                                }
                            }
                        }
                    }
                }
            })
            .render(),
    )
}
