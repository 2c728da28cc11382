use axum::extract::Path;
use hypertext::prelude::*;

use crate::{
    auth::{Gate, Session, TeacherLogin},
    evaluations::report::InstructorReport,
    flash::Flash,
    instructors::Instructor,
    state::Conn,
    template::Page,
    util_resp::{FlashResponse, see_other_ok, success},
    widgets::rating::ReportTables,
};

/// Teachers may only see the results of instructors assigned to them.
pub async fn teacher_view_results(
    Gate(login): Gate<TeacherLogin>,
    session: Session,
    flash: Flash,
    Path(instructor_id): Path<i32>,
    mut conn: Conn<false>,
) -> FlashResponse {
    let instructor = match Instructor::fetch(instructor_id, &mut *conn)? {
        Some(instructor) if instructor.teacher_id == Some(login.id) => {
            instructor
        }
        _ => {
            return see_other_ok(
                flash.error(
                    "You are not authorized to view results for this \
                     instructor.",
                ),
                "/teacher_dashboard",
            );
        }
    };

    let report = InstructorReport::for_instructor(instructor, &mut *conn)?;

    let (flash, notices) = flash.take();
    success(
        flash,
        Page::new()
            .title("Results")
            .session(session)
            .notices(notices)
            .body(maud! {
                ReportTables report=(&report) show_year_level=(false);
                a class="btn btn-secondary mt-3" href="/teacher_dashboard" { "Back" }
            })
            .render(),
    )
}
