use axum::extract::Path;
use hypertext::prelude::*;

use crate::{
    auth::{AdminLogin, Gate, Session},
    evaluations::report::InstructorReport,
    flash::Flash,
    instructors::Instructor,
    state::Conn,
    template::Page,
    util_resp::{FlashResponse, see_other_ok, success},
    widgets::rating::ReportTables,
};

pub async fn admin_view_evaluations(
    Gate(_): Gate<AdminLogin>,
    session: Session,
    flash: Flash,
    Path(instructor_id): Path<i32>,
    mut conn: Conn<false>,
) -> FlashResponse {
    let Some(instructor) = Instructor::fetch(instructor_id, &mut *conn)? else {
        return see_other_ok(
            flash.error("Instructor not found."),
            "/admin_manage_instructors",
        );
    };

    let report = InstructorReport::for_instructor(instructor, &mut *conn)?;

    let (flash, notices) = flash.take();
    success(
        flash,
        Page::new()
            .title("Evaluations")
            .session(session)
            .notices(notices)
            .body(maud! {
                ReportTables report=(&report) show_year_level=(true);
                a class="btn btn-secondary mt-3" href="/admin_manage_instructors" { "Back" }
            })
            .render(),
    )
}
