use hypertext::prelude::*;

use crate::{
    auth::{Gate, Session, TeacherLogin},
    evaluations::report::CourseSummary,
    flash::Flash,
    state::Conn,
    students::{Student, StudentStatus},
    template::Page,
    util_resp::{FlashResponse, success},
};

pub async fn teacher_dashboard(
    Gate(login): Gate<TeacherLogin>,
    session: Session,
    flash: Flash,
    mut conn: Conn<false>,
) -> FlashResponse {
    let courses = CourseSummary::for_teacher(login.id, &mut *conn)?;
    let approved_students =
        Student::count_with_status(StudentStatus::Approved, &mut *conn)?;

    let (flash, notices) = flash.take();
    success(
        flash,
        Page::new()
            .title("Teacher dashboard")
            .session(session)
            .notices(notices)
            .body(maud! {
                h1 class="h2 mb-3" { (format!("Welcome, {}", login.name)) }
                p class="text-muted" {
                    (format!("{approved_students} approved students can submit evaluations."))
                }
                @if courses.is_empty() {
                    p { "No instructors have been assigned to you yet." }
                } @else {
                    table class="table table-striped" {
                        thead {
                            tr {
                                th scope="col" { "Instructor" }
                                th scope="col" { "Course" }
                                th scope="col" { "Evaluations" }
                                th scope="col" { "Average rating" }
                                th scope="col" {}
                            }
                        }
                        tbody {
                            @for course in &courses {
                                tr {
                                    td { (course.instructor.full_name()) }
                                    td { (course.instructor.course) }
                                    td { (course.evaluation_count) }
                                    td { (course.average.to_string()) }
                                    td {
                                        a class="btn btn-sm btn-outline-primary"
                                            href=(format!("/teacher_view_results/{}", course.instructor.id)) {
                                            "View results"
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
