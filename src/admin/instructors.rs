use axum_extra::extract::Form;
use hypertext::prelude::*;
use serde::Deserialize;

use crate::{
    auth::{AdminLogin, Gate, Session},
    flash::Flash,
    instructors::{AssignOutcome, Instructor},
    state::Conn,
    store::Deletion,
    teachers::Teacher,
    template::Page,
    util_resp::{FlashResponse, see_other_ok, success},
    validation::{parse_id, required},
};

const MANAGE_INSTRUCTORS: &str = "/admin_manage_instructors";

pub async fn manage_instructors_page(
    Gate(_): Gate<AdminLogin>,
    session: Session,
    flash: Flash,
    mut conn: Conn<false>,
) -> FlashResponse {
    let instructors = Instructor::listing(&mut *conn)?;
    let teachers = Teacher::all(&mut *conn)?;

    let (flash, notices) = flash.take();
    success(
        flash,
        Page::new()
            .title("Manage instructors")
            .session(session)
            .notices(notices)
            .body(maud! {
                h1 class="h2 mb-3" { "Instructors" }
                @if instructors.is_empty() {
                    p { "There are no instructors yet." }
                } @else {
                    table class="table table-striped align-middle" {
                        thead {
                            tr {
                                th scope="col" { "Name" }
                                th scope="col" { "Course" }
                                th scope="col" { "Teacher" }
                                th scope="col" {}
                            }
                        }
                        tbody {
                            @for listing in &instructors {
                                @let instructor = &listing.instructor;
                                tr {
                                    td { (instructor.full_name()) }
                                    td { (instructor.course) }
                                    td {
                                        form method="post" action=(MANAGE_INSTRUCTORS) class="d-flex gap-2" {
                                            input type="hidden" name="action" value="assign_teacher";
                                            input type="hidden" name="i_id" value=(instructor.id);
                                            select class="form-select form-select-sm" name="t_id" {
                                                option value="none" selected[instructor.teacher_id.is_none()] {
                                                    "Unassigned"
                                                }
                                                @for teacher in &teachers {
                                                    option value=(teacher.id)
                                                        selected[instructor.teacher_id == Some(teacher.id)] {
                                                        (teacher.full_name())
                                                    }
                                                }
                                            }
                                            button type="submit" class="btn btn-sm btn-outline-primary" { "Assign" }
                                        }
                                    }
                                    td {
                                        div class="btn-group" role="group" {
                                            a class="btn btn-sm btn-outline-secondary"
                                                href=(format!("/admin_view_evaluations/{}", instructor.id)) {
                                                "Evaluations"
                                            }
                                            form method="post" action=(MANAGE_INSTRUCTORS) class="d-inline" {
                                                input type="hidden" name="action" value="delete";
                                                input type="hidden" name="i_id" value=(instructor.id);
                                                button type="submit" class="btn btn-sm btn-outline-danger"
                                                    onclick="return confirm('Are you sure?')" { "Delete" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                h2 class="h4 mt-4" { "Add an instructor" }
                form method="post" action=(MANAGE_INSTRUCTORS) {
                    input type="hidden" name="action" value="add";
                    div class="row" {
                        div class="col-md mb-3" {
                            label for="i_first_name" class="form-label" { "First name" }
                            input type="text" class="form-control" id="i_first_name" name="i_first_name" required;
                        }
                        div class="col-md mb-3" {
                            label for="i_last_name" class="form-label" { "Last name" }
                            input type="text" class="form-control" id="i_last_name" name="i_last_name" required;
                        }
                        div class="col-md mb-3" {
                            label for="i_course" class="form-label" { "Course" }
                            input type="text" class="form-control" id="i_course" name="i_course" required;
                        }
                    }
                    button type="submit" class="btn btn-primary" { "Add instructor" }
                }
            })
            .render(),
    )
}

#[derive(Deserialize, Debug)]
pub struct ManageInstructorsForm {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    i_id: Option<String>,
    #[serde(default)]
    t_id: Option<String>,
    #[serde(default)]
    i_first_name: Option<String>,
    #[serde(default)]
    i_last_name: Option<String>,
    #[serde(default)]
    i_course: Option<String>,
}

pub async fn do_manage_instructors(
    Gate(_): Gate<AdminLogin>,
    flash: Flash,
    mut conn: Conn<true>,
    Form(form): Form<ManageInstructorsForm>,
) -> FlashResponse {
    let flash = match form.action.as_deref() {
        Some("add") => add_instructor(flash, &mut conn, &form),
        Some("delete") => delete_instructor(flash, &mut conn, &form),
        Some("assign_teacher") => assign_teacher(flash, &mut conn, &form),
        _ => flash.error("Unknown action."),
    };

    see_other_ok(flash, MANAGE_INSTRUCTORS)
}

fn add_instructor(
    flash: Flash,
    conn: &mut Conn<true>,
    form: &ManageInstructorsForm,
) -> Flash {
    let (Some(first_name), Some(last_name), Some(course)) = (
        required(&form.i_first_name),
        required(&form.i_last_name),
        required(&form.i_course),
    ) else {
        return flash.error("All fields are required to add an instructor.");
    };

    match Instructor::add(first_name, last_name, course, &mut **conn) {
        Ok(_) => flash.success("New instructor added successfully!"),
        Err(e) => {
            tracing::error!("could not add instructor: {e}");
            flash.error("Error adding instructor.")
        }
    }
}

fn delete_instructor(
    flash: Flash,
    conn: &mut Conn<true>,
    form: &ManageInstructorsForm,
) -> Flash {
    let Some(id) = parse_id(&form.i_id) else {
        return flash.error("Please select an instructor to delete.");
    };

    match Instructor::delete(id, &mut **conn) {
        Ok(Deletion::Deleted) => {
            flash.success("Instructor deleted successfully!")
        }
        Ok(Deletion::InUse) => {
            flash.error("Cannot delete instructor. Evaluations exist.")
        }
        Ok(Deletion::NotFound) => flash.error("Instructor not found."),
        Err(e) => {
            tracing::error!("could not delete instructor {id}: {e}");
            flash.error("Error deleting instructor.")
        }
    }
}

/// A missing teacher (or `none`) unassigns the instructor.
fn assign_teacher(
    flash: Flash,
    conn: &mut Conn<true>,
    form: &ManageInstructorsForm,
) -> Flash {
    let Some(id) = parse_id(&form.i_id) else {
        return flash.error("Please select an instructor.");
    };

    let teacher_id = match required(&form.t_id) {
        None => None,
        Some(t) if t.eq_ignore_ascii_case("none") => None,
        Some(t) => match t.parse::<i32>() {
            Ok(t) => Some(t),
            Err(_) => return flash.error("Teacher not found."),
        },
    };

    match Instructor::assign_teacher(id, teacher_id, &mut **conn) {
        Ok(AssignOutcome::Assigned) => {
            flash.success("Teacher assignment updated successfully!")
        }
        Ok(AssignOutcome::NoSuchInstructor) => {
            flash.error("Instructor not found.")
        }
        Ok(AssignOutcome::NoSuchTeacher) => flash.error("Teacher not found."),
        Err(e) => {
            tracing::error!("could not assign teacher to instructor {id}: {e}");
            flash.error("Error assigning teacher.")
        }
    }
}
