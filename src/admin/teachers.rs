use axum_extra::extract::Form;
use hypertext::prelude::*;
use serde::Deserialize;

use crate::{
    auth::{AdminLogin, Gate, Session},
    flash::Flash,
    state::Conn,
    store::Deletion,
    teachers::{AddTeacherError, Teacher},
    template::Page,
    util_resp::{FlashResponse, see_other_ok, success},
    validation::{is_ascii_no_spaces, parse_id, required},
};

const MANAGE_TEACHERS: &str = "/admin_manage_teachers";

pub async fn manage_teachers_page(
    Gate(_): Gate<AdminLogin>,
    session: Session,
    flash: Flash,
    mut conn: Conn<false>,
) -> FlashResponse {
    let teachers = Teacher::all(&mut *conn)?;

    let (flash, notices) = flash.take();
    success(
        flash,
        Page::new()
            .title("Manage teachers")
            .session(session)
            .notices(notices)
            .body(maud! {
                h1 class="h2 mb-3" { "Teacher accounts" }
                @if teachers.is_empty() {
                    p { "There are no teacher accounts yet." }
                } @else {
                    table class="table table-striped" {
                        thead {
                            tr {
                                th scope="col" { "Username" }
                                th scope="col" { "Name" }
                                th scope="col" {}
                            }
                        }
                        tbody {
                            @for teacher in &teachers {
                                tr {
                                    td { (teacher.username) }
                                    td { (teacher.full_name()) }
                                    td {
                                        form method="post" action=(MANAGE_TEACHERS) class="d-inline" {
                                            input type="hidden" name="action" value="delete";
                                            input type="hidden" name="t_id" value=(teacher.id);
                                            button type="submit" class="btn btn-sm btn-outline-danger"
                                                onclick="return confirm('Are you sure?')" { "Delete" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                h2 class="h4 mt-4" { "Add a teacher" }
                form method="post" action=(MANAGE_TEACHERS) {
                    input type="hidden" name="action" value="add";
                    div class="row" {
                        div class="col-md mb-3" {
                            label for="t_username" class="form-label" { "Username" }
                            input type="text" class="form-control" id="t_username" name="t_username" required;
                        }
                        div class="col-md mb-3" {
                            label for="t_password" class="form-label" { "Password" }
                            input type="password" class="form-control" id="t_password" name="t_password" required;
                        }
                    }
                    div class="row" {
                        div class="col-md mb-3" {
                            label for="t_first_name" class="form-label" { "First name" }
                            input type="text" class="form-control" id="t_first_name" name="t_first_name" required;
                        }
                        div class="col-md mb-3" {
                            label for="t_last_name" class="form-label" { "Last name" }
                            input type="text" class="form-control" id="t_last_name" name="t_last_name" required;
                        }
                    }
                    button type="submit" class="btn btn-primary" { "Add teacher" }
                }
            })
            .render(),
    )
}

#[derive(Deserialize, Debug)]
pub struct ManageTeachersForm {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    t_id: Option<String>,
    #[serde(default)]
    t_username: Option<String>,
    #[serde(default)]
    t_password: Option<String>,
    #[serde(default)]
    t_first_name: Option<String>,
    #[serde(default)]
    t_last_name: Option<String>,
}

pub async fn do_manage_teachers(
    Gate(_): Gate<AdminLogin>,
    flash: Flash,
    mut conn: Conn<true>,
    Form(form): Form<ManageTeachersForm>,
) -> FlashResponse {
    let flash = match form.action.as_deref() {
        Some("add") => add_teacher(flash, &mut conn, &form),
        Some("delete") => delete_teacher(flash, &mut conn, &form),
        _ => flash.error("Unknown action."),
    };

    see_other_ok(flash, MANAGE_TEACHERS)
}

fn add_teacher(
    flash: Flash,
    conn: &mut Conn<true>,
    form: &ManageTeachersForm,
) -> Flash {
    let (Some(username), Some(password), Some(first_name), Some(last_name)) = (
        required(&form.t_username),
        form.t_password.as_deref().filter(|p| !p.is_empty()),
        required(&form.t_first_name),
        required(&form.t_last_name),
    ) else {
        return flash.error("All fields are required to add a teacher.");
    };

    if is_ascii_no_spaces(username).is_err() {
        return flash.error("Usernames may not contain spaces.");
    }

    match Teacher::add(username, password, first_name, last_name, &mut **conn)
    {
        Ok(_) => flash.success("New teacher account added successfully!"),
        Err(AddTeacherError::UsernameTaken) => {
            flash.error("Username already exists.")
        }
        Err(AddTeacherError::Hash(e)) => {
            tracing::error!("could not hash password: {e}");
            flash.error("Error adding teacher.")
        }
        Err(AddTeacherError::Database(e)) => {
            tracing::error!("could not add teacher: {e}");
            flash.error("Error adding teacher.")
        }
    }
}

fn delete_teacher(
    flash: Flash,
    conn: &mut Conn<true>,
    form: &ManageTeachersForm,
) -> Flash {
    let Some(id) = parse_id(&form.t_id) else {
        return flash.error("Please select a teacher to delete.");
    };

    match Teacher::delete(id, &mut **conn) {
        Ok(Deletion::Deleted) => {
            flash.success("Teacher account deleted successfully!")
        }
        Ok(Deletion::InUse) => flash.error(
            "Cannot delete teacher. Please unassign all instructors first.",
        ),
        Ok(Deletion::NotFound) => flash.error("Teacher not found."),
        Err(e) => {
            tracing::error!("could not delete teacher {id}: {e}");
            flash.error("Error deleting teacher.")
        }
    }
}
