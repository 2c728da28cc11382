//! The landing page, where students log in or register.

use axum::extract::Query;
use axum_extra::extract::Form;
use hypertext::prelude::*;
use serde::Deserialize;

use crate::{
    auth::{Role, Session, StudentLogin, password::verify_password},
    flash::Flash,
    instructors::Instructor,
    state::Conn,
    students::{RegisterError, Registration, Student, StudentStatus},
    template::Page,
    util_resp::{FlashResponse, see_other_ok, success},
    validation::{is_ascii_no_spaces, is_valid_email, required},
};

#[derive(Deserialize)]
pub struct LandingQuery {
    tab: Option<String>,
}

pub async fn landing_page(
    session: Session,
    flash: Flash,
    Query(query): Query<LandingQuery>,
    mut conn: Conn<false>,
) -> FlashResponse {
    if session.student.is_some() {
        return see_other_ok(flash, "/dashboard");
    }

    let instructors_empty = Instructor::count(&mut *conn)? == 0;
    let login_tab = query.tab.as_deref() == Some("login");

    let (flash, notices) = flash.take();
    success(
        flash,
        Page::new()
            .title("Welcome")
            .session(session)
            .notices(notices)
            .body(maud! {
                h1 class="h2 mb-3" { "Instructor Evaluation" }
                @if instructors_empty {
                    div class="alert alert-warning" role="alert" {
                        "No instructors have been added yet. Evaluations will \
                         open once an administrator adds them."
                    }
                }
                ul class="nav nav-tabs mb-3" {
                    li class="nav-item" {
                        a class=(if login_tab { "nav-link active" } else { "nav-link" })
                            href="/?tab=login" { "Log in" }
                    }
                    li class="nav-item" {
                        a class=(if login_tab { "nav-link" } else { "nav-link active" })
                            href="/?tab=register" { "Register" }
                    }
                }
                @if login_tab {
                    form method="post" action="/" {
                        input type="hidden" name="action" value="login";
                        div class="mb-3" {
                            label for="login_school_id" class="form-label" { "School ID" }
                            input type="text" class="form-control" id="login_school_id"
                                name="login_school_id" required;
                        }
                        div class="mb-3" {
                            label for="login_password" class="form-label" { "Password" }
                            input type="password" class="form-control" id="login_password"
                                name="login_password" required;
                        }
                        button type="submit" class="btn btn-primary" { "Log in" }
                    }
                } @else {
                    form method="post" action="/" {
                        input type="hidden" name="action" value="register";
                        div class="mb-3" {
                            label for="reg_school_id" class="form-label" { "School ID" }
                            input type="text" class="form-control" id="reg_school_id"
                                name="reg_school_id" required;
                        }
                        div class="row" {
                            div class="col-md mb-3" {
                                label for="reg_first_name" class="form-label" { "First name" }
                                input type="text" class="form-control" id="reg_first_name"
                                    name="reg_first_name" required;
                            }
                            div class="col-md mb-3" {
                                label for="reg_last_name" class="form-label" { "Last name" }
                                input type="text" class="form-control" id="reg_last_name"
                                    name="reg_last_name" required;
                            }
                        }
                        div class="mb-3" {
                            label for="reg_email" class="form-label" { "Email address" }
                            input type="email" class="form-control" id="reg_email"
                                name="reg_email" required;
                        }
                        div class="mb-3" {
                            label for="reg_year_level" class="form-label" { "Year level" }
                            select class="form-select" id="reg_year_level" name="reg_year_level" required {
                                option value="" disabled selected { "Select your year level" }
                                @for year in ["1", "2", "3", "4"] {
                                    option value=(year) { (format!("Year {year}")) }
                                }
                            }
                        }
                        div class="mb-3" {
                            label for="reg_password" class="form-label" { "Password" }
                            input type="password" class="form-control" id="reg_password"
                                name="reg_password" required;
                        }
                        button type="submit" class="btn btn-primary" { "Register" }
                    }
                }
            })
            .render(),
    )
}

#[derive(Deserialize, Debug)]
pub struct LandingForm {
    action: Option<String>,
    #[serde(default)]
    login_school_id: Option<String>,
    #[serde(default)]
    login_password: Option<String>,
    #[serde(default)]
    reg_school_id: Option<String>,
    #[serde(default)]
    reg_password: Option<String>,
    #[serde(default)]
    reg_first_name: Option<String>,
    #[serde(default)]
    reg_last_name: Option<String>,
    #[serde(default)]
    reg_email: Option<String>,
    #[serde(default)]
    reg_year_level: Option<String>,
}

/// The landing page hosts two forms, told apart by their `action` field.
pub async fn do_landing(
    session: Session,
    flash: Flash,
    mut conn: Conn<true>,
    Form(form): Form<LandingForm>,
) -> FlashResponse {
    match form.action.as_deref() {
        Some("login") => do_login(session, flash, &mut conn, &form),
        Some("register") => do_register(flash, &mut conn, &form),
        _ => see_other_ok(flash.error("Unknown action."), "/"),
    }
}

fn do_login(
    session: Session,
    flash: Flash,
    conn: &mut Conn<true>,
    form: &LandingForm,
) -> FlashResponse {
    let (Some(school_id), Some(password)) = (
        required(&form.login_school_id),
        form.login_password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return see_other_ok(
            flash.error("Please enter your school ID and password."),
            "/?tab=login",
        );
    };

    let student = match Student::fetch(school_id, &mut **conn)? {
        Some(student)
            if verify_password(password, &student.password_hash) =>
        {
            student
        }
        _ => {
            tracing::debug!(school_id, "student login rejected");
            return see_other_ok(
                flash.error("Invalid School ID or Password."),
                "/?tab=login",
            );
        }
    };

    if student.status() != StudentStatus::Approved {
        return see_other_ok(
            flash.info("Your account is pending approval by an administrator."),
            "/?tab=login",
        );
    }

    let session = Session {
        student: Some(StudentLogin {
            school_id: student.school_id.clone(),
            name: student.full_name(),
        }),
        ..session
    };
    let flash = session
        .store(flash)
        .success(format!("Welcome back, {}!", student.first_name));

    see_other_ok(flash, "/dashboard")
}

fn do_register(
    flash: Flash,
    conn: &mut Conn<true>,
    form: &LandingForm,
) -> FlashResponse {
    let (
        Some(school_id),
        Some(password),
        Some(first_name),
        Some(last_name),
        Some(email),
        Some(year_level),
    ) = (
        required(&form.reg_school_id),
        form.reg_password.as_deref().filter(|p| !p.is_empty()),
        required(&form.reg_first_name),
        required(&form.reg_last_name),
        required(&form.reg_email),
        required(&form.reg_year_level),
    )
    else {
        return see_other_ok(flash.error("All fields are required."), "/");
    };

    if is_ascii_no_spaces(school_id).is_err() {
        return see_other_ok(
            flash.error("School ID may not contain spaces."),
            "/",
        );
    }

    if is_valid_email(email).is_err() {
        return see_other_ok(
            flash.error("Please enter a valid email address."),
            "/",
        );
    }

    let registration = Registration {
        school_id,
        password,
        first_name,
        last_name,
        email,
        year_level,
    };

    match Student::register(&registration, &mut **conn) {
        Ok(()) => see_other_ok(
            flash.success(
                "Registration successful! Your account is pending \
                 administrator approval.",
            ),
            "/?tab=login",
        ),
        Err(RegisterError::AlreadyRegistered) => {
            see_other_ok(flash.error("School ID is already registered."), "/")
        }
        Err(RegisterError::Hash(e)) => {
            tracing::error!("could not hash password: {e}");
            see_other_ok(
                flash.error("An error occurred during registration."),
                "/",
            )
        }
        Err(RegisterError::Database(e)) => {
            tracing::error!("could not register student: {e}");
            see_other_ok(
                flash.error("An error occurred during registration."),
                "/",
            )
        }
    }
}

pub async fn logout(session: Session, flash: Flash) -> FlashResponse {
    let flash = session.clear(Role::Student).store(flash);
    see_other_ok(flash.info("You have been logged out."), "/")
}
