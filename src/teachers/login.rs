use axum_extra::extract::Form;
use hypertext::prelude::*;

use crate::{
    auth::{Role, Session, TeacherLogin, password::verify_password},
    flash::Flash,
    state::Conn,
    teachers::Teacher,
    template::Page,
    util_resp::{FlashResponse, see_other_ok, success},
    widgets::login::{StaffCredentials, StaffLoginForm},
};

pub async fn teacher_login_page(
    session: Session,
    flash: Flash,
) -> FlashResponse {
    if session.teacher.is_some() {
        return see_other_ok(flash, "/teacher_dashboard");
    }

    let (flash, notices) = flash.take();
    success(
        flash,
        Page::new()
            .title("Teacher login")
            .session(session)
            .notices(notices)
            .body(StaffLoginForm {
                heading: "Teacher login",
                action: "/teacher_login",
            })
            .render(),
    )
}

pub async fn do_teacher_login(
    session: Session,
    flash: Flash,
    mut conn: Conn<true>,
    Form(form): Form<StaffCredentials>,
) -> FlashResponse {
    if session.teacher.is_some() {
        return see_other_ok(flash, "/teacher_dashboard");
    }

    let teacher = match Teacher::by_username(form.username.trim(), &mut *conn)? {
        Some(teacher) if verify_password(&form.password, &teacher.password_hash) => {
            teacher
        }
        _ => {
            return see_other_ok(
                flash.error("Invalid username or password."),
                "/teacher_login",
            );
        }
    };

    let session = Session {
        teacher: Some(TeacherLogin {
            id: teacher.id,
            name: teacher.full_name(),
        }),
        ..session
    };
    let flash = session.store(flash).success("Teacher login successful!");

    see_other_ok(flash, "/teacher_dashboard")
}

pub async fn teacher_logout(session: Session, flash: Flash) -> FlashResponse {
    let flash = session.clear(Role::Teacher).store(flash);
    see_other_ok(flash.info("You have been logged out."), "/")
}
