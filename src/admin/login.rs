use axum_extra::extract::Form;
use hypertext::prelude::*;

use crate::{
    admin::Admin,
    auth::{AdminLogin, Role, Session, password::verify_password},
    flash::Flash,
    state::Conn,
    template::Page,
    util_resp::{FlashResponse, see_other_ok, success},
    widgets::login::{StaffCredentials, StaffLoginForm},
};

pub async fn admin_login_page(session: Session, flash: Flash) -> FlashResponse {
    if session.admin.is_some() {
        return see_other_ok(flash, "/admin_dashboard");
    }

    let (flash, notices) = flash.take();
    success(
        flash,
        Page::new()
            .title("Administrator login")
            .session(session)
            .notices(notices)
            .body(StaffLoginForm {
                heading: "Administrator login",
                action: "/admin_login",
            })
            .render(),
    )
}

pub async fn do_admin_login(
    session: Session,
    flash: Flash,
    mut conn: Conn<true>,
    Form(form): Form<StaffCredentials>,
) -> FlashResponse {
    if session.admin.is_some() {
        return see_other_ok(flash, "/admin_dashboard");
    }

    let admin = match Admin::by_username(form.username.trim(), &mut *conn)? {
        Some(admin) if verify_password(&form.password, &admin.password_hash) => {
            admin
        }
        _ => {
            tracing::debug!("admin login rejected");
            return see_other_ok(
                flash.error("Invalid Username or Password."),
                "/admin_login",
            );
        }
    };

    let session = Session {
        admin: Some(AdminLogin {
            id: admin.id,
            name: admin.username,
        }),
        ..session
    };
    let flash = session.store(flash).success("Admin login successful!");

    see_other_ok(flash, "/admin_dashboard")
}

pub async fn admin_logout(session: Session, flash: Flash) -> FlashResponse {
    let flash = session.clear(Role::Admin).store(flash);
    see_other_ok(flash.info("You have been logged out."), "/")
}
