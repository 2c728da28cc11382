//! Sessions and the role gate.
//!
//! A [`Session`] records which roles the browser is currently logged in as.
//! It is stored (encrypted) in a private cookie and is extracted for every
//! request which needs it, rather than being looked up globally. Handlers
//! which require a role take a [`Gate`] for that role, which redirects to the
//! role's login page when the session lacks it.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key},
};
use chrono::{NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::flash::Flash;

pub mod password;

pub const LOGIN_COOKIE: &str = "tally_session";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StudentLogin {
    pub school_id: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TeacherLogin {
    pub id: i32,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AdminLogin {
    pub id: i32,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub student: Option<StudentLogin>,
    pub teacher: Option<TeacherLogin>,
    pub admin: Option<AdminLogin>,
}

#[derive(Serialize, Deserialize)]
struct LoginSession {
    session: Session,
    expiry: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    pub fn login_path(self) -> &'static str {
        match self {
            Role::Student => "/",
            Role::Teacher => "/teacher_login",
            Role::Admin => "/admin_login",
        }
    }

    pub fn login_notice(self) -> &'static str {
        match self {
            Role::Student | Role::Teacher => {
                "Please log in to access this page."
            }
            Role::Admin => "Please log in as an administrator.",
        }
    }
}

impl Session {
    /// Reads the session from the cookie jar. Missing, malformed and expired
    /// cookies all produce an empty session.
    pub fn from_jar(jar: &PrivateCookieJar) -> Self {
        let Some(cookie) = jar.get(LOGIN_COOKIE) else {
            return Session::default();
        };

        match serde_json::from_str::<LoginSession>(cookie.value()) {
            Ok(login) if Utc::now().naive_utc() < login.expiry => login.session,
            _ => Session::default(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::Student => self.student.is_some(),
            Role::Teacher => self.teacher.is_some(),
            Role::Admin => self.admin.is_some(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.has_role(Role::Student)
            || self.has_role(Role::Teacher)
            || self.has_role(Role::Admin))
    }

    pub fn clear(mut self, role: Role) -> Self {
        match role {
            Role::Student => self.student = None,
            Role::Teacher => self.teacher = None,
            Role::Admin => self.admin = None,
        }
        self
    }

    /// Writes the session into the response cookies, replacing the previous
    /// session. An empty session removes the cookie.
    pub fn store(&self, flash: Flash) -> Flash {
        if self.is_empty() {
            return flash.map_jar(|jar| {
                let mut cookie = Cookie::from(LOGIN_COOKIE);
                cookie.set_path("/");
                jar.remove(cookie)
            });
        }

        let login = LoginSession {
            session: self.clone(),
            expiry: Utc::now().naive_utc() + TimeDelta::days(7),
        };

        let value = match serde_json::to_string(&login) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("could not serialize session: {e}");
                return flash;
            }
        };

        let mut cookie = Cookie::new(LOGIN_COOKIE, value);
        cookie.set_path("/");
        cookie.set_http_only(true);

        flash.map_jar(|jar| jar.add(cookie))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state)
            .await?;
        Ok(Session::from_jar(&jar))
    }
}

/// The identity a role's marker carries in the session.
pub trait RoleLogin: Sized {
    const ROLE: Role;

    fn from_session(session: &Session) -> Option<Self>;
}

impl RoleLogin for StudentLogin {
    const ROLE: Role = Role::Student;

    fn from_session(session: &Session) -> Option<Self> {
        session.student.clone()
    }
}

impl RoleLogin for TeacherLogin {
    const ROLE: Role = Role::Teacher;

    fn from_session(session: &Session) -> Option<Self> {
        session.teacher.clone()
    }
}

impl RoleLogin for AdminLogin {
    const ROLE: Role = Role::Admin;

    fn from_session(session: &Session) -> Option<Self> {
        session.admin.clone()
    }
}

/// Admits the request only if the session holds the role `R`.
pub struct Gate<R>(pub R);

pub struct GateRejection {
    role: Role,
    flash: Flash,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        (
            self.flash.info(self.role.login_notice()),
            Redirect::to(self.role.login_path()),
        )
            .into_response()
    }
}

#[async_trait]
impl<S, R> FromRequestParts<S> for Gate<R>
where
    S: Send + Sync,
    Key: FromRef<S>,
    R: RoleLogin + Send,
{
    type Rejection = GateRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::<Key>::from_request_parts(
            parts, state,
        )
        .await
        {
            Ok(jar) => jar,
            Err(never) => match never {},
        };

        match R::from_session(&Session::from_jar(&jar)) {
            Some(login) => Ok(Gate(login)),
            None => {
                tracing::debug!(role = ?R::ROLE, "rejected by role gate");
                Err(GateRejection {
                    role: R::ROLE,
                    flash: Flash::new(jar),
                })
            }
        }
    }
}
