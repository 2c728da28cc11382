//! One-shot notices shown on the next rendered page.
//!
//! Notices are queued by a handler (usually just before redirecting) and are
//! stored in a private cookie until a page is rendered, at which point they
//! are removed from the cookie and displayed.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponseParts, ResponseParts},
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key},
};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "tally_flash";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
    Info,
}

impl FlashKind {
    pub fn alert_class(self) -> &'static str {
        match self {
            FlashKind::Success => "alert alert-success",
            FlashKind::Error => "alert alert-danger",
            FlashKind::Info => "alert alert-info",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub msg: String,
}

/// The request's private cookie jar, with helpers for the flash cookie. The
/// session cookie lives in the same jar (see [`crate::auth`]).
pub struct Flash {
    jar: PrivateCookieJar,
}

impl Flash {
    pub fn new(jar: PrivateCookieJar) -> Self {
        Self { jar }
    }

    pub fn jar(&self) -> &PrivateCookieJar {
        &self.jar
    }

    pub fn map_jar(
        self,
        f: impl FnOnce(PrivateCookieJar) -> PrivateCookieJar,
    ) -> Self {
        Self { jar: f(self.jar) }
    }

    fn queued(&self) -> Vec<FlashMessage> {
        self.jar
            .get(FLASH_COOKIE)
            .and_then(|cookie| {
                serde_json::from_str::<Vec<FlashMessage>>(cookie.value()).ok()
            })
            .unwrap_or_default()
    }

    pub fn push(self, kind: FlashKind, msg: impl Into<String>) -> Self {
        let mut queued = self.queued();
        queued.push(FlashMessage {
            kind,
            msg: msg.into(),
        });

        let value = match serde_json::to_string(&queued) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("could not serialize flash messages: {e}");
                return self;
            }
        };

        let mut cookie = Cookie::new(FLASH_COOKIE, value);
        cookie.set_path("/");
        cookie.set_http_only(true);

        self.map_jar(|jar| jar.add(cookie))
    }

    pub fn success(self, msg: impl Into<String>) -> Self {
        self.push(FlashKind::Success, msg)
    }

    pub fn error(self, msg: impl Into<String>) -> Self {
        self.push(FlashKind::Error, msg)
    }

    pub fn info(self, msg: impl Into<String>) -> Self {
        self.push(FlashKind::Info, msg)
    }

    /// Removes all queued notices, returning them for display.
    pub fn take(self) -> (Self, Vec<FlashMessage>) {
        let queued = self.queued();
        if self.jar.get(FLASH_COOKIE).is_none() {
            return (self, queued);
        }

        let flash = self.map_jar(|jar| {
            let mut cookie = Cookie::from(FLASH_COOKIE);
            cookie.set_path("/");
            jar.remove(cookie)
        });
        (flash, queued)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Flash
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
        Ok(Flash::new(jar))
    }
}

impl IntoResponseParts for Flash {
    type Error = Infallible;

    fn into_response_parts(
        self,
        res: ResponseParts,
    ) -> Result<ResponseParts, Self::Error> {
        self.jar.into_response_parts(res)
    }
}
