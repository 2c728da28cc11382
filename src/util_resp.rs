use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use hypertext::Rendered;

use crate::flash::Flash;

pub fn see_other_ok(flash: Flash, to: &str) -> FlashResponse {
    Ok((flash, SuccessResponse::SeeOther(Box::new(Redirect::to(to)))))
}

pub fn success(flash: Flash, html: Rendered<String>) -> FlashResponse {
    Ok((flash, SuccessResponse::Success(html)))
}

pub fn err_not_found<T>() -> Result<T, FailureResponse> {
    Err(FailureResponse::NotFound(()))
}

/// Most handlers also hand back the flash cookie, which is updated whenever a
/// notice is queued or displayed.
pub type FlashResponse = Result<(Flash, SuccessResponse), FailureResponse>;

pub enum SuccessResponse {
    Success(Rendered<String>),
    SeeOther(Box<Redirect>),
}

impl IntoResponse for SuccessResponse {
    fn into_response(self) -> Response {
        match self {
            SuccessResponse::Success(html) => {
                Html(html.into_inner()).into_response()
            }
            SuccessResponse::SeeOther(redirect) => redirect.into_response(),
        }
    }
}

#[derive(Debug)]
pub enum FailureResponse {
    NotFound(()),
    ServerError(()),
}

impl IntoResponse for FailureResponse {
    fn into_response(self) -> Response {
        match self {
            FailureResponse::NotFound(()) => {
                (StatusCode::NOT_FOUND, "Not found").into_response()
            }
            FailureResponse::ServerError(()) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                    .into_response()
            }
        }
    }
}

impl From<diesel::result::Error> for FailureResponse {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => FailureResponse::NotFound(()),
            e => {
                tracing::error!("database error: {e}");
                FailureResponse::ServerError(())
            }
        }
    }
}
