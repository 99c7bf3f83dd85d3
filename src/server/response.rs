//! Responses shared by the handlers, and the conversion of errors into responses.

use crate::error::ErrorType;
use crate::Error;
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

/// The `{"status": ...}` acknowledgement returned by the mutating API routes.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Status<'a> {
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<'a> Status<'a> {
    pub(crate) fn ok(status: &'a str) -> Self {
        Self {
            status,
            message: None,
        }
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: Some(message.into()),
        }
    }
}

/// A `302 Found` pointing at `location`, with no body.
pub(crate) fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}

/// A JSON error response, e.g. `{"status":"error","message":"..."}`.
pub(crate) fn error_status(status: StatusCode, message: &str) -> Response {
    (status, Json(Status::error(message))).into_response()
}

/// The error type returned by handlers. Errors tagged `ErrorType::Request` are the caller's fault
/// and become `400 Bad Request` carrying the error message. Anything else is a `500` and the
/// details are only logged.
#[derive(Debug)]
pub(crate) struct HandlerError(Error);

pub(crate) type HandlerResult<T> = std::result::Result<T, HandlerError>;

impl<E> From<E> for HandlerError
where
    E: Into<Error>,
{
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let e = self.0;
        match ErrorType::of(&e) {
            Some(ErrorType::Request) => {
                warn!("Rejecting request: {e:#}");
                error_status(StatusCode::BAD_REQUEST, &root_message(&e))
            }
            _ => {
                error!("Request failed: {e:#}");
                error_status(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

/// The message to show a client. `pub_result` attaches the `ErrorType` as the outermost layer, so
/// it is skipped.
fn root_message(e: &Error) -> String {
    e.chain()
        .skip(1)
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}
