use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::AuthError;
use crate::api::ErrorResponse;

/// Message sent for every 5xx; the cause is logged, never returned.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// converts `AuthError` into the `{code, error}` envelope
#[derive(Debug)]
pub struct AppError(pub AuthError);

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

pub(crate) fn status_for(err: &AuthError) -> StatusCode {
    match err {
        AuthError::Validation(_) => StatusCode::BAD_REQUEST,
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::Unauthorized | AuthError::Forbidden | AuthError::UsernameTaken => {
            StatusCode::FORBIDDEN
        }
        AuthError::UserNotFound => StatusCode::NOT_FOUND,
        AuthError::DatabaseError(_)
        | AuthError::ConfigurationError(_)
        | AuthError::PasswordHashError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn error_body(err: &AuthError) -> (StatusCode, ErrorResponse) {
    let status = status_for(err);
    let message = if status.is_server_error() {
        log::error!(target: "draconic::api", "msg=\"request failed\" error=\"{err}\"");
        INTERNAL_ERROR_MESSAGE.to_owned()
    } else {
        err.to_string()
    };
    (status, ErrorResponse::new(status.as_u16(), message))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = error_body(&self.0);
        (status, Json(body)).into_response()
    }
}
