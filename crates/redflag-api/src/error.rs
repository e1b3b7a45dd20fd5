use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use redflag_types::api::ErrorResponse;

/// Shown for any storage failure; the detail only goes to the log.
const RETRY_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, RETRY_MESSAGE)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<redflag_core::Error> for ApiError {
    fn from(err: redflag_core::Error) -> Self {
        match err {
            redflag_core::Error::Validation(message) => Self::new(StatusCode::BAD_REQUEST, message),
            redflag_core::Error::NotFound(message) => Self::new(StatusCode::NOT_FOUND, message),
            redflag_core::Error::Transient(detail) => {
                error!("Storage failure: {}", detail);
                Self::new(StatusCode::SERVICE_UNAVAILABLE, RETRY_MESSAGE)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}
