use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::ReservationError;
use thiserror::Error;
use tracing::{error, warn};

/// Error returned by reservation handlers; rendered as `{"error", "detail"}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", Some(detail.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.title.to_string(), detail: self.detail };
        (self.status, Json(body)).into_response()
    }
}

impl From<ReservationError> for ApiError {
    fn from(err: ReservationError) -> Self {
        let code = err.code();
        match err {
            ReservationError::NoAvailability { .. } => {
                Self::new(StatusCode::CONFLICT, "No Availability", Some(err.to_string()))
            }
            ReservationError::Validation(msg) => {
                Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg))
            }
            ReservationError::Timeout(what) => {
                warn!(code, what, "reservation request timed out");
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "Timeout", Some(format!("{what} timed out")))
            }
            other => {
                // storage details stay in the logs
                error!(code, error = %other, "reservation request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", None)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
}
