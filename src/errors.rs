use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid deadline: {0}")]
    InvalidDeadline(String),

    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    #[error("year out of range: {0}")]
    InvalidYear(i32),
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("task not found: {0}")]
    NotFound(String),

    /// The user rejected an irreversible action; nothing was changed.
    #[error("confirmation declined")]
    ConfirmationDeclined,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            TrackerError::ConfirmationDeclined => {
                debug!("action aborted, confirmation declined");
                return StatusCode::NO_CONTENT.into_response();
            }
            TrackerError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            TrackerError::NotFound(id) => (StatusCode::NOT_FOUND, format!("task not found: {id}")),
            TrackerError::Io(err) => {
                error!("io error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "failed to access state file".to_string())
            }
            TrackerError::Json(err) => {
                error!("serialization error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "failed to encode state".to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
