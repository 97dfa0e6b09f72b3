use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::response::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(String),

    #[error("No transcript available for this video.")]
    NoTranscriptError,

    #[error("Exception: {0}")]
    ExecutionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NoTranscriptError => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ExecutionError(_) => StatusCode::BAD_GATEWAY,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiResponse::<()>::error(self.status_code(), self.to_string()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
