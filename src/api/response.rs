use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;

/// `{ data, meta }` envelope shared by every JSON endpoint.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub meta: ResponseMeta,
    #[serde(skip)]
    status: StatusCode,
}

#[derive(Serialize)]
pub struct ResponseMeta {
    pub status: &'static str,
    pub status_code: u16,
    pub timestamp: String,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::build(StatusCode::OK, Some(data), None)
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self::build(status, None, Some(message.into()))
    }

    fn build(status: StatusCode, data: Option<T>, message: Option<String>) -> Self {
        Self {
            data,
            meta: ResponseMeta {
                status: if status.is_success() { "success" } else { "error" },
                status_code: status.as_u16(),
                timestamp: Utc::now().to_rfc3339(),
                message,
            },
            status,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
