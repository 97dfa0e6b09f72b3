use std::time::Instant;

use axum::{
    Router,
    extract::{Json, State},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::api::form::{index_handler, submit_handler};
use crate::api::models::SummarizeResponse;
use crate::api::response::ApiResponse;
use crate::error::{AppError, Result};
use crate::models::{SummaryRequest, SummaryResult};

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler).post(submit_handler))
        .route("/api/summarize", post(summarize_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn summarize_handler(
    State(state): State<AppState>,
    Json(req): Json<SummaryRequest>,
) -> Result<ApiResponse<SummarizeResponse>> {
    let result = run_summary(&state, &req).await?;
    Ok(ApiResponse::success(SummarizeResponse::new(&req.url, result)))
}

/// Runs one submission through the dispatcher under the overall request
/// timeout.
pub(crate) async fn run_summary(state: &AppState, req: &SummaryRequest) -> Result<SummaryResult> {
    let start_time = Instant::now();

    let result = tokio::time::timeout(
        state.config.request_timeout,
        state.dispatcher.dispatch(req),
    )
    .await
    .unwrap_or_else(|_| {
        Err(AppError::ExecutionError(
            "Request processing timed out".to_string(),
        ))
    });

    let elapsed = start_time.elapsed();
    match &result {
        Ok(summary) => tracing::info!(
            url = %req.url.trim(),
            source = ?summary.source,
            ?elapsed,
            "Summary ready"
        ),
        Err(err) => tracing::warn!(url = %req.url.trim(), error = %err, ?elapsed, "Summary failed"),
    }

    result
}
