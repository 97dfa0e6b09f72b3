use askama::Template;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::AppState;
use crate::api::routes::run_summary;
use crate::models::{SourceKind, SummaryRequest, SummaryResult};

#[derive(Template, Default)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub url: String,
    pub api_key: String,
    pub api_key_missing: bool,
    pub summary: Option<String>,
    pub video_title: Option<String>,
    pub video_author: Option<String>,
    pub error: Option<String>,
}

impl IndexPage {
    fn for_request(request: &SummaryRequest) -> Self {
        Self {
            url: request.url.clone(),
            api_key: request.api_key.clone(),
            api_key_missing: request.api_key.trim().is_empty(),
            ..Default::default()
        }
    }

    fn with_result(mut self, result: SummaryResult) -> Self {
        if result.source == SourceKind::Video {
            self.video_title = result.metadata.get("title").cloned();
            self.video_author = result.metadata.get("author").cloned();
        }
        self.summary = Some(result.text);
        self
    }
}

impl IntoResponse for IndexPage {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render page");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
            }
        }
    }
}

pub async fn index_handler() -> IndexPage {
    IndexPage {
        api_key_missing: true,
        ..Default::default()
    }
}

/// Form submissions always come back as the page itself, carrying either the
/// summary or a one-line error, so the user can fix the input and resubmit.
pub async fn submit_handler(
    State(state): State<AppState>,
    Form(request): Form<SummaryRequest>,
) -> IndexPage {
    let page = IndexPage::for_request(&request);

    match run_summary(&state, &request).await {
        Ok(result) => page.with_result(result),
        Err(err) => IndexPage {
            error: Some(err.to_string()),
            ..page
        },
    }
}
