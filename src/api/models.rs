use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{SourceKind, SummaryResult};

#[derive(Serialize)]
pub struct SummarizeResponse {
    pub url: String,
    pub summary: String,
    pub source: SourceKind,
    pub metadata: BTreeMap<String, String>,
    pub summarized_at: DateTime<Utc>,
    pub word_count: usize,
}

impl SummarizeResponse {
    pub fn new(url: &str, result: SummaryResult) -> Self {
        Self {
            url: url.trim().to_string(),
            word_count: result.text.split_whitespace().count(),
            summary: result.text,
            source: result.source,
            metadata: result.metadata,
            summarized_at: Utc::now(),
        }
    }
}
