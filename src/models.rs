use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One user submission: the page or video to summarize and the key used to
/// call the LLM on the user's behalf.
#[derive(Clone, Default, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default, alias = "apiKey")]
    pub api_key: String,
}

impl SummaryRequest {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
        }
    }
}

// Keep the key out of logs and panic messages.
impl std::fmt::Debug for SummaryRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryRequest")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Video,
    Page,
}

/// Text pulled out of a page or video, with whatever the loader learned
/// about its origin.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentDocument {
    pub text: String,
    pub metadata: BTreeMap<String, String>,
}

impl ContentDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SummaryResult {
    pub text: String,
    pub source: SourceKind,
    pub metadata: BTreeMap<String, String>,
}
