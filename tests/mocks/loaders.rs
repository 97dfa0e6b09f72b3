use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_web_summarizer::loader::{LoaderError, PageLoader, VideoLoader};
use rust_web_summarizer::models::ContentDocument;
use url::Url;

#[derive(Clone, Default)]
pub struct MockVideoLoader {
    pub document: Option<ContentDocument>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockVideoLoader {
    pub fn with_transcript(text: &str) -> Self {
        Self {
            document: Some(
                ContentDocument::new(text)
                    .with_metadata("title", "Test Video")
                    .with_metadata("author", "Test Channel"),
            ),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn without_transcript() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoLoader for MockVideoLoader {
    async fn load_transcript(&self, url: &Url) -> Result<Option<ContentDocument>, LoaderError> {
        self.calls.lock().unwrap().push(url.to_string());
        Ok(self.document.clone())
    }
}

#[derive(Clone, Default)]
pub struct MockPageLoader {
    pub text: String,
    pub fail_with: Option<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockPageLoader {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl PageLoader for MockPageLoader {
    async fn load_page(&self, url: &Url) -> Result<ContentDocument, LoaderError> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(LoaderError::Parse(msg.clone()));
        }
        Ok(ContentDocument::new(self.text.clone()).with_metadata("source", url.as_str()))
    }
}
