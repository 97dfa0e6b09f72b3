use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_web_summarizer::llm::{LlmError, Summarizer};

#[derive(Clone)]
pub struct MockSummarizer {
    pub summary: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<(u16, String)>,
    pub delay: Option<Duration>,
}

impl MockSummarizer {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
            delay: None,
        }
    }

    pub fn failing(status: u16, msg: &str) -> Self {
        Self {
            fail_with: Some((status, msg.to_string())),
            ..Self::new("")
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new("too late")
        }
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(
        &self,
        prompt: &str,
        _model: &str,
        _api_key: &str,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some((status, ref message)) = self.fail_with {
            return Err(LlmError::Api {
                status,
                message: message.clone(),
            });
        }
        Ok(self.summary.clone())
    }
}
