use std::sync::Arc;

use url::{Host, Url};

use crate::error::{AppError, Result};
use crate::llm::Summarizer;
use crate::loader::{PageLoader, VideoLoader};
use crate::models::{SourceKind, SummaryRequest, SummaryResult};

pub const PROMPT_TEMPLATE: &str = "
Provide summary of the following content in 100 to 300 words:
content: {text}";

const VIDEO_HOSTS: &[&str] = &["youtube.com", "youtu.be"];

/// Routes one submission to the right loader and hands the loaded text to
/// the summarizer. Holds no per-request state.
#[derive(Clone)]
pub struct RequestDispatcher {
    video: Arc<dyn VideoLoader>,
    page: Arc<dyn PageLoader>,
    summarizer: Arc<dyn Summarizer>,
    model: String,
}

impl RequestDispatcher {
    pub fn new(
        video: Arc<dyn VideoLoader>,
        page: Arc<dyn PageLoader>,
        summarizer: Arc<dyn Summarizer>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            video,
            page,
            summarizer,
            model: model.into(),
        }
    }

    #[tracing::instrument(skip_all, fields(url = %request.url.trim()))]
    pub async fn dispatch(&self, request: &SummaryRequest) -> Result<SummaryResult> {
        let url = validate(request)?;
        let source = classify(&url);
        tracing::info!(?source, "Loading content");

        let document = match source {
            SourceKind::Video => self
                .video
                .load_transcript(&url)
                .await
                .map_err(|e| AppError::ExecutionError(e.to_string()))?
                .filter(|doc| !doc.text.trim().is_empty())
                .ok_or(AppError::NoTranscriptError)?,
            // Page text is summarized even when empty.
            SourceKind::Page => self
                .page
                .load_page(&url)
                .await
                .map_err(|e| AppError::ExecutionError(e.to_string()))?,
        };

        let prompt = build_prompt(&document.text);
        tracing::info!(prompt_len = prompt.len(), model = %self.model, "Requesting summary");

        let text = self
            .summarizer
            .summarize(&prompt, &self.model, request.api_key.trim())
            .await
            .map_err(|e| AppError::ExecutionError(e.to_string()))?;

        Ok(SummaryResult {
            text,
            source,
            metadata: document.metadata,
        })
    }
}

/// Checks a submission before anything touches the network.
pub fn validate(request: &SummaryRequest) -> Result<Url> {
    let url = request.url.trim();
    if request.api_key.trim().is_empty() || url.is_empty() {
        return Err(AppError::ValidationError(
            "Please provide the required information".into(),
        ));
    }

    let invalid = || AppError::ValidationError("Invalid URL".into());
    let parsed = Url::parse(url).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || !has_public_host(&parsed) {
        return Err(invalid());
    }

    Ok(parsed)
}

// IP literals, or dotted domain names with no empty labels. Bare names such
// as `localhost` or `intranet` are rejected.
fn has_public_host(url: &Url) -> bool {
    match url.host() {
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        Some(Host::Domain(domain)) => {
            domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
        }
        None => false,
    }
}

pub fn classify(url: &Url) -> SourceKind {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    if VIDEO_HOSTS.iter().any(|video_host| host.contains(video_host)) {
        SourceKind::Video
    } else {
        SourceKind::Page
    }
}

/// Embeds the whole text in the fixed template. No chunking or truncation.
pub fn build_prompt(text: &str) -> String {
    PROMPT_TEMPLATE.replace("{text}", text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use crate::loader::LoaderError;
    use crate::models::ContentDocument;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Calls {
        video: Mutex<Vec<String>>,
        page: Mutex<Vec<String>>,
        prompts: Mutex<Vec<(String, String, String)>>,
    }

    struct StubVideo(Arc<Calls>, std::result::Result<Option<&'static str>, &'static str>);
    struct StubPage(Arc<Calls>, std::result::Result<&'static str, &'static str>);
    struct StubSummarizer(Arc<Calls>, std::result::Result<&'static str, u16>);

    #[async_trait]
    impl VideoLoader for StubVideo {
        async fn load_transcript(
            &self,
            url: &Url,
        ) -> std::result::Result<Option<ContentDocument>, LoaderError> {
            self.0.video.lock().unwrap().push(url.to_string());
            self.1
                .map(|text| text.map(ContentDocument::new))
                .map_err(|msg| LoaderError::InvalidVideoUrl(msg.into()))
        }
    }

    #[async_trait]
    impl PageLoader for StubPage {
        async fn load_page(&self, url: &Url) -> std::result::Result<ContentDocument, LoaderError> {
            self.0.page.lock().unwrap().push(url.to_string());
            self.1
                .map(ContentDocument::new)
                .map_err(|msg| LoaderError::Parse(msg.into()))
        }
    }

    #[async_trait]
    impl Summarizer for StubSummarizer {
        async fn summarize(
            &self,
            prompt: &str,
            model: &str,
            api_key: &str,
        ) -> std::result::Result<String, LlmError> {
            self.0
                .prompts
                .lock()
                .unwrap()
                .push((prompt.into(), model.into(), api_key.into()));
            self.1.map(String::from).map_err(|status| LlmError::Api {
                status,
                message: "invalid api key".into(),
            })
        }
    }

    fn dispatcher(
        video: std::result::Result<Option<&'static str>, &'static str>,
        page: std::result::Result<&'static str, &'static str>,
        summary: std::result::Result<&'static str, u16>,
    ) -> (RequestDispatcher, Arc<Calls>) {
        let calls = Arc::new(Calls::default());
        let dispatcher = RequestDispatcher::new(
            Arc::new(StubVideo(calls.clone(), video)),
            Arc::new(StubPage(calls.clone(), page)),
            Arc::new(StubSummarizer(calls.clone(), summary)),
            "test-model",
        );
        (dispatcher, calls)
    }

    fn untouched(calls: &Calls) -> bool {
        calls.video.lock().unwrap().is_empty()
            && calls.page.lock().unwrap().is_empty()
            && calls.prompts.lock().unwrap().is_empty()
    }

    #[tokio::test]
    async fn blank_inputs_fail_validation_without_network() {
        let cases = [
            ("", "key"),
            ("   ", "key"),
            ("https://example.com", ""),
            ("https://example.com", " \t "),
            ("", ""),
        ];
        for (url, key) in cases {
            let (d, calls) = dispatcher(Ok(Some("t")), Ok("p"), Ok("s"));
            let err = d.dispatch(&SummaryRequest::new(url, key)).await.unwrap_err();
            assert!(
                matches!(err, AppError::ValidationError(_)),
                "{url:?}/{key:?} gave {err:?}"
            );
            assert!(untouched(&calls));
        }
    }

    #[tokio::test]
    async fn malformed_url_fails_validation() {
        let urls = [
            "not-a-url",
            "ftp://example.com/file",
            "http://",
            "mailto:a@b.c",
            "example.com",
            "http://localhost",
            "http://localhost:8080/admin",
            "http://intranet/x",
            "https://example..com",
        ];
        for url in urls {
            let (d, calls) = dispatcher(Ok(Some("t")), Ok("p"), Ok("s"));
            let err = d
                .dispatch(&SummaryRequest::new(url, "valid-key"))
                .await
                .unwrap_err();
            assert!(
                matches!(err, AppError::ValidationError(ref m) if m == "Invalid URL"),
                "{url}"
            );
            assert!(untouched(&calls));
        }
    }

    #[test]
    fn dotted_domains_and_ip_literals_are_valid() {
        for url in [
            "https://example.com",
            "http://sub.example.co.uk:8080/path?q=1",
            "http://192.168.1.10/page",
            "http://[::1]:3000/",
            "https://youtu.be/abc123",
        ] {
            assert!(validate(&SummaryRequest::new(url, "k")).is_ok(), "{url}");
        }
    }

    #[test]
    fn classifies_by_host() {
        let kind = |s: &str| classify(&Url::parse(s).unwrap());
        assert_eq!(kind("https://youtu.be/abc123"), SourceKind::Video);
        assert_eq!(kind("https://www.youtube.com/watch?v=x"), SourceKind::Video);
        assert_eq!(kind("https://m.YouTube.com/shorts/x"), SourceKind::Video);
        assert_eq!(kind("https://example.com/youtube.com"), SourceKind::Page);
        assert_eq!(kind("https://vimeo.com/123"), SourceKind::Page);
    }

    #[tokio::test]
    async fn video_url_end_to_end() {
        let (d, calls) = dispatcher(
            Ok(Some("hello world transcript")),
            Ok("p"),
            Ok("A summary."),
        );
        let result = d
            .dispatch(&SummaryRequest::new("https://youtu.be/abc123", "valid-key"))
            .await
            .unwrap();

        assert_eq!(result.text, "A summary.");
        assert_eq!(result.source, SourceKind::Video);
        assert_eq!(*calls.video.lock().unwrap(), vec!["https://youtu.be/abc123"]);
        assert!(calls.page.lock().unwrap().is_empty());

        let prompts = calls.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        let (prompt, model, key) = &prompts[0];
        assert_eq!(prompt, &build_prompt("hello world transcript"));
        assert!(prompt.ends_with("content: hello world transcript"));
        assert_eq!(model, "test-model");
        assert_eq!(key, "valid-key");
    }

    #[tokio::test]
    async fn missing_transcript_is_reported_as_such() {
        for transcript in [None, Some("  ")] {
            let (d, calls) = dispatcher(Ok(transcript), Ok("p"), Ok("s"));
            let err = d
                .dispatch(&SummaryRequest::new("https://www.youtube.com/watch?v=x", "k"))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::NoTranscriptError));
            assert!(calls.prompts.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn video_loader_failure_is_execution_error_not_missing_transcript() {
        let (d, calls) = dispatcher(Err("watch page unavailable"), Ok("p"), Ok("s"));
        let err = d
            .dispatch(&SummaryRequest::new("https://www.youtube.com/watch?v=x", "k"))
            .await
            .unwrap_err();
        match err {
            AppError::ExecutionError(msg) => {
                assert!(msg.contains("watch page unavailable"), "{msg}")
            }
            other => panic!("expected ExecutionError, got {other:?}"),
        }
        assert_eq!(calls.video.lock().unwrap().len(), 1);
        assert!(calls.page.lock().unwrap().is_empty());
        assert!(calls.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn other_urls_use_page_loader() {
        let (d, calls) = dispatcher(Ok(Some("t")), Ok("page body"), Ok("s"));
        let result = d
            .dispatch(&SummaryRequest::new(" https://example.com/post ", "k"))
            .await
            .unwrap();
        assert_eq!(result.source, SourceKind::Page);
        assert!(calls.video.lock().unwrap().is_empty());
        assert_eq!(*calls.page.lock().unwrap(), vec!["https://example.com/post"]);
        assert!(calls.prompts.lock().unwrap()[0].0.ends_with("content: page body"));
    }

    #[tokio::test]
    async fn empty_page_is_still_summarized() {
        let (d, calls) = dispatcher(Ok(Some("t")), Ok(""), Ok("s"));
        let result = d
            .dispatch(&SummaryRequest::new("https://example.com", "k"))
            .await;
        assert!(result.is_ok());
        assert_eq!(calls.prompts.lock().unwrap()[0].0, build_prompt(""));
    }

    #[tokio::test]
    async fn page_loader_failure_is_execution_error() {
        let (d, calls) = dispatcher(Ok(Some("t")), Err("connection reset"), Ok("s"));
        let err = d
            .dispatch(&SummaryRequest::new("https://example.com", "k"))
            .await
            .unwrap_err();
        match err {
            AppError::ExecutionError(msg) => assert!(msg.contains("connection reset"), "{msg}"),
            other => panic!("expected ExecutionError, got {other:?}"),
        }
        assert!(calls.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn summarizer_failure_is_execution_error() {
        let (d, _) = dispatcher(Ok(Some("t")), Ok("p"), Err(401));
        let err = d
            .dispatch(&SummaryRequest::new("https://example.com", "bad-key"))
            .await
            .unwrap_err();
        match err {
            AppError::ExecutionError(msg) => {
                assert!(msg.contains("401"), "{msg}");
                assert!(msg.contains("invalid api key"), "{msg}");
            }
            other => panic!("expected ExecutionError, got {other:?}"),
        }
    }

    #[test]
    fn prompt_embeds_text_verbatim() {
        let prompt = build_prompt("a {text} b");
        assert_eq!(
            prompt,
            "\nProvide summary of the following content in 100 to 300 words:\ncontent: a {text} b"
        );
    }
}
