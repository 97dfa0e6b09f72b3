use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use scraper::{Html, Node, Selector};
use url::Url;

use super::{LoaderError, PageLoader};
use crate::models::ContentDocument;

pub const USER_AGENT: &str = "Mozilla/5.0";

// Subtrees whose text never reaches the reader.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("Failed to parse body selector"));

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("Failed to parse title selector"));

#[derive(Clone)]
pub struct WebPageLoader {
    client: Client,
}

impl WebPageLoader {
    /// `accept_invalid_certs` turns off TLS certificate verification for
    /// every page fetched by this loader. Only enable it when the operator
    /// has asked for it.
    pub fn new(timeout: Duration, accept_invalid_certs: bool) -> reqwest::Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .pool_max_idle_per_host(10)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch_html(&self, url: &str) -> Result<String, LoaderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoaderError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| LoaderError::fetch(url, e))
    }
}

#[async_trait]
impl PageLoader for WebPageLoader {
    #[tracing::instrument(skip(self, url), fields(url = %url))]
    async fn load_page(&self, url: &Url) -> Result<ContentDocument, LoaderError> {
        let html = self.fetch_html(url.as_str()).await?;
        tracing::debug!(bytes = html.len(), "Fetched page");

        let document = parse_page(&html).with_metadata("source", url.as_str());
        tracing::info!(chars = document.text.len(), "Extracted page text");
        Ok(document)
    }
}

/// Turns an HTML document into its visible body text plus its title.
pub fn parse_page(html: &str) -> ContentDocument {
    let document = Html::parse_document(html);

    let text = document
        .select(&BODY_SELECTOR)
        .next()
        .map(|body| format_text(&extract_text(body)))
        .unwrap_or_default();

    let mut content = ContentDocument::new(text);
    if let Some(title) = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
    {
        content = content.with_metadata("title", title);
    }
    content
}

fn extract_text(root: scraper::ElementRef<'_>) -> String {
    let mut out = String::new();

    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            // Block-level boundaries become line breaks so words do not fuse.
            if let Node::Element(el) = node.value() {
                if matches!(
                    el.name(),
                    "p" | "div" | "br" | "li" | "tr" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
                        | "section" | "article" | "header" | "footer" | "pre" | "blockquote"
                ) {
                    out.push('\n');
                }
            }
            continue;
        };

        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            out.push_str(text);
        }
    }

    out
}

/// Trims every line, collapses runs of inner whitespace and drops blank
/// lines.
pub fn format_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for line in text.lines() {
        let mut words = line.split_whitespace().peekable();
        if words.peek().is_none() {
            continue;
        }
        if !result.is_empty() {
            result.push('\n');
        }
        for (i, word) in words.enumerate() {
            if i > 0 {
                result.push(' ');
            }
            result.push_str(word);
        }
    }

    result
}
