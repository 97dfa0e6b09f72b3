pub mod page;
pub mod youtube;

use async_trait::async_trait;
use url::Url;

use crate::models::ContentDocument;

pub use page::WebPageLoader;
pub use youtube::YoutubeLoader;

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Could not find a video id in {0}")]
    InvalidVideoUrl(String),
    #[error("Error parsing content: {0}")]
    Parse(String),
}

impl LoaderError {
    pub(crate) fn fetch(url: &str, source: reqwest::Error) -> Self {
        LoaderError::Fetch {
            url: url.to_string(),
            source,
        }
    }
}

/// Produces a transcript for a video url. `Ok(None)` means the video has
/// no transcript to offer.
#[async_trait]
pub trait VideoLoader: Send + Sync {
    async fn load_transcript(&self, url: &Url) -> Result<Option<ContentDocument>, LoaderError>;
}

/// Produces the readable text of an arbitrary web page.
#[async_trait]
pub trait PageLoader: Send + Sync {
    async fn load_page(&self, url: &Url) -> Result<ContentDocument, LoaderError>;
}
