pub mod api;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod llm;
pub mod loader;
pub mod models;

use std::sync::Arc;

use config::Config;
use dispatcher::RequestDispatcher;
use error::{AppError, Result};
use llm::ChatCompletionsClient;
use loader::{WebPageLoader, YoutubeLoader};

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Arc<RequestDispatcher>,
}

impl AppState {
    pub fn new(config: Config, dispatcher: RequestDispatcher) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Wires the production loaders and LLM client from `config`.
    pub fn from_config(config: Config) -> Result<Self> {
        let client_error = |e: reqwest::Error| AppError::ConfigError(format!("HTTP client: {}", e));

        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled for page fetches");
        }

        let video = YoutubeLoader::new(config.fetch_timeout)
            .map_err(client_error)?
            .with_language(config.caption_language.clone());
        let page = WebPageLoader::new(config.fetch_timeout, config.accept_invalid_certs)
            .map_err(client_error)?;
        let llm_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(client_error)?;
        let summarizer =
            ChatCompletionsClient::new(config.llm_base_url.clone()).with_client(llm_client);

        let dispatcher = RequestDispatcher::new(
            Arc::new(video),
            Arc::new(page),
            Arc::new(summarizer),
            config.llm_model.clone(),
        );

        Ok(Self::new(config, dispatcher))
    }
}
