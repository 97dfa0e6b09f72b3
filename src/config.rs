use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.1-8b-instant";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub llm_base_url: String,
    pub llm_model: String,
    /// Skip TLS certificate verification when fetching generic pages.
    /// Off unless `ACCEPT_INVALID_CERTS=true` is set explicitly.
    pub accept_invalid_certs: bool,
    /// Preferred caption language for video transcripts.
    pub caption_language: String,
    pub fetch_timeout: Duration,
    pub request_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source, falling back to
    /// defaults for anything unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port
            .parse::<u16>()
            .map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let llm_base_url = lookup("LLM_BASE_URL")
            .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        url::Url::parse(&llm_base_url)
            .map_err(|e| AppError::ConfigError(format!("Invalid LLM_BASE_URL: {}", e)))?;

        let llm_model = lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string());

        let accept_invalid_certs = match lookup("ACCEPT_INVALID_CERTS") {
            Some(v) => parse_bool(&v).ok_or_else(|| {
                AppError::ConfigError(format!("Invalid ACCEPT_INVALID_CERTS: {}", v))
            })?,
            None => false,
        };

        let caption_language = lookup("CAPTION_LANGUAGE")
            .map(|l| l.trim().to_ascii_lowercase())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "en".to_string());

        let fetch_timeout = parse_secs(&lookup, "FETCH_TIMEOUT_SECS", 15)?;
        let request_timeout = parse_secs(&lookup, "REQUEST_TIMEOUT_SECS", 120)?;

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            llm_base_url,
            llm_model,
            accept_invalid_certs,
            caption_language,
            fetch_timeout,
            request_timeout,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<Duration> {
    let Some(raw) = lookup(key) else {
        return Ok(Duration::from_secs(default));
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(AppError::ConfigError(format!("Invalid {}: {}", key, raw))),
    }
}
