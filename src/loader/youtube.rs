//! Transcript loading for YouTube videos.
//!
//! The watch page embeds a `ytInitialPlayerResponse` JSON object that lists
//! the caption tracks available for the video. The chosen track's timed-text
//! XML is fetched and flattened into plain text.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::{LoaderError, VideoLoader};
use crate::models::ContentDocument;

pub const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

static PLAYER_RESPONSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)ytInitialPlayerResponse\s*=\s*(\{.+?\})\s*;\s*(?:var\s|</script>)")
        .expect("Failed to compile player response regex")
});

static VIDEO_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Failed to compile video id regex"));

static CUE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("text, p").expect("Failed to parse cue selector"));

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    #[serde(default)]
    pub language_code: String,
    /// `"asr"` for auto-generated tracks.
    #[serde(default)]
    pub kind: Option<String>,
}

#[derive(Clone)]
pub struct YoutubeLoader {
    client: Client,
    base_url: String,
    language: String,
}

impl YoutubeLoader {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            base_url: YOUTUBE_BASE_URL.into(),
            language: "en".into(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    async fn get_text(&self, url: &str) -> Result<String, LoaderError> {
        let response = self
            .client
            .get(url)
            .header("Accept-Language", accept_language(&self.language))
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
impl VideoLoader for YoutubeLoader {
    #[tracing::instrument(skip(self, url), fields(url = %url))]
    async fn load_transcript(&self, url: &Url) -> Result<Option<ContentDocument>, LoaderError> {
        let video_id =
            video_id(url).ok_or_else(|| LoaderError::InvalidVideoUrl(url.to_string()))?;

        let watch_url = format!("{}/watch?v={}", self.base_url, video_id);
        let page = self.get_text(&watch_url).await?;
        let player = extract_player_response(&page)?;

        let tracks = caption_tracks(&player);
        let Some(track) = pick_track(&tracks, &self.language) else {
            tracing::info!(video_id = %video_id, "Video has no caption tracks");
            return Ok(None);
        };
        tracing::debug!(
            video_id = %video_id,
            language = %track.language_code,
            auto_generated = track.kind.as_deref() == Some("asr"),
            "Selected caption track"
        );

        let xml = self.get_text(&track.base_url).await?;
        let text = parse_timed_text(&xml);
        if text.is_empty() {
            tracing::info!(video_id = %video_id, "Caption track is empty");
            return Ok(None);
        }

        let mut document = ContentDocument::new(text)
            .with_metadata("source", url.as_str())
            .with_metadata("video_id", video_id.as_str());
        document.metadata.extend(video_info(&player));

        tracing::info!(video_id = %video_id, chars = document.text.len(), "Loaded transcript");
        Ok(Some(document))
    }
}

/// Asks YouTube for pages in the caption language, with English as fallback.
pub fn accept_language(language: &str) -> String {
    if language == "en" {
        "en-US,en;q=0.9".to_string()
    } else {
        format!("{},en;q=0.8", language)
    }
}

/// Pulls the video id out of the url shapes YouTube hands out.
pub fn video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    let id = if host.contains("youtu.be") {
        segments.next().map(str::to_string)
    } else {
        match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            Some("shorts" | "embed" | "live" | "v") => segments.next().map(str::to_string),
            _ => None,
        }
    }?;

    VIDEO_ID_RE.is_match(&id).then_some(id)
}

pub fn extract_player_response(page: &str) -> Result<Value, LoaderError> {
    let json = PLAYER_RESPONSE_RE
        .captures(page)
        .and_then(|c| c.get(1))
        .ok_or_else(|| {
            LoaderError::Parse("ytInitialPlayerResponse not found in watch page".into())
        })?;

    serde_json::from_str(json.as_str())
        .map_err(|e| LoaderError::Parse(format!("Invalid ytInitialPlayerResponse: {}", e)))
}

pub fn caption_tracks(player: &Value) -> Vec<CaptionTrack> {
    player["captions"]["playerCaptionsTracklistRenderer"]["captionTracks"]
        .as_array()
        .map(|tracks| {
            tracks
                .iter()
                .filter_map(|t| serde_json::from_value::<CaptionTrack>(t.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Prefers a hand-written track in `language`, then an auto-generated one,
/// then whatever comes first.
pub fn pick_track<'a>(tracks: &'a [CaptionTrack], language: &str) -> Option<&'a CaptionTrack> {
    let in_language = |t: &&CaptionTrack| t.language_code.split('-').next() == Some(language);
    let is_asr = |t: &&CaptionTrack| t.kind.as_deref() == Some("asr");

    tracks
        .iter()
        .filter(in_language)
        .find(|t| !is_asr(t))
        .or_else(|| tracks.iter().find(in_language))
        .or_else(|| tracks.first())
}

fn video_info(player: &Value) -> Vec<(String, String)> {
    let details = &player["videoDetails"];
    [
        ("title", "title"),
        ("author", "author"),
        ("channel_id", "channelId"),
        ("length_seconds", "lengthSeconds"),
        ("view_count", "viewCount"),
    ]
    .into_iter()
    .filter_map(|(key, field)| {
        details[field]
            .as_str()
            .map(|value| (key.to_string(), value.to_string()))
    })
    .collect()
}

/// Flattens timed-text XML (`<text>` cues, or `<p>` cues in srv3) into one
/// line of text.
pub fn parse_timed_text(xml: &str) -> String {
    let fragment = Html::parse_fragment(xml);

    fragment
        .select(&CUE_SELECTOR)
        .map(|cue| decode_entities(&cue.text().collect::<String>()))
        .flat_map(|cue| {
            cue.split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// Caption text is frequently escaped twice (`&amp;#39;`), so one parse pass
// leaves entities behind.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    Html::parse_fragment(text)
        .root_element()
        .text()
        .collect()
}
