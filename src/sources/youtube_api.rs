use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

use super::{Resolver, SearchCandidate, SearchOptions, TrackMetadata};
use crate::error::ResolveError;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

static BARE_VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("video id pattern is valid")
});

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    channel_title: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    maxres: Option<Thumbnail>,
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

impl Thumbnails {
    fn best(self) -> Option<String> {
        self.maxres
            .or(self.high)
            .or(self.medium)
            .or(self.default)
            .map(|t| t.url)
    }
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<Video>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Video {
    id: String,
    snippet: Snippet,
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

/// Resolver sobre la YouTube Data API v3.
pub struct YouTubeApiResolver {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl YouTubeApiResolver {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ResolveError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!("❌ YouTube API error: {} - {}", status, body);
            return Err(ResolveError::Api { status, body });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ResolveError::MalformedResponse(e.to_string()))
    }

    /// Extrae el ID de video de una URL de YouTube o de un ID suelto.
    ///
    /// Accepts `watch?v=`, `youtu.be/`, `embed/`, `shorts/` and `v/` forms, with
    /// or without a scheme.
    pub fn extract_video_id(input: &str) -> Result<String, ResolveError> {
        let input = input.trim();
        if BARE_VIDEO_ID.is_match(input) {
            return Ok(input.to_string());
        }

        let with_scheme = if input.contains("://") {
            input.to_string()
        } else {
            format!("https://{}", input)
        };
        let invalid = || ResolveError::InvalidIdentifier(input.to_string());

        let parsed = Url::parse(&with_scheme).map_err(|_| invalid())?;
        let host = parsed.host_str().ok_or_else(invalid)?;
        let mut segments = parsed.path_segments().ok_or_else(invalid)?;

        let id = match host {
            "youtu.be" | "www.youtu.be" => segments.next().map(str::to_string),
            "youtube.com" | "www.youtube.com" | "m.youtube.com" | "music.youtube.com" => {
                match segments.next() {
                    Some("watch") => parsed
                        .query_pairs()
                        .find(|(k, _)| k == "v")
                        .map(|(_, v)| v.into_owned()),
                    Some("embed" | "shorts" | "v" | "live") => segments.next().map(str::to_string),
                    _ => None,
                }
            }
            _ => None,
        };

        id.filter(|id| !id.is_empty()).ok_or_else(invalid)
    }

    /// Parsea duración ISO 8601 (PT1H2M3S) a segundos.
    ///
    /// Returns `None` for malformed input or values that overflow `u64`.
    pub fn parse_duration(duration: &str) -> Option<u64> {
        let rest = duration.strip_prefix('P')?;
        let (date_part, time_part) = match rest.split_once('T') {
            Some((date, time)) => (date, time),
            None => (rest, ""),
        };

        let mut total = 0u64;
        let mut current = String::new();

        for ch in date_part.chars() {
            match ch {
                'D' => {
                    total = Self::add_component(total, &current, 86_400)?;
                    current.clear();
                }
                c if c.is_ascii_digit() => current.push(c),
                // Años/meses/semanas no aparecen en videos
                _ => return None,
            }
        }

        for ch in time_part.chars() {
            let unit = match ch {
                'H' => 3600,
                'M' => 60,
                'S' => 1,
                c if c.is_ascii_digit() => {
                    current.push(c);
                    continue;
                }
                _ => return None,
            };
            total = Self::add_component(total, &current, unit)?;
            current.clear();
        }

        current.is_empty().then_some(total)
    }

    fn add_component(total: u64, digits: &str, unit: u64) -> Option<u64> {
        let value = digits.parse::<u64>().ok()?.checked_mul(unit)?;
        total.checked_add(value)
    }

    fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", video_id)
    }

    fn video_to_metadata(video: Video) -> TrackMetadata {
        let url = Self::watch_url(&video.id);
        let snippet = video.snippet;

        let mut track = TrackMetadata::new(video.id, snippet.title, url);

        if let Some(artist) = snippet.channel_title {
            track = track.with_artist(artist);
        }
        if let Some(thumb) = snippet.thumbnails.best() {
            track = track.with_thumbnail(thumb);
        }
        if let Some(published_at) = snippet.published_at {
            track = track.with_published_at(published_at);
        }
        if let Some(seconds) = video
            .content_details
            .and_then(|details| Self::parse_duration(&details.duration))
        {
            track = track.with_duration(seconds);
        }

        track
    }

    fn search_to_candidates(response: SearchResponse) -> Vec<SearchCandidate> {
        response
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                Some(SearchCandidate {
                    link: Self::watch_url(&video_id),
                    title: item.snippet.title,
                })
            })
            .collect()
    }
}

#[async_trait]
impl Resolver for YouTubeApiResolver {
    async fn fetch_by_identifier(&self, id: &str) -> Result<TrackMetadata, ResolveError> {
        let video_id = Self::extract_video_id(id)?;
        debug!("🎯 Obteniendo video {} desde YouTube API", video_id);

        let response: VideosResponse = self
            .get_json(
                "videos",
                &[("part", "snippet,contentDetails"), ("id", video_id.as_str())],
            )
            .await?;

        let video = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ResolveError::NotFound(video_id.clone()))?;

        Ok(Self::video_to_metadata(video))
    }

    async fn search(
        &self,
        text: &str,
        options: SearchOptions,
    ) -> Result<Vec<SearchCandidate>, ResolveError> {
        debug!("🔍 Búsqueda YouTube API v3: {}", text);

        let max_results = options.max_results.to_string();
        let response: SearchResponse = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("type", "video"),
                    ("q", text),
                    ("maxResults", max_results.as_str()),
                    ("order", "relevance"),
                ],
            )
            .await?;

        let candidates = Self::search_to_candidates(response);
        info!("✅ YouTube API v3: {} resultados para '{}'", candidates.len(), text);
        Ok(candidates)
    }

    fn name(&self) -> &'static str {
        "YouTube API v3"
    }
}
