pub mod youtube_api;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

pub use youtube_api::YouTubeApiResolver;

/// Metadata de un track tal como la devuelve el resolver.
///
/// The cache stores this as JSON and hands it back untouched, so every field
/// must survive a serde round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub video_id: String,
    pub title: String,
    pub url: String,
    pub artist: Option<String>,
    /// Duración en segundos
    pub duration: Option<u64>,
    pub thumbnail: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub source: String,
}

impl TrackMetadata {
    pub fn new(video_id: String, title: String, url: String) -> Self {
        Self {
            video_id,
            title,
            url,
            artist: None,
            duration: None,
            thumbnail: None,
            published_at: None,
            source: "youtube".to_string(),
        }
    }

    pub fn with_artist(mut self, artist: String) -> Self {
        self.artist = Some(artist);
        self
    }

    pub fn with_duration(mut self, seconds: u64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: String) -> Self {
        self.thumbnail = Some(thumbnail);
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }
}

/// Resultado de búsqueda, ordenado por relevancia.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCandidate {
    /// Enlace que `fetch_by_identifier` sabe resolver
    pub link: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub max_results: usize,
}

/// Trait común para los resolvers de metadata
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Obtiene metadata para un identificador o URL exacto
    async fn fetch_by_identifier(&self, id: &str) -> Result<TrackMetadata, ResolveError>;

    /// Busca por texto libre; la lista puede venir vacía
    async fn search(
        &self,
        text: &str,
        options: SearchOptions,
    ) -> Result<Vec<SearchCandidate>, ResolveError>;

    /// Nombre del resolver para logs
    fn name(&self) -> &'static str;
}
