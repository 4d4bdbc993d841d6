//! # Cache Module
//!
//! Cache-aside lookup of track metadata.
//!
//! [`QueryCache`] sits between callers and two collaborators: a [`Store`]
//! (key-value with expiry) and a [`Resolver`] (search plus direct fetch).
//! Every lookup follows the same path:
//!
//! 1. **Normalize**: trim, lowercase, cap at [`MAX_QUERY_LENGTH`] characters.
//!    The result is both the store key and the resolver input.
//! 2. **Store read**: a hit is decoded and returned. A failed read fails the
//!    lookup; there is no fallback to the resolver.
//! 3. **Resolve**: direct links go straight to `fetch_by_identifier`, free text
//!    goes through `search` (best candidate only) and then a fetch.
//! 4. **Write-back**: the metadata is stored as JSON for [`DEFAULT_CACHE_TTL`].
//!    A failed write is logged and otherwise ignored.
//!
//! Each completed lookup bumps exactly one of the hit, fetch or error counters
//! exposed by [`QueryCache::stats`].
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::{sync::Arc, time::Duration};
//! use track_lookup::cache::QueryCache;
//! use track_lookup::sources::YouTubeApiResolver;
//! use track_lookup::store::MemoryStore;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let resolver = YouTubeApiResolver::new(
//!     "api-key".to_string(),
//!     "https://www.googleapis.com/youtube/v3".to_string(),
//!     Duration::from_secs(5),
//! )?;
//! let cache = QueryCache::new(Arc::new(MemoryStore::new()), Arc::new(resolver));
//!
//! let track = cache.lookup(" Never Gonna Give You Up ").await?;
//! println!("{} ({})", track.title, track.url);
//! println!("{:?}", cache.stats());
//! # Ok(())
//! # }
//! ```

pub mod query;
pub mod stats;

use std::{sync::Arc, time::Duration};
use tracing::{debug, error, info, warn};

use crate::error::{LookupError, ResolveError};
use crate::sources::{Resolver, SearchOptions, TrackMetadata};
use crate::store::Store;

pub use query::{NormalizedQuery, QueryKind, MAX_QUERY_LENGTH};
pub use stats::CacheStats;

use stats::Counters;

/// TTL de cada entrada escrita: 7 días
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(604_800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub ttl: Duration,
    pub max_query_length: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
            max_query_length: MAX_QUERY_LENGTH,
        }
    }
}

/// Caché cache-aside de metadata sobre un [`Store`] y un [`Resolver`].
///
/// Concurrent lookups of the same query are not coalesced: on a miss both
/// resolve and both write, last write wins.
pub struct QueryCache {
    store: Arc<dyn Store>,
    resolver: Arc<dyn Resolver>,
    settings: CacheSettings,
    stats: Counters,
}

impl QueryCache {
    pub fn new(store: Arc<dyn Store>, resolver: Arc<dyn Resolver>) -> Self {
        Self::with_settings(store, resolver, CacheSettings::default())
    }

    pub fn with_settings(
        store: Arc<dyn Store>,
        resolver: Arc<dyn Resolver>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            store,
            resolver,
            settings,
            stats: Counters::default(),
        }
    }

    pub fn settings(&self) -> CacheSettings {
        self.settings
    }

    pub fn normalize(&self, input: &str) -> NormalizedQuery {
        NormalizedQuery::new(input, self.settings.max_query_length)
    }

    /// Busca metadata para `input`, consultando primero el store.
    pub async fn lookup(&self, input: &str) -> Result<TrackMetadata, LookupError> {
        let query = self.normalize(input);

        match self.store.get(query.as_str()).await {
            Ok(Some(raw)) => return self.decode_hit(&query, &raw),
            Ok(None) => debug!("❌ Cache miss para: '{}'", query),
            Err(e) => {
                self.stats.record_error();
                error!("❌ Error leyendo del store para '{}': {}", query, e);
                return Err(LookupError::StoreRead(e));
            }
        }

        let metadata = match self.resolve(&query).await {
            Ok(metadata) => metadata,
            Err(e) => {
                self.stats.record_error();
                error!("❌ No se pudo resolver '{}': {}", query, e);
                return Err(e.into());
            }
        };

        self.stats.record_fetch();
        info!("🎵 Resuelto '{}' -> {}", query, metadata.url);

        self.write_back(&query, &metadata).await;
        Ok(metadata)
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    fn decode_hit(&self, query: &NormalizedQuery, raw: &str) -> Result<TrackMetadata, LookupError> {
        match serde_json::from_str(raw) {
            Ok(metadata) => {
                self.stats.record_hit();
                debug!("✅ Cache hit para: '{}'", query);
                Ok(metadata)
            }
            Err(source) => {
                self.stats.record_error();
                error!("❌ Entrada corrupta en el store para '{}': {}", query, source);
                Err(LookupError::CorruptEntry {
                    key: query.to_string(),
                    source,
                })
            }
        }
    }

    async fn resolve(&self, query: &NormalizedQuery) -> Result<TrackMetadata, ResolveError> {
        match query.kind() {
            QueryKind::DirectLink => {
                debug!("🎯 Enlace directo: '{}'", query);
                self.resolver.fetch_by_identifier(query.as_str()).await
            }
            QueryKind::FreeText => {
                let candidates = self
                    .resolver
                    .search(query.as_str(), SearchOptions { max_results: 1 })
                    .await?;

                let best = candidates
                    .into_iter()
                    .next()
                    .ok_or_else(|| ResolveError::NoCandidates(query.to_string()))?;

                debug!("🔍 Mejor candidato para '{}': {}", query, best.link);
                self.resolver.fetch_by_identifier(&best.link).await
            }
        }
    }

    /// Escribe en el store; los fallos no llegan al caller.
    async fn write_back(&self, query: &NormalizedQuery, metadata: &TrackMetadata) {
        let payload = match serde_json::to_string(metadata) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("⚠️ No se pudo serializar metadata para '{}': {}", query, e);
                return;
            }
        };

        match self.store.set(query.as_str(), &payload, self.settings.ttl).await {
            Ok(()) => debug!("💾 Metadata almacenada para '{}'", query),
            Err(e) => warn!("⚠️ Falló la escritura en el store para '{}': {}", query, e),
        }
    }
}
