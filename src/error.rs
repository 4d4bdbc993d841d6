//! Error types for the lookup pipeline.
//!
//! Each collaborator gets its own enum ([`StoreError`], [`ResolveError`]) and
//! [`LookupError`] is what callers of [`QueryCache::lookup`] see.
//!
//! [`QueryCache::lookup`]: crate::cache::QueryCache::lookup

use thiserror::Error;

/// Errores del almacén clave-valor.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store was never connected or the connection was dropped for good.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A single command failed (I/O, protocol, server-side error).
    #[error("store command failed: {0}")]
    Command(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        Self::Command(err.to_string())
    }
}

/// Errores del resolver externo (búsqueda y obtención de metadata).
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("no item found for identifier: {0}")]
    NotFound(String),

    #[error("search returned no candidates for: {0}")]
    NoCandidates(String),

    #[error("not a recognised identifier: {0}")]
    InvalidIdentifier(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Failure of a whole lookup. Exactly one of these is counted per failed call.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("cache read failed: {0}")]
    StoreRead(#[source] StoreError),

    #[error("cached entry for {key:?} could not be decoded: {source}")]
    CorruptEntry {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("resolve failed: {0}")]
    Resolve(#[from] ResolveError),
}
