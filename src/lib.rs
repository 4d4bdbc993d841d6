//! Cache-aside lookup of track metadata.
//!
//! Queries (free text or YouTube links) are normalized, looked up in a
//! key-value [`store`], and on a miss resolved through a [`sources::Resolver`]
//! before being written back with a 7-day TTL. See [`cache::QueryCache`].

pub mod cache;
pub mod config;
pub mod error;
pub mod sources;
pub mod store;

pub use cache::{CacheSettings, CacheStats, QueryCache};
pub use error::{LookupError, ResolveError, StoreError};
pub use sources::TrackMetadata;
