//! # Store Module
//!
//! Key-value backends used as the cache substrate.
//!
//! Two implementations of [`Store`] ship with the crate:
//!
//! - [`RedisStore`]: Redis via `ConnectionManager`, with `SETEX` expiry and a
//!   background health monitor that logs connection faults.
//! - [`MemoryStore`]: in-process `DashMap` with per-entry expiry, for local
//!   runs and tests.
//!
//! Values are opaque strings; the cache layer decides the encoding.

pub mod memory;
pub mod redis_store;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::StoreError;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// Almacén clave-valor con expiración.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    /// Reads a key. `Ok(None)` means absent or expired; `Err` only on I/O failure.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Escribe una clave que expira tras `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;
}
