//! Seen-store backends for notification dedup.
//!
//! A listing id is written after a confirmed delivery and expires after
//! the configured TTL, so a listing can be re-notified once its entry
//! lapses. Backends:
//! - `RedisSeenStore` - production, entries expire server-side
//! - `MemorySeenStore` - dev and tests, entries expire on read

pub mod memory;
pub mod redis;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

pub use self::memory::MemorySeenStore;
pub use self::redis::RedisSeenStore;

/// Trait for seen-store backends.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Whether a live entry exists for `id`.
    async fn exists(&self, id: &str) -> Result<bool>;

    /// Write an entry for `id` that lapses after `ttl`.
    async fn set_with_expiry(&self, id: &str, ttl: Duration, value: &str) -> Result<()>;
}
