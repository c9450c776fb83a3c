//! Cache store implementations.

use std::time::Duration;

pub mod lru;
pub mod sharded;

pub use lru::{CacheStats, LruCache};
pub use sharded::ShardedLruCache;

/// Trait for bounded in-process cache stores.
///
/// Abstracts storage operations so decorators depend on the contract, not on
/// a concrete cache. Implementations: [`LruCache`] (single lock) and
/// [`ShardedLruCache`] (one lock per shard).
///
/// **IMPORTANT:** All methods use `&self` so one instance can be shared across
/// threads behind an `Arc`. Implementations use interior mutability.
///
/// Operations are synchronous CPU-bound critical sections. Never call them
/// while holding anything across an `.await`; they do not suspend.
pub trait CacheStore<K, V>: Send + Sync {
    /// Retrieve a copy of the value stored under `key`.
    ///
    /// # Returns
    /// - `Some(value)` - Live entry found; it becomes the most recently used
    /// - `None` - Key absent, or present but expired (the entry is dropped)
    fn get(&self, key: &K) -> Option<V>;

    /// Store `value` under `key` with an optional time-to-live.
    ///
    /// # Arguments
    /// - `key`: Cache key
    /// - `value`: Value to store; replaces any previous value for `key`
    /// - `ttl`: Time-to-live. None = never expires by time
    ///
    /// Inserting a new key into a full store evicts the least recently used
    /// entry, whatever its expiration.
    fn set(&self, key: K, value: V, ttl: Option<Duration>);

    /// Remove the entry for `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &K);

    /// Drop every entry.
    fn clear(&self);

    /// Number of entries currently held, including expired ones not yet read.
    fn len(&self) -> usize;

    /// Check if the store holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries the store holds.
    fn capacity(&self) -> usize;

    /// Snapshot of the store's occupancy.
    fn stats(&self) -> CacheStats;
}
