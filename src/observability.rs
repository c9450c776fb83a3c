//! Observability and TTL policies for cache slots.
//!
//! This module provides the hook the cache-aside decorators report through,
//! and the policy that decides how long a slot's entries stay fresh.
//!
//! # Metrics
//!
//! Implement the `CacheMetrics` trait to forward hit/miss signals to your
//! monitoring system:
//!
//! ```ignore
//! use gamehub_cache::observability::CacheMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl CacheMetrics for PrometheusMetrics {
//!     fn record_hit(&self, _key: &str, _duration: Duration) {
//!         // counter!("catalog_cache_hits").inc();
//!     }
//!     // ... implement other methods
//! }
//!
//! // let catalog = CachedCatalog::new(upstream, &caches)
//! //     .with_metrics(Box::new(PrometheusMetrics));
//! ```
//!
//! The trait's default methods log via the `log` crate; that is what
//! [`LogMetrics`] does. [`NoOpMetrics`] discards everything and
//! [`CounterMetrics`] keeps atomic totals.
//!
//! # TTL Policies
//!
//! ```
//! use gamehub_cache::observability::TtlPolicy;
//! use std::time::Duration;
//!
//! // Catalog data changes rarely: keep entries for a week
//! let _policy = TtlPolicy::Fixed(Duration::from_secs(7 * 24 * 60 * 60));
//!
//! // Only capacity pressure removes entries
//! let _policy = TtlPolicy::Infinite;
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default lifetime of a cached catalog response.
pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Trait for cache metrics collection.
///
/// Every lookup reports exactly one of `record_hit` or `record_miss`; a miss
/// is followed by `record_set` when the upstream succeeded, or
/// `record_error` when it failed.
pub trait CacheMetrics: Send + Sync {
    /// Record a cache hit.
    fn record_hit(&self, key: &str, duration: Duration) {
        debug!("Cache HIT: {} took {:?}", key, duration);
    }

    /// Record a cache miss.
    fn record_miss(&self, key: &str, duration: Duration) {
        debug!("Cache MISS: {} took {:?}", key, duration);
    }

    /// Record a cache population after a successful upstream call.
    fn record_set(&self, key: &str, duration: Duration) {
        debug!("Cache SET: {} took {:?}", key, duration);
    }

    /// Record an upstream error seen on a miss.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Cache ERROR for {}: {}", key, error);
    }
}

/// Metrics that only log (the trait's default behavior).
#[derive(Clone, Default)]
pub struct LogMetrics;

impl CacheMetrics for LogMetrics {}

/// Metrics implementation that discards everything.
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _key: &str, _duration: Duration) {}
    fn record_set(&self, _key: &str, _duration: Duration) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    errors: AtomicU64,
}

/// Metrics keeping running totals. Clones share the same counters.
#[derive(Clone, Default)]
pub struct CounterMetrics {
    counters: Arc<Counters>,
}

impl CounterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hits(&self) -> u64 {
        self.counters.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.counters.misses.load(Ordering::Relaxed)
    }

    pub fn sets(&self) -> u64 {
        self.counters.sets.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.counters.errors.load(Ordering::Relaxed)
    }

    /// Hits over lookups, or `None` before the first lookup.
    pub fn hit_ratio(&self) -> Option<f64> {
        let hits = self.hits();
        let lookups = hits + self.misses();
        (lookups > 0).then(|| hits as f64 / lookups as f64)
    }
}

impl CacheMetrics for CounterMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {
        self.counters.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self, _key: &str, _duration: Duration) {
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn record_set(&self, _key: &str, _duration: Duration) {
        self.counters.sets.fetch_add(1, Ordering::Relaxed);
    }

    fn record_error(&self, _key: &str, _error: &str) {
        self.counters.errors.fetch_add(1, Ordering::Relaxed);
    }
}

/// TTL (Time-to-Live) policy for a cache slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TtlPolicy {
    /// Fixed duration for all entries
    Fixed(Duration),

    /// No TTL (entries live until evicted or cleared)
    Infinite,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        TtlPolicy::Fixed(DEFAULT_TTL)
    }
}

impl TtlPolicy {
    /// TTL to pass to [`crate::backend::CacheStore::set`].
    pub fn get_ttl(&self) -> Option<Duration> {
        match self {
            TtlPolicy::Fixed(d) => Some(*d),
            TtlPolicy::Infinite => None,
        }
    }
}
