//! # gamehub-cache
//!
//! Bounded, thread-safe in-process caching for a game catalog backend.
//!
//! ## Features
//!
//! - **Bounded:** Every cache holds at most `capacity` entries and evicts the least recently used
//! - **Time-aware:** Entries carry an optional TTL and expire lazily on read
//! - **Thread Safe:** One cache instance is shared by all request handlers
//! - **Drop-in Decorators:** [`CachedCatalog`] and [`CachedTranslator`] implement the same traits as the providers they wrap
//! - **Deterministic Keys:** Keys are built from every request parameter; blank filters are omitted
//! - **Observable:** Built-in logging and a pluggable metrics hook
//!
//! ## Quick Start
//!
//! ```ignore
//! use gamehub_cache::{CacheConfig, CachedCatalog, CachedTranslator, CatalogCaches, CatalogProvider};
//! use gamehub_cache::localize::localize_game;
//!
//! // 1. Build the caches once at startup
//! let config = CacheConfig::from_file("cache.json")?;
//! let caches = CatalogCaches::from_config(&config)?;
//!
//! // 2. Wrap the upstream clients
//! let catalog = CachedCatalog::new(RawgClient::new(api_key), &caches);
//! let translator = CachedTranslator::new(TranslateClient::new(), &caches);
//!
//! // 3. Serve requests; repeated lookups never reach the upstream
//! let game = catalog.get_game("3498").await?;
//! let localized = localize_game(&game, &translator, Some("fr")).await?;
//! ```
//!
//! ## Using the cache directly
//!
//! ```
//! use gamehub_cache::{CacheStore, LruCache};
//! use std::time::Duration;
//!
//! let cache = LruCache::new(2).expect("capacity is positive");
//! cache.set("a".to_string(), 1, Some(Duration::from_secs(60)));
//! cache.set("b".to_string(), 2, None);
//! cache.get(&"a".to_string());
//! cache.set("c".to_string(), 3, None);
//!
//! // "b" was least recently used
//! assert_eq!(cache.get(&"b".to_string()), None);
//! assert_eq!(cache.get(&"a".to_string()), Some(1));
//! ```

#[macro_use]
extern crate log;

pub mod backend;
pub mod cached;
pub mod config;
pub mod error;
pub mod key;
pub mod localize;
pub mod model;
pub mod observability;
pub mod provider;
pub mod service;

// Re-exports for convenience
pub use backend::{CacheStats, CacheStore, LruCache, ShardedLruCache};
pub use cached::{CachedCatalog, CachedTranslator};
pub use config::{CacheConfig, CacheSettings};
pub use error::{Error, Result};
pub use key::CacheKeyBuilder;
pub use observability::{CacheMetrics, TtlPolicy};
pub use provider::{CatalogProvider, Translator};
pub use service::{CacheSlot, CatalogCaches};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
