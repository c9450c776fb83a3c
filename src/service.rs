//! Process-wide cache slots for web applications.
//!
//! Build [`CatalogCaches`] once at startup and hand clones to whatever needs
//! them; clones share the same underlying caches.

use crate::backend::{CacheStats, CacheStore, LruCache, ShardedLruCache};
use crate::config::{CacheConfig, CacheSettings};
use crate::error::Result;
use crate::model::{CollectionResult, Game, Genre, Movie, Screenshot};
use crate::observability::TtlPolicy;
use std::sync::Arc;

/// One cache instance plus the TTL its entries are stored with.
///
/// Cheap to clone: the store is behind an `Arc`.
///
/// # Example
///
/// ```
/// use gamehub_cache::observability::TtlPolicy;
/// use gamehub_cache::service::CacheSlot;
///
/// let slot: CacheSlot<String> = CacheSlot::lru(100, TtlPolicy::default()).expect("valid");
/// let shared = slot.clone();
/// assert_eq!(shared.store().capacity(), 100);
/// ```
pub struct CacheSlot<V> {
    store: Arc<dyn CacheStore<String, V>>,
    ttl: TtlPolicy,
}

impl<V> Clone for CacheSlot<V> {
    fn clone(&self) -> Self {
        CacheSlot {
            store: Arc::clone(&self.store),
            ttl: self.ttl,
        }
    }
}

impl<V: Clone + Send + 'static> CacheSlot<V> {
    /// Wrap any store, e.g. a custom [`CacheStore`] implementation.
    pub fn new(store: Arc<dyn CacheStore<String, V>>, ttl: TtlPolicy) -> Self {
        CacheSlot { store, ttl }
    }

    /// Single-lock LRU slot.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if `capacity` is 0
    pub fn lru(capacity: usize, ttl: TtlPolicy) -> Result<Self> {
        Ok(Self::new(Arc::new(LruCache::new(capacity)?), ttl))
    }

    /// Slot built from configuration: sharded when `shards > 1`.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if the settings are invalid
    pub fn from_settings(name: &str, settings: &CacheSettings) -> Result<Self> {
        settings.validate(name)?;

        let store: Arc<dyn CacheStore<String, V>> = if settings.shards > 1 {
            Arc::new(ShardedLruCache::new(settings.capacity, settings.shards)?)
        } else {
            Arc::new(LruCache::new(settings.capacity)?)
        };

        debug!(
            "Cache slot {} ready: capacity {}, {} shard(s), {:?}",
            name,
            settings.capacity,
            settings.shards,
            settings.ttl_policy()
        );
        Ok(Self::new(store, settings.ttl_policy()))
    }
}

impl<V> CacheSlot<V> {
    pub fn store(&self) -> &dyn CacheStore<String, V> {
        self.store.as_ref()
    }

    pub fn ttl(&self) -> TtlPolicy {
        self.ttl
    }
}

/// Every cache slot the catalog decorators use, one per result shape.
#[derive(Clone)]
pub struct CatalogCaches {
    pub games: CacheSlot<CollectionResult<Game>>,
    pub genres: CacheSlot<CollectionResult<Genre>>,
    pub game_details: CacheSlot<Game>,
    pub movies: CacheSlot<CollectionResult<Movie>>,
    pub screenshots: CacheSlot<CollectionResult<Screenshot>>,
    pub translations: CacheSlot<String>,
}

impl CatalogCaches {
    /// Build all slots from configuration.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` naming the first invalid slot
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        let caches = CatalogCaches {
            games: CacheSlot::from_settings("games", &config.games)?,
            genres: CacheSlot::from_settings("genres", &config.genres)?,
            game_details: CacheSlot::from_settings("game_details", &config.game_details)?,
            movies: CacheSlot::from_settings("movies", &config.movies)?,
            screenshots: CacheSlot::from_settings("screenshots", &config.screenshots)?,
            translations: CacheSlot::from_settings("translations", &config.translations)?,
        };
        info!("Catalog caches initialised");
        Ok(caches)
    }

    /// Drop every entry in every slot.
    pub fn clear_all(&self) {
        self.games.store().clear();
        self.genres.store().clear();
        self.game_details.store().clear();
        self.movies.store().clear();
        self.screenshots.store().clear();
        self.translations.store().clear();
        warn!("⚠ Catalog caches cleared");
    }

    /// Occupancy per slot, in declaration order.
    pub fn stats(&self) -> Vec<(&'static str, CacheStats)> {
        vec![
            ("games", self.games.store().stats()),
            ("genres", self.genres.store().stats()),
            ("game_details", self.game_details.store().stats()),
            ("movies", self.movies.store().stats()),
            ("screenshots", self.screenshots.store().stats()),
            ("translations", self.translations.store().stats()),
        ]
    }
}
