//! Cache-aside decorators for the catalog and translator.
//!
//! Each decorated operation builds a key from its parameters, answers from
//! the slot on a hit, and on a miss calls the wrapped provider and stores a
//! successful result. Failures are returned as-is and never cached. The
//! cache lock is only taken for the lookup and the store, never across the
//! upstream call.
//!
//! Two concurrent misses for the same key may both reach the upstream; the
//! last one to finish decides the stored value.

use crate::error::{Error, Result};
use crate::model::{
    self, CollectionResult, Game, GamesQuery, Genre, Movie, PageRequest, Screenshot,
};
use crate::observability::{CacheMetrics, LogMetrics};
use crate::provider::{CatalogProvider, Translator};
use crate::service::{CacheSlot, CatalogCaches};
use std::future::Future;
use std::time::Instant;

/// Look `key` up in `slot`; on a miss run `fetch` and store its success.
async fn read_through<V, F, Fut>(
    slot: &CacheSlot<V>,
    metrics: &dyn CacheMetrics,
    key: String,
    fetch: F,
) -> Result<V>
where
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V>>,
{
    let timer = Instant::now();

    if let Some(cached) = slot.store().get(&key) {
        metrics.record_hit(&key, timer.elapsed());
        info!("Cache hit for request: {}", key);
        return Ok(cached);
    }
    metrics.record_miss(&key, timer.elapsed());

    match fetch().await {
        Ok(value) => {
            slot.store().set(key.clone(), value.clone(), slot.ttl().get_ttl());
            metrics.record_set(&key, timer.elapsed());
            info!("Cache miss for request: {} (populated in {:?})", key, timer.elapsed());
            Ok(value)
        }
        Err(e) => {
            metrics.record_error(&key, &e.to_string());
            Err(e)
        }
    }
}

fn require_id(game_id: &str) -> Result<()> {
    if game_id.trim().is_empty() {
        return Err(Error::InvalidKey(
            "game id cannot be null or empty".to_string(),
        ));
    }
    Ok(())
}

/// Catalog provider that answers repeated requests from cache.
///
/// Wraps any [`CatalogProvider`] and is one itself, so it can be dropped in
/// wherever the uncached provider was used.
///
/// # Example
///
/// ```ignore
/// use gamehub_cache::{CacheConfig, CachedCatalog, CatalogCaches};
///
/// let caches = CatalogCaches::from_config(&CacheConfig::default())?;
/// let catalog = CachedCatalog::new(RawgClient::new(api_key), &caches);
///
/// // First call reaches the upstream, the second is served from cache
/// let page = catalog.get_games(&GamesQuery::default().with_genres("action")).await?;
/// let again = catalog.get_games(&GamesQuery::default().with_genres("action")).await?;
/// assert_eq!(page, again);
/// ```
pub struct CachedCatalog<P: CatalogProvider> {
    inner: P,
    games: CacheSlot<CollectionResult<Game>>,
    genres: CacheSlot<CollectionResult<Genre>>,
    game_details: CacheSlot<Game>,
    movies: CacheSlot<CollectionResult<Movie>>,
    screenshots: CacheSlot<CollectionResult<Screenshot>>,
    metrics: Box<dyn CacheMetrics>,
}

impl<P: CatalogProvider> CachedCatalog<P> {
    /// Wrap `inner` with the catalog slots of `caches`.
    pub fn new(inner: P, caches: &CatalogCaches) -> Self {
        CachedCatalog {
            inner,
            games: caches.games.clone(),
            genres: caches.genres.clone(),
            game_details: caches.game_details.clone(),
            movies: caches.movies.clone(),
            screenshots: caches.screenshots.clone(),
            metrics: Box::new(LogMetrics),
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }
}

impl<P: CatalogProvider> CatalogProvider for CachedCatalog<P> {
    async fn get_games(&self, query: &GamesQuery) -> Result<CollectionResult<Game>> {
        read_through(&self.games, self.metrics.as_ref(), query.cache_key(), || {
            self.inner.get_games(query)
        })
        .await
    }

    async fn get_genres(&self, page: &PageRequest) -> Result<CollectionResult<Genre>> {
        read_through(&self.genres, self.metrics.as_ref(), page.genres_cache_key(), || {
            self.inner.get_genres(page)
        })
        .await
    }

    async fn get_game(&self, game_id: &str) -> Result<Game> {
        require_id(game_id)?;
        read_through(
            &self.game_details,
            self.metrics.as_ref(),
            model::game_cache_key(game_id),
            || self.inner.get_game(game_id),
        )
        .await
    }

    async fn get_movies(&self, game_id: &str) -> Result<CollectionResult<Movie>> {
        require_id(game_id)?;
        read_through(
            &self.movies,
            self.metrics.as_ref(),
            model::movies_cache_key(game_id),
            || self.inner.get_movies(game_id),
        )
        .await
    }

    async fn get_screenshots(&self, game_id: &str) -> Result<CollectionResult<Screenshot>> {
        require_id(game_id)?;
        read_through(
            &self.screenshots,
            self.metrics.as_ref(),
            model::screenshots_cache_key(game_id),
            || self.inner.get_screenshots(game_id),
        )
        .await
    }
}

/// Translator that remembers previous translations.
pub struct CachedTranslator<T: Translator> {
    inner: T,
    cache: CacheSlot<String>,
    metrics: Box<dyn CacheMetrics>,
}

impl<T: Translator> CachedTranslator<T> {
    /// Wrap `inner` with the translation slot of `caches`.
    pub fn new(inner: T, caches: &CatalogCaches) -> Self {
        Self::with_slot(inner, caches.translations.clone())
    }

    /// Wrap `inner` with an explicit translation slot.
    pub fn with_slot(inner: T, cache: CacheSlot<String>) -> Self {
        CachedTranslator {
            inner,
            cache,
            metrics: Box::new(LogMetrics),
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }
}

impl<T: Translator> Translator for CachedTranslator<T> {
    async fn translate(&self, text: &str, from: Option<&str>, to: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(Error::InvalidKey("text cannot be null or empty".to_string()));
        }
        if to.trim().is_empty() {
            return Err(Error::InvalidKey(
                "target language cannot be null or empty".to_string(),
            ));
        }

        read_through(
            &self.cache,
            self.metrics.as_ref(),
            model::translation_cache_key(text, from, to),
            || self.inner.translate(text, from, to),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::observability::{CounterMetrics, TtlPolicy};
    use crate::provider::{CatalogOperation, InMemoryCatalog};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn caches() -> CatalogCaches {
        CatalogCaches::from_config(&CacheConfig::default()).expect("Failed to build caches")
    }

    fn upstream() -> InMemoryCatalog {
        let catalog = InMemoryCatalog::new();
        let mut game = Game::new(3498, "Grand Theft Auto V", "grand-theft-auto-v");
        game.genres.push(Genre {
            id: 4,
            name: "Action".to_string(),
            slug: "action".to_string(),
            background_image: None,
        });
        catalog.insert_game(game);
        catalog
    }

    #[tokio::test]
    async fn test_cached_game_hits_upstream_once() {
        let upstream = upstream();
        let catalog = CachedCatalog::new(upstream.clone(), &caches());

        let first = catalog.get_game("3498").await.expect("Failed to fetch");
        let second = catalog.get_game("3498").await.expect("Failed to fetch");

        assert_eq!(first, second);
        assert_eq!(upstream.calls(CatalogOperation::Game), 1);
    }

    #[tokio::test]
    async fn test_cached_games_round_trip() {
        let upstream = upstream();
        let metrics = CounterMetrics::new();
        let catalog = CachedCatalog::new(upstream.clone(), &caches())
            .with_metrics(Box::new(metrics.clone()));
        let query = GamesQuery::default().with_genres("action");

        let first = catalog.get_games(&query).await.expect("Failed to fetch");
        let second = catalog.get_games(&query).await.expect("Failed to fetch");

        assert_eq!(first, second);
        assert_eq!(first.count, 1);
        assert_eq!(upstream.calls(CatalogOperation::Games), 1);
        assert_eq!(metrics.misses(), 1);
        assert_eq!(metrics.hits(), 1);
        assert_eq!(metrics.sets(), 1);
    }

    #[tokio::test]
    async fn test_cached_errors_are_not_cached() {
        let upstream = upstream();
        let metrics = CounterMetrics::new();
        let caches = caches();
        let catalog = CachedCatalog::new(upstream.clone(), &caches)
            .with_metrics(Box::new(metrics.clone()));

        let missing = catalog.get_game("404").await;
        assert!(matches!(missing, Err(Error::NotFound(_))));
        assert!(caches.game_details.store().is_empty());

        let again = catalog.get_game("404").await;
        assert!(matches!(again, Err(Error::NotFound(_))));
        assert_eq!(upstream.calls(CatalogOperation::Game), 2);
        assert_eq!(metrics.errors(), 2);
    }

    #[tokio::test]
    async fn test_cached_blank_id_rejected_before_upstream() {
        let upstream = upstream();
        let catalog = CachedCatalog::new(upstream.clone(), &caches());

        assert!(matches!(catalog.get_game("  ").await, Err(Error::InvalidKey(_))));
        assert!(matches!(catalog.get_movies("").await, Err(Error::InvalidKey(_))));
        assert!(matches!(
            catalog.get_screenshots("").await,
            Err(Error::InvalidKey(_))
        ));
        assert_eq!(upstream.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_cached_slots_are_independent() {
        let upstream = upstream();
        let catalog = CachedCatalog::new(upstream.clone(), &caches());

        catalog.get_movies("3498").await.expect("Failed to fetch");
        catalog.get_screenshots("3498").await.expect("Failed to fetch");
        catalog.get_movies("3498").await.expect("Failed to fetch");
        catalog.get_screenshots("3498").await.expect("Failed to fetch");

        assert_eq!(upstream.calls(CatalogOperation::Movies), 1);
        assert_eq!(upstream.calls(CatalogOperation::Screenshots), 1);
    }

    #[tokio::test]
    async fn test_cached_entry_expires() {
        let upstream = upstream();
        let mut caches = caches();
        caches.genres = CacheSlot::lru(10, TtlPolicy::Fixed(Duration::from_millis(1)))
            .expect("Failed to build slot");
        let catalog = CachedCatalog::new(upstream.clone(), &caches);

        catalog
            .get_genres(&PageRequest::default())
            .await
            .expect("Failed to fetch");
        tokio::time::sleep(Duration::from_millis(10)).await;
        catalog
            .get_genres(&PageRequest::default())
            .await
            .expect("Failed to fetch");

        assert_eq!(upstream.calls(CatalogOperation::Genres), 2);
    }

    struct CountingTranslator {
        calls: Arc<AtomicUsize>,
    }

    impl Translator for CountingTranslator {
        async fn translate(&self, text: &str, _from: Option<&str>, to: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("[{}] {}", to, text))
        }
    }

    #[tokio::test]
    async fn test_cached_translator() {
        let calls = Arc::new(AtomicUsize::new(0));
        let translator = CachedTranslator::new(
            CountingTranslator {
                calls: calls.clone(),
            },
            &caches(),
        );

        let first = translator
            .translate("Hello", None, "fr")
            .await
            .expect("Failed to translate");
        let second = translator
            .translate("Hello", Some(""), "fr")
            .await
            .expect("Failed to translate");
        let german = translator
            .translate("Hello", None, "de")
            .await
            .expect("Failed to translate");

        assert_eq!(first, "[fr] Hello");
        assert_eq!(first, second);
        assert_eq!(german, "[de] Hello");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cached_translator_rejects_blank_input() {
        let calls = Arc::new(AtomicUsize::new(0));
        let translator = CachedTranslator::new(
            CountingTranslator {
                calls: calls.clone(),
            },
            &caches(),
        );

        assert!(matches!(
            translator.translate(" ", None, "fr").await,
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(
            translator.translate("Hello", None, "").await,
            Err(Error::InvalidKey(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
