//! Upstream provider traits for abstracting the game catalog and translator.
//!
//! The `CatalogProvider` trait decouples the caches from the real catalog
//! client. The cache-aside decorators in [`crate::cached`] implement the same
//! trait, so callers cannot tell a cached provider from an uncached one.
//!
//! # Error Handling
//!
//! When implementing the trait for a real upstream, return:
//! - `Error::NotFound` when the entity does not exist
//! - `Error::UpstreamUnavailable` for connectivity failures
//! - `Error::DeserializationError` for unreadable responses
//! - `Error::Timeout` when the call exceeds its deadline
//!
//! The decorators never translate or swallow these.

use crate::error::{Error, Result};
use crate::model::{
    CollectionResult, Game, GamesQuery, Genre, Movie, PageRequest, Screenshot,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

/// Trait for game catalog implementations.
///
/// Every method is a read; none of them mutate upstream state.
#[allow(async_fn_in_trait)]
pub trait CatalogProvider: Send + Sync {
    /// Fetch one page of games matching the query's filters.
    ///
    /// # Errors
    /// Returns `Err` if the upstream is unavailable or rejects the query
    async fn get_games(&self, query: &GamesQuery) -> Result<CollectionResult<Game>>;

    /// Fetch one page of genres.
    ///
    /// # Errors
    /// Returns `Err` if the upstream is unavailable or rejects the page
    async fn get_genres(&self, page: &PageRequest) -> Result<CollectionResult<Genre>>;

    /// Fetch a single game by id or slug.
    ///
    /// # Errors
    /// Returns `Error::NotFound` if the game does not exist
    async fn get_game(&self, game_id: &str) -> Result<Game>;

    /// Fetch the trailers attached to a game.
    ///
    /// # Errors
    /// Returns `Err` if the upstream is unavailable or the game is unknown
    async fn get_movies(&self, game_id: &str) -> Result<CollectionResult<Movie>>;

    /// Fetch the screenshots attached to a game.
    ///
    /// # Errors
    /// Returns `Err` if the upstream is unavailable or the game is unknown
    async fn get_screenshots(&self, game_id: &str) -> Result<CollectionResult<Screenshot>>;
}

/// Trait for text translation services.
#[allow(async_fn_in_trait)]
pub trait Translator: Send + Sync {
    /// Translate `text` into the `to` language.
    ///
    /// `from` is the source language; `None` asks the service to detect it.
    ///
    /// # Errors
    /// Returns `Err` if the translation service fails
    async fn translate(&self, text: &str, from: Option<&str>, to: &str) -> Result<String>;
}

// ============================================================================
// In-Memory Catalog
// ============================================================================

/// The logical read operations of a [`CatalogProvider`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogOperation {
    Games,
    Genres,
    Game,
    Movies,
    Screenshots,
}

impl CatalogOperation {
    fn slot(self) -> usize {
        match self {
            CatalogOperation::Games => 0,
            CatalogOperation::Genres => 1,
            CatalogOperation::Game => 2,
            CatalogOperation::Movies => 3,
            CatalogOperation::Screenshots => 4,
        }
    }
}

impl fmt::Display for CatalogOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogOperation::Games => write!(f, "games"),
            CatalogOperation::Genres => write!(f, "genres"),
            CatalogOperation::Game => write!(f, "game"),
            CatalogOperation::Movies => write!(f, "movies"),
            CatalogOperation::Screenshots => write!(f, "screenshots"),
        }
    }
}

#[derive(Default)]
struct CatalogData {
    games: Vec<Game>,
    genres: Vec<Genre>,
    movies: HashMap<u64, Vec<Movie>>,
    screenshots: HashMap<u64, Vec<Screenshot>>,
}

impl CatalogData {
    fn find_game(&self, game_id: &str) -> Option<&Game> {
        let numeric = game_id.parse::<u64>().ok();
        self.games
            .iter()
            .find(|g| Some(g.id) == numeric || g.slug == game_id)
    }
}

/// Deterministic in-memory catalog for tests, benchmarks and local runs.
///
/// Behaves like the real upstream: filters by genre, parent platform and
/// search term, orders by `name`, `rating`, `metacritic` or `id` (prefix `-`
/// for descending), and paginates with `next`/`previous` links. It also
/// counts calls per operation, can be told to fail, and can simulate
/// latency, which makes cache hits and misses observable.
///
/// Clones share the same data, counters and failure switch.
///
/// # Example
///
/// ```ignore
/// let upstream = InMemoryCatalog::new();
/// upstream.insert_game(Game::new(1, "Portal", "portal"));
///
/// let cached = CachedCatalog::new(upstream.clone(), &caches);
/// cached.get_game("1").await?;
/// cached.get_game("1").await?;
/// assert_eq!(upstream.calls(CatalogOperation::Game), 1);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    data: Arc<RwLock<CatalogData>>,
    calls: Arc<[AtomicUsize; 5]>,
    failure: Arc<Mutex<Option<Error>>>,
    latency: Option<Duration>,
}

impl InMemoryCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn insert_game(&self, game: Game) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.games.retain(|g| g.id != game.id);
        data.games.push(game);
    }

    pub fn insert_genre(&self, genre: Genre) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.genres.retain(|g| g.id != genre.id);
        data.genres.push(genre);
    }

    pub fn insert_movies(&self, game_id: u64, movies: Vec<Movie>) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.movies.insert(game_id, movies);
    }

    pub fn insert_screenshots(&self, game_id: u64, screenshots: Vec<Screenshot>) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.screenshots.insert(game_id, screenshots);
    }

    /// Make every subsequent call fail with `error`; `None` restores service.
    pub fn fail_with(&self, error: Option<Error>) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = error;
    }

    /// Number of calls received for `operation`.
    pub fn calls(&self, operation: CatalogOperation) -> usize {
        self.calls[operation.slot()].load(Ordering::SeqCst)
    }

    /// Number of calls received across all operations.
    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|c| c.load(Ordering::SeqCst)).sum()
    }

    async fn enter(&self, operation: CatalogOperation) -> Result<()> {
        self.calls[operation.slot()].fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let failure = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match failure {
            Some(e) => {
                debug!("InMemoryCatalog {} -> injected failure: {}", operation, e);
                Err(e)
            }
            None => Ok(()),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, CatalogData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn split_filter(filter: Option<&str>) -> Vec<&str> {
    filter
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn order_games(games: &mut [Game], ordering: Option<&str>) {
    let ordering = match ordering.map(str::trim) {
        Some(o) if !o.is_empty() => o,
        _ => return,
    };
    let (field, descending) = match ordering.strip_prefix('-') {
        Some(field) => (field, true),
        None => (ordering, false),
    };

    match field {
        "name" => games.sort_by(|a, b| a.name.cmp(&b.name)),
        "rating" => games.sort_by(|a, b| a.rating.total_cmp(&b.rating)),
        "metacritic" => games.sort_by_key(|g| g.metacritic),
        "id" => games.sort_by_key(|g| g.id),
        _ => return,
    }
    if descending {
        games.reverse();
    }
}

fn paginate<T: Clone>(
    items: &[T],
    resource: &str,
    page: u32,
    page_size: u32,
) -> Result<CollectionResult<T>> {
    if page == 0 || page_size == 0 {
        return Err(Error::BadRequest(format!(
            "page and page_size must be positive, got page={} page_size={}",
            page, page_size
        )));
    }

    let size = page_size as usize;
    let start = (page as usize - 1).saturating_mul(size);
    if page > 1 && start >= items.len() {
        return Err(Error::NotFound(format!("{} page {} is out of range", resource, page)));
    }

    let end = start.saturating_add(size).min(items.len());
    let link = |p: u32| format!("inmemory://{}?page={}&page_size={}", resource, p, page_size);

    Ok(CollectionResult {
        count: items.len() as u64,
        next: (end < items.len()).then(|| link(page + 1)),
        previous: (page > 1).then(|| link(page - 1)),
        results: items[start.min(items.len())..end].to_vec(),
    })
}

impl CatalogProvider for InMemoryCatalog {
    async fn get_games(&self, query: &GamesQuery) -> Result<CollectionResult<Game>> {
        self.enter(CatalogOperation::Games).await?;

        let genres = split_filter(query.genres.as_deref());
        let platforms = split_filter(query.parent_platforms.as_deref());
        let search = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut matching: Vec<Game> = self
            .read()
            .games
            .iter()
            .filter(|g| {
                genres.is_empty()
                    || g.genres
                        .iter()
                        .any(|genre| genres.iter().any(|f| *f == genre.slug || *f == genre.id.to_string()))
            })
            .filter(|g| {
                platforms.is_empty()
                    || g.parent_platforms.iter().any(|p| {
                        platforms
                            .iter()
                            .any(|f| *f == p.platform.slug || *f == p.platform.id.to_string())
                    })
            })
            .filter(|g| {
                search
                    .as_ref()
                    .map_or(true, |s| g.name.to_lowercase().contains(s.as_str()))
            })
            .cloned()
            .collect();

        order_games(&mut matching, query.ordering.as_deref());
        paginate(&matching, "games", query.page, query.page_size)
    }

    async fn get_genres(&self, page: &PageRequest) -> Result<CollectionResult<Genre>> {
        self.enter(CatalogOperation::Genres).await?;
        paginate(&self.read().genres, "genres", page.page, page.page_size)
    }

    async fn get_game(&self, game_id: &str) -> Result<Game> {
        self.enter(CatalogOperation::Game).await?;
        self.read()
            .find_game(game_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("game {}", game_id)))
    }

    async fn get_movies(&self, game_id: &str) -> Result<CollectionResult<Movie>> {
        self.enter(CatalogOperation::Movies).await?;
        let data = self.read();
        let game = data
            .find_game(game_id)
            .ok_or_else(|| Error::NotFound(format!("game {}", game_id)))?;
        let movies = data.movies.get(&game.id).cloned().unwrap_or_default();
        Ok(CollectionResult::new(movies))
    }

    async fn get_screenshots(&self, game_id: &str) -> Result<CollectionResult<Screenshot>> {
        self.enter(CatalogOperation::Screenshots).await?;
        let data = self.read();
        let game = data
            .find_game(game_id)
            .ok_or_else(|| Error::NotFound(format!("game {}", game_id)))?;
        let screenshots = data.screenshots.get(&game.id).cloned().unwrap_or_default();
        Ok(CollectionResult::new(screenshots))
    }
}
