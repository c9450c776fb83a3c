//! Catalog data model and typed request parameters.
//!
//! Field names follow the upstream catalog's JSON. Every cached value type is
//! `Clone`: the cache hands out owned copies, so a caller transforming a
//! result can never reach the stored original.

use crate::key::CacheKeyBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default page size used by the upstream catalog.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One page of results plus pagination cursors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectionResult<T> {
    /// Total number of items across all pages.
    pub count: u64,
    /// Link to the next page, if any.
    pub next: Option<String>,
    /// Link to the previous page, if any.
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> CollectionResult<T> {
    pub fn new(results: Vec<T>) -> Self {
        CollectionResult {
            count: results.len() as u64,
            next: None,
            previous: None,
            results,
        }
    }
}

impl<T> Default for CollectionResult<T> {
    fn default() -> Self {
        CollectionResult::new(Vec::new())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub background_image: Option<String>,
    #[serde(default)]
    pub rating: f64,
    pub metacritic: Option<u32>,
    #[serde(default)]
    pub rating_top: u32,
    #[serde(default)]
    pub parent_platforms: Vec<ParentPlatform>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(rename = "description_raw")]
    pub description: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub publishers: Vec<Publisher>,
}

impl Game {
    /// Minimal game with only the identifying fields set.
    pub fn new(id: u64, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Game {
            id,
            name: name.into(),
            slug: slug.into(),
            background_image: None,
            rating: 0.0,
            metacritic: None,
            rating_top: 0,
            parent_platforms: Vec::new(),
            tags: Vec::new(),
            description: None,
            genres: Vec::new(),
            publishers: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(rename = "image_background")]
    pub background_image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(rename = "image_background")]
    pub background_image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
    pub slug: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u64,
    pub name: String,
    pub slug: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentPlatform {
    pub platform: Platform,
}

/// Trailer or cinematic attached to a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub name: String,
    pub preview: String,
    /// Video URLs keyed by resolution (e.g. `"480"`, `"max"`).
    #[serde(default)]
    pub data: HashMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenshot {
    pub id: u64,
    pub image: String,
    pub width: u32,
    pub height: u32,
    pub is_deleted: bool,
}

/// Filters and pagination for a catalog listing.
///
/// `genres` and `parent_platforms` are comma-separated lists as the upstream
/// expects them. Blank filters are treated exactly like absent ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamesQuery {
    pub genres: Option<String>,
    pub parent_platforms: Option<String>,
    pub ordering: Option<String>,
    pub search: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for GamesQuery {
    fn default() -> Self {
        GamesQuery {
            genres: None,
            parent_platforms: None,
            ordering: None,
            search: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl GamesQuery {
    pub fn with_genres(mut self, genres: impl Into<String>) -> Self {
        self.genres = Some(genres.into());
        self
    }

    pub fn with_parent_platforms(mut self, platforms: impl Into<String>) -> Self {
        self.parent_platforms = Some(platforms.into());
        self
    }

    pub fn with_ordering(mut self, ordering: impl Into<String>) -> Self {
        self.ordering = Some(ordering.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Cache key covering every parameter that affects the listing.
    pub fn cache_key(&self) -> String {
        CacheKeyBuilder::new("games")
            .optional("genres", self.genres.as_deref())
            .optional("parentPlatforms", self.parent_platforms.as_deref())
            .optional("ordering", self.ordering.as_deref())
            .optional("search", self.search.as_deref())
            .param("page", self.page)
            .param("pageSize", self.page_size)
            .build()
    }
}

/// Pagination for listings that take no filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        PageRequest { page, page_size }
    }

    pub fn genres_cache_key(&self) -> String {
        CacheKeyBuilder::new("genres")
            .param("page", self.page)
            .param("pageSize", self.page_size)
            .build()
    }
}

/// Key for a single game's details.
pub fn game_cache_key(game_id: &str) -> String {
    CacheKeyBuilder::new("game").param("id", game_id).build()
}

/// Key for a game's trailers.
pub fn movies_cache_key(game_id: &str) -> String {
    CacheKeyBuilder::new("movies").param("id", game_id).build()
}

/// Key for a game's screenshots.
pub fn screenshots_cache_key(game_id: &str) -> String {
    CacheKeyBuilder::new("screenshots").param("id", game_id).build()
}

/// Key for a translation of `text` from an optional source language.
pub fn translation_cache_key(text: &str, from: Option<&str>, to: &str) -> String {
    CacheKeyBuilder::new("translate")
        .param("text", text)
        .optional("from", from)
        .param("to", to)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_games_query_defaults() {
        let query = GamesQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 20);
        assert_eq!(query.cache_key(), "games:page=1;pageSize=20;");
    }

    #[test]
    fn test_games_query_key_sensitivity() {
        let by_name = GamesQuery::default().with_ordering("name");
        let by_rating = GamesQuery::default().with_ordering("rating");
        assert_ne!(by_name.cache_key(), by_rating.cache_key());

        let page_one = GamesQuery::default().with_genres("action");
        let page_two = GamesQuery::default().with_genres("action").with_page(2);
        assert_ne!(page_one.cache_key(), page_two.cache_key());
    }

    #[test]
    fn test_games_query_empty_equals_absent() {
        let absent = GamesQuery::default();
        let empty = GamesQuery::default().with_search("").with_genres("");
        assert_eq!(absent.cache_key(), empty.cache_key());
    }

    #[test]
    fn test_games_query_filters_do_not_collide() {
        // Same value under different parameters must not share a key
        let genre = GamesQuery::default().with_genres("4");
        let platform = GamesQuery::default().with_parent_platforms("4");
        assert_ne!(genre.cache_key(), platform.cache_key());
    }

    #[test]
    fn test_entity_keys_are_namespaced() {
        assert_eq!(game_cache_key("3498"), "game:id=3498;");
        assert_ne!(movies_cache_key("3498"), screenshots_cache_key("3498"));
        assert_ne!(
            PageRequest::default().genres_cache_key(),
            GamesQuery::default().cache_key()
        );
    }

    #[test]
    fn test_translation_key() {
        let auto = translation_cache_key("Hello", None, "fr");
        let blank = translation_cache_key("Hello", Some(""), "fr");
        let explicit = translation_cache_key("Hello", Some("en"), "fr");

        assert_eq!(auto, blank);
        assert_ne!(auto, explicit);
        assert_ne!(auto, translation_cache_key("Hello", None, "de"));
    }

    #[test]
    fn test_game_deserializes_upstream_json() {
        let json = r#"{
            "id": 3498,
            "name": "Grand Theft Auto V",
            "slug": "grand-theft-auto-v",
            "background_image": null,
            "rating": 4.47,
            "metacritic": 92,
            "rating_top": 5,
            "description_raw": "Rockstar Games went bigger.",
            "genres": [{"id": 4, "name": "Action", "slug": "action", "image_background": null}]
        }"#;

        let game: Game = serde_json::from_str(json).expect("Failed to parse game");
        assert_eq!(game.id, 3498);
        assert_eq!(game.description.as_deref(), Some("Rockstar Games went bigger."));
        assert_eq!(game.genres[0].slug, "action");
        assert!(game.tags.is_empty());
    }

    #[test]
    fn test_collection_result_deserializes() {
        let json = r#"{"count": 2, "next": "https://api.rawg.io/api/genres?page=2", "previous": null,
            "results": [{"id": 1, "image": "a.jpg", "width": 1920, "height": 1080, "is_deleted": false}]}"#;

        let page: CollectionResult<Screenshot> =
            serde_json::from_str(json).expect("Failed to parse page");
        assert_eq!(page.count, 2);
        assert!(page.next.is_some());
        assert_eq!(page.results.len(), 1);
    }
}
