//! Startup configuration for the catalog caches.
//!
//! Every slot gets its own capacity and TTL. Values are read once at process
//! start; the caches built from them live for the rest of the process.
//!
//! ```
//! use gamehub_cache::config::CacheConfig;
//!
//! let config = CacheConfig::from_json_str(r#"{
//!     "games": { "capacity": 1000 },
//!     "translations": { "capacity": 50, "ttl_secs": null }
//! }"#).expect("valid config");
//!
//! assert_eq!(config.games.capacity, 1000);
//! assert_eq!(config.genres.capacity, 100);
//! assert_eq!(config.translations.ttl_secs, None);
//! ```

use crate::error::{Error, Result};
use crate::observability::{TtlPolicy, DEFAULT_TTL};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

fn default_ttl_secs() -> Option<u64> {
    Some(DEFAULT_TTL.as_secs())
}

fn default_shards() -> usize {
    1
}

/// Capacity, freshness and sharding of one cache slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Maximum number of entries; must be at least 1.
    pub capacity: usize,

    /// Entry lifetime in seconds. `null` keeps entries until evicted.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: Option<u64>,

    /// Number of independently locked shards; 1 means a single lock.
    #[serde(default = "default_shards")]
    pub shards: usize,
}

impl CacheSettings {
    pub fn new(capacity: usize) -> Self {
        CacheSettings {
            capacity,
            ttl_secs: default_ttl_secs(),
            shards: default_shards(),
        }
    }

    /// Set the entry lifetime; `None` keeps entries until evicted.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if `ttl` is zero or not a whole number of
    /// seconds, since `ttl_secs` cannot represent it.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Result<Self> {
        if let Some(d) = ttl {
            if d.is_zero() || d.subsec_nanos() != 0 {
                return Err(Error::ConfigError(format!(
                    "TTL must be a positive whole number of seconds, got {:?}",
                    d
                )));
            }
        }
        self.ttl_secs = ttl.map(|d| d.as_secs());
        Ok(self)
    }

    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    pub fn ttl_policy(&self) -> TtlPolicy {
        match self.ttl_secs {
            Some(secs) => TtlPolicy::Fixed(Duration::from_secs(secs)),
            None => TtlPolicy::Infinite,
        }
    }

    /// Check the settings for `slot`.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` naming the slot when capacity is 0, the
    /// shard count is 0 or exceeds capacity, or the TTL is 0.
    pub fn validate(&self, slot: &str) -> Result<()> {
        if self.capacity < 1 {
            return Err(Error::ConfigError(format!(
                "{}: capacity must be at least 1",
                slot
            )));
        }
        if self.shards == 0 || self.shards > self.capacity {
            return Err(Error::ConfigError(format!(
                "{}: shards must be between 1 and capacity ({}), got {}",
                slot, self.capacity, self.shards
            )));
        }
        if self.ttl_secs == Some(0) {
            return Err(Error::ConfigError(format!(
                "{}: ttl_secs must be positive or null",
                slot
            )));
        }
        Ok(())
    }
}

/// Settings for every cache slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub games: CacheSettings,
    pub genres: CacheSettings,
    pub game_details: CacheSettings,
    pub movies: CacheSettings,
    pub screenshots: CacheSettings,
    pub translations: CacheSettings,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            games: CacheSettings::new(500),
            genres: CacheSettings::new(100),
            game_details: CacheSettings::new(100),
            movies: CacheSettings::new(100),
            screenshots: CacheSettings::new(100),
            translations: CacheSettings::new(1000),
        }
    }
}

impl CacheConfig {
    /// Parse and validate a JSON document. Missing slots keep their defaults.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if the document is malformed or invalid
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CacheConfig = serde_json::from_str(json)
            .map_err(|e| Error::ConfigError(format!("invalid cache config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if the file cannot be read or is invalid
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        info!("Loading cache config from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Validate every slot.
    ///
    /// # Errors
    /// Returns the first slot's `Error::ConfigError`
    pub fn validate(&self) -> Result<()> {
        self.games.validate("games")?;
        self.genres.validate("genres")?;
        self.game_details.validate("game_details")?;
        self.movies.validate("movies")?;
        self.screenshots.validate("screenshots")?;
        self.translations.validate("translations")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CacheConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.games.capacity, 500);
        assert_eq!(config.game_details.capacity, 100);
        assert_eq!(config.games.ttl_policy(), TtlPolicy::Fixed(DEFAULT_TTL));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CacheConfig::from_json_str(r#"{"movies": {"capacity": 7, "shards": 2}}"#)
            .expect("Failed to parse config");

        assert_eq!(config.movies.capacity, 7);
        assert_eq!(config.movies.shards, 2);
        assert_eq!(config.movies.ttl_secs, Some(604_800));
        assert_eq!(config.screenshots, CacheSettings::new(100));
    }

    #[test]
    fn test_null_ttl_is_infinite() {
        let config = CacheConfig::from_json_str(r#"{"genres": {"capacity": 10, "ttl_secs": null}}"#)
            .expect("Failed to parse config");
        assert_eq!(config.genres.ttl_policy(), TtlPolicy::Infinite);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = CacheConfig::from_json_str(r#"{"games": {"capacity": 0}}"#);
        match result {
            Err(Error::ConfigError(msg)) => assert!(msg.contains("games")),
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_shards_rejected() {
        let settings = CacheSettings::new(2).with_shards(3);
        assert!(settings.validate("movies").is_err());
        assert!(CacheSettings::new(2).with_shards(0).validate("movies").is_err());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let result = CacheSettings::new(2).with_ttl(Some(Duration::ZERO));
        assert!(matches!(result, Err(Error::ConfigError(_))));

        let settings = CacheSettings {
            ttl_secs: Some(0),
            ..CacheSettings::new(2)
        };
        assert!(settings.validate("genres").is_err());
    }

    #[test]
    fn test_with_ttl_whole_seconds() {
        let settings = CacheSettings::new(2)
            .with_ttl(Some(Duration::from_secs(90)))
            .expect("Whole seconds are accepted");
        assert_eq!(settings.ttl_secs, Some(90));
        assert_eq!(
            settings.ttl_policy(),
            TtlPolicy::Fixed(Duration::from_secs(90))
        );

        let infinite = CacheSettings::new(2).with_ttl(None).expect("None is accepted");
        assert_eq!(infinite.ttl_policy(), TtlPolicy::Infinite);
    }

    #[test]
    fn test_with_ttl_rejects_fractional_seconds() {
        for millis in [500, 1500] {
            match CacheSettings::new(2).with_ttl(Some(Duration::from_millis(millis))) {
                Err(Error::ConfigError(msg)) => assert!(msg.contains("whole number of seconds")),
                other => panic!("Expected ConfigError, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = CacheConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_missing_file_rejected() {
        let result = CacheConfig::from_file("/nonexistent/gamehub-cache.json");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!(
            "gamehub-cache-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"game_details": {"capacity": 42}}"#)
            .expect("Failed to write config");

        let config = CacheConfig::from_file(&path).expect("Failed to load config");
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.game_details.capacity, 42);
    }
}
