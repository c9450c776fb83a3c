//! Cache key management utilities.
//!
//! Keys have the shape `operation:name=value;name=value;` with parameters
//! sorted by name and values percent-escaped. Blank optional parameters are
//! left out entirely, so "not specified" and "specified as empty" share a key.

use std::fmt::Display;

/// Builder for cache keys.
///
/// # Example
///
/// ```
/// use gamehub_cache::key::CacheKeyBuilder;
///
/// let key = CacheKeyBuilder::new("games")
///     .optional("search", Some("half life"))
///     .optional("ordering", None)
///     .param("page", 1)
///     .build();
///
/// assert_eq!(key, "games:page=1;search=half%20life;");
/// ```
#[derive(Clone, Debug)]
pub struct CacheKeyBuilder {
    operation: &'static str,
    params: Vec<(&'static str, String)>,
}

impl CacheKeyBuilder {
    /// Start a key for the named operation.
    pub fn new(operation: &'static str) -> Self {
        CacheKeyBuilder {
            operation,
            params: Vec::new(),
        }
    }

    /// Add a parameter that is always part of the key.
    pub fn param(mut self, name: &'static str, value: impl Display) -> Self {
        self.params.push((name, value.to_string()));
        self
    }

    /// Add a parameter that is left out when absent or blank.
    pub fn optional(self, name: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => self.param(name, v),
            _ => self,
        }
    }

    /// Build the canonical key.
    pub fn build(mut self) -> String {
        self.params.sort_by(|a, b| a.0.cmp(b.0));

        let mut key = format!("{}:", self.operation);
        for (name, value) in &self.params {
            key.push_str(name);
            key.push('=');
            key.push_str(&urlencoding::encode(value));
            key.push(';');
        }
        key
    }
}
