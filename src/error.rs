//! Error types for the catalog cache.

use std::fmt;

/// Result type for cache and provider operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the catalog cache and the providers it wraps.
///
/// The cache itself only ever produces `ConfigError` (bad capacity or shard
/// count) and `InvalidKey` (blank identifier). A cache miss is never an error.
/// Every other variant originates in an upstream provider and is passed
/// through the cache-aside decorators untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid cache configuration.
    ///
    /// Raised at construction time when:
    /// - Capacity is less than 1
    /// - Shard count is 0 or larger than the capacity
    /// - A configuration document cannot be read or parsed
    ///
    /// **Recovery:** Fix configuration and restart.
    ConfigError(String),

    /// A blank or otherwise unusable identifier was passed to an operation.
    ///
    /// Rejected before touching the cache or the upstream provider.
    InvalidKey(String),

    /// The requested resource does not exist upstream.
    NotFound(String),

    /// The upstream rejected our credentials.
    Unauthorized(String),

    /// The upstream rejected the request as malformed.
    BadRequest(String),

    /// The upstream reported a conflicting state.
    Conflict(String),

    /// The upstream could not be reached or failed while serving the request.
    ///
    /// **Recovery:** Retry after the upstream recovers.
    UpstreamUnavailable(String),

    /// The upstream response could not be decoded.
    DeserializationError(String),

    /// The upstream call exceeded its deadline.
    Timeout(String),

    /// Generic error with custom message.
    Other(String),
}

impl Error {
    /// Whether this error means the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::InvalidKey(msg) => write!(f, "Invalid key: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Error::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Error::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Error::UpstreamUnavailable(msg) => write!(f, "Upstream unavailable: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::Timeout(msg) => write!(f, "Timeout: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::UpstreamUnavailable(e.to_string())
        } else {
            Error::DeserializationError(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::UpstreamUnavailable(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}
