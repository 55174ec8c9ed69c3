//! Error types for swcache
//!
//! All fallible operations return `SwCacheResult<T>`. Matching, version
//! generation and invalidation decisions are total and never produce one.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for swcache operations
pub type SwCacheResult<T> = Result<T, SwCacheError>;

/// All errors that can occur in swcache
#[derive(Error, Debug)]
pub enum SwCacheError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Route errors
    #[error("Invalid routes in {path}:\n  {}", .errors.join("\n  "))]
    InvalidRoutes { path: PathBuf, errors: Vec<String> },

    #[error("Route not found: {0}")]
    RouteNotFound(String),

    // Version state errors
    #[error("Invalid cache version file {path}: {reason}")]
    VersionFileInvalid { path: PathBuf, reason: String },

    #[error("No stored cache version at {0}")]
    VersionMissing(PathBuf),

    // Service worker config errors
    #[error("merge() requires at least one service worker config")]
    EmptyMerge,

    #[error("Unknown backend integration: {0}")]
    UnknownBackend(String),

    #[error("Service worker config is invalid:\n  {}", .0.join("\n  "))]
    ServiceWorkerInvalid(Vec<String>),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl SwCacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::VersionMissing(_) => Some("Run: swcache version --write"),
            Self::VersionFileInvalid { .. } => {
                Some("Delete the version file and run: swcache version --write")
            }
            Self::UnknownBackend(_) => Some("Supported backends: django, flask"),
            Self::InvalidRoutes { .. } => Some(
                "Strategy names must be one of: CacheFirst, NetworkFirst, \
                 StaleWhileRevalidate, NetworkOnly, CacheOnly",
            ),
            _ => None,
        }
    }
}
