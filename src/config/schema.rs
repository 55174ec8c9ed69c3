//! Configuration schema for swcache
//!
//! Configuration is stored in `.swcache.toml` at the project root, or at
//! `~/.config/swcache/config.toml`.

use crate::routing::RouteConfig;
use crate::service_worker::{BuilderOptions, Features, OfflineConfig, ServiceWorkerConfig};
use crate::version::VERSION_FILE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Route, versioning and invalidation policy
    pub caching: AdvancedCachingConfig,

    /// Service worker output settings
    pub service_worker: ServiceWorkerSettings,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Where the cache version is persisted between runs, relative to the project
    pub version_file: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            version_file: PathBuf::from(VERSION_FILE),
        }
    }
}

/// Caching policy consumed by the invalidation engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedCachingConfig {
    /// Routes, possibly declaring dependencies on each other
    pub routes: Vec<RouteConfig>,

    pub versioning: VersioningConfig,

    pub dependencies: DependencyTrackingConfig,

    pub invalidation: InvalidationConfig,
}

/// How the cache version is chosen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VersioningConfig {
    /// Pinned version; takes precedence over everything else
    pub manual_version: Option<String>,

    /// Derive the version from tracked file contents
    pub auto_version: bool,
}

/// Files whose contents feed the auto-generated version
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyTrackingConfig {
    pub enabled: bool,

    /// Globs relative to the project root
    pub tracked_files: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvalidationConfig {
    /// Globs excluded from version generation
    pub ignore_patterns: Vec<String>,
}

/// Service worker output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceWorkerSettings {
    /// Output path of the generated script
    pub destination: String,

    /// Backend integration providing route presets (django, flask)
    pub backend: Option<String>,

    /// Deduplicate each route list
    pub deduplicate_routes: bool,

    pub custom_routes: Vec<RouteConfig>,

    pub offline: Option<OfflineConfig>,

    pub features: Option<Features>,

    pub security_headers: Option<BTreeMap<String, String>>,

    pub cors_origins: Option<Vec<String>>,
}

impl Default for ServiceWorkerSettings {
    fn default() -> Self {
        Self {
            destination: "public/sw.js".to_string(),
            backend: None,
            deduplicate_routes: false,
            custom_routes: Vec::new(),
            offline: None,
            features: None,
            security_headers: None,
            cors_origins: None,
        }
    }
}

impl ServiceWorkerSettings {
    /// Options applied on top of a backend integration's routes
    pub fn builder_options(&self) -> BuilderOptions {
        BuilderOptions {
            custom_routes: self.custom_routes.clone(),
            offline: self.offline.clone(),
            features: self.features.clone(),
            deduplicate_routes: self.deduplicate_routes,
        }
    }

    /// Fields that override a generated config when merged after it
    pub fn overrides(&self) -> ServiceWorkerConfig {
        ServiceWorkerConfig {
            destination: self.destination.clone(),
            security_headers: self.security_headers.clone(),
            cors_origins: self.cors_origins.clone(),
            ..ServiceWorkerConfig::default()
        }
    }
}
