//! Configuration management for swcache

pub mod schema;

pub use schema::{
    AdvancedCachingConfig, Config, DependencyTrackingConfig, GeneralConfig, InvalidationConfig,
    ServiceWorkerSettings, VersioningConfig,
};

use crate::error::{SwCacheError, SwCacheResult};
use crate::routing::validate_patterns;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = ".swcache.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("swcache")
            .join("config.toml")
    }

    /// Find `.swcache.toml` in `start` or any of its ancestors
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration, using defaults if the file doesn't exist
    pub fn load(&self) -> SwCacheResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path)
    }

    /// Load configuration from a specific file
    ///
    /// Route tables are validated first so that every malformed route is
    /// reported with its position, rather than only the first serde error.
    pub fn load_from_file(&self, path: &Path) -> SwCacheResult<Config> {
        let content = fs::read_to_string(path)
            .map_err(|e| SwCacheError::io(format!("reading config from {}", path.display()), e))?;

        let raw: toml::Table = toml::from_str(&content).map_err(|e| SwCacheError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let errors = route_errors(&raw);
        if !errors.is_empty() {
            return Err(SwCacheError::InvalidRoutes {
                path: path.to_path_buf(),
                errors,
            });
        }

        let config: Config = toml::Value::Table(raw).try_into().map_err(|e| SwCacheError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        debug!(
            "Loaded {} route(s) from {}",
            config.caching.routes.len(),
            path.display()
        );
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config: &Config) -> SwCacheResult<()> {
        self.ensure_config_dir()?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).map_err(|e| {
            SwCacheError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    fn ensure_config_dir(&self) -> SwCacheResult<()> {
        if let Some(parent) = self.config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SwCacheError::ConfigDirCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate both route lists of a raw config table, labelling each error
fn route_errors(raw: &toml::Table) -> Vec<String> {
    let lists = [
        ("caching.routes", raw.get("caching").and_then(|c| c.get("routes"))),
        (
            "service_worker.custom_routes",
            raw.get("service_worker").and_then(|s| s.get("custom_routes")),
        ),
    ];

    let mut errors = Vec::new();
    for (label, value) in lists {
        let Some(value) = value else { continue };
        let Some(routes) = value.as_array() else {
            errors.push(format!("{}: must be an array of route tables", label));
            continue;
        };
        let routes: Vec<serde_json::Value> = routes
            .iter()
            .map(|r| serde_json::to_value(r).unwrap_or(serde_json::Value::Null))
            .collect();
        errors.extend(
            validate_patterns(&routes)
                .into_iter()
                .map(|e| format!("{}: {}", label, e)),
        );
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().unwrap();
        assert!(config.caching.routes.is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.caching.versioning.manual_version = Some("v2.0.0".to_string());
        config.caching.dependencies.tracked_files = vec!["dist/**/*.js".to_string()];

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded.caching.versioning.manual_version.as_deref(), Some("v2.0.0"));
        assert_eq!(loaded.caching.dependencies.tracked_files, ["dist/**/*.js"]);
    }

    #[test]
    fn invalid_routes_are_all_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(LOCAL_CONFIG_FILE);
        fs::write(
            &path,
            r#"
[[caching.routes]]
pattern = "/ok/**"
strategy = { name = "CacheFirst", cache_name = "ok" }

[[caching.routes]]
pattern = "/bad"
strategy = { name = "Fastest", cache_name = "bad" }

[[caching.routes]]
pattern = "/missing"

[[service_worker.custom_routes]]
pattern = 7
strategy = { name = "CacheOnly", cache_name = "x" }
"#,
        )
        .unwrap();

        let err = ConfigManager::with_path(path).load().unwrap_err();
        match err {
            SwCacheError::InvalidRoutes { errors, .. } => {
                assert_eq!(errors.len(), 3);
                assert!(errors[0].starts_with("caching.routes: Route 1: unknown strategy"));
                assert!(errors[1].contains("Route 2: strategy is required"));
                assert!(errors[2].starts_with("service_worker.custom_routes: Route 0"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn malformed_toml_is_config_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(LOCAL_CONFIG_FILE);
        fs::write(&path, "[caching\nroutes = ").unwrap();

        let err = ConfigManager::with_path(path).load().unwrap_err();
        assert!(matches!(err, SwCacheError::ConfigInvalid { .. }));
    }

    #[test]
    fn find_local_config_walks_ancestors() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        assert!(ConfigManager::find_local_config(&nested).is_none());

        fs::write(temp.path().join(LOCAL_CONFIG_FILE), "").unwrap();
        assert_eq!(
            ConfigManager::find_local_config(&nested),
            Some(temp.path().join(LOCAL_CONFIG_FILE))
        );
    }
}
