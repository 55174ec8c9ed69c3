//! CLI command implementations

pub mod cascade;
pub mod check;
pub mod matching;
pub mod sw_config;
pub mod validate;
pub mod version;

pub use cascade::execute as cascade;
pub use check::execute as check;
pub use matching::execute as matching;
pub use sw_config::execute as sw_config;
pub use validate::execute as validate;
pub use version::execute as version;

use crate::config::{AdvancedCachingConfig, Config};
use std::path::{Component, Path, PathBuf};

/// Location of the persisted cache version for a project
pub(crate) fn version_path(root: &Path, config: &Config) -> PathBuf {
    root.join(&config.general.version_file)
}

/// Caching policy with the version file excluded from tracking
///
/// The version file records the hashes it would otherwise contribute to,
/// so tracking it makes every saved version stale.
pub(crate) fn tracking_policy(root: &Path, config: &Config) -> AdvancedCachingConfig {
    let mut caching = config.caching.clone();
    if let Ok(rel) = version_path(root, config).strip_prefix(root) {
        let parts: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if !parts.is_empty() {
            caching.invalidation.ignore_patterns.push(parts.join("/"));
        }
    }
    caching
}
