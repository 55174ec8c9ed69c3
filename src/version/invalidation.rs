//! Cache invalidation decisions
//!
//! Rules, first match wins:
//!
//! 1. Manual version set and different from the stored one: invalidate.
//! 2. Manual version set and equal: keep. No files are scanned.
//! 3. Auto-versioning with dependency tracking: regenerate file hashes and
//!    invalidate if any tracked file was added, removed or modified.
//! 4. Otherwise: keep.

use crate::config::AdvancedCachingConfig;
use crate::version::generator::{generate_cache_version_with, CacheVersion, FileSource, LocalFileSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Why a decision was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidationReason {
    #[serde(rename = "Manual version changed")]
    ManualVersionChanged,
    #[serde(rename = "Manual version unchanged")]
    ManualVersionUnchanged,
    #[serde(rename = "Tracked files changed")]
    FilesChanged,
    #[serde(rename = "No tracked file changes")]
    NoFileChanges,
    #[serde(rename = "No versioning strategy configured")]
    NoVersioning,
}

impl InvalidationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManualVersionChanged => "Manual version changed",
            Self::ManualVersionUnchanged => "Manual version unchanged",
            Self::FilesChanged => "Tracked files changed",
            Self::NoFileChanges => "No tracked file changes",
            Self::NoVersioning => "No versioning strategy configured",
        }
    }
}

impl fmt::Display for InvalidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an invalidation check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidationResult {
    pub should_invalidate: bool,

    pub reason: InvalidationReason,

    /// Version to adopt when invalidating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_version: Option<String>,

    /// Differing paths, for file-change decisions only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_files: Option<Vec<String>>,

    /// The version the decision was computed against, to persist when invalidating
    #[serde(skip)]
    pub next: Option<CacheVersion>,
}

impl InvalidationResult {
    fn keep(reason: InvalidationReason) -> Self {
        Self {
            should_invalidate: false,
            reason,
            new_version: None,
            changed_files: None,
            next: None,
        }
    }
}

/// Differences between two file hash maps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<String>,
}

impl FileChanges {
    /// Compare `current` hashes against `previous` ones
    pub fn between(previous: &BTreeMap<String, String>, current: &BTreeMap<String, String>) -> Self {
        let mut changes = Self::default();

        for (path, hash) in current {
            match previous.get(path) {
                Some(old) if old == hash => {}
                Some(_) => changes.modified.push(path.clone()),
                None => changes.added.push(path.clone()),
            }
        }
        changes.removed = previous
            .keys()
            .filter(|p| !current.contains_key(*p))
            .cloned()
            .collect();

        changes
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// Every differing path, sorted
    pub fn all(&self) -> Vec<String> {
        let mut all: Vec<String> = self
            .added
            .iter()
            .chain(&self.removed)
            .chain(&self.modified)
            .cloned()
            .collect();
        all.sort();
        all
    }
}

/// Decide whether cached content built from `current` is stale
pub fn should_invalidate_cache(
    root: &Path,
    current: &CacheVersion,
    config: &AdvancedCachingConfig,
) -> InvalidationResult {
    should_invalidate_cache_with(&LocalFileSource, root, current, config)
}

/// [`should_invalidate_cache`] reading files through `source`
pub fn should_invalidate_cache_with(
    source: &dyn FileSource,
    root: &Path,
    current: &CacheVersion,
    config: &AdvancedCachingConfig,
) -> InvalidationResult {
    if let Some(manual) = &config.versioning.manual_version {
        if *manual != current.version {
            info!("Manual version changed: {} -> {}", current.version, manual);
            return InvalidationResult {
                should_invalidate: true,
                reason: InvalidationReason::ManualVersionChanged,
                new_version: Some(manual.clone()),
                changed_files: None,
                next: Some(CacheVersion::manual(manual.clone())),
            };
        }
        return InvalidationResult::keep(InvalidationReason::ManualVersionUnchanged);
    }

    if config.versioning.auto_version && config.dependencies.enabled {
        let regenerated = generate_cache_version_with(
            source,
            root,
            &config.dependencies.tracked_files,
            &config.invalidation.ignore_patterns,
        );
        let changes = FileChanges::between(&current.file_hashes, &regenerated.file_hashes);

        if changes.is_empty() {
            debug!("No tracked file changes since {}", current.version);
            return InvalidationResult::keep(InvalidationReason::NoFileChanges);
        }

        info!(
            "Tracked files changed ({} added, {} removed, {} modified): {} -> {}",
            changes.added.len(),
            changes.removed.len(),
            changes.modified.len(),
            current.version,
            regenerated.version
        );
        return InvalidationResult {
            should_invalidate: true,
            reason: InvalidationReason::FilesChanged,
            new_version: Some(regenerated.version.clone()),
            changed_files: Some(changes.all()),
            next: Some(regenerated),
        };
    }

    debug!("No versioning strategy configured, keeping cache");
    InvalidationResult::keep(InvalidationReason::NoVersioning)
}

/// The version to use for this run
///
/// Manual version if pinned, content-addressed if auto-versioning with
/// tracked files, otherwise a timestamp-derived version.
pub fn get_or_generate_cache_version(root: &Path, config: &AdvancedCachingConfig) -> CacheVersion {
    get_or_generate_cache_version_with(&LocalFileSource, root, config)
}

/// [`get_or_generate_cache_version`] reading files through `source`
pub fn get_or_generate_cache_version_with(
    source: &dyn FileSource,
    root: &Path,
    config: &AdvancedCachingConfig,
) -> CacheVersion {
    if let Some(manual) = &config.versioning.manual_version {
        return CacheVersion::manual(manual.clone());
    }

    if config.versioning.auto_version && !config.dependencies.tracked_files.is_empty() {
        return generate_cache_version_with(
            source,
            root,
            &config.dependencies.tracked_files,
            &config.invalidation.ignore_patterns,
        );
    }

    CacheVersion::from_timestamp()
}
