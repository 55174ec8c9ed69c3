//! Content-addressed cache version generation
//!
//! Scans a project tree for tracked files, hashes each one and derives a
//! single version identifier from the sorted (path, hash) pairs. The same
//! tree always yields the same version, regardless of the order in which
//! the file system enumerates entries.

use crate::error::{SwCacheError, SwCacheResult};
use crate::routing::glob::{self, Matcher};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Hex characters kept from the digest for the version string
const VERSION_HASH_LEN: usize = 12;

/// Default file name for the persisted version, relative to the project root
pub const VERSION_FILE: &str = ".swcache-version.json";

/// A cache version and the file hashes it was derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheVersion {
    /// Content-addressed or manual version identifier
    pub version: String,

    /// When this version was created
    pub timestamp: DateTime<Utc>,

    /// Absolute file path -> SHA-256 of its contents
    #[serde(default)]
    pub file_hashes: BTreeMap<String, String>,
}

impl CacheVersion {
    /// A manually pinned version with no file hashes
    pub fn manual(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            timestamp: Utc::now(),
            file_hashes: BTreeMap::new(),
        }
    }

    /// A version derived from the current instant (`v` + epoch millis)
    pub fn from_timestamp() -> Self {
        let now = Utc::now();
        Self {
            version: format!("v{}", now.timestamp_millis()),
            timestamp: now,
            file_hashes: BTreeMap::new(),
        }
    }

    /// Load a persisted version. Returns `None` if the file doesn't exist.
    pub fn load(path: &Path) -> SwCacheResult<Option<Self>> {
        if !path.exists() {
            debug!("No stored cache version at {}", path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SwCacheError::io(format!("reading cache version {}", path.display()), e))?;

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| SwCacheError::VersionFileInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    /// Persist this version as pretty JSON
    pub fn save(&self, path: &Path) -> SwCacheResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| SwCacheError::io(format!("creating directory {}", parent.display()), e))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .map_err(|e| SwCacheError::io(format!("writing cache version {}", path.display()), e))?;

        debug!("Saved cache version {} to {}", self.version, path.display());
        Ok(())
    }
}

/// Read access to the files of a project tree
pub trait FileSource {
    /// All regular files under `root`. Unreadable entries are skipped.
    fn files(&self, root: &Path) -> Vec<PathBuf>;

    /// File contents
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// [`FileSource`] backed by the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSource;

impl FileSource for LocalFileSource {
    fn files(&self, root: &Path) -> Vec<PathBuf> {
        if !root.is_dir() {
            debug!("Root {} is not a directory, no files to track", root.display());
            return Vec::new();
        }

        WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

/// SHA-256 of a byte slice, hex-encoded
pub fn hash_bytes(contents: &[u8]) -> String {
    hex::encode(Sha256::digest(contents))
}

/// Version string over (relative path, hash) pairs, which must be sorted by path
fn digest_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let mut hasher = Sha256::new();
    for (path, hash) in pairs {
        hasher.update(path.as_bytes());
        hasher.update(b":");
        hasher.update(hash.as_bytes());
        hasher.update(b"\n");
    }
    let digest = hex::encode(hasher.finalize());
    digest[..VERSION_HASH_LEN].to_string()
}

/// Path relative to `root` with `/` separators
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

fn compile_all(globs: &[String]) -> Vec<Matcher> {
    globs.iter().map(|g| glob::compile(g)).collect()
}

/// Whether a path matches any ignore glob
pub fn should_ignore_file(path: &str, ignore_globs: &[String]) -> bool {
    let normalized = path.replace('\\', "/");
    ignore_globs
        .iter()
        .any(|g| glob::compile(g).test(&normalized))
}

/// Generate a cache version for `root` using the local file system
pub fn generate_cache_version(root: &Path, tracked: &[String], ignore: &[String]) -> CacheVersion {
    generate_cache_version_with(&LocalFileSource, root, tracked, ignore)
}

/// Generate a cache version reading files through `source`
///
/// A file is tracked when its root-relative path matches at least one
/// tracked glob and no ignore glob. Files that cannot be read are
/// treated as absent. An empty tracked set still produces a valid,
/// deterministic version.
pub fn generate_cache_version_with(
    source: &dyn FileSource,
    root: &Path,
    tracked: &[String],
    ignore: &[String],
) -> CacheVersion {
    let tracked_matchers = compile_all(tracked);
    let ignore_matchers = compile_all(ignore);

    // relative path -> (absolute path, hash); BTreeMap keeps pairs sorted
    let mut pairs: BTreeMap<String, (String, String)> = BTreeMap::new();

    for path in source.files(root) {
        let Some(rel) = relative_path(root, &path) else {
            continue;
        };
        if !tracked_matchers.iter().any(|m| m.test(&rel)) {
            continue;
        }
        if ignore_matchers.iter().any(|m| m.test(&rel)) {
            debug!("Ignoring {}", rel);
            continue;
        }

        match source.read(&path) {
            Ok(contents) => {
                pairs.insert(rel, (path.to_string_lossy().into_owned(), hash_bytes(&contents)));
            }
            Err(e) => warn!("Treating unreadable file {} as removed: {}", path.display(), e),
        }
    }

    let version = digest_pairs(pairs.iter().map(|(rel, (_, hash))| (rel.as_str(), hash.as_str())));
    debug!("Generated cache version {} from {} file(s)", version, pairs.len());

    CacheVersion {
        version,
        timestamp: Utc::now(),
        file_hashes: pairs.into_values().collect(),
    }
}
