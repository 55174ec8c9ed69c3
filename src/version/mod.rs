//! Cache versioning and invalidation
//!
//! Versions are content-addressed: derived from SHA-256 hashes of the
//! tracked files, so the same tree always yields the same version.
//!
//! # Decision inputs
//!
//! | Config | Compared against stored version |
//! |--------|---------------------------------|
//! | `manual_version` | version string only |
//! | `auto_version` + tracked files | per-file hashes |
//! | neither | nothing; cache is kept |
//!
//! The engine holds no state: callers load the previous [`CacheVersion`],
//! pass it in, and persist the new one themselves.

pub mod generator;
pub mod invalidation;

pub use generator::{
    generate_cache_version, generate_cache_version_with, hash_bytes, should_ignore_file,
    CacheVersion, FileSource, LocalFileSource, VERSION_FILE,
};
pub use invalidation::{
    get_or_generate_cache_version, get_or_generate_cache_version_with, should_invalidate_cache,
    should_invalidate_cache_with, FileChanges, InvalidationReason, InvalidationResult,
};
