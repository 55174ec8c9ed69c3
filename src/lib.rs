//! swcache - Service worker caching policy
//!
//! Resolves request URLs to caching strategies, derives content-addressed
//! cache versions from tracked files, cascades invalidation along route
//! dependencies and assembles service worker configuration.

pub mod cli;
pub mod config;
pub mod dependency;
pub mod error;
pub mod routing;
pub mod service_worker;
pub mod version;

pub use error::{SwCacheError, SwCacheResult};
