//! Route patterns, caching strategies and URL matching
//!
//! Globs are compiled into anchored matchers ([`glob`]); routes bind a
//! pattern to a [`CachingStrategy`] and are ordered, deduplicated and
//! matched by the [`resolver`].

pub mod glob;
pub mod resolver;
pub mod strategy;

pub use glob::{compile, Matcher};
pub use resolver::{
    deduplicate, find_best_match, find_matches, normalize_url, sort_by_priority,
    validate_patterns, PatternError, RouteResolver,
};
pub use strategy::{CachingStrategy, Expiration, RegexPattern, RouteConfig, RoutePattern, StrategyName};
