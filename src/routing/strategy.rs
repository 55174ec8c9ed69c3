//! Caching strategies and route definitions
//!
//! The strategy vocabulary is closed: the service-worker runtime that
//! consumes the generated configuration recognizes exactly these names.

use crate::routing::glob::{self, Matcher};
use regex::Regex;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Named caching behavior executed by the service-worker runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyName {
    /// Serve from cache, fall back to network on miss
    CacheFirst,
    /// Try network (optionally with a timeout), fall back to cache
    NetworkFirst,
    /// Serve from cache and refresh in the background
    StaleWhileRevalidate,
    /// Never cache
    NetworkOnly,
    /// Never hit the network
    CacheOnly,
}

impl StrategyName {
    /// All recognized strategy names
    pub const ALL: [StrategyName; 5] = [
        Self::CacheFirst,
        Self::NetworkFirst,
        Self::StaleWhileRevalidate,
        Self::NetworkOnly,
        Self::CacheOnly,
    ];

    /// Name as understood by the runtime
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CacheFirst => "CacheFirst",
            Self::NetworkFirst => "NetworkFirst",
            Self::StaleWhileRevalidate => "StaleWhileRevalidate",
            Self::NetworkOnly => "NetworkOnly",
            Self::CacheOnly => "CacheOnly",
        }
    }
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown strategy '{}'", s))
    }
}

/// Entry expiration limits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expiration {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "max_entries")]
    pub max_entries: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "max_age_seconds")]
    pub max_age_seconds: Option<u64>,
}

/// An immutable caching strategy bound to a cache namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachingStrategy {
    /// Strategy name
    pub name: StrategyName,

    /// Namespace for stored entries
    #[serde(alias = "cache_name")]
    pub cache_name: String,

    /// Network timeout (NetworkFirst only)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "network_timeout_seconds"
    )]
    pub network_timeout_seconds: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<Expiration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    /// Runtime options passed through unmodified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

impl CachingStrategy {
    fn new(name: StrategyName, cache_name: impl Into<String>) -> Self {
        Self {
            name,
            cache_name: cache_name.into(),
            network_timeout_seconds: None,
            expiration: None,
            headers: None,
            options: None,
        }
    }

    pub fn cache_first(cache_name: impl Into<String>) -> Self {
        Self::new(StrategyName::CacheFirst, cache_name)
    }

    /// NetworkFirst with an optional timeout before falling back to cache
    pub fn network_first(cache_name: impl Into<String>, timeout_seconds: Option<u32>) -> Self {
        Self {
            network_timeout_seconds: timeout_seconds,
            ..Self::new(StrategyName::NetworkFirst, cache_name)
        }
    }

    pub fn stale_while_revalidate(cache_name: impl Into<String>) -> Self {
        Self::new(StrategyName::StaleWhileRevalidate, cache_name)
    }

    pub fn network_only(cache_name: impl Into<String>) -> Self {
        Self::new(StrategyName::NetworkOnly, cache_name)
    }

    pub fn cache_only(cache_name: impl Into<String>) -> Self {
        Self::new(StrategyName::CacheOnly, cache_name)
    }

    /// Limit stored entries by count and age
    pub fn with_expiration(mut self, max_entries: Option<u32>, max_age_seconds: Option<u64>) -> Self {
        self.expiration = Some(Expiration {
            max_entries,
            max_age_seconds,
        });
        self
    }

    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_options(mut self, options: serde_json::Value) -> Self {
        self.options = Some(options);
        self
    }
}

/// A precompiled regular expression used as a route pattern
#[derive(Debug, Clone)]
pub struct RegexPattern(Regex);

impl RegexPattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq for RegexPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for RegexPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RegexPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Self::new(&source).map_err(de::Error::custom)
    }
}

/// Route pattern: a glob string or a precompiled regex
///
/// Serialized as a plain string for globs and `{ "regex": "..." }` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoutePattern {
    Glob(String),
    Regex { regex: RegexPattern },
}

impl RoutePattern {
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self::Glob(pattern.into())
    }

    /// Pattern as a string; this is the route identifier
    pub fn as_str(&self) -> &str {
        match self {
            Self::Glob(pattern) => pattern,
            Self::Regex { regex } => regex.as_str(),
        }
    }

    /// Whether the pattern matches more than one literal URL
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Glob(pattern) => glob::has_wildcard(pattern),
            Self::Regex { .. } => true,
        }
    }

    /// Build a matcher for normalized URLs
    pub fn matcher(&self) -> Matcher {
        match self {
            Self::Glob(pattern) => glob::compile(pattern),
            Self::Regex { regex } => Matcher::from_regex(regex.0.clone()),
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RoutePattern {
    fn from(pattern: &str) -> Self {
        Self::Glob(pattern.to_string())
    }
}

/// A pattern-to-strategy binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfig {
    pub pattern: RoutePattern,

    pub strategy: CachingStrategy,

    /// Higher wins
    #[serde(default)]
    pub priority: i32,

    /// Identifiers of routes this route's cached validity depends on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl RouteConfig {
    pub fn new(pattern: impl Into<RoutePattern>, strategy: CachingStrategy) -> Self {
        Self {
            pattern: pattern.into(),
            strategy,
            priority: 0,
            dependencies: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Route identifier (the pattern string)
    pub fn id(&self) -> &str {
        self.pattern.as_str()
    }
}
