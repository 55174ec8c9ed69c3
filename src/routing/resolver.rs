//! Route ordering, deduplication and matching
//!
//! Routes are ordered by descending priority. Among equal priorities a
//! static pattern (no wildcards) sorts before a dynamic one, so exact
//! routes win ties. The sort is stable: declaration order breaks any
//! remaining tie.

use crate::routing::glob::Matcher;
use crate::routing::strategy::{RouteConfig, StrategyName};
use serde_json::Value;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Strip query string and fragment and force a leading `/`
///
/// Absolute URLs are reduced to their path. A `://` only starts an origin
/// when nothing but the scheme precedes it, so URLs carried in a query or
/// fragment are left alone.
pub fn normalize_url(url: &str) -> String {
    let without_origin = match url.find("://") {
        Some(scheme_end) if !url[..scheme_end].contains(['/', '?', '#']) => {
            let rest = &url[scheme_end + 3..];
            rest.find(['/', '?', '#']).map_or("", |i| &rest[i..])
        }
        _ => url,
    };

    let path = without_origin
        .find(['?', '#'])
        .map_or(without_origin, |i| &without_origin[..i]);

    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

fn sort_key(route: &RouteConfig) -> (Reverse<i32>, bool) {
    (Reverse(route.priority), route.pattern.is_dynamic())
}

/// Stable sort by descending priority, static patterns first on ties
pub fn sort_by_priority(routes: &[RouteConfig]) -> Vec<RouteConfig> {
    let mut sorted = routes.to_vec();
    sorted.sort_by_key(sort_key);
    sorted
}

/// Keep the first route per (pattern, cache name) after priority sorting
pub fn deduplicate(routes: &[RouteConfig]) -> Vec<RouteConfig> {
    let mut seen = HashSet::new();
    let deduped: Vec<RouteConfig> = sort_by_priority(routes)
        .into_iter()
        .filter(|route| {
            seen.insert((
                route.pattern.as_str().to_string(),
                route.strategy.cache_name.clone(),
            ))
        })
        .collect();

    if deduped.len() != routes.len() {
        debug!("Removed {} duplicate route(s)", routes.len() - deduped.len());
    }
    deduped
}

/// Highest-priority route matching the URL
pub fn find_best_match<'a>(url: &str, routes: &'a [RouteConfig]) -> Option<&'a RouteConfig> {
    RouteResolver::new(routes).best_match(url)
}

/// Every route matching the URL, in priority order
pub fn find_matches<'a>(url: &str, routes: &'a [RouteConfig]) -> Vec<&'a RouteConfig> {
    RouteResolver::new(routes).matches(url)
}

/// Routes sorted once with their matchers compiled, for repeated lookups
#[derive(Debug)]
pub struct RouteResolver<'a> {
    entries: Vec<(&'a RouteConfig, Matcher)>,
}

impl<'a> RouteResolver<'a> {
    pub fn new(routes: &'a [RouteConfig]) -> Self {
        let mut ordered: Vec<&RouteConfig> = routes.iter().collect();
        ordered.sort_by_key(|route| sort_key(route));

        Self {
            entries: ordered
                .into_iter()
                .map(|route| (route, route.pattern.matcher()))
                .collect(),
        }
    }

    pub fn best_match(&self, url: &str) -> Option<&'a RouteConfig> {
        let normalized = normalize_url(url);
        self.entries
            .iter()
            .find(|(_, matcher)| matcher.test(&normalized))
            .map(|(route, _)| *route)
    }

    pub fn matches(&self, url: &str) -> Vec<&'a RouteConfig> {
        let normalized = normalize_url(url);
        self.entries
            .iter()
            .filter(|(_, matcher)| matcher.test(&normalized))
            .map(|(route, _)| *route)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A malformed route found by [`validate_patterns`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    /// Position of the route in its list
    pub index: usize,
    pub message: String,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Route {}: {}", self.index, self.message)
    }
}

/// Validate untyped route definitions, collecting every problem
///
/// A route is invalid when its pattern is neither a string nor a
/// `{ "regex": ... }` matcher, when its strategy is missing, or when the
/// strategy name is outside the recognized vocabulary.
pub fn validate_patterns(routes: &[Value]) -> Vec<PatternError> {
    let mut errors = Vec::new();

    for (index, route) in routes.iter().enumerate() {
        let mut push = |message: String| errors.push(PatternError { index, message });

        let Some(route) = route.as_object() else {
            push("route must be a table with a pattern and a strategy".to_string());
            continue;
        };

        match route.get("pattern") {
            Some(Value::String(_)) => {}
            Some(Value::Object(obj)) => match obj.get("regex").and_then(Value::as_str) {
                Some(source) => {
                    if let Err(e) = regex::Regex::new(source) {
                        push(format!("invalid regex pattern: {}", e));
                    }
                }
                None => push("pattern must be a string or a regex matcher".to_string()),
            },
            _ => push("pattern must be a string or a regex matcher".to_string()),
        }

        match route.get("strategy") {
            None | Some(Value::Null) => push("strategy is required".to_string()),
            Some(Value::Object(strategy)) => match strategy.get("name").and_then(Value::as_str) {
                Some(name) if name.parse::<StrategyName>().is_ok() => {}
                Some(name) => push(format!(
                    "unknown strategy '{}' (expected one of: {})",
                    name,
                    StrategyName::ALL.map(|s| s.as_str()).join(", ")
                )),
                None => push("strategy name is required".to_string()),
            },
            Some(_) => push("strategy must be a table with a name".to_string()),
        }
    }

    errors
}
