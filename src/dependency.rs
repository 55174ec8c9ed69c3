//! Route dependency graph and cascade invalidation
//!
//! Routes are identified by their pattern string. Declarations are
//! user-authored, so the graph may contain cycles; traversal keeps a
//! visited set and never revisits a route.

use crate::routing::RouteConfig;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Forward and reverse adjacency maps over route identifiers
///
/// For every edge `A -> B` in `dependencies`, `B -> A` is in `dependents`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// route -> routes it depends on
    pub dependencies: HashMap<String, Vec<String>>,
    /// route -> routes that depend on it
    pub dependents: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Routes `route` declares a dependency on
    pub fn dependencies_of(&self, route: &str) -> &[String] {
        self.dependencies.get(route).map_or(&[], Vec::as_slice)
    }

    /// Routes declaring a dependency on `route`
    pub fn dependents_of(&self, route: &str) -> &[String] {
        self.dependents.get(route).map_or(&[], Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Every route that becomes stale when `changed` changes, itself included
    pub fn cascade(&self, changed: &str) -> Vec<String> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::new();

        visited.insert(changed);
        queue.push_back(changed);

        while let Some(route) = queue.pop_front() {
            order.push(route.to_string());
            for dependent in self.dependents_of(route) {
                if visited.insert(dependent.as_str()) {
                    queue.push_back(dependent.as_str());
                }
            }
        }

        debug!("Cascade from '{}' reaches {} route(s)", changed, order.len());
        order
    }

    fn add_edge(&mut self, route: &str, target: &str) {
        let forward = self.dependencies.entry(route.to_string()).or_default();
        if forward.iter().any(|d| d == target) {
            return;
        }
        forward.push(target.to_string());
        self.dependents
            .entry(target.to_string())
            .or_default()
            .push(route.to_string());
    }
}

/// Build adjacency maps from route dependency declarations
///
/// Routes without dependencies add no forward entry. Duplicate patterns
/// have their declarations merged.
pub fn build_dependency_graph(routes: &[RouteConfig]) -> DependencyGraph {
    let mut graph = DependencyGraph::default();

    for route in routes.iter().filter(|r| !r.dependencies.is_empty()) {
        for target in &route.dependencies {
            graph.add_edge(route.id(), target);
        }
    }

    debug!(
        "Built dependency graph: {} route(s) with dependencies",
        graph.dependencies.len()
    );
    graph
}

/// Breadth-first cascade along `dependents` edges starting at `changed`
///
/// Terminates on cycles of any length; ordering is not significant.
pub fn get_cascade_invalidation(changed: &str, graph: &DependencyGraph) -> Vec<String> {
    graph.cascade(changed)
}
