//! Flat route registry.
//!
//! Nested route declarations are flattened on registration: every descendant
//! becomes its own entry with the ancestors' paths prepended (a `/` shared
//! at the join is kept once) and their middleware appended. Lookups scan the
//! entries in registration order and the first pattern that matches wins.

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::middleware::Middleware;
use crate::params::{Parameters, parse_query, split_location};
use crate::pattern::RoutePattern;
use crate::route::RouteEntry;

/// The outcome of looking up a location in the registry.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The matched route, if any.
    pub route: Option<Arc<RouteEntry>>,
    /// Query parameters, overridden by values captured from the path.
    pub parameters: Parameters,
}

impl MatchResult {
    /// Returns true if a route matched.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.route.is_some()
    }
}

/// A flattened, compiled registry entry.
#[derive(Debug)]
struct RegisteredRoute {
    pattern: RoutePattern,
    entry: Arc<RouteEntry>,
    /// Full paths of the declarations this entry was flattened out of.
    ancestors: Vec<String>,
}

/// The set of routes known to a navigator.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: Vec<RegisteredRoute>,
    not_found: Option<Arc<RouteEntry>>,
}

impl RouteRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route and all of its descendants.
    ///
    /// Nothing is registered if any pattern in the tree fails to compile.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NavigatorError::InvalidPattern`] if a flattened path
    /// is not a valid pattern.
    pub fn add_route(&mut self, entry: RouteEntry) -> Result<()> {
        let mut flattened = Vec::new();
        flatten(entry, "", &[], &[], &mut flattened)?;

        for route in &flattened {
            debug!(
                path = %route.pattern,
                middlewares = route.entry.middlewares.len(),
                "Registered route"
            );
        }
        self.routes.extend(flattened);
        Ok(())
    }

    /// Registers several routes in order.
    ///
    /// # Errors
    ///
    /// Stops at the first route whose tree contains an invalid pattern;
    /// routes before it stay registered.
    pub fn add_routes(&mut self, entries: impl IntoIterator<Item = RouteEntry>) -> Result<()> {
        for entry in entries {
            self.add_route(entry)?;
        }
        Ok(())
    }

    /// Removes the route registered under `path` together with every entry
    /// flattened from its children. Returns how many entries were removed.
    pub fn remove_route(&mut self, path: &str) -> usize {
        let before = self.routes.len();
        self.routes.retain(|route| {
            route.entry.path != path && !route.ancestors.iter().any(|a| a == path)
        });
        let removed = before - self.routes.len();
        debug!(path = %path, removed, "Removed route");
        removed
    }

    /// Sets the route used when nothing matches.
    pub fn set_not_found(&mut self, entry: RouteEntry) {
        self.not_found = Some(Arc::new(entry));
    }

    /// Returns the route used when nothing matches.
    #[must_use]
    pub fn not_found(&self) -> Option<&Arc<RouteEntry>> {
        self.not_found.as_ref()
    }

    /// Looks up `location`, which may carry a query string.
    #[must_use]
    pub fn match_route(&self, location: &str) -> MatchResult {
        let (path, query) = split_location(location);
        let mut parameters = query.map(parse_query).unwrap_or_default();

        for route in &self.routes {
            if let Some(captured) = route.pattern.captures(path) {
                parameters.merge(&captured);
                return MatchResult {
                    route: Some(Arc::clone(&route.entry)),
                    parameters,
                };
            }
        }

        MatchResult {
            route: None,
            parameters,
        }
    }

    /// Returns the entry registered under exactly `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Arc<RouteEntry>> {
        self.routes
            .iter()
            .find(|route| route.entry.path == path)
            .map(|route| &route.entry)
    }

    /// Generates a concrete location for the route registered under `path`.
    #[must_use]
    pub fn url_for(&self, path: &str, params: &Parameters) -> Option<String> {
        self.routes
            .iter()
            .find(|route| route.entry.path == path)
            .and_then(|route| route.pattern.reverse(params))
    }

    /// Iterates over the flattened entries in lookup order.
    pub fn routes(&self) -> impl Iterator<Item = &Arc<RouteEntry>> {
        self.routes.iter().map(|route| &route.entry)
    }

    /// Number of flattened entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Flattens `entry` and its descendants into `out`, parent first.
fn flatten(
    mut entry: RouteEntry,
    prefix: &str,
    inherited: &[Arc<dyn Middleware>],
    ancestors: &[String],
    out: &mut Vec<RegisteredRoute>,
) -> Result<()> {
    let children = std::mem::take(&mut entry.children);
    entry.path = join_path(prefix, &entry.path);

    let own = std::mem::take(&mut entry.middlewares);
    for mw in own.iter().chain(inherited) {
        if !entry.middlewares.iter().any(|seen| Arc::ptr_eq(seen, mw)) {
            entry.middlewares.push(Arc::clone(mw));
        }
    }

    let pattern = RoutePattern::compile(&entry.path)?;
    let entry = Arc::new(entry);
    out.push(RegisteredRoute {
        pattern,
        entry: Arc::clone(&entry),
        ancestors: ancestors.to_vec(),
    });

    let mut lineage = ancestors.to_vec();
    lineage.push(entry.path.clone());
    for child in children {
        flatten(child, &entry.path, &entry.middlewares, &lineage, out)?;
    }
    Ok(())
}

/// Appends `path` to `prefix`, collapsing the `/` they would otherwise share.
fn join_path(prefix: &str, path: &str) -> String {
    match (prefix.strip_suffix('/'), path.starts_with('/')) {
        (Some(trimmed), true) => format!("{trimmed}{path}"),
        _ => format!("{prefix}{path}"),
    }
}
