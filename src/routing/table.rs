//! The root route table and its compiled forms.
//!
//! # Responsibilities
//! - Hold route entries in priority order (first match wins)
//! - Refuse entries that duplicate an existing one
//! - Flatten includes into full paths below a mount prefix
//! - Compile into an immutable `axum::Router` and a `RouteIndex`
//!
//! # Design Decisions
//! - Append-only: there is no removal or reordering
//! - Duplicates are decided on the typed `RouteKey` plus method overlap,
//!   never on raw pattern strings
//! - Shadowed routes found while flattening are dropped with a warning
//!   instead of letting the router panic at startup

use std::collections::HashMap;

use axum::routing::MethodRouter;
use axum::Router;

use crate::http::AppState;
use crate::routing::entry::{RouteEntry, RouteMethod, Target};
use crate::routing::pattern::{RouteKey, RoutePattern};

/// Ordered, append-only collection of route entries.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table from an ordered list, dropping later duplicates.
    pub fn from_entries(entries: Vec<RouteEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            if !table.push_unique(entry) {
                tracing::debug!("Dropped duplicate entry while seeding route table");
            }
        }
        table
    }

    /// Append `entry` unless an existing entry conflicts with it.
    ///
    /// Returns false if the entry was a duplicate and was not added.
    pub fn push_unique(&mut self, entry: RouteEntry) -> bool {
        if self.contains(&entry) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn contains(&self, entry: &RouteEntry) -> bool {
        self.entries.iter().any(|e| e.conflicts_with(entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    /// Flatten includes into full-path routes below `prefix`, in priority
    /// order, with shadowed routes removed.
    pub fn compile(&self, prefix: &RoutePattern) -> Vec<CompiledRoute> {
        let mut flat = Vec::new();
        flatten_into(&mut flat, prefix, &self.entries);

        let mut seen: Vec<(RouteKey, RouteMethod)> = Vec::new();
        let mut compiled = Vec::with_capacity(flat.len());
        for route in flat {
            let key = route.pattern.key();
            if seen
                .iter()
                .any(|(k, m)| *k == key && m.overlaps(&route.method))
            {
                tracing::warn!(
                    path = %route.pattern.to_axum_path(),
                    method = %route.method,
                    "Route shadowed by an earlier definition, skipping"
                );
                continue;
            }
            seen.push((key, route.method.clone()));
            compiled.push(route);
        }
        compiled
    }

    /// Build the lookup index for the routes mounted below `prefix`.
    pub fn index(&self, prefix: &RoutePattern) -> RouteIndex {
        let mounts = self
            .entries
            .iter()
            .filter(|e| matches!(e.target(), Target::Include(_)))
            .map(|e| e.pattern().to_string().trim_end_matches('/').to_string())
            .collect();

        let routes = self
            .compile(prefix)
            .into_iter()
            .map(|route| IndexedRoute {
                path: route.pattern.to_axum_path(),
                pattern: route.pattern,
                method: route.method,
                name: route.name,
            })
            .collect();

        RouteIndex { routes, mounts }
    }

    /// Compile into an axum router with every route mounted below `prefix`.
    pub fn into_router(self, prefix: &RoutePattern) -> Router<AppState> {
        let mut router = Router::new();
        // Routes sharing a key must share one path string, or the matcher
        // rejects the second parameter name.
        let mut paths: HashMap<RouteKey, String> = HashMap::new();

        for route in self.compile(prefix) {
            let path = paths
                .entry(route.pattern.key())
                .or_insert_with(|| route.pattern.to_axum_path())
                .clone();
            tracing::debug!(path = %path, method = %route.method, "Mounting route");
            router = router.route(&path, route.handler);
        }
        router
    }
}

fn flatten_into(out: &mut Vec<CompiledRoute>, prefix: &RoutePattern, entries: &[RouteEntry]) {
    for entry in entries {
        let pattern = match prefix.join(entry.pattern()) {
            Ok(pattern) => pattern,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot mount route below prefix, skipping");
                continue;
            }
        };
        match entry.target() {
            Target::Handler(handler) => out.push(CompiledRoute {
                pattern,
                method: entry.method().clone(),
                name: entry.route_name().map(str::to_string),
                handler: handler.clone(),
            }),
            Target::Include(children) => flatten_into(out, &pattern, children),
        }
    }
}

/// A handler route with its full path.
#[derive(Debug)]
pub struct CompiledRoute {
    pub pattern: RoutePattern,
    pub method: RouteMethod,
    pub name: Option<String>,
    pub handler: MethodRouter<AppState>,
}

/// One row of the route index.
#[derive(Debug, Clone)]
pub struct IndexedRoute {
    pub method: RouteMethod,
    pub path: String,
    pub pattern: RoutePattern,
    pub name: Option<String>,
}

/// Read-only view of the mounted routes.
#[derive(Debug, Clone, Default)]
pub struct RouteIndex {
    routes: Vec<IndexedRoute>,
    mounts: Vec<String>,
}

impl RouteIndex {
    pub fn routes(&self) -> &[IndexedRoute] {
        &self.routes
    }

    /// Names of the feature includes mounted at the top level.
    pub fn mounts(&self) -> &[String] {
        &self.mounts
    }

    /// URL for the route called `name`, with `params` substituted.
    pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
        self.routes
            .iter()
            .find(|r| r.name.as_deref() == Some(name))
            .and_then(|r| r.pattern.reverse(params))
    }
}
