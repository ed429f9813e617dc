//! Route entries: a template, a method and what to dispatch to.

use std::fmt;

use axum::handler::Handler;
use axum::http::Method;
use axum::routing::{self, MethodRouter};

use crate::http::AppState;
use crate::routing::pattern::{PatternError, RouteKey, RoutePattern};

/// HTTP method an entry answers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMethod {
    Any,
    Only(Method),
}

impl RouteMethod {
    /// Two entries on the same key conflict when their methods overlap.
    pub fn overlaps(&self, other: &RouteMethod) -> bool {
        match (self, other) {
            (RouteMethod::Any, _) | (_, RouteMethod::Any) => true,
            (RouteMethod::Only(a), RouteMethod::Only(b)) => a == b,
        }
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteMethod::Any => write!(f, "ANY"),
            RouteMethod::Only(method) => write!(f, "{}", method),
        }
    }
}

/// What a matched entry dispatches to.
#[derive(Clone)]
pub enum Target {
    Handler(MethodRouter<AppState>),
    /// Every entry of a feature's route list, mounted below this entry.
    Include(Vec<RouteEntry>),
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Handler(_) => f.write_str("Handler"),
            Target::Include(entries) => f.debug_tuple("Include").field(entries).finish(),
        }
    }
}

/// A (pattern, target, optional name) triple.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pattern: RoutePattern,
    method: RouteMethod,
    target: Target,
    name: Option<String>,
}

impl RouteEntry {
    pub fn get<H, T>(pattern: &str, handler: H) -> Result<Self, PatternError>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::handler(pattern, RouteMethod::Only(Method::GET), routing::get(handler))
    }

    pub fn post<H, T>(pattern: &str, handler: H) -> Result<Self, PatternError>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::handler(pattern, RouteMethod::Only(Method::POST), routing::post(handler))
    }

    pub fn delete<H, T>(pattern: &str, handler: H) -> Result<Self, PatternError>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::handler(
            pattern,
            RouteMethod::Only(Method::DELETE),
            routing::delete(handler),
        )
    }

    /// Mount `entries` below `pattern`.
    pub fn include(pattern: &str, entries: Vec<RouteEntry>) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: RoutePattern::parse(pattern)?,
            method: RouteMethod::Any,
            target: Target::Include(entries),
            name: None,
        })
    }

    fn handler(
        pattern: &str,
        method: RouteMethod,
        router: MethodRouter<AppState>,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: RoutePattern::parse(pattern)?,
            method,
            target: Target::Handler(router),
            name: None,
        })
    }

    /// Attach a name for reverse lookup.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn key(&self) -> RouteKey {
        self.pattern.key()
    }

    pub fn method(&self) -> &RouteMethod {
        &self.method
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// True if dispatching `other` would be shadowed by this entry.
    pub fn conflicts_with(&self, other: &RouteEntry) -> bool {
        self.key() == other.key() && self.method.overlaps(&other.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn noop() -> &'static str {
        "ok"
    }

    #[test]
    fn test_method_overlap() {
        let get = RouteMethod::Only(Method::GET);
        let post = RouteMethod::Only(Method::POST);
        assert!(get.overlaps(&get));
        assert!(!get.overlaps(&post));
        assert!(RouteMethod::Any.overlaps(&post));
        assert!(post.overlaps(&RouteMethod::Any));
    }

    #[test]
    fn test_conflicts_use_normalized_key() {
        let a = RouteEntry::get("users/<int:id>/", noop).unwrap();
        let b = RouteEntry::get("/users/{user_id}", noop).unwrap();
        let c = RouteEntry::post("users/<int:id>/", noop).unwrap();
        assert!(a.conflicts_with(&b));
        assert!(!a.conflicts_with(&c));

        let include = RouteEntry::include("users/<int:id>", Vec::new()).unwrap();
        assert!(include.conflicts_with(&c));
    }

    #[test]
    fn test_bad_pattern_is_an_error() {
        assert!(RouteEntry::get("<bogus:x>/", noop).is_err());
    }

    #[test]
    fn test_name() {
        let entry = RouteEntry::get("", noop).unwrap().name("home");
        assert_eq!(entry.route_name(), Some("home"));
        assert_eq!(entry.method().to_string(), "GET");
    }
}
