//! Compile-time feature registry and module resolution.
//!
//! Each feature exposes a `routes()` function and is listed once in the
//! application's registry. The registry then answers resolution requests for
//! dotted module identifiers such as `api.users.routes`.

use std::fmt;

use thiserror::Error;

use crate::routing::entry::RouteEntry;
use crate::routing::pattern::PatternError;

/// Suffix of the module each feature exposes its routes under.
pub const ROUTES_MODULE: &str = "routes";

/// Failure reported by a feature while producing its route list.
#[derive(Debug, Clone, Error)]
pub enum RouteError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Something the routes depend on is not available.
    #[error("dependency unavailable: {0}")]
    Unavailable(String),
}

/// Signature of a feature's route provider.
pub type RoutesFn = fn() -> Result<Vec<RouteEntry>, RouteError>;

/// Dotted module identifier, e.g. `api.users.routes`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModulePath(String);

impl ModulePath {
    /// The root route module of `package` (`api.routes`).
    pub fn root(package: &str) -> Self {
        Self(format!("{}.{}", package, ROUTES_MODULE))
    }

    /// The route module of feature `name` inside `package`.
    pub fn feature(package: &str, name: &str) -> Self {
        Self(format!("{}.{}.{}", package, name, ROUTES_MODULE))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolution failures, with absence distinguishable from breakage.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("no module named '{0}'")]
    NotFound(ModulePath),

    #[error("failed to load '{module}': {source}")]
    Load {
        module: ModulePath,
        #[source]
        source: RouteError,
    },
}

/// Looks up the route list behind a module identifier.
pub trait RouteResolver: Send + Sync {
    fn resolve(&self, module: &ModulePath) -> Result<Vec<RouteEntry>, ResolveError>;
}

/// Ordered manifest of the route providers compiled into the binary.
#[derive(Debug, Clone)]
pub struct FeatureRegistry {
    package: String,
    root: Option<RoutesFn>,
    features: Vec<(String, RoutesFn)>,
}

impl FeatureRegistry {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            root: None,
            features: Vec::new(),
        }
    }

    /// Set the package's root route list.
    pub fn root(mut self, routes: RoutesFn) -> Self {
        self.root = Some(routes);
        self
    }

    /// Register a feature's routes. A name registered twice keeps its first provider.
    pub fn feature(mut self, name: impl Into<String>, routes: RoutesFn) -> Self {
        let name = name.into();
        if self.features.iter().any(|(n, _)| *n == name) {
            tracing::warn!(feature = %name, "Feature registered twice, keeping the first");
            return self;
        }
        self.features.push((name, routes));
        self
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|(name, _)| name.as_str())
    }

    fn provider(&self, module: &ModulePath) -> Option<RoutesFn> {
        if *module == ModulePath::root(&self.package) {
            return self.root;
        }
        self.features
            .iter()
            .find(|(name, _)| ModulePath::feature(&self.package, name) == *module)
            .map(|(_, routes)| *routes)
    }
}

impl RouteResolver for FeatureRegistry {
    fn resolve(&self, module: &ModulePath) -> Result<Vec<RouteEntry>, ResolveError> {
        let routes = self
            .provider(module)
            .ok_or_else(|| ResolveError::NotFound(module.clone()))?;
        routes().map_err(|source| ResolveError::Load {
            module: module.clone(),
            source,
        })
    }
}
