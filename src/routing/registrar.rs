//! Startup-time discovery and registration of feature routes.
//!
//! # Responsibilities
//! - Enumerate candidate features (directory scan or registry names)
//! - Apply the denylist and reserved-prefix rules
//! - Resolve each candidate's `routes` module and mount it as `<name>/`
//! - Keep the root table free of duplicate mounts across repeated runs
//!
//! # Design Decisions
//! - One candidate's failure never stops the others: absence is logged at
//!   info, load failures and panics at error
//! - Only a missing root module aborts registration (nothing to append to)
//! - Candidates are visited in sorted order so tables are reproducible

use std::any::Any;
use std::fmt;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ApiConfig;
use crate::routing::entry::RouteEntry;
use crate::routing::pattern::PatternError;
use crate::routing::registry::{ModulePath, ResolveError, RouteResolver};
use crate::routing::table::RouteTable;

/// Directory names never treated as features.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "migrations",
    "management",
    "static",
    "templates",
    "tests",
    "models",
];

/// Names starting with this prefix are never scanned.
pub const DEFAULT_RESERVED_PREFIX: &str = "__";

/// Which names may become feature mounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRules {
    denylist: Vec<String>,
    reserved_prefix: String,
}

impl ScanRules {
    pub fn new(denylist: Vec<String>, reserved_prefix: impl Into<String>) -> Self {
        Self {
            denylist,
            reserved_prefix: reserved_prefix.into(),
        }
    }

    pub fn admits(&self, name: &str) -> bool {
        !name.starts_with(&self.reserved_prefix) && !self.denylist.iter().any(|d| d == name)
    }
}

impl Default for ScanRules {
    fn default() -> Self {
        Self::new(
            DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
            DEFAULT_RESERVED_PREFIX,
        )
    }
}

impl From<&ApiConfig> for ScanRules {
    fn from(config: &ApiConfig) -> Self {
        Self::new(config.denylist.clone(), config.reserved_prefix.clone())
    }
}

/// Where candidate names come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSource {
    /// Immediate subdirectories of a scan root.
    Directory(PathBuf),
    /// A fixed list, usually the registry's feature names.
    Names(Vec<String>),
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateSource::Directory(path) => write!(f, "directory {}", path.display()),
            CandidateSource::Names(names) => write!(f, "registry ({} features)", names.len()),
        }
    }
}

/// Outcome of one registration pass, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationSummary {
    pub registered: Vec<String>,
    pub absent: Vec<String>,
    pub failed: Vec<String>,
    pub duplicates: Vec<String>,
    pub excluded: Vec<String>,
}

#[derive(Debug, Error)]
enum MountError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("invalid mount point: {0}")]
    Pattern(#[from] PatternError),
}

/// Mounts every discoverable feature's routes into a root table.
pub struct Registrar<'a, R: RouteResolver> {
    package: String,
    resolver: &'a R,
    source: CandidateSource,
    rules: ScanRules,
}

impl<'a, R: RouteResolver> Registrar<'a, R> {
    pub fn new(package: impl Into<String>, resolver: &'a R, source: CandidateSource) -> Self {
        Self {
            package: package.into(),
            resolver,
            source,
            rules: ScanRules::default(),
        }
    }

    pub fn with_rules(mut self, rules: ScanRules) -> Self {
        self.rules = rules;
        self
    }

    /// Candidate names admitted by the scan rules, sorted.
    pub fn discover(&self) -> Vec<String> {
        self.list_names()
            .into_iter()
            .filter(|name| self.rules.admits(name))
            .collect()
    }

    fn list_names(&self) -> Vec<String> {
        let mut names = match &self.source {
            CandidateSource::Names(names) => names.clone(),
            CandidateSource::Directory(root) => match fs::read_dir(root) {
                Ok(entries) => entries
                    .filter_map(|entry| entry.ok())
                    // Follows symlinks, so a linked feature directory still counts.
                    .filter(|entry| entry.path().is_dir())
                    .filter_map(|entry| entry.file_name().into_string().ok())
                    .collect(),
                Err(e) => {
                    tracing::error!(
                        path = %root.display(),
                        error = %e,
                        "Cannot list feature directory"
                    );
                    Vec::new()
                }
            },
        };
        names.sort();
        names.dedup();
        names
    }

    /// Resolve the root module and register every feature into it.
    ///
    /// If the root module cannot be resolved, nothing is registered and an
    /// empty table is returned.
    pub fn build_table(&self) -> RouteTable {
        let module = ModulePath::root(&self.package);
        let root = panic::catch_unwind(AssertUnwindSafe(|| self.resolver.resolve(&module)));
        let entries = match root {
            Ok(Ok(entries)) => entries,
            Ok(Err(e)) => {
                tracing::error!(
                    module = %module,
                    error = %e,
                    "Root route module unavailable, route registration aborted"
                );
                return RouteTable::new();
            }
            Err(payload) => {
                tracing::error!(
                    module = %module,
                    reason = %panic_message(payload.as_ref()),
                    "Root route module panicked, route registration aborted"
                );
                return RouteTable::new();
            }
        };

        let mut table = RouteTable::from_entries(entries);
        self.register_all(&mut table);
        table
    }

    /// Mount each candidate's routes under `<name>/`, skipping duplicates.
    ///
    /// Never fails: every per-candidate problem is logged and recorded in the
    /// returned summary.
    pub fn register_all(&self, table: &mut RouteTable) -> RegistrationSummary {
        let mut summary = RegistrationSummary::default();

        tracing::info!(
            package = %self.package,
            source = %self.source,
            "Scanning for feature routes"
        );

        for name in self.list_names() {
            if !self.rules.admits(&name) {
                tracing::debug!(feature = %name, "Excluded by scan rules");
                summary.excluded.push(name);
                continue;
            }

            let module = ModulePath::feature(&self.package, &name);
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.mount(&name, &module)));

            match outcome {
                Ok(Ok(entry)) => {
                    let mount = entry.pattern().to_string();
                    if table.push_unique(entry) {
                        tracing::info!(
                            module = %module,
                            mount = %format!("{}/{}", self.package, mount),
                            "Registered feature routes"
                        );
                        summary.registered.push(name);
                    } else {
                        tracing::debug!(module = %module, "Feature routes already registered");
                        summary.duplicates.push(name);
                    }
                }
                Ok(Err(MountError::Resolve(ResolveError::NotFound(_)))) => {
                    tracing::info!(
                        feature = %name,
                        module = %module,
                        "No routes module, skipping"
                    );
                    summary.absent.push(name);
                }
                Ok(Err(e)) => {
                    tracing::error!(feature = %name, error = %e, "Failed to load feature routes");
                    summary.failed.push(name);
                }
                Err(payload) => {
                    tracing::error!(
                        feature = %name,
                        reason = %panic_message(payload.as_ref()),
                        "Unexpected error while registering feature routes"
                    );
                    summary.failed.push(name);
                }
            }
        }

        tracing::info!(
            registered = summary.registered.len(),
            absent = summary.absent.len(),
            failed = summary.failed.len(),
            duplicates = summary.duplicates.len(),
            "Feature route scan complete"
        );
        summary
    }

    fn mount(&self, name: &str, module: &ModulePath) -> Result<RouteEntry, MountError> {
        let routes = self.resolver.resolve(module)?;
        Ok(RouteEntry::include(&format!("{}/", name), routes)?)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
