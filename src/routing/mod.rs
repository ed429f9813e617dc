//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     FeatureRegistry (api::registry())
//!     → registrar.rs (discover candidates, resolve `<pkg>.<name>.routes`)
//!     → table.rs (append-only RouteTable, duplicate guard)
//!     → Compile: flatten includes below the mount prefix
//!     → Freeze as immutable axum Router + RouteIndex
//!
//! Incoming Request (path, method)
//!     → axum matcher (compiled paths)
//!     → feature handler
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Features are listed explicitly at compile time instead of imported by name
//! - Duplicate detection on normalized templates, not raw strings
//! - First definition wins when two routes would shadow each other

pub mod entry;
pub mod pattern;
pub mod registrar;
pub mod registry;
pub mod table;

pub use entry::{RouteEntry, RouteMethod, Target};
pub use pattern::{Converter, PatternError, RouteKey, RoutePattern};
pub use registrar::{CandidateSource, Registrar, RegistrationSummary, ScanRules};
pub use registry::{FeatureRegistry, ModulePath, ResolveError, RouteError, RouteResolver, RoutesFn};
pub use table::{IndexedRoute, RouteIndex, RouteTable};
