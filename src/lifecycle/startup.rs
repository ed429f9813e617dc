//! Startup orchestration: the "application ready" hook.
//!
//! # Responsibilities
//! - Build the root route table before any request is served
//! - Choose the candidate source (scan directory or compiled-in features)
//!
//! # Design Decisions
//! - Runs synchronously and to completion before the listener accepts
//! - Every worker process builds its own table; nothing is shared

use crate::api;
use crate::config::AppConfig;
use crate::routing::{CandidateSource, FeatureRegistry, Registrar, RouteTable, ScanRules};

/// Build the route table from the compiled-in feature registry.
pub fn build_route_table(config: &AppConfig) -> RouteTable {
    build_route_table_with(config, &api::registry(&config.api.package))
}

/// Build the route table from an explicit registry.
pub fn build_route_table_with(config: &AppConfig, registry: &FeatureRegistry) -> RouteTable {
    let source = match &config.api.scan_dir {
        Some(dir) => CandidateSource::Directory(dir.clone()),
        None => CandidateSource::Names(registry.feature_names().map(str::to_string).collect()),
    };

    Registrar::new(registry.package(), registry, source)
        .with_rules(ScanRules::from(&config.api))
        .build_table()
}
