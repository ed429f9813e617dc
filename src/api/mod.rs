//! JSON API features.
//!
//! Each feature lives in its own module with a `routes` submodule exposing
//! `routes() -> Result<Vec<RouteEntry>, RouteError>`. Listing the feature in
//! [`registry`] is all it takes to have it mounted under `<prefix>/<name>/`.

pub mod users;
pub mod welcome;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::AppState;
use crate::routing::{FeatureRegistry, RouteEntry, RouteError};

/// Every feature compiled into the binary, under `package`.
pub fn registry(package: &str) -> FeatureRegistry {
    FeatureRegistry::new(package)
        .root(routes)
        .feature("users", users::routes::routes)
        .feature("welcome", welcome::routes::routes)
}

/// Routes of the API root itself; features are appended after these.
pub fn routes() -> Result<Vec<RouteEntry>, RouteError> {
    Ok(vec![RouteEntry::get("", index)?.name("api-index")])
}

#[derive(Debug, Serialize)]
pub struct ApiIndex {
    pub features: Vec<String>,
}

/// Lists the mounted features.
async fn index(State(state): State<AppState>) -> Json<ApiIndex> {
    Json(ApiIndex {
        features: state.routes.mounts().to_vec(),
    })
}
