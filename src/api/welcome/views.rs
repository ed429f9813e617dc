use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::http::AppState;

/// A general welcome message for the API.
pub async fn general_welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to our Awesome API!" }))
}

#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub api_name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: BTreeMap<String, &'static str>,
}

/// Basic information about the API, with endpoint URLs taken from the
/// mounted route table.
pub async fn api_info(State(state): State<AppState>) -> Json<ApiInfo> {
    let endpoints = [
        ("welcome-general", "General welcome message."),
        ("welcome-api-info", "This information."),
    ]
    .into_iter()
    .filter_map(|(name, description)| {
        state
            .routes
            .reverse(name, &[])
            .map(|url| (url, description))
    })
    .collect();

    Json(ApiInfo {
        api_name: "My Welcome API",
        version: "1.0.0",
        description: "An API to provide warm welcomes.",
        endpoints,
    })
}
