//! Response helpers.
//!
//! # Responsibilities
//! - Map handler errors to JSON error bodies with matching status codes
//! - Serve the HTML landing page at the site root
//!
//! # Design Decisions
//! - Error bodies are `{"error": "<message>"}` so the frontend can show them as-is

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::http::server::AppState;

/// Errors returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Landing page for the backend itself.
pub async fn root_view(State(state): State<AppState>) -> Html<String> {
    let api_url = state
        .routes
        .reverse("api-index", &[])
        .unwrap_or_else(|| format!("/{}/", state.config.api.prefix.trim_matches('/')));

    let mut page = format!(
        "<h1>API Backend is Running</h1>\
         <p>Access your frontend at its development server (e.g., {dev}).</p>\
         <p>Available API base: <a href='{api}'>{api}</a></p>",
        dev = state.config.frontend.dev_server_url,
        api = api_url,
    );

    if state.config.debug {
        page.push_str("<h2>Routes</h2><ul>");
        for route in state.routes.routes() {
            page.push_str(&format!(
                "<li><code>{} {}</code>{}</li>",
                route.method,
                route.path,
                route
                    .name
                    .as_deref()
                    .map(|n| format!(" ({})", n))
                    .unwrap_or_default()
            ));
        }
        page.push_str("</ul>");
    }

    Html(page)
}
