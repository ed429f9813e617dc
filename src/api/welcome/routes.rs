//! Mounted under `welcome/` by the registrar.

use crate::api::welcome::views;
use crate::routing::{RouteEntry, RouteError};

pub fn routes() -> Result<Vec<RouteEntry>, RouteError> {
    Ok(vec![
        RouteEntry::get("", views::general_welcome)?.name("welcome-general"),
        RouteEntry::get("info/", views::api_info)?.name("welcome-api-info"),
    ])
}
