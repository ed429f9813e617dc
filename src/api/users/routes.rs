//! Mounted under `users/` by the registrar.

use crate::api::users::views;
use crate::routing::{RouteEntry, RouteError};

pub fn routes() -> Result<Vec<RouteEntry>, RouteError> {
    Ok(vec![
        RouteEntry::get("", views::list_users)?.name("user-list"),
        RouteEntry::get("<int:user_id>/", views::user_detail)?.name("user-detail"),
    ])
}
