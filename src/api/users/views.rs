use axum::{extract::Path, Json};
use serde::Serialize;

use crate::http::ApiError;
use crate::routing::Converter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: u64,
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'static str>,
}

pub async fn list_users() -> Json<Vec<User>> {
    Json(vec![
        User {
            id: 1,
            name: "Alice",
            email: None,
        },
        User {
            id: 2,
            name: "Bob",
            email: None,
        },
    ])
}

pub async fn user_detail(Path(user_id): Path<String>) -> Result<Json<User>, ApiError> {
    // The template declares `int`; anything else is not a route match.
    if !Converter::Int.accepts(&user_id) {
        return Err(ApiError::NotFound("Not found".to_string()));
    }

    // No storage yet: only the sample user exists.
    match user_id.parse::<u64>() {
        Ok(1) => Ok(Json(User {
            id: 1,
            name: "Alice",
            email: Some("alice@example.com"),
        })),
        _ => Err(ApiError::NotFound("User not found".to_string())),
    }
}
