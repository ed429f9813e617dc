//! Welcome feature: greeting and API information.

pub mod routes;
pub mod views;
