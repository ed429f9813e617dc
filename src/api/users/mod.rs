//! Users feature: a static user list and a detail lookup.

pub mod routes;
pub mod views;
