//! Reactango API backend library.
//!
//! Feature modules under [`api`] are discovered at startup and mounted
//! below the configured API prefix. See [`routing`] for the registrar.

// Core subsystems
pub mod api;
pub mod config;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
