//! Security subsystem.
//!
//! # Components
//! - allowed_hosts.rs: Host header validation (400 on unknown hosts)
//! - headers.rs: Security response headers
//! - cors.rs: Cross-origin policy for the frontend dev server
//!
//! # Design Decisions
//! - Defense in depth: host check runs before any handler
//! - Fail closed: unparseable Host headers are rejected

pub mod allowed_hosts;
pub mod cors;
pub mod headers;

pub use allowed_hosts::{enforce_allowed_hosts, AllowedHosts};
pub use cors::cors_layer;
pub use headers::with_security_headers;
