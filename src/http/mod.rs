//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trailing-slash normalization)
//!     → request.rs (assign request ID)
//!     → security (allowed hosts, headers, CORS)
//!     → [compiled route table] → feature handler
//!     → response.rs (JSON errors, landing page)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer, ServerError};
