//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::routing::registrar::{DEFAULT_DENYLIST, DEFAULT_RESERVED_PREFIX};

/// Root configuration for the API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Development mode. Enables the more verbose root page.
    pub debug: bool,

    /// Host names the server answers for. `*` allows any host,
    /// `.example.com` allows the domain and its subdomains.
    pub allowed_hosts: Vec<String>,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Feature route discovery.
    pub api: ApiConfig,

    /// Built frontend assets.
    pub static_files: StaticFilesConfig,

    /// Frontend development server.
    pub frontend: FrontendConfig,

    /// Cross-origin requests.
    pub cors: CorsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: true,
            allowed_hosts: vec!["localhost".to_string(), "127.0.0.1".to_string()],
            listener: ListenerConfig::default(),
            api: ApiConfig::default(),
            static_files: StaticFilesConfig::default(),
            frontend: FrontendConfig::default(),
            cors: CorsConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Feature route discovery.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// URL prefix every feature is mounted under.
    pub prefix: String,

    /// Package name used to build module identifiers (`<package>.<name>.routes`).
    pub package: String,

    /// Scan this directory's subdirectories for candidates instead of
    /// using the compiled-in feature list.
    pub scan_dir: Option<PathBuf>,

    /// Directory names never treated as features.
    pub denylist: Vec<String>,

    /// Names starting with this prefix are never scanned.
    pub reserved_prefix: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: "api".to_string(),
            package: "api".to_string(),
            scan_dir: None,
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
            reserved_prefix: DEFAULT_RESERVED_PREFIX.to_string(),
        }
    }
}

/// Static file serving for the built frontend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub enabled: bool,

    /// URL prefix (e.g., "/static").
    pub url: String,

    /// Directory holding the built assets.
    pub dir: PathBuf,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "/static".to_string(),
            dir: PathBuf::from("app/dist/assets"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Where the frontend dev server runs, linked from the root page.
    pub dev_server_url: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            dev_server_url: "http://localhost:5173".to_string(),
        }
    }
}

/// CORS configuration. No layer is installed when the list is empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins, or `["*"]` for any.
    pub allowed_origins: Vec<String>,

    /// Allow cookies on cross-origin requests.
    pub allow_credentials: bool,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human readable output for development, JSON for production.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
