//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, URL prefixes and value ranges
//! - Validate discovery rules so a bad denylist cannot hide every feature
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::routing::RoutePattern;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let prefix = match RoutePattern::parse(&config.api.prefix) {
        Ok(pattern) if pattern.has_params() => {
            errors.push(ValidationError::new(
                "api.prefix",
                "must not contain parameters",
            ));
            None
        }
        Ok(pattern) => Some(pattern),
        Err(e) => {
            errors.push(ValidationError::new("api.prefix", e.to_string()));
            None
        }
    };

    if config.api.package.is_empty() || config.api.package.contains('.') {
        errors.push(ValidationError::new(
            "api.package",
            "must be a single non-empty identifier",
        ));
    }

    if config.api.reserved_prefix.is_empty() {
        errors.push(ValidationError::new(
            "api.reserved_prefix",
            "must not be empty (it would exclude every directory)",
        ));
    }

    if config.api.denylist.iter().any(|name| name.is_empty()) {
        errors.push(ValidationError::new(
            "api.denylist",
            "entries must not be empty",
        ));
    }

    if config.static_files.enabled {
        let url = &config.static_files.url;
        if !url.starts_with('/') {
            errors.push(ValidationError::new("static_files.url", "must start with '/'"));
        } else {
            match RoutePattern::parse(url) {
                Ok(pattern) if pattern.is_root() => errors.push(ValidationError::new(
                    "static_files.url",
                    "must not be the site root",
                )),
                Ok(pattern) if pattern.has_params() => errors.push(ValidationError::new(
                    "static_files.url",
                    "must not contain parameters",
                )),
                Ok(pattern) => {
                    let api_root = prefix.as_ref().and_then(|p| p.first_literal());
                    if api_root.is_some() && api_root == pattern.first_literal() {
                        errors.push(ValidationError::new(
                            "static_files.url",
                            format!("'{}' overlaps the api prefix", url),
                        ));
                    }
                }
                Err(e) => errors.push(ValidationError::new("static_files.url", e.to_string())),
            }
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            "must be greater than zero",
        ));
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    for origin in &config.cors.allowed_origins {
        if origin != "*" && origin.parse::<HeaderValue>().is_err() {
            errors.push(ValidationError::new(
                "cors.allowed_origins",
                format!("'{}' is not a valid origin", origin),
            ));
        }
    }

    if config.cors.allow_credentials && config.cors.allowed_origins.iter().any(|o| o == "*") {
        errors.push(ValidationError::new(
            "cors.allow_credentials",
            "cannot be combined with a wildcard origin",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
