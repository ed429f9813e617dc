//! Host header validation.
//!
//! # Responsibilities
//! - Match the Host header against the configured allowed hosts
//! - Reject requests for other hosts with 400 Bad Request
//!
//! # Design Decisions
//! - Host matching is case-insensitive (per HTTP spec)
//! - The port is ignored
//! - `*` allows any host; `.example.com` allows the domain and its subdomains
//! - An empty list allows only local hosts, so a blank config still works
//!   in development

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::request::RequestIdExt;

const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "[::1]"];

/// A single allowed-host rule.
#[derive(Debug, Clone, PartialEq, Eq)]
enum HostRule {
    Any,
    Exact(String),
    /// Stored without the leading dot.
    Domain(String),
}

impl HostRule {
    fn new(rule: &str) -> Self {
        let rule = rule.trim().to_lowercase();
        if rule == "*" {
            HostRule::Any
        } else if let Some(domain) = rule.strip_prefix('.') {
            HostRule::Domain(domain.to_string())
        } else {
            HostRule::Exact(rule)
        }
    }

    fn matches(&self, host: &str) -> bool {
        match self {
            HostRule::Any => true,
            HostRule::Exact(expected) => host == expected,
            HostRule::Domain(domain) => {
                host == domain
                    || host
                        .strip_suffix(domain.as_str())
                        .map(|rest| rest.ends_with('.'))
                        .unwrap_or(false)
            }
        }
    }
}

/// Matches request hosts against the allowed list.
#[derive(Debug, Clone)]
pub struct AllowedHosts {
    rules: Vec<HostRule>,
}

impl AllowedHosts {
    pub fn new(hosts: &[String]) -> Self {
        let rules = if hosts.is_empty() {
            LOCAL_HOSTS.iter().map(|h| HostRule::new(h)).collect()
        } else {
            hosts.iter().map(|h| HostRule::new(h)).collect()
        };
        Self { rules }
    }

    /// Check a raw Host header value (port allowed).
    pub fn allows(&self, host_header: &str) -> bool {
        let host = strip_port(host_header.trim()).to_lowercase();
        if host.is_empty() {
            return false;
        }
        self.rules.iter().any(|rule| rule.matches(&host))
    }
}

fn strip_port(host: &str) -> &str {
    // IPv6 literal: keep the brackets, drop anything after them.
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Middleware rejecting requests whose Host header is not allowed.
pub async fn enforce_allowed_hosts(
    State(hosts): State<Arc<AllowedHosts>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri().authority().map(|a| a.as_str()))
        .unwrap_or_default()
        .to_string();

    if hosts.allows(&host) {
        return next.run(request).await;
    }

    tracing::warn!(
        host = %host,
        request_id = request.request_id().unwrap_or("-"),
        "Rejected request for disallowed host"
    );
    (StatusCode::BAD_REQUEST, "Bad Request (400)").into_response()
}
