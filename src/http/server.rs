//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Run the startup hook that builds the route table
//! - Compile the table into an Axum Router below the API prefix
//! - Serve the landing page and the built frontend assets
//! - Wire up middleware (request ID, tracing, timeout, hosts, headers, CORS, metrics)
//! - Serve until the shutdown signal fires

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Request,
    middleware,
    routing::get,
    Router, ServiceExt,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::Layer;
use tower_http::{
    normalize_path::{NormalizePath, NormalizePathLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::request::{RequestIdExt, UuidRequestId};
use crate::http::response::root_view;
use crate::lifecycle::startup;
use crate::observability::metrics;
use crate::routing::{PatternError, RouteIndex, RoutePattern, RouteTable};
use crate::security::{cors_layer, enforce_allowed_hosts, with_security_headers, AllowedHosts};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub routes: Arc<RouteIndex>,
}

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid api prefix: {0}")]
    Prefix(#[from] PatternError),

    #[error("invalid static files url: {0}")]
    StaticUrl(PatternError),

    #[error("static files url '{url}' collides with route {route}")]
    StaticConflict { url: String, route: String },
}

/// HTTP server for the API backend.
pub struct HttpServer {
    app: NormalizePath<Router>,
    config: Arc<AppConfig>,
    routes: Arc<RouteIndex>,
}

impl HttpServer {
    /// Create a new HTTP server, discovering feature routes from `config`.
    pub fn new(config: AppConfig) -> Result<Self, ServerError> {
        let table = startup::build_route_table(&config);
        Self::with_routes(config, table)
    }

    /// Create a server from an already built route table.
    pub fn with_routes(config: AppConfig, table: RouteTable) -> Result<Self, ServerError> {
        let prefix = RoutePattern::parse(&config.api.prefix)?;
        let config = Arc::new(config);
        let routes = Arc::new(table.index(&prefix));

        if config.static_files.enabled {
            Self::check_static_url(&config.static_files.url, &routes)?;
        }

        tracing::info!(
            prefix = %config.api.prefix,
            routes = routes.routes().len(),
            features = ?routes.mounts(),
            "Route table compiled"
        );

        let state = AppState {
            config: config.clone(),
            routes: routes.clone(),
        };

        let router = Self::build_router(&config, &prefix, table, state);
        let app = NormalizePathLayer::trim_trailing_slash().layer(router);

        Ok(Self {
            app,
            config,
            routes,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(
        config: &AppConfig,
        prefix: &RoutePattern,
        table: RouteTable,
        state: AppState,
    ) -> Router {
        let mut router = table.into_router(prefix);

        // With an empty prefix the API index already owns "/".
        if !prefix.is_root() {
            router = router.route("/", get(root_view));
        }

        if config.static_files.enabled {
            router = Self::mount_static(router, &config.static_files.url, &config.static_files.dir);
        }

        let hosts = Arc::new(AllowedHosts::new(&config.allowed_hosts));

        let mut router = with_security_headers(
            router
                .route_layer(middleware::from_fn(metrics::track_metrics))
                .layer(middleware::from_fn_with_state(hosts, enforce_allowed_hosts)),
        );

        if let Some(cors) = cors_layer(&config.cors) {
            router = router.layer(cors);
        }

        router
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = request.request_id().unwrap_or("-"),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .with_state(state)
    }

    /// The static mount must own its first path segment outright.
    fn check_static_url(url: &str, routes: &RouteIndex) -> Result<(), ServerError> {
        let pattern = RoutePattern::parse(url).map_err(ServerError::StaticUrl)?;
        let conflict = match pattern.first_literal() {
            Some(head) if !pattern.has_params() => routes
                .routes()
                .iter()
                .find(|route| route.pattern.first_literal() == Some(head))
                .map(|route| route.path.clone()),
            _ => Some("/".to_string()),
        };

        match conflict {
            Some(route) => Err(ServerError::StaticConflict {
                url: url.to_string(),
                route,
            }),
            None => Ok(()),
        }
    }

    fn mount_static(router: Router<AppState>, url: &str, dir: &Path) -> Router<AppState> {
        if !dir.is_dir() {
            tracing::warn!(
                dir = %dir.display(),
                "Static files directory not found; assets will 404 until the frontend is built"
            );
        }
        let url = format!("/{}", url.trim_matches('/'));
        router.nest_service(&url, ServeDir::new(dir))
    }

    /// The complete service, for driving requests without a listener.
    pub fn app(&self) -> NormalizePath<Router> {
        self.app.clone()
    }

    pub fn routes(&self) -> &RouteIndex {
        &self.routes
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let service = ServiceExt::<Request>::into_make_service(self.app);
        axum::serve(listener, service)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
