//! Reactango API backend.
//!
//! # Architecture Overview
//!
//! ```text
//!     startup                                   request path
//!     ───────                                   ────────────
//!     config (TOML)                             client
//!        │                                        │
//!        ▼                                        ▼
//!     registrar ──▶ feature registry         trace / request id
//!        │          (api::users, ...)             │
//!        ▼                                        ▼
//!     route table ──▶ axum Router ─────────▶ hosts / headers / cors
//!                                                 │
//!                                                 ▼
//!                                          feature handlers (JSON)
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use reactango::config::{load_or_default, AppConfig};
use reactango::http::HttpServer;
use reactango::lifecycle::{signals, startup, Shutdown};
use reactango::observability::{init_logging, metrics};
use reactango::routing::RoutePattern;

#[derive(Parser)]
#[command(name = "reactango", version, about = "JSON API backend with automatic feature routing")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "REACTANGO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the API (default)
    Serve,
    /// Print the resolved route index and exit
    Routes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref()).context("failed to load configuration")?;
    init_logging(&config.observability).context("failed to initialize logging")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Routes => print_routes(&config),
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        api_prefix = %config.api.prefix,
        debug = config.debug,
        "reactango starting"
    );

    if config.observability.metrics_enabled {
        let addr = config
            .observability
            .metrics_address
            .parse()
            .context("invalid metrics address")?;
        metrics::init_metrics(addr).context("failed to start metrics exporter")?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.listener.bind_address))?;

    let server = HttpServer::new(config).context("failed to build HTTP server")?;

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move { signals::shutdown_on_signal(&shutdown).await });

    server.run(listener, receiver).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn print_routes(config: &AppConfig) -> anyhow::Result<()> {
    let prefix = RoutePattern::parse(&config.api.prefix).context("invalid api prefix")?;
    let index = startup::build_route_table(config).index(&prefix);

    for route in index.routes() {
        println!(
            "{:<6} {:<40} {}",
            route.method.to_string(),
            route.path,
            route.name.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
