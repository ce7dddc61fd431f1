//! Employee API facade (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────────┐
//!                    │                  EMPLOYEE API                       │
//!                    │                                                     │
//!  Client Request    │  ┌────────┐   ┌──────────┐   ┌──────────────────┐  │
//!  ──────────────────┼─▶│  http  │──▶│ security │──▶│     handlers     │  │
//!                    │  │ server │   │rate+auth │   └────────┬─────────┘  │
//!                    │  └────────┘   └──────────┘            ▼            │
//!                    │                               ┌──────────────────┐  │
//!                    │                               │     service      │  │
//!                    │                               │  (orchestrator)  │  │
//!                    │                               └───┬──────────┬───┘  │
//!                    │                                   ▼          ▼      │
//!                    │                          ┌──────────┐  ┌──────────┐ │
//!                    │                          │ upstream │  │ employee │ │
//!                    │                          │  client  │  │  query   │ │
//!                    │                          └────┬─────┘  └──────────┘ │
//!                    └───────────────────────────────┼─────────────────────┘
//!                                                    ▼
//!                                        External employee service
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use employee_api::config::{load_config, ServiceConfig};
use employee_api::observability::{logging, metrics};
use employee_api::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "employee-api", version, about = "REST facade over the employee data service")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!("employee-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?args.config,
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        rate_limit = config.rate_limit.enabled,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
