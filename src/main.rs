//! Forwarding HTTP proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──URL──▶ ┌────────────┐    ┌──────────┐    ┌───────────┐
//!                     │  listener  │───▶│   url    │───▶│  request  │
//!                     │ (accept +  │    │  parser  │    │ formatter │
//!                     │  permits)  │    └──────────┘    └─────┬─────┘
//!                     └────────────┘                          │
//!                                                             ▼
//!     Client ◀──raw── ┌────────────┐    ┌──────────────────────────┐
//!        bytes        │   relay    │◀───│ transport (connect, send,│◀──▶ Origin :80
//!                     └────────────┘    │   receive-until-idle)    │
//!                                       └──────────────────────────┘
//! ```
//!
//! Usage: `forward-proxy [HOST] [PORT] [--config FILE] [--log-level LEVEL]`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use forward_proxy::config::{load_config, validate_config, ProxyConfig};
use forward_proxy::lifecycle::{signals, Shutdown};
use forward_proxy::observability::{logging, metrics};
use forward_proxy::ProxyServer;

#[derive(Parser)]
#[command(name = "forward-proxy")]
#[command(about = "Minimal forwarding HTTP proxy", long_about = None)]
struct Cli {
    /// Host to listen on (overrides the config file).
    host: Option<String>,

    /// Port to listen on (overrides the config file).
    port: Option<u16>,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

fn resolve_config(cli: Cli) -> Result<ProxyConfig, String> {
    let mut config = match &cli.config {
        Some(path) => load_config(path).map_err(|e| format!("{}: {}", path.display(), e))?,
        None => ProxyConfig::default(),
    };

    if let Some(host) = cli.host {
        config.listener.host = host;
    }
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }

    validate_config(&config).map_err(|errors| {
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    })?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match resolve_config(Cli::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_logging(&config.observability.log_level) {
        eprintln!("Failed to initialize logging: {e}");
    }

    tracing::info!("forward-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        address = %config.listener.address(),
        backlog = config.listener.backlog,
        max_connections = config.listener.max_connections,
        client_idle_ms = config.timeouts.client_idle_ms,
        origin_idle_ms = config.timeouts.origin_idle_ms,
        framing = ?config.forwarding.framing,
        failure_reporting = ?config.forwarding.failure_reporting,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = match ProxyServer::bind(&config).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Failed to run the proxy");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("The proxy is up and running");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_interrupt_handler(shutdown.clone());

    match server.run(server_shutdown).await {
        Ok(reason) => {
            tracing::info!(?reason, "The proxy has been stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "The proxy has stopped unexpectedly");
            ExitCode::FAILURE
        }
    }
}
