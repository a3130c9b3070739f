//! Forwarding gateway binary.
//!
//! Relays inbound HTTP requests to a statically configured backend origin,
//! adding permissive CORS headers so a browser UI can read the responses.
//! Configuration precedence: defaults < TOML file < environment < CLI flags.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use forwarding_gateway::config::loader::load_config;
use forwarding_gateway::config::validation::validate_config;
use forwarding_gateway::{GatewayConfig, HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "forwarding-gateway", about = "CORS-unlocking HTTP forwarding gateway")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listener bind address (overrides config/env).
    #[arg(long)]
    bind: Option<String>,

    /// Backend origin to forward to (overrides config/env).
    #[arg(long)]
    backend_url: Option<String>,

    /// Forward timeout in milliseconds (overrides config).
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forwarding_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("forwarding-gateway v0.1.0 starting");

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            let mut config = GatewayConfig::default();
            config.apply_env();
            config
        }
    };

    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(origin) = cli.backend_url {
        config.backend.origin = origin;
    }
    if let Some(ms) = cli.timeout_ms {
        config.timeouts.forward_ms = ms;
    }

    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            tracing::error!(error = %error, "Invalid configuration");
        }
        return Err("configuration validation failed".into());
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend_origin = %config.backend.origin,
        forward_timeout_ms = config.timeouts.forward_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => forwarding_gateway::observability::metrics::init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
