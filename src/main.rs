//! Wake-on-LAN gateway.
//!
//! Authenticates `GET /wake?id=..&key=..` calls and broadcasts a magic
//! packet to the physical address registered for `id`.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ trace_request ─▶ /wake handler ─▶ WakePipeline
//!                      (X-Request-ID,                     │
//!                       duration)                         ├─ validation (id, key)
//!                                                         ├─ auth (secret)
//!                                                         ├─ registry (id → MAC)
//!                                                         └─ dispatcher ─▶ UDP broadcast
//!     Client Response
//!     ◀─────────────── JSON envelope {status, code, message, timestamp, ...}
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;

use wol_gateway::config::load_config;
use wol_gateway::http::HttpServer;
use wol_gateway::lifecycle::{signals, Shutdown};
use wol_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "wol-gateway", version)]
#[command(about = "HTTP gateway that sends Wake-on-LAN packets to registered devices", long_about = None)]
struct Cli {
    /// TOML configuration file. Environment variables override its values.
    #[arg(short, long, env = "WOL_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overriding configuration.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // A missing .env file is normal in production.
    let _ = dotenvy::dotenv();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    if let Err(e) = logging::init(&config.observability) {
        eprintln!("Logging Configuration Error: {e}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Gateway terminated");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: wol_gateway::GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("wol-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    let server = HttpServer::new(config)?;
    let config = server.config();

    tracing::info!(
        bind_address = %config.listener.bind_address,
        broadcast_address = %config.wake.broadcast_address,
        port = config.wake.port,
        log_file = %config.observability.log_file,
        devices = config.devices.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    server.run(listener, server_shutdown).await?;
    Ok(())
}
