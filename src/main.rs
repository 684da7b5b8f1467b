//! Token-gated landing page server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────────▶ request id ─▶ trace ─▶ timeout ─▶ gate middleware
//!                                                              │
//!                          ┌───────────────────────────────────┼──────────────────┐
//!                          ▼                                   ▼                  ▼
//!                   302 + Set-Cookie                    302 block URL / 403     handler
//!                   (valid `creative`)                  (everyone else)    (/, /debug, /static)
//! ```
//!
//! Configuration is read once: defaults, optional TOML file, then the
//! `TOKEN_OFFER`, `BLOCK_URL` and `PORT` environment variables.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use link_cloak::config::{self, loader::ENV_CONFIG_PATH};
use link_cloak::gate::{session::SESSION_MAX_AGE_SECS, Environment};
use link_cloak::lifecycle::{signals::shutdown_signal, Shutdown};
use link_cloak::observability::{logging, metrics};
use link_cloak::HttpServer;

#[derive(Parser)]
#[command(name = "link-cloak")]
#[command(about = "Serve a landing page only to visitors arriving with a valid tracked link", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long, env = ENV_CONFIG_PATH)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = config::load_from_env(args.config.as_deref(), args.bind.as_deref())?;

    logging::init_logging(&config.observability);

    let environment = Environment::from_process(&config.gate.development_markers);

    tracing::info!("link-cloak v{} starting", env!("CARGO_PKG_VERSION"));
    if environment.is_development() && !config.gate.enforce_in_development {
        tracing::info!(%environment, "Gate disabled: every request is served");
    } else {
        tracing::info!(%environment, "Gate active: unauthenticated requests are diverted");
    }
    tracing::info!(
        token_configured = config.gate.token.is_some(),
        block_url = config.gate.block_url.as_deref().unwrap_or("<unset, 403>"),
        failure_policy = config.gate.failure_policy.as_str(),
        cookie_max_age_secs = SESSION_MAX_AGE_SECS,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(config, environment)?;

    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
