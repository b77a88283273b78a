//! chat-relay HTTP server
//!
//! Starts an Axum web server that relays chat messages to the upstream
//! completion API.

use chat_relay::{
    cli::{self, Cli, Command},
    config::Config,
    handlers::{self, AppState},
    telemetry,
};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = cli.command {
        let template = cli::generate_config_template();
        match output {
            Some(path) => {
                std::fs::write(&path, template)?;
                eprintln!("Wrote configuration template to {}", path);
            }
            None => print!("{}", template),
        }
        return Ok(());
    }

    // Configuration is built once here and injected into the app state
    let config = Config::load(cli.config.as_deref().map(Path::new))?;

    telemetry::init(&config.observability.log_level);

    let overrides = config.env_overrides();
    if overrides.port {
        tracing::debug!(port = config.server.port, "Port taken from environment");
    }
    if overrides.api_key {
        tracing::debug!("Upstream credential taken from environment");
    }

    if config.upstream.api_key().is_none() {
        tracing::warn!(
            "No upstream credential configured (set AI_API_KEY); /chat requests will fail"
        );
    }

    let addr = config.socket_addr()?;
    let state = AppState::new(Arc::new(config))?;
    let app = handlers::router(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
