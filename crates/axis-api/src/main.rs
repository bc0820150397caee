//! Axis REST API entry point.
//!
//! Binary name: `axis`
//!
//! Loads configuration, initializes tracing, then either starts the REST API
//! server or runs a one-shot command.

mod cli;
mod http;
mod state;

use anyhow::Context;
use axis_core::storage::StorageProbe;
use axis_infra::config::load_config;
use axis_infra::llm::build_catalog;
use axis_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};
use axis_types::config::{AppConfig, LogFormat};
use clap::Parser;
use tracing::{error, info, warn};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())
        .await
        .context("failed to load configuration")?;

    init_tracing(&TracingOptions {
        level: config.observability.log_level.clone(),
        json: config.observability.log_format == LogFormat::Json,
        otel: config.observability.otel,
        service_name: "axis".to_string(),
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli.command, config).await;
    if let Err(err) = &result {
        error!(error = %err, "axis exited with an error");
    }
    shutdown_tracing();
    result
}

async fn run(command: Commands, mut config: AppConfig) -> anyhow::Result<()> {
    match command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            serve(config).await
        }
        Commands::Models { json } => {
            let mut aliases = build_catalog(&config.model).aliases();
            aliases.sort();
            if json {
                println!("{}", serde_json::to_string_pretty(&aliases)?);
            } else {
                for alias in aliases {
                    println!("  {:<16} {}", alias.name, alias.model);
                }
            }
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::init(config).await?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Axis API listening");

    let router = http::router::build_router(state.clone());
    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    state.database.close().await;
    info!("server stopped");
    served.context("server error")
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
