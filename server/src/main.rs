//! Server entrypoint
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use glance_application::{SessionStore, SystemClock, VisionGateway, spawn_reaper};
use glance_infrastructure::{ConfigLoader, OpenAiVisionGateway};
use glance_presentation::{AppState, router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load configuration, then apply CLI overrides
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(size) = &cli.model_size {
        config.model.size = size.parse().unwrap_or_default();
    }
    config.validate()?;

    let model_id = config.model.resolved_model_id();
    info!(
        "Starting glance (model: {}, device: {}, backend: {})",
        model_id, config.model.device, config.model.backend_url
    );

    // === Dependency Injection ===
    let gateway: Arc<dyn VisionGateway> = Arc::new(OpenAiVisionGateway::new(
        config.model.backend_url.clone(),
        model_id,
        config.model.device.clone(),
        Duration::from_secs(config.model.timeout_seconds),
    )?);

    let store = Arc::new(SessionStore::new(
        gateway.clone(),
        Arc::new(SystemClock),
        config.session.store_config(),
    ));

    let shutdown = CancellationToken::new();
    let reaper = spawn_reaper(
        store.clone(),
        Duration::from_secs(config.session.reap_interval_seconds),
        shutdown.clone(),
    );

    let state = AppState {
        store,
        gateway,
        max_upload_bytes: config.session.max_upload_bytes,
    };
    let app = router(state);

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the reaper before reporting shutdown
    shutdown.cancel();
    let _ = reaper.await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
