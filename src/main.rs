//! Offline Shell - A cache-first offline shell for static sites
//!
//! Fronts an upstream origin, keeps its app shell available offline and
//! serves the chatbot and sequencer endpoints.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use offline_shell::api::create_router;
use offline_shell::{spawn_install_task, spawn_sequencer_task, AppState, Config, Deployment};

/// Main entry point for the offline shell server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shell with its cache store and upstream fetcher
/// 4. Start install → activate for the compiled-in deployment
/// 5. Start the step sequencer clock
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "offline_shell=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Offline Shell");

    let config = Config::from_env();
    info!(
        "Configuration loaded: upstream={}, port={}, fetch_timeout={}s, jam_step={}ms",
        config.upstream_origin, config.server_port, config.fetch_timeout, config.jam_step_ms
    );

    let state = AppState::from_config(&config).context("failed to build offline shell")?;
    info!("Offline shell initialized for {}", state.shell.origin());

    // Requests are forwarded uncached until the generation is active
    let install_handle = spawn_install_task(state.shell.clone(), Deployment::compiled());
    let sequencer_handle = spawn_sequencer_task(state.sequencer.clone(), config.jam_step());
    info!("Background tasks started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    let background = vec![install_handle.abort_handle(), sequencer_handle.abort_handle()];
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(background))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the background tasks and allows graceful shutdown.
async fn shutdown_signal(tasks: Vec<tokio::task::AbortHandle>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    for task in tasks {
        task.abort();
    }
    warn!("Background tasks aborted");
}
