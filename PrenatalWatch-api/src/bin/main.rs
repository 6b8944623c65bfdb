use std::net::SocketAddr;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use prenatal_watch_api::create_application;
use prenatal_watch_data::seed::demo_storage;
use prenatal_watch_domain::services::{cancellation_pair, CancellationHandle};
use prenatal_watch_domain::TriageConfig;

const DEFAULT_PORT: u16 = 3000;

/// The main entry point for the PrenatalWatch API server
///
/// Loads `.env`, sets up tracing, seeds the in-memory storage and serves the
/// router until Ctrl+C or SIGTERM. Shutdown also cancels running rosters.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stdout),
        )
        .with(env_filter)
        .init();

    info!("Starting PrenatalWatch API server");

    let config = TriageConfig::from_env();
    info!(
        "Triage config: top_symptoms={} roster_concurrency={} fetch_timeout={:?}",
        config.top_symptoms, config.roster_concurrency, config.fetch_timeout
    );

    let storage = demo_storage().context("failed to seed demo storage")?;
    let (shutdown_handle, shutdown) = cancellation_pair();
    let app = create_application(storage, config, shutdown);

    let port = match std::env::var("PORT") {
        Ok(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
            warn!("PORT '{}' is not a port number, using {}", raw, DEFAULT_PORT);
            DEFAULT_PORT
        }),
        Err(_) => DEFAULT_PORT,
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM, then cancel in-flight rosters
async fn shutdown_signal(rosters: CancellationHandle) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
    rosters.cancel();
}
