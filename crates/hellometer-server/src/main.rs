//! hellometer server
//!
//! - `GET /api/hello?name=..&workMs=..` : simulated work, business metrics
//! - `GET /healthz`, `GET /readyz`
//! - `GET /actuator/prometheus` (configurable) : scrape endpoint
//! - Ctrl-C / SIGTERM : drain with a bounded grace period

use std::future::IntoFuture;
use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use hellometer_core::error::{HellometerError, Result};
use hellometer_server::{app_state::AppState, config, router, shutdown};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "hellometer-server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = config::config_path();
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.server.listen_addr()?;
    let grace = cfg.server.shutdown_grace();
    let metrics_path = cfg.metrics.path.clone();

    let state = AppState::new(cfg)?;
    let signal = state.shutdown();
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| HellometerError::Internal(format!("failed to bind {listen}: {e}")))?;
    tracing::info!(%listen, %metrics_path, "hellometer-server starting");

    tokio::spawn(shutdown::listen_for_signals(signal.clone()));

    let drain = {
        let signal = signal.clone();
        async move { signal.triggered().await }
    };
    let serve = axum::serve(listener, app)
        .with_graceful_shutdown(drain)
        .into_future();

    tokio::select! {
        res = serve => {
            res.map_err(|e| HellometerError::Internal(format!("server failed: {e}")))?;
        }
        _ = async {
            signal.triggered().await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(grace_ms = grace.as_millis() as u64, "grace period elapsed, dropping open connections");
        }
    }

    tracing::info!("hellometer-server stopped");
    Ok(())
}
