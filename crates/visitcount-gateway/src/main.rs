//! visitcount gateway
//!
//! - Counter endpoint on `server.path` (default `/v1/visits`)
//! - Table name from `TABLE_NAME`, optional YAML from `VISITCOUNT_CONFIG`
//! - Graceful shutdown: draining flag flips `/readyz` to 503

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use visitcount_core::error::{Result, VisitCountError};
use visitcount_gateway::{app_state::AppState, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.client_code().as_str(), error = %e, "visitcount-gateway failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cfg = config::load_from_env()?;
    let listen = cfg.server.listen_addr()?;

    let state = AppState::new(cfg).await?;
    let app = router::build_router(state.clone());

    tracing::info!(
        %listen,
        path = %state.cfg().server.path,
        backend = state.cfg().store.backend.as_str(),
        table = state.store().table(),
        "visitcount-gateway starting"
    );

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| VisitCountError::Config(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| VisitCountError::Internal(format!("server failed: {e}")))?;

    tracing::info!("visitcount-gateway stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
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

    state.set_draining();
    tracing::info!("signal received, draining");
}
