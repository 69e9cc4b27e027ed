//! chartdesk HTTP server

use anyhow::Context;
use chartdesk_stock::{Catalog, TechnicalAnalysisEngine};
use chartdesk_utils::Config;
use chartdesk_web::{AppState, Args, router};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env()?;
    args.apply_to(&mut config);
    chartdesk_utils::init_tracing(&config.log)?;

    let stock_config = Arc::new(args.stock_config()?);
    let catalog = Arc::new(Catalog::load(&stock_config)?);
    let engine = Arc::new(TechnicalAnalysisEngine::yahoo(
        Arc::clone(&stock_config),
        Arc::clone(&catalog),
    ));
    let state = AppState::new(catalog, engine, stock_config.request_timeout)?;

    let addr = args.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        %addr,
        environment = %config.environment,
        production = config.is_production(),
        timeout_secs = stock_config.request_timeout.as_secs(),
        "Starting chartdesk"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
