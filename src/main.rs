use axum::Router;
use dotenvy::dotenv;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use raffle_server::config::{Config, ConfigError};
use raffle_server::routes::create_routes;
use raffle_server::state::AppState;
use raffle_server::store::{self, StoreError};

const DEFAULT_LOG_FILTER: &str = "raffle_server=info,tower_http=info";

#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("ticket store error: {0}")]
    Store(#[from] StoreError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Startup failed");
        return Err(e);
    }
    Ok(())
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;

    let store = store::connect(&config.database).await?;
    store.ensure_schema().await?;

    let state = AppState::new(store, config.limits);
    let app: Router = create_routes(state, &config.http);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Raffle ticket API listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
