use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod utils;
pub mod validation;

use auth::credentials::{CredentialStore, DemoCredentialStore};
use auth::TokenService;
use config::Config;
use context::AppContext;
use rate_limit::{RateLimitStore, SweepTask};

pub async fn run() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; fatal misconfiguration stops the process here
    let config = Arc::new(Config::from_env()?);
    if config.demo_mode {
        tracing::warn!(
            "Demo mode enabled: authentication is relaxed and rate limiting is disabled"
        );
    }

    let tokens = Arc::new(TokenService::new(&config));
    let rate_store = Arc::new(RateLimitStore::new());
    let credentials: Arc<dyn CredentialStore> = Arc::new(DemoCredentialStore::with_fixtures());

    let ctx = Arc::new(AppContext::new(
        config.clone(),
        tokens,
        rate_store.clone(),
        credentials,
    ));

    // The sweep task owns no state beyond the store handle; aborting it at
    // shutdown is its whole cancellation contract.
    let sweep = SweepTask::new(
        rate_store,
        Duration::from_secs(config.rate.sweep_interval_secs),
    );
    let sweep_handle = tokio::spawn(sweep.run());

    let app = routes::create_router(ctx);

    let bind_address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!("Gateway listening on http://{}", bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    sweep_handle.abort();
    tracing::info!("Gateway shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
