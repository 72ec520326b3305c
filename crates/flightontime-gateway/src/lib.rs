//! FlightOnTime gateway
//!
//! Accepts flight-delay prediction requests, enriches them with route
//! weather and merges the prediction service's answer into one response.

pub mod api;
pub mod domain;

pub use api::router;
pub use domain::{GatewayError, PredictionGateway, PredictionResponse};

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use flightontime_core::Config;
use tokio_util::sync::CancellationToken;

/// Bind the gateway and serve until `cancel` fires.
pub async fn serve(config: &Config, cancel: CancellationToken) -> Result<()> {
    let addr: SocketAddr = config
        .gateway
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid gateway bind address: {}", config.gateway.bind_addr))?;

    let gateway = PredictionGateway::from_config(&config.services)
        .context("Failed to build upstream clients")?;
    let app = router(Arc::new(gateway));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind gateway on {}", addr))?;
    tracing::info!("Gateway listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
            tracing::info!("Gateway shutting down");
        })
        .await
        .context("Gateway server failed")
}
