//! Mock flight-delay prediction service
//!
//! Stands in for a trained model behind the same HTTP contract.

pub mod api;
pub mod predictor;

pub use api::router;
pub use predictor::{MockPredictor, Predictor};

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use flightontime_core::ModelConfig;
use tokio_util::sync::CancellationToken;

/// Bind the prediction service and serve until `cancel` fires.
pub async fn serve(config: &ModelConfig, cancel: CancellationToken) -> Result<()> {
    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid model bind address: {}", config.bind_addr))?;

    let predictor: Arc<dyn Predictor> = Arc::new(MockPredictor::new(config.threshold));
    let app = router(predictor);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind model service on {}", addr))?;
    tracing::info!("Prediction service listening on {} (threshold {})", addr, config.threshold);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
            tracing::info!("Prediction service shutting down");
        })
        .await
        .context("Prediction service failed")
}
