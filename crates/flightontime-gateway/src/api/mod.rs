pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::domain::PredictionGateway;

pub use error::ApiError;

/// Build the gateway router: `POST /predict` and `GET /health`.
pub fn router(gateway: Arc<PredictionGateway>) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(gateway)
}
