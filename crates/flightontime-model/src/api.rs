//! HTTP surface of the prediction service

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use flightontime_services::{ModelResult, PredictionRequest};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::predictor::Predictor;

/// Build the router: `POST /predict` and `GET /health`.
pub fn router(predictor: Arc<dyn Predictor>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(predictor)
}

async fn predict(
    State(predictor): State<Arc<dyn Predictor>>,
    Json(request): Json<PredictionRequest>,
) -> Json<ModelResult> {
    let result = predictor.predict(&request);
    tracing::info!(
        origin = %request.icao_aerodromo_origem,
        destination = %request.icao_aerodromo_destino,
        probability = result.probabilidade,
        "Prediction served: {}",
        result.previsao
    );
    Json(result)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
