//! REST handlers for the gateway

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use flightontime_services::PredictionRequest;
use serde_json::{json, Value};

use crate::domain::{PredictionGateway, PredictionResponse};

use super::error::ApiError;

/// Handler for POST /predict
pub async fn predict(
    State(gateway): State<Arc<PredictionGateway>>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(request) = payload?;
    let response = gateway.predict(&request).await?;
    Ok(Json(response))
}

/// Handler for GET /health. Does not touch upstream services.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
