//! Client for the prediction service. Failures propagate; there is no
//! retry and no fallback result.

use flightontime_core::{NetworkError, ReqwestErrorExt};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::error::{ModelClientError, ModelServiceError};
use crate::types::ModelPayload;

#[derive(Debug, Clone)]
pub struct ModelClient {
    client: Arc<Client>,
    base_url: String,
}

impl ModelClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ModelClientError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// POST the payload to `{base}/predict` and return the raw JSON body.
    ///
    /// The body's schema is not checked here; see
    /// [`ModelResult::merge_with_defaults`](crate::ModelResult::merge_with_defaults).
    #[instrument(skip(self, payload), fields(origin = %payload.icao_aerodromo_origem), level = "info")]
    pub async fn fetch_prediction(&self, payload: &ModelPayload) -> Result<Value, ModelServiceError> {
        let url = format!("{}/predict", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkError::from_status(status, &body).into());
        }

        let body = response
            .text()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        let value = serde_json::from_str(&body)
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;

        tracing::debug!("Model service responded with status {}", status);
        Ok(value)
    }
}
