//! Best-effort client for the weather service.
//!
//! Every failure is absorbed into [`WeatherRecord::fallback`], so callers
//! always get a record back.

use flightontime_core::{NetworkError, ReqwestErrorExt};
use reqwest::Client;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::types::{WeatherError, WeatherRecord};

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Arc<Client>,
    base_url: String,
}

impl WeatherClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the forecast for a route, falling back to an "Unknown" record on
    /// any failure. Never returns an error.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_weather(&self, origin: &str, destination: &str, date: &str) -> WeatherRecord {
        match self.request_forecast(origin, destination, date).await {
            Ok(record) => {
                tracing::debug!("Weather condition: {:?}", record.condition());
                record
            }
            Err(e) => {
                tracing::warn!("Weather service failed, using fallback record: {}", e);
                WeatherRecord::fallback(origin, destination, date, e.to_string())
            }
        }
    }

    async fn request_forecast(
        &self,
        origin: &str,
        destination: &str,
        date: &str,
    ) -> Result<WeatherRecord, NetworkError> {
        let url = format!("{}/forecast", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("origem", origin), ("destino", destination), ("data", date)])
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkError::from_status(status, &body));
        }

        let body = response
            .text()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        // Only a JSON object is accepted; its contents are not inspected
        let fields: Map<String, Value> = serde_json::from_str(&body)
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;

        Ok(WeatherRecord::from_upstream(fields))
    }
}
