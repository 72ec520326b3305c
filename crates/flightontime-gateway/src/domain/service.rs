//! Prediction orchestration
//!
//! Weather is fetched first and can never fail the request. The model call
//! follows and its failure always does.

use flightontime_core::ServiceConfig;
use flightontime_services::{
    ModelClient, ModelClientError, ModelPayload, ModelResult, ModelServiceError, PredictionRequest,
};
use flightontime_weather::{WeatherClient, WeatherError, WeatherRecord};
use serde::Serialize;
use tracing::instrument;

/// Startup errors while wiring the upstream clients
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("weather client: {0}")]
    Weather(#[from] WeatherError),

    #[error("model client: {0}")]
    Model(#[from] ModelClientError),
}

/// Model outcome merged with the route weather
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResponse {
    #[serde(flatten)]
    pub result: ModelResult,
    pub clima: WeatherRecord,
}

pub struct PredictionGateway {
    weather: WeatherClient,
    model: ModelClient,
}

impl PredictionGateway {
    pub fn new(weather: WeatherClient, model: ModelClient) -> Self {
        Self { weather, model }
    }

    /// Build both upstream clients from the service settings.
    pub fn from_config(services: &ServiceConfig) -> Result<Self, GatewayError> {
        let weather = WeatherClient::new(&services.weather_service_url, services.weather_timeout())?;
        let model = ModelClient::new(&services.model_service_url, services.model_timeout())?;

        tracing::info!(
            weather = %services.weather_service_url,
            model = %services.model_service_url,
            "Upstream services configured"
        );
        Ok(Self::new(weather, model))
    }

    #[instrument(
        skip(self, request),
        fields(
            airline = %request.icao_empresa,
            origin = %request.icao_aerodromo_origem,
            destination = %request.icao_aerodromo_destino
        )
    )]
    pub async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, ModelServiceError> {
        let departure = request.partida_prevista.to_iso8601();

        let clima = self
            .weather
            .fetch_weather(
                &request.icao_aerodromo_origem,
                &request.icao_aerodromo_destino,
                &departure,
            )
            .await;

        let payload = ModelPayload::from(request);
        let upstream = self.model.fetch_prediction(&payload).await.map_err(|e| {
            tracing::error!("Prediction aborted: {}", e);
            e
        })?;

        let result = ModelResult::merge_with_defaults(&upstream);
        tracing::info!(
            probability = result.probabilidade,
            weather_fallback = clima.is_fallback(),
            "Prediction assembled: {}",
            result.previsao
        );

        Ok(PredictionResponse { result, clima })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_with_defaults() {
        assert!(PredictionGateway::from_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn test_response_flattens_result_next_to_clima() {
        let response = PredictionResponse {
            result: ModelResult::classify(0.7, 0.5),
            clima: WeatherRecord::fallback("SBRF", "SBRJ", "2025-11-12T22:30:00", "down"),
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["previsao"], "Delayed");
        assert_eq!(json["previsao_atraso"], 1);
        assert_eq!(json["clima"]["condicao"], "Unknown");
        assert_eq!(json["clima"]["error"], "down");
    }
}
