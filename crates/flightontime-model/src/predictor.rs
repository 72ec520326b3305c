//! Delay-probability sources for the prediction service.

use flightontime_services::{ModelResult, PredictionRequest};
use rand::Rng;

/// Anything that can turn a flight into a delay prediction. The HTTP layer
/// only depends on this trait, so a real model can replace the mock.
pub trait Predictor: Send + Sync {
    fn predict(&self, request: &PredictionRequest) -> ModelResult;
}

/// Random stand-in for a trained model: ignores the flight and draws a
/// uniform probability in `[0.1, 0.9]`, rounded to 3 decimals.
#[derive(Debug, Clone)]
pub struct MockPredictor {
    threshold: f64,
}

impl MockPredictor {
    pub const MIN_PROBABILITY: f64 = 0.1;
    pub const MAX_PROBABILITY: f64 = 0.9;

    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    fn sample_probability(&self) -> f64 {
        let raw = rand::rng().random_range(Self::MIN_PROBABILITY..=Self::MAX_PROBABILITY);
        round3(raw)
    }
}

impl Predictor for MockPredictor {
    fn predict(&self, request: &PredictionRequest) -> ModelResult {
        let probability = self.sample_probability();
        tracing::debug!(
            airline = %request.icao_empresa,
            probability,
            "Mock prediction drawn"
        );
        ModelResult::classify(probability, self.threshold)
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
