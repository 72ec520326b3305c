pub mod service;

pub use service::{GatewayError, PredictionGateway, PredictionResponse};
