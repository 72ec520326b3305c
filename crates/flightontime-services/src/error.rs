//! Prediction-service error types.

use flightontime_core::NetworkError;
use thiserror::Error;

/// The prediction service could not produce a result. Never substituted
/// with a default; callers must surface it.
#[derive(Error, Debug)]
#[error("Model service call failed: {cause}")]
pub struct ModelServiceError {
    #[source]
    pub cause: NetworkError,
}

impl ModelServiceError {
    pub fn new(cause: NetworkError) -> Self {
        Self { cause }
    }

    pub fn is_timeout(&self) -> bool {
        self.cause.is_timeout()
    }
}

impl From<NetworkError> for ModelServiceError {
    fn from(cause: NetworkError) -> Self {
        Self::new(cause)
    }
}

/// Model client construction errors
#[derive(Error, Debug)]
pub enum ModelClientError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
