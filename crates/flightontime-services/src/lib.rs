pub mod error;
pub mod model_client;
pub mod types;

pub use error::{ModelClientError, ModelServiceError};
pub use model_client::ModelClient;
pub use types::*;
