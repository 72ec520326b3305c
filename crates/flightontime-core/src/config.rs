use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Environment variable pointing at an explicit config file
pub const CONFIG_PATH_ENV: &str = "FLIGHTONTIME_CONFIG";
pub const MODEL_SERVICE_URL_ENV: &str = "MODEL_SERVICE_URL";
pub const WEATHER_SERVICE_URL_ENV: &str = "WEATHER_SERVICE_URL";
pub const GATEWAY_BIND_ADDR_ENV: &str = "GATEWAY_BIND_ADDR";
pub const MODEL_BIND_ADDR_ENV: &str = "MODEL_BIND_ADDR";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Joins all errors into a single line
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Process-wide settings, resolved once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Gateway HTTP server
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Upstream weather and model services
    #[serde(default)]
    pub services: ServiceConfig,

    /// Mock prediction service
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Address the gateway listens on
    #[serde(default = "default_gateway_bind_addr")]
    pub bind_addr: String,
}

fn default_gateway_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_gateway_bind_addr(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the prediction service
    #[serde(default = "default_model_service_url")]
    pub model_service_url: String,

    /// Base URL of the weather service
    #[serde(default = "default_weather_service_url")]
    pub weather_service_url: String,

    /// Upper bound on a single model call
    #[serde(default = "default_model_timeout_secs")]
    pub model_timeout_secs: u64,

    /// Upper bound on a single weather call
    #[serde(default = "default_weather_timeout_secs")]
    pub weather_timeout_secs: u64,
}

fn default_model_service_url() -> String {
    "http://model:8000".to_string()
}

fn default_weather_service_url() -> String {
    "http://weather:8000".to_string()
}

fn default_model_timeout_secs() -> u64 {
    10
}

fn default_weather_timeout_secs() -> u64 {
    5
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_service_url: default_model_service_url(),
            weather_service_url: default_weather_service_url(),
            model_timeout_secs: default_model_timeout_secs(),
            weather_timeout_secs: default_weather_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    pub fn weather_timeout(&self) -> Duration {
        Duration::from_secs(self.weather_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Address the mock prediction service listens on
    #[serde(default = "default_model_bind_addr")]
    pub bind_addr: String,

    /// Probability above which a flight is classified as delayed
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_model_bind_addr() -> String {
    "0.0.0.0:8001".to_string()
}

fn default_threshold() -> f64 {
    0.5
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_model_bind_addr(),
            threshold: default_threshold(),
        }
    }
}

impl Config {
    /// Resolve configuration: defaults, then the config file if present, then
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(explicit) => {
                let path = PathBuf::from(explicit);
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.display().to_string()));
                }
                Self::from_file(&path)?
            }
            Err(_) => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; any error aborts with `ConfigError::Invalid`.
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Parse a TOML config file. Missing sections and keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::NotFound(format!("{}: {}", path.display(), e)))?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in production).
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(MODEL_SERVICE_URL_ENV) {
            self.services.model_service_url = url;
        }
        if let Some(url) = lookup(WEATHER_SERVICE_URL_ENV) {
            self.services.weather_service_url = url;
        }
        if let Some(addr) = lookup(GATEWAY_BIND_ADDR_ENV) {
            self.gateway.bind_addr = addr;
        }
        if let Some(addr) = lookup(MODEL_BIND_ADDR_ENV) {
            self.model.bind_addr = addr;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(
            &self.services.model_service_url,
            "services.model_service_url",
            &mut result,
        );
        self.validate_url(
            &self.services.weather_service_url,
            "services.weather_service_url",
            &mut result,
        );

        Self::validate_timeout(
            self.services.model_timeout_secs,
            "services.model_timeout_secs",
            &mut result,
        );
        Self::validate_timeout(
            self.services.weather_timeout_secs,
            "services.weather_timeout_secs",
            &mut result,
        );

        Self::validate_bind_addr(&self.gateway.bind_addr, "gateway.bind_addr", &mut result);
        Self::validate_bind_addr(&self.model.bind_addr, "model.bind_addr", &mut result);

        if !(0.0..=1.0).contains(&self.model.threshold) {
            result.add_error(
                "model.threshold",
                format!("Threshold must be within [0, 1], got {}", self.model.threshold),
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    fn validate_timeout(secs: u64, field_name: &str, result: &mut ValidationResult) {
        if secs == 0 {
            result.add_error(field_name, "Timeout must be greater than 0");
        } else if secs > 120 {
            result.add_warning(field_name, "Timeout is unusually long (>120s)");
        }
    }

    fn validate_bind_addr(addr: &str, field_name: &str, result: &mut ValidationResult) {
        if let Err(e) = addr.parse::<SocketAddr>() {
            result.add_error(field_name, format!("Invalid bind address '{}': {}", addr, e));
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("flightontime").join("config.toml"))
    }
}
