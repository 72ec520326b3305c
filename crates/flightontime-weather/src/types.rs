use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Condition reported when no weather data could be obtained
pub const UNKNOWN_CONDITION: &str = "Unknown";

/// Weather for a flight's route at its departure time (`clima` on the wire).
///
/// The upstream schema is not contractually fixed, so a successful body is
/// kept exactly as received. Typed accessors read the well-known fields.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    fields: Map<String, Value>,
    fallback: bool,
}

/// Shape of the locally synthesized record
#[derive(Debug, Serialize)]
struct FallbackRecord<'a> {
    origem: &'a str,
    destino: &'a str,
    data: &'a str,
    condicao: &'a str,
    temperatura: Option<f64>,
    vento: Option<f64>,
    error: String,
}

impl WeatherRecord {
    /// Wrap a body returned by the weather service, untouched.
    pub fn from_upstream(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            fallback: false,
        }
    }

    /// Local substitute used when the weather service could not be reached.
    pub fn fallback(origin: &str, destination: &str, date: &str, error: impl Into<String>) -> Self {
        let record = FallbackRecord {
            origem: origin,
            destino: destination,
            data: date,
            condicao: UNKNOWN_CONDITION,
            temperatura: None,
            vento: None,
            error: error.into(),
        };

        let fields = match serde_json::to_value(record) {
            Ok(Value::Object(fields)) => fields,
            _ => Map::new(),
        };

        Self {
            fields,
            fallback: true,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn condition(&self) -> Option<&str> {
        self.get("condicao").and_then(Value::as_str)
    }

    pub fn temperature(&self) -> Option<f64> {
        self.get("temperatura").and_then(Value::as_f64)
    }

    pub fn wind(&self) -> Option<f64> {
        self.get("vento").and_then(Value::as_f64)
    }

    pub fn error(&self) -> Option<&str> {
        self.get("error").and_then(Value::as_str)
    }
}

impl Serialize for WeatherRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Weather client construction errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
