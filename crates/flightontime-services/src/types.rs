use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::str::FromStr;

pub const DELAYED_LABEL: &str = "Delayed";
pub const ON_TIME_LABEL: &str = "On-time";
/// Label used when the model response carries none
pub const UNKNOWN_LABEL: &str = "Unknown";
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Scheduled departure, with or without a UTC offset.
///
/// Accepts a `T` or space separator, optional seconds and fractional seconds,
/// and an optional `Z`/`±HH:MM`/`±HHMM` offset. Serializes to ISO-8601: the
/// offset is kept when one was given and fractional seconds only appear when
/// non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartureTime {
    Zoned(DateTime<FixedOffset>),
    Local(NaiveDateTime),
}

const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid departure time '{0}': expected an ISO-8601 date and time")]
pub struct ParseDepartureError(String);

impl DepartureTime {
    pub fn to_iso8601(&self) -> String {
        match self {
            DepartureTime::Zoned(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            DepartureTime::Local(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        }
    }
}

impl FromStr for DepartureTime {
    type Err = ParseDepartureError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let normalized = match trimmed.strip_suffix(['Z', 'z']) {
            Some(rest) => format!("{rest}+00:00"),
            None => trimmed.to_string(),
        };

        if let Some(dt) = ZONED_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(&normalized, fmt).ok())
        {
            return Ok(DepartureTime::Zoned(dt));
        }

        LOCAL_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
            .map(DepartureTime::Local)
            .ok_or_else(|| ParseDepartureError(raw.to_string()))
    }
}

impl Serialize for DepartureTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for DepartureTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Inbound flight-delay prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Airline ICAO code
    pub icao_empresa: String,
    /// Origin airport ICAO code
    pub icao_aerodromo_origem: String,
    /// Destination airport ICAO code
    pub icao_aerodromo_destino: String,
    pub partida_prevista: DepartureTime,
    pub tempo_voo_estimado_hr: f64,
    pub distancia_km: f64,
}

/// Body sent to the prediction service: the request with its departure time
/// already rendered as a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelPayload {
    pub icao_empresa: String,
    pub icao_aerodromo_origem: String,
    pub icao_aerodromo_destino: String,
    pub partida_prevista: String,
    pub tempo_voo_estimado_hr: f64,
    pub distancia_km: f64,
}

impl From<&PredictionRequest> for ModelPayload {
    fn from(req: &PredictionRequest) -> Self {
        Self {
            icao_empresa: req.icao_empresa.clone(),
            icao_aerodromo_origem: req.icao_aerodromo_origem.clone(),
            icao_aerodromo_destino: req.icao_aerodromo_destino.clone(),
            partida_prevista: req.partida_prevista.to_iso8601(),
            tempo_voo_estimado_hr: req.tempo_voo_estimado_hr,
            distancia_km: req.distancia_km,
        }
    }
}

/// Outcome of a delay prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    /// "Delayed" or "On-time"
    pub previsao: String,
    pub probabilidade: f64,
    pub threshold_usado: f64,
    /// 1 when delayed, 0 otherwise
    pub previsao_atraso: i64,
    pub probabilidade_atraso: f64,
}

impl ModelResult {
    /// Classify a delay probability against a threshold.
    /// Delayed iff `probability > threshold`.
    pub fn classify(probability: f64, threshold: f64) -> Self {
        let delayed = probability > threshold;

        Self {
            previsao: if delayed { DELAYED_LABEL } else { ON_TIME_LABEL }.to_string(),
            probabilidade: probability,
            threshold_usado: threshold,
            previsao_atraso: i64::from(delayed),
            probabilidade_atraso: probability,
        }
    }

    /// Read a loosely-typed upstream response, substituting a default for
    /// every field that is missing or of the wrong JSON type.
    pub fn merge_with_defaults(upstream: &Value) -> Self {
        let previsao = upstream
            .get("previsao")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_LABEL)
            .to_string();

        let previsao_atraso = match upstream.get("previsao_atraso") {
            Some(Value::Bool(flag)) => i64::from(*flag),
            Some(other) => other
                .as_i64()
                .or_else(|| other.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .unwrap_or(0),
            None => 0,
        };

        Self {
            previsao,
            probabilidade: number_or(upstream, "probabilidade", 0.0),
            threshold_usado: number_or(upstream, "threshold_usado", DEFAULT_THRESHOLD),
            previsao_atraso,
            probabilidade_atraso: number_or(upstream, "probabilidade_atraso", 0.0),
        }
    }

    pub fn is_delayed(&self) -> bool {
        self.previsao_atraso == 1
    }
}

fn number_or(upstream: &Value, field: &str, default: f64) -> f64 {
    upstream
        .get(field)
        .and_then(Value::as_f64)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn sample_request(departure: &str) -> PredictionRequest {
        serde_json::from_value(serde_json::json!({
            "icao_empresa": "AZU",
            "icao_aerodromo_origem": "SBRF",
            "icao_aerodromo_destino": "SBRJ",
            "partida_prevista": departure,
            "tempo_voo_estimado_hr": 1.2,
            "distancia_km": 50.0
        }))
        .unwrap()
    }

    #[test]
    fn test_naive_departure_parses_as_local() {
        let req = sample_request("2025-11-12T22:30:00");
        let expected = NaiveDate::from_ymd_opt(2025, 11, 12)
            .unwrap()
            .and_hms_opt(22, 30, 0)
            .unwrap();
        assert_eq!(req.partida_prevista, DepartureTime::Local(expected));
        assert_eq!(req.partida_prevista.to_iso8601(), "2025-11-12T22:30:00");
    }

    #[test]
    fn test_zoned_departure_keeps_offset() {
        let req = sample_request("2025-11-12T22:30:00-03:00");
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        let expected = offset.with_ymd_and_hms(2025, 11, 12, 22, 30, 0).unwrap();
        assert_eq!(req.partida_prevista, DepartureTime::Zoned(expected));
        assert_eq!(req.partida_prevista.to_iso8601(), "2025-11-12T22:30:00-03:00");
    }

    #[test]
    fn test_utc_departure_renders_z() {
        let req = sample_request("2025-11-12T22:30:00Z");
        assert_eq!(req.partida_prevista.to_iso8601(), "2025-11-12T22:30:00Z");
    }

    #[test]
    fn test_departure_round_trip_keeps_sub_seconds() {
        for raw in [
            "2025-11-12T22:30:00",
            "2025-11-12T22:30:00.123456",
            "2025-11-12T22:30:00.5+01:00",
            "2025-11-12T22:30:00.000001Z",
            "2025-11-12 22:30:00",
            "2025-11-12T22:30",
            "2025-11-12 22:30-03:00",
            "2025-11-12T22:30:00+0100",
        ] {
            let original = sample_request(raw).partida_prevista;
            let payload = ModelPayload::from(&sample_request(raw));
            let parsed: DepartureTime =
                serde_json::from_value(Value::String(payload.partida_prevista)).unwrap();
            assert_eq!(parsed, original, "round trip failed for {}", raw);
        }
    }

    #[test]
    fn test_space_separated_departure_parses_as_local() {
        let departure: DepartureTime = "2025-11-12 22:30:00".parse().unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 11, 12)
            .unwrap()
            .and_hms_opt(22, 30, 0)
            .unwrap();
        assert_eq!(departure, DepartureTime::Local(expected));
        assert_eq!(departure.to_iso8601(), "2025-11-12T22:30:00");
    }

    #[test]
    fn test_departure_without_seconds() {
        let local: DepartureTime = "2025-11-12T22:30".parse().unwrap();
        assert_eq!(local.to_iso8601(), "2025-11-12T22:30:00");

        let zoned: DepartureTime = "2025-11-12 22:30-03:00".parse().unwrap();
        assert_eq!(zoned.to_iso8601(), "2025-11-12T22:30:00-03:00");
    }

    #[test]
    fn test_compact_offset_is_accepted() {
        let departure: DepartureTime = "2025-11-12T22:30:00+0100".parse().unwrap();
        assert_eq!(departure.to_iso8601(), "2025-11-12T22:30:00+01:00");
    }

    #[test]
    fn test_invalid_departure_message() {
        let err = "2025-13-40T99:00".parse::<DepartureTime>().unwrap_err();
        assert!(err.to_string().contains("2025-13-40T99:00"));
    }

    #[test]
    fn test_invalid_departure_rejected() {
        let result: Result<PredictionRequest, _> = serde_json::from_value(serde_json::json!({
            "icao_empresa": "AZU",
            "icao_aerodromo_origem": "SBRF",
            "icao_aerodromo_destino": "SBRJ",
            "partida_prevista": "tomorrow evening",
            "tempo_voo_estimado_hr": 1.2,
            "distancia_km": 50.0
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_model_payload_copies_all_fields() {
        let payload = ModelPayload::from(&sample_request("2025-11-12T22:30:00"));
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["icao_empresa"], "AZU");
        assert_eq!(json["icao_aerodromo_origem"], "SBRF");
        assert_eq!(json["icao_aerodromo_destino"], "SBRJ");
        assert_eq!(json["partida_prevista"], "2025-11-12T22:30:00");
        assert_eq!(json["tempo_voo_estimado_hr"], 1.2);
        assert_eq!(json["distancia_km"], 50.0);
    }

    #[test]
    fn test_classify_above_threshold() {
        let result = ModelResult::classify(0.73, 0.5);
        assert_eq!(result.previsao, DELAYED_LABEL);
        assert_eq!(result.previsao_atraso, 1);
        assert_eq!(result.probabilidade_atraso, 0.73);
        assert!(result.is_delayed());
    }

    #[test]
    fn test_classify_at_threshold_is_on_time() {
        let result = ModelResult::classify(0.5, 0.5);
        assert_eq!(result.previsao, ON_TIME_LABEL);
        assert_eq!(result.previsao_atraso, 0);
    }

    #[test]
    fn test_merge_with_complete_response() {
        let upstream = serde_json::json!({
            "previsao": "Delayed",
            "probabilidade": 0.81,
            "threshold_usado": 0.6,
            "previsao_atraso": 1,
            "probabilidade_atraso": 0.81
        });
        let result = ModelResult::merge_with_defaults(&upstream);
        assert_eq!(result, ModelResult {
            previsao: "Delayed".to_string(),
            probabilidade: 0.81,
            threshold_usado: 0.6,
            previsao_atraso: 1,
            probabilidade_atraso: 0.81,
        });
    }

    #[test]
    fn test_merge_with_empty_response_uses_defaults() {
        let result = ModelResult::merge_with_defaults(&serde_json::json!({}));
        assert_eq!(result.previsao, UNKNOWN_LABEL);
        assert_eq!(result.probabilidade, 0.0);
        assert_eq!(result.threshold_usado, DEFAULT_THRESHOLD);
        assert_eq!(result.previsao_atraso, 0);
        assert_eq!(result.probabilidade_atraso, 0.0);
    }

    #[test]
    fn test_merge_treats_wrong_types_as_missing() {
        let upstream = serde_json::json!({
            "previsao": 42,
            "probabilidade": "high",
            "previsao_atraso": true,
            "threshold_usado": null
        });
        let result = ModelResult::merge_with_defaults(&upstream);
        assert_eq!(result.previsao, UNKNOWN_LABEL);
        assert_eq!(result.probabilidade, 0.0);
        assert_eq!(result.previsao_atraso, 1);
        assert_eq!(result.threshold_usado, DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_merge_accepts_integral_float_flag() {
        let delayed = ModelResult::merge_with_defaults(&serde_json::json!({ "previsao_atraso": 1.0 }));
        assert_eq!(delayed.previsao_atraso, 1);
        assert!(delayed.is_delayed());

        let fractional =
            ModelResult::merge_with_defaults(&serde_json::json!({ "previsao_atraso": 0.5 }));
        assert_eq!(fractional.previsao_atraso, 0);
    }

    #[test]
    fn test_merge_non_object_response() {
        let result = ModelResult::merge_with_defaults(&serde_json::json!([0.9]));
        assert_eq!(result.previsao, UNKNOWN_LABEL);
        assert_eq!(result.threshold_usado, DEFAULT_THRESHOLD);
    }
}
