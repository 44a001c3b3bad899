//! Weather type definitions
//!
//! Open-Meteo response shapes and the report returned to tool callers.

use serde::{Deserialize, Serialize};

use crate::config::open_meteo::TEMPERATURE_UNIT;

/// Outcome of a single-city lookup.
///
/// A failed lookup is data, not a protocol fault: callers inspect the
/// `error` key in the serialized payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeatherReport {
    Current(CurrentWeather),
    Failed { error: String },
}

impl WeatherReport {
    pub fn failed(error: impl Into<String>) -> Self {
        WeatherReport::Failed {
            error: error.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, WeatherReport::Failed { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            WeatherReport::Failed { error } => Some(error.as_str()),
            WeatherReport::Current(_) => None,
        }
    }
}

/// Current temperature for a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub temperature: Option<f64>,
    pub unit: String,
    pub time: Option<String>,
    pub timezone: String,
}

impl CurrentWeather {
    /// Build a report from a forecast response
    pub fn from_forecast(city: String, forecast: ForecastResponse) -> Self {
        let current = forecast.current.unwrap_or_default();
        Self {
            city,
            temperature: current.temperature_2m,
            unit: TEMPERATURE_UNIT.to_string(),
            time: current.time,
            timezone: forecast.timezone.unwrap_or_else(|| "UTC".to_string()),
        }
    }
}

/// Open-Meteo `/forecast` response (only the fields we read)
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub timezone: Option<String>,

    #[serde(default)]
    pub current: Option<CurrentConditions>,
}

/// `current` block of a forecast response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub time: Option<String>,

    #[serde(default)]
    pub temperature_2m: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_deserialization() {
        let json = r#"{
            "latitude": 12.97,
            "longitude": 77.59,
            "timezone": "Asia/Kolkata",
            "current_units": {"time": "iso8601", "temperature_2m": "°C"},
            "current": {"time": "2024-06-01T12:00", "interval": 900, "temperature_2m": 27.4}
        }"#;

        let forecast: ForecastResponse = serde_json::from_str(json).unwrap();
        let report = CurrentWeather::from_forecast("Bangalore".to_string(), forecast);
        assert_eq!(report.temperature, Some(27.4));
        assert_eq!(report.timezone, "Asia/Kolkata");
        assert_eq!(report.time.as_deref(), Some("2024-06-01T12:00"));
    }

    #[test]
    fn test_missing_timezone_defaults_to_utc() {
        let forecast: ForecastResponse = serde_json::from_str("{}").unwrap();
        let report = CurrentWeather::from_forecast("Delhi".to_string(), forecast);
        assert_eq!(report.timezone, "UTC");
        assert_eq!(report.temperature, None);
    }

    #[test]
    fn test_report_serialization() {
        let report = WeatherReport::Current(CurrentWeather {
            city: "Delhi".to_string(),
            temperature: Some(31.2),
            unit: "°C".to_string(),
            time: Some("2024-06-01T12:00".to_string()),
            timezone: "Asia/Kolkata".to_string(),
        });
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["city"], "Delhi");
        assert_eq!(value["temperature"], 31.2);
        assert!(value.get("error").is_none());

        let failed = serde_json::to_value(WeatherReport::failed("boom")).unwrap();
        assert_eq!(failed, serde_json::json!({"error": "boom"}));
    }
}
