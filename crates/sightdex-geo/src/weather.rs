//! Open-Meteo current-weather adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use sightdex_core::{defaults, CurrentConditions, GeoPoint, WeatherCondition, WeatherProvider};

/// Default Open-Meteo endpoint.
pub const DEFAULT_WEATHER_URL: &str = defaults::WEATHER_URL;

/// Timeout for weather requests (seconds).
pub const WEATHER_TIMEOUT_SECS: u64 = defaults::GEO_TIMEOUT_SECS;

/// Weather provider backed by the Open-Meteo forecast API.
///
/// Best-effort by contract: any failure returns `None` and the caller
/// applies its own fallback. No API key is required.
pub struct OpenMeteoWeather {
    client: Client,
    base_url: String,
}

impl OpenMeteoWeather {
    /// Create a new provider with the default endpoint and timeout.
    pub fn new() -> Self {
        Self::with_config(DEFAULT_WEATHER_URL.to_string(), WEATHER_TIMEOUT_SECS)
    }

    /// Create a new provider with custom configuration.
    pub fn with_config(base_url: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    /// Create from environment variables.
    ///
    /// Reads `WEATHER_BASE_URL` and `GEO_TIMEOUT_SECS`, falling back to
    /// defaults for any that are unset.
    pub fn from_env() -> Self {
        let base_url = std::env::var(defaults::ENV_WEATHER_BASE_URL)
            .unwrap_or_else(|_| DEFAULT_WEATHER_URL.to_string());
        let timeout_secs = std::env::var(defaults::ENV_GEO_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(WEATHER_TIMEOUT_SECS);

        Self::with_config(base_url, timeout_secs)
    }
}

impl Default for OpenMeteoWeather {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to one decimal place, matching the wire precision of the API.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[async_trait]
impl WeatherProvider for OpenMeteoWeather {
    #[instrument(skip(self), fields(subsystem = "geo", component = "open_meteo", op = "current_conditions", latitude = point.latitude, longitude = point.longitude))]
    async fn current_conditions(&self, point: GeoPoint) -> Option<CurrentConditions> {
        let start = Instant::now();

        let request = self
            .client
            .get(format!("{}/v1/forecast", self.base_url))
            .query(&[
                ("latitude", point.latitude.to_string()),
                ("longitude", point.longitude.to_string()),
                (
                    "current",
                    "temperature_2m,weather_code,wind_speed_10m".to_string(),
                ),
                ("temperature_unit", "fahrenheit".to_string()),
                ("wind_speed_unit", "mph".to_string()),
            ]);

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Weather request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "Weather API returned non-success status");
            return None;
        }

        let result: ForecastResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Failed to parse weather response");
                return None;
            }
        };

        let current = result.current.unwrap_or_default();
        let conditions = CurrentConditions {
            condition: WeatherCondition::from_code(current.weather_code.unwrap_or(0)),
            temperature_f: round_one_decimal(
                current
                    .temperature_2m
                    .unwrap_or(defaults::FALLBACK_TEMPERATURE_F),
            ),
            wind_speed_mph: round_one_decimal(
                current
                    .wind_speed_10m
                    .unwrap_or(defaults::FALLBACK_WIND_SPEED_MPH),
            ),
        };

        debug!(
            condition = %conditions.condition,
            temperature_f = conditions.temperature_f,
            wind_speed_mph = conditions.wind_speed_mph,
            duration_ms = start.elapsed().as_millis() as u64,
            "Weather lookup complete"
        );
        Some(conditions)
    }
}

#[derive(Deserialize, Default)]
struct ForecastResponse {
    current: Option<CurrentData>,
}

#[derive(Deserialize, Default)]
struct CurrentData {
    temperature_2m: Option<f64>,
    weather_code: Option<i32>,
    wind_speed_10m: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_WEATHER_URL, "https://api.open-meteo.com");
        assert_eq!(WEATHER_TIMEOUT_SECS, 5);
    }

    #[test]
    fn test_custom_config() {
        let weather = OpenMeteoWeather::with_config("http://localhost:8112".to_string(), 2);
        assert_eq!(weather.base_url, "http://localhost:8112");
    }

    #[test]
    fn test_round_one_decimal() {
        assert!((round_one_decimal(68.4567) - 68.5).abs() < f64::EPSILON);
        assert!((round_one_decimal(4.04) - 4.0).abs() < f64::EPSILON);
        assert!((round_one_decimal(-0.06) - (-0.1)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_response_parsing_with_all_fields() {
        let body = r#"{
            "latitude": 37.76,
            "longitude": -122.42,
            "current": {
                "time": "2026-02-10T18:00",
                "temperature_2m": 61.3,
                "weather_code": 3,
                "wind_speed_10m": 9.8
            }
        }"#;
        let parsed: ForecastResponse = serde_json::from_str(body).unwrap();
        let current = parsed.current.unwrap();
        assert_eq!(current.weather_code, Some(3));
        assert_eq!(current.temperature_2m, Some(61.3));
        assert_eq!(current.wind_speed_10m, Some(9.8));
    }

    #[test]
    fn test_response_parsing_with_missing_current_block() {
        let body = r#"{"latitude": 0.0, "longitude": 0.0}"#;
        let parsed: ForecastResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.current.is_none());
    }
}
