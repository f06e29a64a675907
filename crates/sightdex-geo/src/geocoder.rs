//! Google Maps geocoding adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use sightdex_core::{defaults, Error, GeoPoint, Geocoder, Result};

/// Default Google Maps endpoint.
pub const DEFAULT_GEOCODER_URL: &str = defaults::GEOCODER_URL;

/// Timeout for geocoding requests (seconds).
pub const GEOCODE_TIMEOUT_SECS: u64 = defaults::GEO_TIMEOUT_SECS;

/// Geocoder backed by the Google Maps Geocoding API.
///
/// Resolves free-form place names to coordinates. Every failure mode
/// (transport error, non-2xx status, malformed body, empty result set)
/// collapses into [`Error::LocationNotFound`] carrying the place name,
/// since the caller cannot distinguish a bad place from a bad lookup.
pub struct GoogleMapsGeocoder {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GoogleMapsGeocoder {
    /// Create a new geocoder with the default endpoint and timeout.
    pub fn new(api_key: String) -> Self {
        Self::with_config(
            DEFAULT_GEOCODER_URL.to_string(),
            api_key,
            GEOCODE_TIMEOUT_SECS,
        )
    }

    /// Create a new geocoder with custom configuration.
    pub fn with_config(base_url: String, api_key: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Create from environment variables.
    ///
    /// Reads `GEOCODER_BASE_URL`, `GOOGLE_MAPS_API_KEY`, and
    /// `GEO_TIMEOUT_SECS`, falling back to defaults for any that are
    /// unset. An empty API key is accepted here so the server can boot
    /// without one; lookups will simply fail as not-found.
    pub fn from_env() -> Self {
        let base_url = std::env::var(defaults::ENV_GEOCODER_BASE_URL)
            .unwrap_or_else(|_| DEFAULT_GEOCODER_URL.to_string());
        let api_key = std::env::var(defaults::ENV_GOOGLE_MAPS_API_KEY).unwrap_or_default();
        let timeout_secs = std::env::var(defaults::ENV_GEO_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(GEOCODE_TIMEOUT_SECS);

        if api_key.is_empty() {
            warn!("GOOGLE_MAPS_API_KEY is not set; geocoding lookups will fail");
        }

        Self::with_config(base_url, api_key, timeout_secs)
    }
}

#[async_trait]
impl Geocoder for GoogleMapsGeocoder {
    #[instrument(skip(self), fields(subsystem = "geo", component = "google_maps", op = "geocode", place = %place))]
    async fn geocode(&self, place: &str) -> Result<GeoPoint> {
        let start = Instant::now();

        let response = self
            .client
            .get(format!("{}/maps/api/geocode/json", self.base_url))
            .query(&[("address", place), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Geocoding request failed");
                Error::LocationNotFound(place.to_string())
            })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Geocoder returned non-success status");
            return Err(Error::LocationNotFound(place.to_string()));
        }

        let result: GeocodeResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse geocoder response");
            Error::LocationNotFound(place.to_string())
        })?;

        let location = result
            .results
            .into_iter()
            .next()
            .map(|r| r.geometry.location)
            .ok_or_else(|| Error::LocationNotFound(place.to_string()))?;

        let point = GeoPoint {
            latitude: location.lat,
            longitude: location.lng,
        };
        debug!(
            latitude = point.latitude,
            longitude = point.longitude,
            duration_ms = start.elapsed().as_millis() as u64,
            "Geocoding complete"
        );
        Ok(point)
    }
}

#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_GEOCODER_URL, "https://maps.googleapis.com");
        assert_eq!(GEOCODE_TIMEOUT_SECS, 5);
    }

    #[test]
    fn test_custom_config() {
        let geocoder = GoogleMapsGeocoder::with_config(
            "http://localhost:8111".to_string(),
            "test-key".to_string(),
            2,
        );
        assert_eq!(geocoder.base_url, "http://localhost:8111");
        assert_eq!(geocoder.api_key, "test-key");
    }

    #[test]
    fn test_new_uses_default_endpoint() {
        let geocoder = GoogleMapsGeocoder::new("k".to_string());
        assert_eq!(geocoder.base_url, DEFAULT_GEOCODER_URL);
    }

    #[test]
    fn test_response_parsing_takes_first_result() {
        let body = r#"{
            "results": [
                {"geometry": {"location": {"lat": 37.7749, "lng": -122.4194}}},
                {"geometry": {"location": {"lat": 0.0, "lng": 0.0}}}
            ],
            "status": "OK"
        }"#;
        let parsed: GeocodeResponse = serde_json::from_str(body).unwrap();
        let first = &parsed.results[0].geometry.location;
        assert!((first.lat - 37.7749).abs() < f64::EPSILON);
        assert!((first.lng - (-122.4194)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_response_parsing_tolerates_missing_results() {
        let body = r#"{"status": "ZERO_RESULTS"}"#;
        let parsed: GeocodeResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.results.is_empty());
    }
}
