//! Mock geocoding and weather adapters for deterministic testing.
//!
//! Provides a single mock that implements both adapter traits with
//! configurable fixed responses and a call log.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sightdex_geo::mock::MockGeo;
//! use sightdex_core::{GeoPoint, Geocoder};
//!
//! #[tokio::test]
//! async fn test_with_mock_geo() {
//!     let geo = MockGeo::new().with_place("San Francisco", 37.7749, -122.4194);
//!
//!     let point = geo.geocode("San Francisco").await.unwrap();
//!     assert_eq!(point.latitude, 37.7749);
//! }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use sightdex_core::{
    defaults, CurrentConditions, Error, GeoPoint, Geocoder, Result, WeatherCondition,
    WeatherProvider,
};

/// Mock geocoder/weather provider for testing.
#[derive(Clone)]
pub struct MockGeo {
    config: Arc<MockGeoConfig>,
    call_log: Arc<Mutex<Vec<MockGeoCall>>>,
}

#[derive(Debug, Clone)]
struct MockGeoConfig {
    default_point: GeoPoint,
    known_places: HashMap<String, GeoPoint>,
    geocode_fails: bool,
    conditions: Option<CurrentConditions>,
}

/// A recorded call against the mock.
#[derive(Debug, Clone)]
pub struct MockGeoCall {
    pub operation: String,
    pub input: String,
}

impl Default for MockGeoConfig {
    fn default() -> Self {
        Self {
            default_point: GeoPoint::default(),
            known_places: HashMap::new(),
            geocode_fails: false,
            conditions: Some(CurrentConditions {
                condition: defaults::FALLBACK_WEATHER,
                temperature_f: defaults::FALLBACK_TEMPERATURE_F,
                wind_speed_mph: defaults::FALLBACK_WIND_SPEED_MPH,
            }),
        }
    }
}

impl MockGeo {
    /// Create a new mock with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockGeoConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the point returned for places without an explicit mapping.
    pub fn with_point(mut self, latitude: f64, longitude: f64) -> Self {
        Arc::make_mut(&mut self.config).default_point = GeoPoint {
            latitude,
            longitude,
        };
        self
    }

    /// Add a place-to-coordinates mapping.
    pub fn with_place(mut self, place: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Arc::make_mut(&mut self.config).known_places.insert(
            place.into(),
            GeoPoint {
                latitude,
                longitude,
            },
        );
        self
    }

    /// Make every geocode call fail as not-found.
    pub fn with_geocode_failure(mut self) -> Self {
        Arc::make_mut(&mut self.config).geocode_fails = true;
        self
    }

    /// Set the conditions returned by weather lookups.
    pub fn with_conditions(
        mut self,
        condition: WeatherCondition,
        temperature_f: f64,
        wind_speed_mph: f64,
    ) -> Self {
        Arc::make_mut(&mut self.config).conditions = Some(CurrentConditions {
            condition,
            temperature_f,
            wind_speed_mph,
        });
        self
    }

    /// Make every weather lookup return `None`.
    pub fn with_weather_unavailable(mut self) -> Self {
        Arc::make_mut(&mut self.config).conditions = None;
        self
    }

    /// All calls recorded so far, in order.
    pub fn calls(&self) -> Vec<MockGeoCall> {
        self.call_log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Number of geocode calls recorded so far.
    pub fn geocode_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.operation == "geocode")
            .count()
    }

    fn record(&self, operation: &str, input: String) {
        if let Ok(mut log) = self.call_log.lock() {
            log.push(MockGeoCall {
                operation: operation.to_string(),
                input,
            });
        }
    }
}

impl Default for MockGeo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geocoder for MockGeo {
    async fn geocode(&self, place: &str) -> Result<GeoPoint> {
        self.record("geocode", place.to_string());

        if self.config.geocode_fails {
            return Err(Error::LocationNotFound(place.to_string()));
        }
        Ok(self
            .config
            .known_places
            .get(place)
            .copied()
            .unwrap_or(self.config.default_point))
    }
}

#[async_trait]
impl WeatherProvider for MockGeo {
    async fn current_conditions(&self, point: GeoPoint) -> Option<CurrentConditions> {
        self.record(
            "current_conditions",
            format!("{},{}", point.latitude, point.longitude),
        );
        self.config.conditions
    }
}
