//! # sightdex-geo
//!
//! Geocoding and weather adapters for sightdex.
//!
//! This crate provides:
//! - Geocoder trait implementation backed by the Google Maps Geocoding API
//! - Weather provider backed by the Open-Meteo forecast API
//! - Mock adapters for deterministic testing (feature `mock`)
//!
//! Both adapters are bounded best-effort calls: the geocoder collapses
//! every failure into a not-found error for the requested place, and the
//! weather provider returns `None` so callers can apply their own
//! fallbacks.
//!
//! # Example
//!
//! ```rust,no_run
//! use sightdex_geo::GoogleMapsGeocoder;
//! use sightdex_core::Geocoder;
//!
//! #[tokio::main]
//! async fn main() {
//!     let geocoder = GoogleMapsGeocoder::from_env();
//!     let point = geocoder.geocode("San Francisco").await.unwrap();
//!     println!("{}, {}", point.latitude, point.longitude);
//! }
//! ```

pub mod geocoder;
pub mod weather;

// Mock adapters for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use sightdex_core::*;

pub use geocoder::GoogleMapsGeocoder;
pub use weather::OpenMeteoWeather;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockGeo;
