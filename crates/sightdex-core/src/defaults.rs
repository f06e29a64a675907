//! Centralized default constants for the sightdex system.
//!
//! **This module is the single source of truth** for all shared default
//! values. All crates should reference these constants instead of defining
//! their own magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

use crate::models::WeatherCondition;

// =============================================================================
// PROXIMITY SEARCH
// =============================================================================

/// Default search radius in miles for the map-display variant.
/// The autocomplete variant has no default; a missing radius there is a
/// validation error.
pub const DEFAULT_RADIUS_MILES: f64 = 5.0;

/// Meters per statute mile, used to convert spherical distances.
pub const METERS_PER_MILE: f64 = 1609.34;

// =============================================================================
// SIGHTING FALLBACKS
// =============================================================================

/// Weather condition recorded when neither the adapter nor the caller
/// supplies one.
pub const FALLBACK_WEATHER: WeatherCondition = WeatherCondition::Clear;

/// Temperature fallback in degrees Fahrenheit.
pub const FALLBACK_TEMPERATURE_F: f64 = 70.0;

/// Wind speed fallback in miles per hour.
pub const FALLBACK_WIND_SPEED_MPH: f64 = 5.0;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default CORS max-age in seconds (1 hour).
pub const CORS_MAX_AGE_SECS: u64 = 3600;

/// Maximum request body size in bytes (1 MB). Every endpoint takes small
/// JSON bodies.
pub const MAX_BODY_SIZE_BYTES: usize = 1024 * 1024;

// =============================================================================
// GEO ADAPTERS
// =============================================================================

/// Default base URL for the Google Maps geocoding service.
pub const GEOCODER_URL: &str = "https://maps.googleapis.com";

/// Default base URL for the Open-Meteo forecast service.
pub const WEATHER_URL: &str = "https://api.open-meteo.com";

/// Request timeout for both geo adapters in seconds.
pub const GEO_TIMEOUT_SECS: u64 = 5;

/// Environment variable for the Google Maps API key.
pub const ENV_GOOGLE_MAPS_API_KEY: &str = "GOOGLE_MAPS_API_KEY";

/// Environment variable overriding the geocoder base URL.
pub const ENV_GEOCODER_BASE_URL: &str = "GEOCODER_BASE_URL";

/// Environment variable overriding the weather base URL.
pub const ENV_WEATHER_BASE_URL: &str = "WEATHER_BASE_URL";

/// Environment variable overriding the adapter timeout.
pub const ENV_GEO_TIMEOUT_SECS: &str = "GEO_TIMEOUT_SECS";

// =============================================================================
// EVENTS
// =============================================================================

/// Inclusive lower bound for generated event ids (six digits).
pub const EVENT_ID_MIN: i32 = 100_000;

/// Inclusive upper bound for generated event ids.
pub const EVENT_ID_MAX: i32 = 999_999;

// =============================================================================
// ORGANIZATIONS & USERS
// =============================================================================

/// Sentinel organization every unaffiliated user belongs to. Seeded by
/// migration; must always exist.
pub const DEFAULT_ORGANIZATION: &str = "default";

/// Role assigned to newly registered users.
pub const ROLE_USER: &str = "user";

/// Role allowed to force organization deletes.
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// REPORTS
// =============================================================================

/// Status written on the initial report of a sighting and on event joins.
pub const REPORT_STATUS_JOINED: &str = "joined";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_default_is_positive() {
        assert!(DEFAULT_RADIUS_MILES > 0.0);
    }

    #[test]
    fn meters_per_mile_matches_statute_mile() {
        assert!((METERS_PER_MILE - 1609.34).abs() < f64::EPSILON);
    }

    #[test]
    fn sighting_fallbacks() {
        assert_eq!(FALLBACK_WEATHER, WeatherCondition::Clear);
        assert!((FALLBACK_TEMPERATURE_F - 70.0).abs() < f64::EPSILON);
        assert!((FALLBACK_WIND_SPEED_MPH - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn event_id_range_is_six_digits() {
        const {
            assert!(EVENT_ID_MIN < EVENT_ID_MAX);
            assert!(EVENT_ID_MIN == 100_000);
            assert!(EVENT_ID_MAX == 999_999);
        }
    }

    #[test]
    fn geo_timeout_is_bounded() {
        const {
            assert!(GEO_TIMEOUT_SECS <= 5);
        }
    }
}
