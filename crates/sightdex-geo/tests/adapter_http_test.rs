//! Integration tests for the HTTP adapters.
//!
//! These tests run the real request/response code against a wiremock
//! server, covering the success path and every fallback branch.

use sightdex_core::{Error, GeoPoint, Geocoder, WeatherCondition, WeatherProvider};
use sightdex_geo::{GoogleMapsGeocoder, OpenMeteoWeather};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn geocoder_for(server: &MockServer) -> GoogleMapsGeocoder {
    GoogleMapsGeocoder::with_config(server.uri(), "test-key".to_string(), 2)
}

fn weather_for(server: &MockServer) -> OpenMeteoWeather {
    OpenMeteoWeather::with_config(server.uri(), 2)
}

#[tokio::test]
async fn test_geocode_resolves_first_result() {
    let mock_server = MockServer::start().await;

    let body = serde_json::json!({
        "results": [
            {"geometry": {"location": {"lat": 37.7749, "lng": -122.4194}}},
            {"geometry": {"location": {"lat": 40.4406, "lng": -79.9959}}}
        ],
        "status": "OK"
    });

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .and(query_param("address", "San Francisco"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let point = geocoder_for(&mock_server)
        .geocode("San Francisco")
        .await
        .expect("geocode should succeed");

    assert!((point.latitude - 37.7749).abs() < f64::EPSILON);
    assert!((point.longitude - (-122.4194)).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_geocode_empty_results_is_not_found() {
    let mock_server = MockServer::start().await;

    let body = serde_json::json!({"results": [], "status": "ZERO_RESULTS"});

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&mock_server)
        .await;

    let result = geocoder_for(&mock_server).geocode("Atlantis").await;

    match result {
        Err(Error::LocationNotFound(place)) => assert_eq!(place, "Atlantis"),
        other => panic!("Expected LocationNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_geocode_server_error_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let result = geocoder_for(&mock_server).geocode("Springfield").await;
    assert!(matches!(result, Err(Error::LocationNotFound(_))));
}

#[tokio::test]
async fn test_geocode_malformed_body_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let result = geocoder_for(&mock_server).geocode("Springfield").await;
    assert!(matches!(result, Err(Error::LocationNotFound(_))));
}

#[tokio::test]
async fn test_weather_maps_code_and_rounds_readings() {
    let mock_server = MockServer::start().await;

    let body = serde_json::json!({
        "latitude": 37.76,
        "longitude": -122.42,
        "current": {
            "time": "2026-02-10T18:00",
            "temperature_2m": 61.27,
            "weather_code": 63,
            "wind_speed_10m": 9.84
        }
    });

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("temperature_unit", "fahrenheit"))
        .and(query_param("wind_speed_unit", "mph"))
        .and(query_param("current", "temperature_2m,weather_code,wind_speed_10m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let conditions = weather_for(&mock_server)
        .current_conditions(GeoPoint {
            latitude: 37.7749,
            longitude: -122.4194,
        })
        .await
        .expect("weather lookup should succeed");

    assert_eq!(conditions.condition, WeatherCondition::Rain);
    assert!((conditions.temperature_f - 61.3).abs() < f64::EPSILON);
    assert!((conditions.wind_speed_mph - 9.8).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_weather_missing_fields_use_reading_defaults() {
    let mock_server = MockServer::start().await;

    // Open-Meteo omits readings it cannot produce for a location.
    let body = serde_json::json!({
        "latitude": 0.0,
        "longitude": 0.0,
        "current": {"time": "2026-02-10T18:00"}
    });

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&mock_server)
        .await;

    let conditions = weather_for(&mock_server)
        .current_conditions(GeoPoint::default())
        .await
        .expect("weather lookup should succeed");

    assert_eq!(conditions.condition, WeatherCondition::Clear);
    assert!((conditions.temperature_f - 70.0).abs() < f64::EPSILON);
    assert!((conditions.wind_speed_mph - 5.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_weather_unmapped_code_falls_back_to_clear() {
    let mock_server = MockServer::start().await;

    let body = serde_json::json!({
        "latitude": 0.0,
        "longitude": 0.0,
        "current": {
            "time": "2026-02-10T18:00",
            "temperature_2m": 50.0,
            "weather_code": 17,
            "wind_speed_10m": 3.0
        }
    });

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&mock_server)
        .await;

    let conditions = weather_for(&mock_server)
        .current_conditions(GeoPoint::default())
        .await
        .expect("weather lookup should succeed");

    assert_eq!(conditions.condition, WeatherCondition::Clear);
}

#[tokio::test]
async fn test_weather_server_error_is_silent_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let conditions = weather_for(&mock_server)
        .current_conditions(GeoPoint::default())
        .await;
    assert!(conditions.is_none());
}

#[tokio::test]
async fn test_weather_malformed_body_is_silent_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>offline</html>"))
        .mount(&mock_server)
        .await;

    let conditions = weather_for(&mock_server)
        .current_conditions(GeoPoint::default())
        .await;
    assert!(conditions.is_none());
}
