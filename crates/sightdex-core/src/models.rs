//! Core data models for sightdex.
//!
//! These types are shared across all sightdex crates and represent
//! the core domain entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// WEATHER TYPES
// =============================================================================

/// Closed set of coarse weather conditions attached to sightings.
///
/// External weather codes are collapsed into these seven buckets via
/// [`WeatherCondition::from_code`]; anything unmapped falls back to `Clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Thunderstorm,
}

impl WeatherCondition {
    /// Map a WMO weather code (Open-Meteo `weather_code`) to a condition.
    ///
    /// Unknown codes resolve to `Clear`.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 | 1 => WeatherCondition::Clear,
            2 | 3 => WeatherCondition::Clouds,
            45 | 48 => WeatherCondition::Fog,
            51 | 53 | 55 => WeatherCondition::Drizzle,
            61 | 63 | 65 | 80 | 81 | 82 => WeatherCondition::Rain,
            71 | 73 | 75 => WeatherCondition::Snow,
            95 | 96 | 99 => WeatherCondition::Thunderstorm,
            _ => WeatherCondition::Clear,
        }
    }

    /// Parse a stored condition name. Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Clear" => Some(WeatherCondition::Clear),
            "Clouds" => Some(WeatherCondition::Clouds),
            "Fog" => Some(WeatherCondition::Fog),
            "Drizzle" => Some(WeatherCondition::Drizzle),
            "Rain" => Some(WeatherCondition::Rain),
            "Snow" => Some(WeatherCondition::Snow),
            "Thunderstorm" => Some(WeatherCondition::Thunderstorm),
            _ => None,
        }
    }

    /// Canonical name as stored in the database and returned on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Clouds => "Clouds",
            WeatherCondition::Fog => "Fog",
            WeatherCondition::Drizzle => "Drizzle",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Thunderstorm => "Thunderstorm",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current conditions reported by the weather adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub condition: WeatherCondition,
    /// Temperature in degrees Fahrenheit, rounded to one decimal.
    pub temperature_f: f64,
    /// Wind speed in miles per hour, rounded to one decimal.
    pub wind_speed_mph: f64,
}

// =============================================================================
// TIME OF DAY
// =============================================================================

/// Wall-clock bucket assigned to a sighting at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Bucket a local wall-clock hour: [5,12) morning, [12,17) afternoon,
    /// [17,21) evening, everything else night.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    /// Parse a stored bucket name. Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "morning" => Some(TimeOfDay::Morning),
            "afternoon" => Some(TimeOfDay::Afternoon),
            "evening" => Some(TimeOfDay::Evening),
            "night" => Some(TimeOfDay::Night),
            _ => None,
        }
    }

    /// Lowercase name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// GEO TYPES
// =============================================================================

/// A geographic coordinate pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

// =============================================================================
// SIGHTING TYPES
// =============================================================================

/// A full sighting row. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sighting {
    pub sighting_id: String,
    pub pokemon_id: i32,
    pub longitude: f64,
    pub latitude: f64,
    pub weather: WeatherCondition,
    pub appeared_time_of_day: TimeOfDay,
    pub temperature: f64,
    pub wind_speed: f64,
}

/// Map-display projection of a sighting returned by proximity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SightingPin {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub weather: WeatherCondition,
    pub appeared_time_of_day: TimeOfDay,
}

/// Identifiers produced by the atomic create-with-report transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSighting {
    pub sighting_id: String,
    pub report_id: i64,
}

/// A sighting joined with the requesting user's report and a city label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSightingRecord {
    pub sighting_id: String,
    pub pokemon_id: i32,
    pub pokemon_name: String,
    pub longitude: f64,
    pub latitude: f64,
    pub weather: WeatherCondition,
    pub appeared_time_of_day: TimeOfDay,
    pub temperature: f64,
    pub wind_speed: f64,
    /// City label from the reverse lookup table, when coordinates match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub report_id: i64,
    pub status: String,
    pub notes: String,
    pub report_time: DateTime<Utc>,
}

// =============================================================================
// EVENT TYPES
// =============================================================================

/// An event row as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_id: i32,
    pub event_name: String,
    pub description: String,
    pub location: String,
    #[serde(rename = "time")]
    pub event_time: Option<DateTime<Utc>>,
    pub participant_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
}

/// Event listing row with a live participant count and host org label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub event_id: i32,
    pub event_name: String,
    pub description: String,
    pub location: String,
    #[serde(rename = "time")]
    pub event_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    /// COUNT(DISTINCT reporting users), not the stored counter.
    pub participant_count: i64,
    /// Organization row label resolved through the directory join.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_organization: Option<String>,
}

// =============================================================================
// ORGANIZATION TYPES
// =============================================================================

/// Organization listing row with its member count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSummary {
    pub organization_name: String,
    pub member_count: i64,
}

/// A user's organization membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOrganization {
    pub user_id: String,
    pub organization_name: String,
}

// =============================================================================
// USER TYPES
// =============================================================================

/// A user row. The password digest never serializes onto the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub role: String,
    pub organization_name: String,
}

// =============================================================================
// POKEMON TYPES
// =============================================================================

/// Species detail joined with its CP stats row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonDetails {
    pub name: String,
    /// Comma-separated tags in storage, split for the response.
    #[serde(rename = "type")]
    pub type_tags: Vec<String>,
    pub rarity: String,
    pub base_attack: i32,
    pub base_defense: i32,
    pub base_stamina: i32,
    #[serde(rename = "maxCP")]
    pub max_cp: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_code_map_clear() {
        assert_eq!(WeatherCondition::from_code(0), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_code(1), WeatherCondition::Clear);
    }

    #[test]
    fn weather_code_map_clouds() {
        assert_eq!(WeatherCondition::from_code(2), WeatherCondition::Clouds);
        assert_eq!(WeatherCondition::from_code(3), WeatherCondition::Clouds);
    }

    #[test]
    fn weather_code_map_fog() {
        assert_eq!(WeatherCondition::from_code(45), WeatherCondition::Fog);
        assert_eq!(WeatherCondition::from_code(48), WeatherCondition::Fog);
    }

    #[test]
    fn weather_code_map_drizzle() {
        for code in [51, 53, 55] {
            assert_eq!(WeatherCondition::from_code(code), WeatherCondition::Drizzle);
        }
    }

    #[test]
    fn weather_code_map_rain_includes_showers() {
        for code in [61, 63, 65, 80, 81, 82] {
            assert_eq!(WeatherCondition::from_code(code), WeatherCondition::Rain);
        }
    }

    #[test]
    fn weather_code_map_snow() {
        for code in [71, 73, 75] {
            assert_eq!(WeatherCondition::from_code(code), WeatherCondition::Snow);
        }
    }

    #[test]
    fn weather_code_map_thunderstorm() {
        for code in [95, 96, 99] {
            assert_eq!(
                WeatherCondition::from_code(code),
                WeatherCondition::Thunderstorm
            );
        }
    }

    #[test]
    fn unmapped_weather_codes_resolve_to_clear() {
        for code in [17, 4, 50, 66, 77, 100, -1] {
            assert_eq!(WeatherCondition::from_code(code), WeatherCondition::Clear);
        }
    }

    #[test]
    fn weather_name_round_trip() {
        for cond in [
            WeatherCondition::Clear,
            WeatherCondition::Clouds,
            WeatherCondition::Fog,
            WeatherCondition::Drizzle,
            WeatherCondition::Rain,
            WeatherCondition::Snow,
            WeatherCondition::Thunderstorm,
        ] {
            assert_eq!(WeatherCondition::from_name(cond.as_str()), Some(cond));
        }
        assert_eq!(WeatherCondition::from_name("Hail"), None);
        assert_eq!(WeatherCondition::from_name("clear"), None);
    }

    #[test]
    fn weather_serializes_to_capitalized_name() {
        let json = serde_json::to_string(&WeatherCondition::Thunderstorm).unwrap();
        assert_eq!(json, "\"Thunderstorm\"");
    }

    #[test]
    fn time_of_day_band_boundaries() {
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(16), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(20), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
    }

    #[test]
    fn time_of_day_serializes_lowercase() {
        let json = serde_json::to_string(&TimeOfDay::Morning).unwrap();
        assert_eq!(json, "\"morning\"");
        assert_eq!(TimeOfDay::from_name("evening"), Some(TimeOfDay::Evening));
        assert_eq!(TimeOfDay::from_name("Evening"), None);
    }

    #[test]
    fn sighting_pin_wire_field_names() {
        let pin = SightingPin {
            id: "abc".to_string(),
            latitude: 37.8,
            longitude: -122.4,
            weather: WeatherCondition::Rain,
            appeared_time_of_day: TimeOfDay::Night,
        };
        let value = serde_json::to_value(&pin).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["appearedTimeOfDay"], "night");
        assert_eq!(value["weather"], "Rain");
    }

    #[test]
    fn pokemon_details_wire_field_names() {
        let details = PokemonDetails {
            name: "Pikachu".to_string(),
            type_tags: vec!["Electric".to_string()],
            rarity: "Common".to_string(),
            base_attack: 112,
            base_defense: 96,
            base_stamina: 111,
            max_cp: 938,
        };
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["type"][0], "Electric");
        assert_eq!(value["baseAttack"], 112);
        assert_eq!(value["maxCP"], 938);
        assert!(value.get("maxCp").is_none());
    }

    #[test]
    fn user_password_never_serializes() {
        let user = User {
            user_id: "alice".to_string(),
            password: "deadbeef".to_string(),
            role: "user".to_string(),
            organization_name: "default".to_string(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["userId"], "alice");
        assert_eq!(value["organizationName"], "default");
    }

    #[test]
    fn event_summary_time_field_name() {
        let summary = EventSummary {
            event_id: 123456,
            event_name: "Raid Night".to_string(),
            description: String::new(),
            location: "Pier 39".to_string(),
            event_time: None,
            organization_name: Some("default".to_string()),
            participant_count: 3,
            host_organization: Some("default".to_string()),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["eventId"], 123456);
        assert!(value.as_object().unwrap().contains_key("time"));
        assert_eq!(value["participantCount"], 3);
        assert_eq!(value["hostOrganization"], "default");
    }
}
