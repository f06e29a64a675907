//! Core traits for sightdex abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// SIGHTING REPOSITORY TRAITS
// =============================================================================

/// Request for creating a sighting.
///
/// Weather, temperature, and wind speed arrive already resolved (adapter
/// value, caller-supplied value, or fixed fallback). The sighting id and
/// time-of-day bucket are assigned inside the repository at insert time.
#[derive(Debug, Clone)]
pub struct CreateSightingRequest {
    pub pokemon_id: i32,
    pub user_id: String,
    pub longitude: f64,
    pub latitude: f64,
    pub weather: WeatherCondition,
    pub temperature: f64,
    pub wind_speed: f64,
    pub notes: String,
}

/// Repository for the sighting lifecycle.
#[async_trait]
pub trait SightingRepository: Send + Sync {
    /// Insert a sighting and its originating report in one transaction.
    async fn create(&self, req: CreateSightingRequest) -> Result<CreatedSighting>;

    /// Delete a sighting and every report referencing it in one
    /// transaction, after checking that `user_id` reported it.
    /// Returns the human-readable success message.
    async fn delete(&self, sighting_id: &str, user_id: &str) -> Result<String>;

    /// Fetch a sighting by id.
    async fn fetch(&self, sighting_id: &str) -> Result<Sighting>;

    /// A user's sighting history, newest report first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<UserSightingRecord>>;
}

// =============================================================================
// PROXIMITY SEARCH TRAITS
// =============================================================================

/// Request for the map-display search variant: sighting rows of one
/// species within a radius of an already-geocoded center.
#[derive(Debug, Clone, Default)]
pub struct SightingSearchRequest {
    pub pokemon_name: String,
    pub center: GeoPoint,
    pub radius_miles: f64,
    /// Optional weather equality filter (raw condition name).
    pub weather: Option<String>,
    /// Lower CP bound; `None` or zero sends no predicate.
    pub min_cp: Option<i32>,
    /// Upper CP bound; `None` or zero sends no predicate.
    pub max_cp: Option<i32>,
}

/// Request for the autocomplete variant: distinct species names sighted
/// within a radius, under optional catalog filters.
#[derive(Debug, Clone, Default)]
pub struct SpeciesSearchRequest {
    pub center: GeoPoint,
    pub radius_miles: f64,
    pub pokemon_type: Option<String>,
    pub rarity: Option<String>,
    pub weather: Option<String>,
    /// Lower CP bound; `None` or zero sends no predicate.
    pub min_cp: Option<i32>,
    /// Upper CP bound; `None` or zero sends no predicate.
    pub max_cp: Option<i32>,
}

/// Repository for proximity-filtered sighting queries.
#[async_trait]
pub trait SightingSearchRepository: Send + Sync {
    /// Variant (a): matching sighting rows for map display, unordered.
    async fn sightings_within_radius(
        &self,
        req: SightingSearchRequest,
    ) -> Result<Vec<SightingPin>>;

    /// Variant (b): distinct species names, ordered alphabetically. The
    /// CP-stats join happens only when a CP bound is active.
    async fn species_within_radius(&self, req: SpeciesSearchRequest) -> Result<Vec<String>>;
}

// =============================================================================
// EVENT REPOSITORY TRAITS
// =============================================================================

/// Request for creating an event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub event_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "time")]
    pub event_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub participant_count: i32,
    pub organization_name: Option<String>,
}

/// Repository for event CRUD and attendance.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// All events with live participant counts, newest first.
    async fn list(&self) -> Result<Vec<EventSummary>>;

    /// Events the user holds a join report for.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Event>>;

    /// Insert a new event under a fresh random id. Returns the id.
    async fn create(&self, req: CreateEventRequest) -> Result<i32>;

    /// Insert a join report and bump the participant counter in one
    /// transaction. Returns the report id.
    async fn join(&self, event_id: i32, user_id: &str) -> Result<i64>;

    /// Remove the user's join report(s) and decrement the counter by the
    /// number removed, in one transaction.
    async fn leave(&self, event_id: i32, user_id: &str) -> Result<()>;

    /// Delete an event and its join reports in one transaction.
    async fn delete(&self, event_id: i32) -> Result<()>;
}

// =============================================================================
// ORGANIZATION REPOSITORY TRAITS
// =============================================================================

/// Outcome of an organization delete attempt. Reference counts ride along
/// so callers can report what blocked or what was cleaned up.
#[derive(Debug, Clone)]
pub enum OrganizationDelete {
    /// Refused because rows still reference the organization.
    Blocked {
        message: String,
        user_count: i64,
        event_count: i64,
    },
    /// Removed. `kicked_members` is set when an admin forced the delete
    /// and members were reassigned to the default organization.
    Deleted {
        message: String,
        user_count: i64,
        event_count: i64,
        kicked_members: Option<i64>,
    },
}

/// Repository for the organization directory.
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// All organizations with member counts, ordered by name.
    async fn list(&self) -> Result<Vec<OrganizationSummary>>;

    /// Create an organization. Duplicate names are an input error.
    async fn create(&self, organization_name: &str) -> Result<()>;

    /// Delete an organization subject to the requester's role and the
    /// reference rules (see [`OrganizationDelete`]).
    async fn delete(
        &self,
        organization_name: &str,
        requesting_user_id: &str,
    ) -> Result<OrganizationDelete>;

    /// A user's current membership.
    async fn membership(&self, user_id: &str) -> Result<UserOrganization>;

    /// Move a user to another organization. The target must exist unless
    /// it is the default organization.
    async fn update_membership(&self, user_id: &str, organization_name: &str) -> Result<()>;
}

// =============================================================================
// USER REPOSITORY TRAITS
// =============================================================================

/// Repository for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create an account with a hashed credential, default role, and
    /// default organization. Duplicate ids are an input error.
    async fn register(&self, user_id: &str, password: &str) -> Result<()>;

    /// Match a user id and password against the stored digest.
    async fn verify_credentials(&self, user_id: &str, password: &str) -> Result<User>;

    /// Fetch a user by id.
    async fn fetch(&self, user_id: &str) -> Result<User>;

    /// Check if a user exists.
    async fn exists(&self, user_id: &str) -> Result<bool>;
}

// =============================================================================
// POKEMON CATALOG TRAITS
// =============================================================================

/// Read-only access to the species catalog.
#[async_trait]
pub trait PokemonRepository: Send + Sync {
    /// Species detail (stats joined) by exact name.
    async fn details_by_name(&self, name: &str) -> Result<PokemonDetails>;

    /// Total number of catalog entries. Used by the connectivity check.
    async fn count(&self) -> Result<i64>;
}

// =============================================================================
// GEO ADAPTER TRAITS
// =============================================================================

/// Resolves place names to coordinates via an external service.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a place name. Any failure (unknown place, network error,
    /// malformed body) surfaces as [`crate::Error::LocationNotFound`].
    async fn geocode(&self, place: &str) -> Result<GeoPoint>;
}

/// Resolves coordinates to current weather via an external service.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch current conditions. Returns `None` on any failure; callers
    /// apply their own fallbacks.
    async fn current_conditions(&self, point: GeoPoint) -> Option<CurrentConditions>;
}
