//! Error type shared by every sightdex crate.
//!
//! Variants follow the failure taxonomy of the API: bad input, a missing
//! resource, a refused action, an upstream adapter miss, or a database
//! failure. Handlers decide status codes from the variant, never from
//! message text.

use thiserror::Error;

/// Result type alias using sightdex's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // --- validation ---------------------------------------------------
    /// Missing or malformed required input. Surfaced before any write.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // --- not found ----------------------------------------------------
    /// Generic missing resource.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No sighting row under this id.
    #[error("Sighting not found: {0}")]
    SightingNotFound(String),

    /// No user row under this id.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// No event row under this id.
    #[error("Event not found: {0}")]
    EventNotFound(i32),

    /// No organization row under this name.
    #[error("Organization not found: {0}")]
    OrganizationNotFound(String),

    /// The geocoder could not resolve a place name. The place name came
    /// from the client, so this is their error, not ours.
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    // --- authorization ------------------------------------------------
    /// Credentials did not match.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is known but not allowed to do this. Distinct from
    /// not-found so a refused delete can say so.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    // --- upstream and persistence --------------------------------------
    /// HTTP call to an external service failed in transport.
    #[error("Request error: {0}")]
    Request(String),

    /// JSON encode/decode failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Database operation failed; the driver message rides along for
    /// diagnostics.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
