//! Handler modules for sightdex-api.
//!
//! Search and sighting-lifecycle handlers live in the crate root next to
//! the router; the groups below cover the rest of the API surface.

pub mod events;
pub mod organizations;
pub mod pokemon;
pub mod users;
