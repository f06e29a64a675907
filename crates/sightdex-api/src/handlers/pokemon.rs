//! Species catalog HTTP handlers.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{non_empty, ApiError, AppState};
use sightdex_core::{PokemonDetails, PokemonRepository};

/// Request body for the species detail lookup.
#[derive(Debug, Deserialize)]
pub struct PokemonDetailsBody {
    pub name: Option<String>,
}

/// Full catalog entry for one species, matched by exact name.
///
/// # Returns
/// - 200 OK with the entry, type tags split into an array
/// - 400 Bad Request when the name is missing
/// - 404 Not Found for an unknown species
pub async fn get_pokemon_details(
    State(state): State<AppState>,
    Json(body): Json<PokemonDetailsBody>,
) -> Result<Json<PokemonDetails>, ApiError> {
    let name = non_empty(body.name)
        .ok_or_else(|| ApiError::BadRequest("Pokémon name is required".to_string()))?;

    let details = state.db.pokemon.details_by_name(&name).await?;
    Ok(Json(details))
}
