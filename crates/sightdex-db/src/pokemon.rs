//! Species catalog repository (read-only).

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use sightdex_core::{Error, PokemonDetails, PokemonRepository, Result};

/// PostgreSQL implementation of the species catalog.
pub struct PgPokemonRepository {
    pool: Pool<Postgres>,
}

impl PgPokemonRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PokemonRepository for PgPokemonRepository {
    async fn details_by_name(&self, name: &str) -> Result<PokemonDetails> {
        let row = sqlx::query(
            "SELECT p.pokemon_name, p.type, p.rarity, p.base_attack, p.base_defense, \
             p.base_stamina, sc.max_cp \
             FROM pokemon p \
             JOIN stats_cp sc ON sc.pokemon_id = p.pokemon_id \
             WHERE p.pokemon_name = $1 \
             LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::NotFound(format!("No Pokémon found with name {}", name)))?;

        let type_str: String = row.get("type");
        let type_tags = if type_str.is_empty() {
            Vec::new()
        } else {
            type_str.split(',').map(String::from).collect()
        };

        Ok(PokemonDetails {
            name: row.get("pokemon_name"),
            type_tags,
            rarity: row.get("rarity"),
            base_attack: row.get("base_attack"),
            base_defense: row.get("base_defense"),
            base_stamina: row.get("base_stamina"),
            max_cp: row.get("max_cp"),
        })
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pokemon")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(count)
    }
}
