//! # sightdex-db
//!
//! PostgreSQL database layer for sightdex.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for all core entities
//! - PostGIS-backed proximity search over sighting coordinates
//! - Atomic sighting + report lifecycle transactions
//! - Event, organization, and user account persistence
//!
//! ## Example
//!
//! ```rust,ignore
//! use sightdex_db::{CreateSightingRequest, Database, SightingRepository, WeatherCondition};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/sightdex").await?;
//!
//!     let created = db.sightings.create(CreateSightingRequest {
//!         pokemon_id: 25,
//!         user_id: "ash".to_string(),
//!         longitude: -122.4194,
//!         latitude: 37.7749,
//!         weather: WeatherCondition::Clear,
//!         temperature: 68.5,
//!         wind_speed: 4.2,
//!         notes: String::new(),
//!     }).await?;
//!
//!     println!("Created sighting: {}", created.sighting_id);
//!     Ok(())
//! }
//! ```
pub mod events;
pub mod organizations;
pub mod pokemon;
pub mod pool;
pub mod proximity;
pub mod sightings;
pub mod users;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use sightdex_core::*;

// Re-export repository implementations
pub use events::PgEventRepository;
pub use organizations::PgOrganizationRepository;
pub use pokemon::PgPokemonRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use proximity::{PgSightingSearchRepository, ProximityFilter, ProximityQueryBuilder, QueryParam};
pub use sightings::PgSightingRepository;
pub use users::{hash_password, PgUserRepository};

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Sighting repository for the report lifecycle.
    pub sightings: PgSightingRepository,
    /// Proximity search over sighting coordinates.
    pub sighting_search: PgSightingSearchRepository,
    /// Event repository for community gatherings.
    pub events: PgEventRepository,
    /// Organization directory repository.
    pub organizations: PgOrganizationRepository,
    /// User account repository.
    pub users: PgUserRepository,
    /// Species catalog repository.
    pub pokemon: PgPokemonRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            sightings: PgSightingRepository::new(pool.clone()),
            sighting_search: PgSightingSearchRepository::new(pool.clone()),
            events: PgEventRepository::new(pool.clone()),
            organizations: PgOrganizationRepository::new(pool.clone()),
            users: PgUserRepository::new(pool.clone()),
            pokemon: PgPokemonRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            sightings: PgSightingRepository::new(self.pool.clone()),
            sighting_search: PgSightingSearchRepository::new(self.pool.clone()),
            events: PgEventRepository::new(self.pool.clone()),
            organizations: PgOrganizationRepository::new(self.pool.clone()),
            users: PgUserRepository::new(self.pool.clone()),
            pokemon: PgPokemonRepository::new(self.pool.clone()),
        }
    }
}
