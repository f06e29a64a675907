//! Sighting lifecycle repository.
//!
//! Creation and deletion both span the sightings and reports tables and
//! run as single transactions: a sighting is never observable without
//! its originating report, and deletion never leaves orphan reports.

use async_trait::async_trait;
use chrono::{Local, Timelike};
use sqlx::{postgres::PgRow, Pool, Postgres, Row, Transaction};
use uuid::Uuid;

use sightdex_core::{
    defaults::REPORT_STATUS_JOINED, CreateSightingRequest, CreatedSighting, Error, Result,
    Sighting, SightingRepository, TimeOfDay, UserSightingRecord, WeatherCondition,
};

/// PostgreSQL implementation of the sighting lifecycle.
pub struct PgSightingRepository {
    pool: Pool<Postgres>,
}

impl PgSightingRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SightingRepository for PgSightingRepository {
    async fn create(&self, req: CreateSightingRequest) -> Result<CreatedSighting> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let created = self.create_tx(&mut tx, req).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(created)
    }

    async fn delete(&self, sighting_id: &str, user_id: &str) -> Result<String> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let message = self.delete_tx(&mut tx, sighting_id, user_id).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(message)
    }

    async fn fetch(&self, sighting_id: &str) -> Result<Sighting> {
        let row = sqlx::query(
            "SELECT sighting_id, pokemon_id, longitude, latitude, weather, \
             appeared_time_of_day, temperature, wind_speed \
             FROM sightings WHERE sighting_id = $1",
        )
        .bind(sighting_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::SightingNotFound(sighting_id.to_string()))?;

        Ok(map_row_to_sighting(row))
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<UserSightingRecord>> {
        let rows = sqlx::query(
            "SELECT s.sighting_id, s.pokemon_id, p.pokemon_name, s.longitude, s.latitude, \
             s.weather, s.appeared_time_of_day, s.temperature, s.wind_speed, \
             l.city AS location, r.report_id, r.status, r.notes, r.reported_at \
             FROM reports r \
             JOIN sightings s ON s.sighting_id = r.sighting_id \
             JOIN pokemon p ON p.pokemon_id = s.pokemon_id \
             LEFT JOIN locations l ON l.longitude = s.longitude AND l.latitude = s.latitude \
             WHERE r.user_id = $1 \
             ORDER BY r.reported_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_row_to_record).collect())
    }
}

// =============================================================================
// TRANSACTION-AWARE VARIANTS
// =============================================================================

/// Transaction-aware variants for the two-table lifecycle operations.
///
/// These methods accept an existing transaction so the sighting write and
/// its report write commit or roll back together.
impl PgSightingRepository {
    /// Insert a sighting and its originating report within an existing
    /// transaction.
    ///
    /// The sighting id is a fresh UUIDv4 string and the time-of-day
    /// bucket comes from the server's local wall-clock hour; both are
    /// assigned here, not by callers. Returns the generated sighting id
    /// together with the database-assigned report id.
    pub async fn create_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        req: CreateSightingRequest,
    ) -> Result<CreatedSighting> {
        let sighting_id = Uuid::new_v4().to_string();
        let appeared_time_of_day = TimeOfDay::from_hour(Local::now().hour());

        sqlx::query(
            "INSERT INTO sightings (sighting_id, pokemon_id, longitude, latitude, weather, \
             appeared_time_of_day, temperature, wind_speed) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&sighting_id)
        .bind(req.pokemon_id)
        .bind(req.longitude)
        .bind(req.latitude)
        .bind(req.weather.as_str())
        .bind(appeared_time_of_day.as_str())
        .bind(req.temperature)
        .bind(req.wind_speed)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        let report_id: i64 = sqlx::query_scalar(
            "INSERT INTO reports (sighting_id, user_id, status, notes) \
             VALUES ($1, $2, $3, $4) \
             RETURNING report_id",
        )
        .bind(&sighting_id)
        .bind(&req.user_id)
        .bind(REPORT_STATUS_JOINED)
        .bind(&req.notes)
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::Database)?;

        Ok(CreatedSighting {
            sighting_id,
            report_id,
        })
    }

    /// Delete a sighting and every report referencing it within an
    /// existing transaction.
    ///
    /// Only a user holding a report on the sighting may delete it. The
    /// checks run inside the same transaction as the deletes, so a
    /// refused request mutates nothing.
    pub async fn delete_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sighting_id: &str,
        user_id: &str,
    ) -> Result<String> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sightings WHERE sighting_id = $1)")
                .bind(sighting_id)
                .fetch_one(&mut **tx)
                .await
                .map_err(Error::Database)?;
        if !exists {
            return Err(Error::SightingNotFound(sighting_id.to_string()));
        }

        let reported_by_user: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reports WHERE sighting_id = $1 AND user_id = $2)",
        )
        .bind(sighting_id)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::Database)?;
        if !reported_by_user {
            return Err(Error::Forbidden(
                "You are not authorized to delete this sighting".to_string(),
            ));
        }

        sqlx::query("DELETE FROM reports WHERE sighting_id = $1")
            .bind(sighting_id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;

        sqlx::query("DELETE FROM sightings WHERE sighting_id = $1")
            .bind(sighting_id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;

        Ok("Sighting deleted successfully".to_string())
    }
}

fn map_row_to_sighting(row: PgRow) -> Sighting {
    let weather: String = row.get("weather");
    let time_of_day: String = row.get("appeared_time_of_day");
    Sighting {
        sighting_id: row.get("sighting_id"),
        pokemon_id: row.get("pokemon_id"),
        longitude: row.get("longitude"),
        latitude: row.get("latitude"),
        weather: WeatherCondition::from_name(&weather).unwrap_or(WeatherCondition::Clear),
        appeared_time_of_day: TimeOfDay::from_name(&time_of_day).unwrap_or(TimeOfDay::Morning),
        temperature: row.get("temperature"),
        wind_speed: row.get("wind_speed"),
    }
}

fn map_row_to_record(row: PgRow) -> UserSightingRecord {
    let weather: String = row.get("weather");
    let time_of_day: String = row.get("appeared_time_of_day");
    UserSightingRecord {
        sighting_id: row.get("sighting_id"),
        pokemon_id: row.get("pokemon_id"),
        pokemon_name: row.get("pokemon_name"),
        longitude: row.get("longitude"),
        latitude: row.get("latitude"),
        weather: WeatherCondition::from_name(&weather).unwrap_or(WeatherCondition::Clear),
        appeared_time_of_day: TimeOfDay::from_name(&time_of_day).unwrap_or(TimeOfDay::Morning),
        temperature: row.get("temperature"),
        wind_speed: row.get("wind_speed"),
        location: row.get("location"),
        report_id: row.get("report_id"),
        status: row.get("status"),
        notes: row.get("notes"),
        report_time: row.get("reported_at"),
    }
}
