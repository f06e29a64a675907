//! Event registry repository.
//!
//! Join and leave maintain the denormalized `participant_count` column in
//! the same transaction as the report write, so the counter never drifts
//! from the reports it summarizes.

use async_trait::async_trait;
use rand::Rng;
use sqlx::{postgres::PgRow, Pool, Postgres, Row, Transaction};

use sightdex_core::{
    defaults::{EVENT_ID_MAX, EVENT_ID_MIN, REPORT_STATUS_JOINED},
    CreateEventRequest, Error, Event, EventRepository, EventSummary, Result,
};

/// PostgreSQL implementation of the event registry.
pub struct PgEventRepository {
    pool: Pool<Postgres>,
}

impl PgEventRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn list(&self) -> Result<Vec<EventSummary>> {
        let rows = sqlx::query(
            "SELECT e.event_id, e.event_name, e.description, e.location, e.event_time, \
             e.organization_name, \
             COUNT(DISTINCT r.user_id) AS participant_count, \
             o.organization_name AS host_organization \
             FROM events e \
             LEFT JOIN reports r ON r.event_id = e.event_id \
             LEFT JOIN organizations o ON o.organization_name = e.organization_name \
             GROUP BY e.event_id, e.event_name, e.description, e.location, e.event_time, \
             e.organization_name, o.organization_name \
             ORDER BY e.event_time DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_row_to_summary).collect())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Event>> {
        let rows = sqlx::query(
            "SELECT DISTINCT e.event_id, e.event_name, e.description, e.location, \
             e.event_time, e.participant_count, e.organization_name \
             FROM events e \
             JOIN reports r ON r.event_id = e.event_id \
             WHERE r.user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_row_to_event).collect())
    }

    async fn create(&self, req: CreateEventRequest) -> Result<i32> {
        let event_id = rand::thread_rng().gen_range(EVENT_ID_MIN..=EVENT_ID_MAX);

        sqlx::query(
            "INSERT INTO events (event_id, event_name, description, location, event_time, \
             participant_count, organization_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(event_id)
        .bind(&req.event_name)
        .bind(&req.description)
        .bind(&req.location)
        .bind(req.event_time)
        .bind(req.participant_count)
        .bind(&req.organization_name)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(event_id)
    }

    async fn join(&self, event_id: i32, user_id: &str) -> Result<i64> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let report_id = self.join_tx(&mut tx, event_id, user_id).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(report_id)
    }

    async fn leave(&self, event_id: i32, user_id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        self.leave_tx(&mut tx, event_id, user_id).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    async fn delete(&self, event_id: i32) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Join reports reference the event, so they go first.
        sqlx::query("DELETE FROM reports WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        let result = sqlx::query("DELETE FROM events WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::EventNotFound(event_id));
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }
}

// =============================================================================
// TRANSACTION-AWARE VARIANTS
// =============================================================================

/// Transaction-aware variants pairing the report write with the counter
/// update.
impl PgEventRepository {
    /// Insert a join report and bump the participant counter within an
    /// existing transaction. Returns the database-assigned report id.
    pub async fn join_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i32,
        user_id: &str,
    ) -> Result<i64> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE event_id = $1)")
                .bind(event_id)
                .fetch_one(&mut **tx)
                .await
                .map_err(Error::Database)?;
        if !exists {
            return Err(Error::EventNotFound(event_id));
        }

        let report_id: i64 = sqlx::query_scalar(
            "INSERT INTO reports (sighting_id, user_id, event_id, status, notes) \
             VALUES (NULL, $1, $2, $3, '') \
             RETURNING report_id",
        )
        .bind(user_id)
        .bind(event_id)
        .bind(REPORT_STATUS_JOINED)
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::Database)?;

        sqlx::query("UPDATE events SET participant_count = participant_count + 1 WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;

        Ok(report_id)
    }

    /// Remove the user's join report(s) for the event and decrement the
    /// counter by the number removed, within an existing transaction.
    /// Leaving an event never touches other users' reports.
    pub async fn leave_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i32,
        user_id: &str,
    ) -> Result<()> {
        let result = sqlx::query("DELETE FROM reports WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;

        let removed = result.rows_affected() as i32;
        if removed > 0 {
            sqlx::query(
                "UPDATE events SET participant_count = participant_count - $1 WHERE event_id = $2",
            )
            .bind(removed)
            .bind(event_id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;
        }

        Ok(())
    }
}

fn map_row_to_event(row: PgRow) -> Event {
    Event {
        event_id: row.get("event_id"),
        event_name: row.get("event_name"),
        description: row.get("description"),
        location: row.get("location"),
        event_time: row.get("event_time"),
        participant_count: row.get("participant_count"),
        organization_name: row.get("organization_name"),
    }
}

fn map_row_to_summary(row: PgRow) -> EventSummary {
    EventSummary {
        event_id: row.get("event_id"),
        event_name: row.get("event_name"),
        description: row.get("description"),
        location: row.get("location"),
        event_time: row.get("event_time"),
        organization_name: row.get("organization_name"),
        participant_count: row.get("participant_count"),
        host_organization: row.get("host_organization"),
    }
}
