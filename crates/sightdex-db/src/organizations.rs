//! Organization directory repository.
//!
//! Membership is implicit through `users.organization_name`, so deleting
//! an organization is governed by reference counts: non-admins may only
//! remove unreferenced organizations, admins may additionally kick
//! remaining members back to the default organization, and nobody may
//! remove an organization that still hosts events.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row, Transaction};

use sightdex_core::{
    defaults::{DEFAULT_ORGANIZATION, ROLE_ADMIN},
    Error, OrganizationDelete, OrganizationRepository, OrganizationSummary, Result,
    UserOrganization,
};

/// PostgreSQL implementation of the organization directory.
pub struct PgOrganizationRepository {
    pool: Pool<Postgres>,
}

impl PgOrganizationRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationRepository for PgOrganizationRepository {
    async fn list(&self) -> Result<Vec<OrganizationSummary>> {
        let rows = sqlx::query(
            "SELECT o.organization_name, COUNT(u.user_id) AS member_count \
             FROM organizations o \
             LEFT JOIN users u ON u.organization_name = o.organization_name \
             GROUP BY o.organization_name \
             ORDER BY o.organization_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| OrganizationSummary {
                organization_name: row.get("organization_name"),
                member_count: row.get("member_count"),
            })
            .collect())
    }

    async fn create(&self, organization_name: &str) -> Result<()> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM organizations WHERE organization_name = $1)",
        )
        .bind(organization_name)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;
        if exists {
            return Err(Error::InvalidInput("Organization already exists".to_string()));
        }

        sqlx::query("INSERT INTO organizations (organization_name) VALUES ($1)")
            .bind(organization_name)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn delete(
        &self,
        organization_name: &str,
        requesting_user_id: &str,
    ) -> Result<OrganizationDelete> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let outcome = self
            .delete_tx(&mut tx, organization_name, requesting_user_id)
            .await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(outcome)
    }

    async fn membership(&self, user_id: &str) -> Result<UserOrganization> {
        let row = sqlx::query("SELECT user_id, organization_name FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))?;

        Ok(UserOrganization {
            user_id: row.get("user_id"),
            organization_name: row.get("organization_name"),
        })
    }

    async fn update_membership(&self, user_id: &str, organization_name: &str) -> Result<()> {
        let user_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;
        if !user_exists {
            return Err(Error::UserNotFound(user_id.to_string()));
        }

        // The default organization is always a legal target; anything else
        // must exist before a user can move there.
        if organization_name != DEFAULT_ORGANIZATION {
            let org_exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM organizations WHERE organization_name = $1)",
            )
            .bind(organization_name)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
            if !org_exists {
                return Err(Error::InvalidInput(
                    "Target organization does not exist".to_string(),
                ));
            }
        }

        sqlx::query("UPDATE users SET organization_name = $1 WHERE user_id = $2")
            .bind(organization_name)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}

// =============================================================================
// TRANSACTION-AWARE VARIANTS
// =============================================================================

impl PgOrganizationRepository {
    /// Evaluate and execute an organization delete within an existing
    /// transaction.
    ///
    /// The reference counts are read inside the transaction, so the
    /// decision and the mutation see the same state. A [`Blocked`]
    /// outcome performs no writes.
    ///
    /// [`Blocked`]: OrganizationDelete::Blocked
    pub async fn delete_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        organization_name: &str,
        requesting_user_id: &str,
    ) -> Result<OrganizationDelete> {
        let requester = sqlx::query("SELECT role FROM users WHERE user_id = $1")
            .bind(requesting_user_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::UserNotFound(requesting_user_id.to_string()))?;
        let role: String = requester.get("role");
        let is_admin = role == ROLE_ADMIN;

        let org_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM organizations WHERE organization_name = $1)",
        )
        .bind(organization_name)
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::Database)?;
        if !org_exists {
            return Err(Error::OrganizationNotFound(organization_name.to_string()));
        }

        // The sentinel must survive: users and events fall back to it.
        if organization_name == DEFAULT_ORGANIZATION {
            return Err(Error::InvalidInput(
                "Cannot delete the default organization".to_string(),
            ));
        }

        let user_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE organization_name = $1")
                .bind(organization_name)
                .fetch_one(&mut **tx)
                .await
                .map_err(Error::Database)?;
        let event_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE organization_name = $1")
                .bind(organization_name)
                .fetch_one(&mut **tx)
                .await
                .map_err(Error::Database)?;

        if !is_admin {
            if user_count > 0 || event_count > 0 {
                return Ok(OrganizationDelete::Blocked {
                    message:
                        "Cannot delete organization that is still referenced by users or events."
                            .to_string(),
                    user_count,
                    event_count,
                });
            }

            sqlx::query("DELETE FROM organizations WHERE organization_name = $1")
                .bind(organization_name)
                .execute(&mut **tx)
                .await
                .map_err(Error::Database)?;

            return Ok(OrganizationDelete::Deleted {
                message: "Organization deleted successfully".to_string(),
                user_count,
                event_count,
                kicked_members: None,
            });
        }

        // Admin path: events still block, but members are reassigned to
        // the default organization in the same transaction as the delete.
        if event_count > 0 {
            return Ok(OrganizationDelete::Blocked {
                message: "Organization still has events associated with it. \
                          Please delete or reassign those events first."
                    .to_string(),
                user_count,
                event_count,
            });
        }

        let kicked = sqlx::query(
            "UPDATE users SET organization_name = $1 WHERE organization_name = $2",
        )
        .bind(DEFAULT_ORGANIZATION)
        .bind(organization_name)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?
        .rows_affected() as i64;

        sqlx::query("DELETE FROM organizations WHERE organization_name = $1")
            .bind(organization_name)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;

        Ok(OrganizationDelete::Deleted {
            message: "Organization deleted by admin. All members were removed from this organization."
                .to_string(),
            user_count,
            event_count,
            kicked_members: Some(kicked),
        })
    }
}
