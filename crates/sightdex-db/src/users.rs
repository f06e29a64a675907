//! User account repository.
//!
//! Passwords are stored as SHA-256 hex digests and compared digest to
//! digest; plaintext never reaches the database.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use sightdex_core::{
    defaults::{DEFAULT_ORGANIZATION, ROLE_USER},
    Error, Result, User, UserRepository,
};

/// SHA-256 hex digest of a password.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// PostgreSQL implementation of the user account store.
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn register(&self, user_id: &str, password: &str) -> Result<()> {
        let exists = self.exists(user_id).await?;
        if exists {
            return Err(Error::InvalidInput("Username already exists".to_string()));
        }

        sqlx::query(
            "INSERT INTO users (user_id, password, role, organization_name) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(hash_password(password))
        .bind(ROLE_USER)
        .bind(DEFAULT_ORGANIZATION)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }

    async fn verify_credentials(&self, user_id: &str, password: &str) -> Result<User> {
        let row = sqlx::query(
            "SELECT user_id, password, role, organization_name \
             FROM users WHERE user_id = $1 AND password = $2",
        )
        .bind(user_id)
        .bind(hash_password(password))
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| {
            Error::Unauthorized("Invalid username or password. Please try again.".to_string())
        })?;

        Ok(map_row_to_user(row))
    }

    async fn fetch(&self, user_id: &str) -> Result<User> {
        let row = sqlx::query(
            "SELECT user_id, password, role, organization_name FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::UserNotFound(user_id.to_string()))?;

        Ok(map_row_to_user(row))
    }

    async fn exists(&self, user_id: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;
        Ok(exists)
    }
}

fn map_row_to_user(row: PgRow) -> User {
    User {
        user_id: row.get("user_id"),
        password: row.get("password"),
        role: row.get("role"),
        organization_name: row.get("organization_name"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_is_sha256_hex() {
        let digest = hash_password("password123");
        assert_eq!(
            digest,
            "ef92b778bafe771e89245b89ecbc08a44a4e166c06659911881f383d4473e94f"
        );
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn test_hash_password_deterministic() {
        assert_eq!(
            hash_password("pikachu"),
            hash_password("pikachu")
        );
        assert_ne!(
            hash_password("pikachu"),
            hash_password("raichu")
        );
    }

    #[test]
    fn test_hash_password_empty_input() {
        // SHA-256 of the empty string
        assert_eq!(
            hash_password(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
