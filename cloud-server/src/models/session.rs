//! Session model
//!
//! One row per sign-in. The bearer token itself is never stored, only
//! its SHA-256 hash.

use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// The part of a session row that authentication checks
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl UserSession {
    pub async fn create(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, token_hash, expires_at)
            VALUES ($1, $2, $3, $4)
            "#
        )
        .bind(id)
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Session that is neither revoked nor expired and matches the token
    pub async fn find_active(
        pool: &PgPool,
        id: Uuid,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserSession>(
            r#"
            SELECT user_id, expires_at FROM sessions
            WHERE id = $1 AND token_hash = $2
              AND revoked_at IS NULL AND expires_at > NOW()
            "#
        )
        .bind(id)
        .bind(token_hash)
        .fetch_optional(pool)
        .await
    }

    /// Mark revoked; returns false if it was already gone
    pub async fn revoke(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL"
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
