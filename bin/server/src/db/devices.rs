//! Repository for device session tokens.

use chrono::{DateTime, Utc};
use jobsta_access::DeviceToken;
use jobsta_core::{DeviceTokenId, UserId};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

/// Row type for device token queries.
#[derive(FromRow)]
struct DeviceTokenRow {
    id: String,
    user_id: String,
    token_hash: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl DeviceTokenRow {
    fn try_into_token(self) -> Result<DeviceToken, sqlx::Error> {
        let id = DeviceTokenId::from_str(&self.id).map_err(|e| decode_error(&self.id, &e))?;
        let user_id = UserId::from_str(&self.user_id).map_err(|e| decode_error(&self.user_id, &e))?;
        Ok(DeviceToken::with_all_fields(
            id,
            user_id,
            self.token_hash,
            self.expires_at,
            self.created_at,
        ))
    }
}

fn decode_error(value: &str, err: &dyn std::fmt::Display) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("invalid id '{value}': {err}"),
    )))
}

/// Repository for device token operations.
pub struct DeviceTokenRepository {
    pool: PgPool,
}

impl DeviceTokenRepository {
    /// Creates a new device token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists a freshly issued device token row.
    pub async fn create(&self, token: &DeviceToken) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO device_tokens (id, user_id, token_hash, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(token.id().to_string())
        .bind(token.user_id().to_string())
        .bind(token.token_hash())
        .bind(token.expires_at())
        .bind(token.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetches all non-expired device tokens, across all users.
    ///
    /// The stored value is a salted hash, not a lookup key, so resolution
    /// has to scan and verify each candidate.
    pub async fn active(&self) -> Result<Vec<DeviceToken>, sqlx::Error> {
        let rows: Vec<DeviceTokenRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, token_hash, expires_at, created_at
            FROM device_tokens
            WHERE expires_at >= NOW()
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(DeviceTokenRow::try_into_token).collect()
    }

    /// Deletes a single device token (logout of one device).
    pub async fn delete(&self, id: DeviceTokenId) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            DELETE FROM device_tokens
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes all device tokens for a user (password change).
    pub async fn delete_all_for_user(&self, user_id: UserId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM device_tokens
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes expired device tokens.
    pub async fn delete_expired(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM device_tokens
            WHERE expires_at < NOW()
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
