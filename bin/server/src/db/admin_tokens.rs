//! Repository for admin session tokens.
//!
//! Admin tokens are stored as the capability value itself, so lookup is a
//! direct primary-key match rather than the device-token scan.

use chrono::{DateTime, Utc};
use jobsta_access::AdminToken;
use sqlx::{FromRow, PgPool};

/// Row type for admin token queries.
#[derive(FromRow)]
struct AdminTokenRow {
    token: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl AdminTokenRow {
    fn into_token(self) -> AdminToken {
        AdminToken::with_all_fields(self.token, self.created_at, self.expires_at)
    }
}

/// Repository for admin token operations.
pub struct AdminTokenRepository {
    pool: PgPool,
}

impl AdminTokenRepository {
    /// Creates a new admin token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists a freshly issued admin token.
    pub async fn create(&self, token: &AdminToken) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO admin_tokens (token, created_at, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(token.token())
        .bind(token.created_at())
        .bind(token.expires_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Finds an admin token by its exact cookie value.
    pub async fn find(&self, token: &str) -> Result<Option<AdminToken>, sqlx::Error> {
        let row: Option<AdminTokenRow> = sqlx::query_as(
            r#"
            SELECT token, created_at, expires_at
            FROM admin_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AdminTokenRow::into_token))
    }

    /// Deletes an admin token (logout).
    pub async fn delete(&self, token: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            DELETE FROM admin_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes expired admin tokens.
    pub async fn delete_expired(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM admin_tokens
            WHERE expires_at < NOW()
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
