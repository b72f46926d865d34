//! Repository for single-use login (verification / magic-link) tokens.

use chrono::{DateTime, Utc};
use jobsta_access::LoginToken;
use sqlx::{FromRow, PgPool};

/// Row type for login token queries.
#[derive(FromRow)]
struct LoginTokenRow {
    token: String,
    email: String,
    expires_at: DateTime<Utc>,
    used: bool,
}

impl LoginTokenRow {
    fn into_token(self) -> LoginToken {
        LoginToken::with_all_fields(self.token, self.email, self.expires_at, self.used)
    }
}

/// Repository for login token operations.
pub struct LoginTokenRepository {
    pool: PgPool,
}

impl LoginTokenRepository {
    /// Creates a new login token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists a freshly issued token.
    pub async fn create(&self, token: &LoginToken) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO login_tokens (token, email, expires_at, used)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(token.token())
        .bind(token.email())
        .bind(token.expires_at())
        .bind(token.is_used())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Finds an unused token by value.
    ///
    /// Expiry is checked by the caller so that a miss and an expired token
    /// surface identically.
    pub async fn find_unused(&self, token: &str) -> Result<Option<LoginToken>, sqlx::Error> {
        let row: Option<LoginTokenRow> = sqlx::query_as(
            r#"
            SELECT token, email, expires_at, used
            FROM login_tokens
            WHERE token = $1 AND used = FALSE
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(LoginTokenRow::into_token))
    }

    /// Marks a token as redeemed.
    pub async fn mark_used(&self, token: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE login_tokens
            SET used = TRUE
            WHERE token = $1
            "#,
        )
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes expired tokens. Used rows are kept until they expire.
    pub async fn delete_expired(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM login_tokens
            WHERE expires_at < NOW()
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
