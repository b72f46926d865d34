//! Repository for user accounts.

use chrono::{DateTime, Utc};
use jobsta_access::{LoginToken, Role, User};
use jobsta_core::UserId;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

/// Row type for user queries.
#[derive(FromRow)]
struct UserRow {
    id: String,
    email: String,
    name: String,
    password_hash: Option<String>,
    role: String,
    verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn try_into_user(self) -> Result<User, sqlx::Error> {
        let id = UserId::from_str(&self.id).map_err(|e| decode_error("user id", &self.id, &e))?;
        let role = Role::from_str(&self.role).map_err(|e| decode_error("role", &self.role, &e))?;
        Ok(User::with_all_fields(
            id,
            self.email,
            self.name,
            self.password_hash,
            role,
            self.verified,
            self.created_at,
            self.updated_at,
        ))
    }
}

fn decode_error(what: &str, value: &str, err: &dyn std::fmt::Display) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("invalid {what} '{value}': {err}"),
    )))
}

/// Repository for user operations.
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds a user by email address.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, name, password_hash, role, verified, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_into_user()?)),
            None => Ok(None),
        }
    }

    /// Finds a user by their internal ID.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, name, password_hash, role, verified, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_into_user()?)),
            None => Ok(None),
        }
    }

    /// Creates a new user together with their verification token.
    ///
    /// Both rows commit as a unit: a crash between the inserts never leaves
    /// a registered user without a redeemable token.
    pub async fn create_with_login_token(
        &self,
        user: &User,
        token: &LoginToken,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, password_hash, role, verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id().to_string())
        .bind(user.email())
        .bind(user.name())
        .bind(user.password_hash())
        .bind(user.role().as_str())
        .bind(user.is_verified())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&mut *tx)
        .await?;

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
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    /// Updates a user's mutable fields (password hash, verified flag).
    pub async fn update(&self, user: &User) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, verified = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(user.id().to_string())
        .bind(user.password_hash())
        .bind(user.is_verified())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
