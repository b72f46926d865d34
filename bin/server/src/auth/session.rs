//! Device-token session issuance and resolution.

use axum_extra::extract::cookie::{Cookie, SameSite};
use jobsta_access::{DeviceToken, PasswordHasher, User, device::device_token_ttl};
use jobsta_core::UserId;
use sqlx::PgPool;
use time::Duration as TimeDuration;

use crate::db::{DeviceTokenRepository, UserRepository};

/// Device session cookie name.
pub const DEVICE_COOKIE: &str = "device_token";

/// Issues a device session for `user_id` and returns the one-time secret.
///
/// The row is committed before the secret is handed back, so the cookie the
/// caller sets always refers to a durable session.
pub async fn issue_session(
    pool: &PgPool,
    hasher: &PasswordHasher,
    user_id: UserId,
) -> Result<String, SessionIssueError> {
    let issued = DeviceToken::issue(user_id, hasher)
        .map_err(|e| SessionIssueError::Hash(e.to_string()))?;

    DeviceTokenRepository::new(pool.clone())
        .create(&issued.record)
        .await
        .map_err(SessionIssueError::Database)?;

    Ok(issued.secret)
}

/// Resolves a bearer cookie value to its user.
///
/// Scans the non-expired device tokens and verifies the cookie against each
/// stored hash; the first match wins. No match resolves to anonymous.
pub async fn resolve_session(
    pool: &PgPool,
    hasher: &PasswordHasher,
    secret: &str,
) -> Result<Option<User>, sqlx::Error> {
    let Some(device) = find_matching_device(pool, hasher, secret).await? else {
        return Ok(None);
    };

    UserRepository::new(pool.clone())
        .find_by_id(device.user_id())
        .await
}

/// Locates the device-token row matching a cookie value, if any.
///
/// Also used by logout, which deletes the row only when it can be located.
pub async fn find_matching_device(
    pool: &PgPool,
    hasher: &PasswordHasher,
    secret: &str,
) -> Result<Option<DeviceToken>, sqlx::Error> {
    let candidates = DeviceTokenRepository::new(pool.clone()).active().await?;
    Ok(candidates
        .into_iter()
        .find(|device| device.matches(hasher, secret)))
}

/// Builds the device session cookie carrying the one-time secret.
#[must_use]
pub fn device_cookie(secret: String, secure: bool) -> Cookie<'static> {
    let max_age = TimeDuration::seconds(device_token_ttl().num_seconds());
    Cookie::build((DEVICE_COOKIE, secret))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

/// Builds an expired cookie that clears the device session.
#[must_use]
pub fn clear_device_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((DEVICE_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::ZERO)
        .build()
}

/// Error issuing a device session.
#[derive(Debug)]
pub enum SessionIssueError {
    /// Hashing the generated secret failed.
    Hash(String),
    /// Persisting the session row failed.
    Database(sqlx::Error),
}

impl std::fmt::Display for SessionIssueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hash(reason) => write!(f, "failed to hash device secret: {reason}"),
            Self::Database(e) => write!(f, "failed to persist device session: {e}"),
        }
    }
}

impl std::error::Error for SessionIssueError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_cookie_is_http_only_lax_with_week_max_age() {
        let cookie = device_cookie("secret-value".to_string(), true);
        assert_eq!(cookie.name(), DEVICE_COOKIE);
        assert_eq!(cookie.value(), "secret-value");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(TimeDuration::days(7)));
    }

    #[test]
    fn device_cookie_secure_flag_follows_config() {
        let cookie = device_cookie("secret-value".to_string(), false);
        assert_eq!(cookie.secure(), Some(false));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_device_cookie(true);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(TimeDuration::ZERO));
    }
}
