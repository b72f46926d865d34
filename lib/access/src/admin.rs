//! Short-lived admin session tokens.
//!
//! Admin tokens take the capability-token design: the 48-byte random value
//! is itself unguessable, so it is stored as-is and looked up directly by
//! value. There is a single shared admin identity; holding a valid token
//! grants full admin rights until the thirty-minute expiry.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::secret;

/// Entropy of the admin token, in bytes before encoding.
const TOKEN_BYTES: usize = 48;

/// Admin tokens expire thirty minutes after issuance.
#[must_use]
pub fn admin_token_ttl() -> Duration {
    Duration::minutes(30)
}

/// A server-side admin session, keyed by the cookie value itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminToken {
    /// The opaque cookie value, used directly as the lookup key.
    token: String,
    /// When the session was issued.
    created_at: DateTime<Utc>,
    /// When the session stops being honored.
    expires_at: DateTime<Utc>,
}

impl AdminToken {
    /// Issues a fresh admin token with the standard thirty-minute expiry.
    #[must_use]
    pub fn issue() -> Self {
        let now = Utc::now();
        Self {
            token: secret::url_safe_secret(TOKEN_BYTES),
            created_at: now,
            expires_at: now + admin_token_ttl(),
        }
    }

    /// Reconstitutes an admin token from storage.
    #[must_use]
    pub fn with_all_fields(
        token: String,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token,
            created_at,
            expires_at,
        }
    }

    /// Returns the token value.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns when the session was issued.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the session expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the token is still honored.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.expires_at >= Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_is_valid() {
        let token = AdminToken::issue();
        assert!(token.is_valid());
    }

    #[test]
    fn issued_token_expires_in_thirty_minutes() {
        let before = Utc::now();
        let token = AdminToken::issue();
        let after = Utc::now();

        assert!(token.expires_at() >= before + admin_token_ttl());
        assert!(token.expires_at() <= after + admin_token_ttl());
    }

    #[test]
    fn token_values_are_unique_and_high_entropy() {
        let a = AdminToken::issue();
        let b = AdminToken::issue();
        assert_ne!(a.token(), b.token());
        assert!(a.token().len() >= 64);
    }

    #[test]
    fn expired_token_is_invalid() {
        let token = AdminToken::with_all_fields(
            "tok".to_string(),
            Utc::now() - Duration::hours(1),
            Utc::now() - Duration::minutes(1),
        );
        assert!(!token.is_valid());
    }
}
