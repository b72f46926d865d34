//! Single-use verification / magic-link tokens.
//!
//! A `LoginToken` is issued at registration and by the password-less login
//! path. It is a URL capability: whoever presents it before expiry is
//! authenticated as the owning email address, exactly once.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::secret;

/// Entropy of the token value, in bytes before encoding.
const TOKEN_BYTES: usize = 32;

/// Tokens expire one hour after issuance.
#[must_use]
pub fn token_ttl() -> Duration {
    Duration::hours(1)
}

/// A single-use, time-limited login capability tied to an email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginToken {
    /// The unguessable token value embedded in the emailed link.
    token: String,
    /// Email address the token authenticates.
    email: String,
    /// When the token stops being redeemable.
    expires_at: DateTime<Utc>,
    /// Set on first redemption; a used token is permanently dead even if
    /// unexpired.
    used: bool,
}

impl LoginToken {
    /// Issues a fresh token for `email` with the standard one-hour expiry.
    #[must_use]
    pub fn issue(email: String) -> Self {
        Self {
            token: secret::url_safe_secret(TOKEN_BYTES),
            email,
            expires_at: Utc::now() + token_ttl(),
            used: false,
        }
    }

    /// Reconstitutes a token from storage.
    #[must_use]
    pub fn with_all_fields(
        token: String,
        email: String,
        expires_at: DateTime<Utc>,
        used: bool,
    ) -> Self {
        Self {
            token,
            email,
            expires_at,
            used,
        }
    }

    /// Returns the token value.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the email address the token authenticates.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns when the token expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the token has been redeemed.
    #[must_use]
    pub fn is_used(&self) -> bool {
        self.used
    }

    /// Returns true if the token is past its expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    /// Returns true if the token can still be redeemed.
    #[must_use]
    pub fn is_redeemable(&self) -> bool {
        !self.used && !self.is_expired()
    }

    /// Marks the token as redeemed.
    pub fn mark_used(&mut self) {
        self.used = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_is_redeemable() {
        let token = LoginToken::issue("a@msrit.edu".to_string());
        assert!(token.is_redeemable());
        assert!(!token.is_used());
        assert!(!token.is_expired());
        assert_eq!(token.email(), "a@msrit.edu");
    }

    #[test]
    fn issued_token_expires_in_one_hour() {
        let before = Utc::now();
        let token = LoginToken::issue("a@msrit.edu".to_string());
        let after = Utc::now();

        assert!(token.expires_at() >= before + token_ttl());
        assert!(token.expires_at() <= after + token_ttl());
    }

    #[test]
    fn token_values_are_unique_and_urlsafe() {
        let a = LoginToken::issue("a@msrit.edu".to_string());
        let b = LoginToken::issue("a@msrit.edu".to_string());
        assert_ne!(a.token(), b.token());
        assert!(a.token().len() >= 43);
        assert!(a.token().chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn used_token_is_not_redeemable() {
        let mut token = LoginToken::issue("a@msrit.edu".to_string());
        token.mark_used();
        assert!(!token.is_redeemable());
        // Used is terminal regardless of expiry.
        assert!(!token.is_expired());
    }

    #[test]
    fn expired_token_is_not_redeemable() {
        let token = LoginToken::with_all_fields(
            "tok".to_string(),
            "a@msrit.edu".to_string(),
            Utc::now() - Duration::minutes(1),
            false,
        );
        assert!(token.is_expired());
        assert!(!token.is_redeemable());
    }
}
