//! Long-lived device session tokens.
//!
//! A device token is issued on successful login or verification. The
//! browser holds a high-entropy secret in a cookie; the store keeps only a
//! bcrypt hash of it, so the plaintext exists exactly once, in transit and
//! in the client's cookie jar. Multiple device tokens per user may be live
//! concurrently (one per device).

use chrono::{DateTime, Duration, Utc};
use jobsta_core::{DeviceTokenId, UserId};
use serde::{Deserialize, Serialize};

use crate::password::{HashError, PasswordHasher};
use crate::secret;

/// Entropy of the device secret, in bytes before encoding.
const SECRET_BYTES: usize = 64;

/// Device tokens expire seven days after issuance.
#[must_use]
pub fn device_token_ttl() -> Duration {
    Duration::days(7)
}

/// A persisted device session row. Holds only the hash of the secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceToken {
    /// Row identifier.
    id: DeviceTokenId,
    /// The user this session belongs to.
    user_id: UserId,
    /// bcrypt hash of the cookie secret.
    token_hash: String,
    /// When the session stops resolving.
    expires_at: DateTime<Utc>,
    /// When the session was issued.
    created_at: DateTime<Utc>,
}

/// A freshly issued device token together with its one-time plaintext
/// secret. The secret goes into the cookie and is then dropped.
#[derive(Debug)]
pub struct IssuedDeviceToken {
    /// The row to persist.
    pub record: DeviceToken,
    /// The plaintext cookie value. Never persisted.
    pub secret: String,
}

impl DeviceToken {
    /// Issues a new device token for `user_id`.
    ///
    /// Generates the secret, hashes it, and stamps the seven-day expiry.
    pub fn issue(user_id: UserId, hasher: &PasswordHasher) -> Result<IssuedDeviceToken, HashError> {
        let secret = secret::url_safe_secret(SECRET_BYTES);
        let token_hash = hasher.hash(&secret)?;
        let now = Utc::now();
        Ok(IssuedDeviceToken {
            record: Self {
                id: DeviceTokenId::new(),
                user_id,
                token_hash,
                expires_at: now + device_token_ttl(),
                created_at: now,
            },
            secret,
        })
    }

    /// Reconstitutes a device token from storage.
    #[must_use]
    pub fn with_all_fields(
        id: DeviceTokenId,
        user_id: UserId,
        token_hash: String,
        expires_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            token_hash,
            expires_at,
            created_at,
        }
    }

    /// Returns the row identifier.
    #[must_use]
    pub fn id(&self) -> DeviceTokenId {
        self.id
    }

    /// Returns the owning user's ID.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the stored hash of the cookie secret.
    #[must_use]
    pub fn token_hash(&self) -> &str {
        &self.token_hash
    }

    /// Returns when the session expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns when the session was issued.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns true if the session is past its expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    /// Returns true iff `candidate` is this session's cookie secret.
    #[must_use]
    pub fn matches(&self, hasher: &PasswordHasher, candidate: &str) -> bool {
        hasher.verify(&self.token_hash, candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_cost(4)
    }

    #[test]
    fn issue_never_stores_plaintext() {
        let issued = DeviceToken::issue(UserId::new(), &fast_hasher()).expect("issue");
        assert_ne!(issued.record.token_hash(), issued.secret);
    }

    #[test]
    fn issued_secret_verifies_against_stored_hash() {
        let hasher = fast_hasher();
        let issued = DeviceToken::issue(UserId::new(), &hasher).expect("issue");
        assert!(issued.record.matches(&hasher, &issued.secret));
    }

    #[test]
    fn wrong_secret_does_not_match() {
        let hasher = fast_hasher();
        let issued = DeviceToken::issue(UserId::new(), &hasher).expect("issue");
        let other = DeviceToken::issue(UserId::new(), &hasher).expect("issue");
        assert!(!issued.record.matches(&hasher, &other.secret));
    }

    #[test]
    fn issued_token_expires_in_seven_days() {
        let before = Utc::now();
        let issued = DeviceToken::issue(UserId::new(), &fast_hasher()).expect("issue");
        let after = Utc::now();

        assert!(issued.record.expires_at() >= before + device_token_ttl());
        assert!(issued.record.expires_at() <= after + device_token_ttl());
        assert!(!issued.record.is_expired());
    }

    #[test]
    fn secret_is_high_entropy_urlsafe() {
        let issued = DeviceToken::issue(UserId::new(), &fast_hasher()).expect("issue");
        assert!(issued.secret.len() >= 86);
        assert!(
            issued
                .secret
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn expired_token_reports_expired() {
        let token = DeviceToken::with_all_fields(
            DeviceTokenId::new(),
            UserId::new(),
            "$2b$04$fakehash".to_string(),
            Utc::now() - Duration::minutes(1),
            Utc::now() - Duration::days(8),
        );
        assert!(token.is_expired());
    }
}
