//! User domain type.
//!
//! Users are created unverified at registration with no password set. The
//! verification flow marks them verified and assigns a temporary password
//! hash; the password-management flows replace it later.

use chrono::{DateTime, Utc};
use jobsta_core::UserId;
use serde::{Deserialize, Serialize};

use crate::role::Role;

/// A registered account on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal platform user ID.
    id: UserId,
    /// Email address; unique across the platform.
    email: String,
    /// Display name supplied at registration.
    name: String,
    /// bcrypt hash of the user's password. Absent until verification or an
    /// explicit password set.
    password_hash: Option<String>,
    /// Access role, fixed at registration.
    role: Role,
    /// Whether the email address has been verified.
    verified: bool,
    /// When the user record was created.
    created_at: DateTime<Utc>,
    /// When the user record was last updated.
    updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new unverified user with no password set.
    #[must_use]
    pub fn new(email: String, name: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email,
            name,
            password_hash: None,
            role,
            verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a user with all fields specified.
    ///
    /// Use this when reconstituting a user from storage.
    #[must_use]
    #[expect(clippy::too_many_arguments)]
    pub fn with_all_fields(
        id: UserId,
        email: String,
        name: String,
        password_hash: Option<String>,
        role: Role,
        verified: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            name,
            password_hash,
            role,
            verified,
            created_at,
            updated_at,
        }
    }

    /// Returns the user's internal platform ID.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the user's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the user's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stored password hash, if one has been set.
    #[must_use]
    pub fn password_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }

    /// Returns true if the user has a password set.
    #[must_use]
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Returns the user's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns true if the user's email has been verified.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Returns when the user was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the user was last updated.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks the user's email as verified.
    pub fn mark_verified(&mut self) {
        self.verified = true;
        self.updated_at = Utc::now();
    }

    /// Replaces the stored password hash.
    pub fn set_password_hash(&mut self, hash: String) {
        self.password_hash = Some(hash);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new("a@msrit.edu".to_string(), "Alice".to_string(), Role::User)
    }

    #[test]
    fn new_user_is_unverified_without_password() {
        let user = test_user();
        assert!(!user.is_verified());
        assert!(!user.has_password());
        assert!(user.password_hash().is_none());
        assert_eq!(user.role(), Role::User);
    }

    #[test]
    fn new_user_has_timestamps() {
        let before = Utc::now();
        let user = test_user();
        let after = Utc::now();

        assert!(user.created_at() >= before);
        assert!(user.created_at() <= after);
        assert_eq!(user.created_at(), user.updated_at());
    }

    #[test]
    fn mark_verified_updates_timestamp() {
        let mut user = test_user();
        let original_updated_at = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(1));
        user.mark_verified();

        assert!(user.is_verified());
        assert!(user.updated_at() > original_updated_at);
    }

    #[test]
    fn set_password_hash_updates_timestamp() {
        let mut user = test_user();
        let original_updated_at = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(1));
        user.set_password_hash("$2b$12$fakehash".to_string());

        assert!(user.has_password());
        assert_eq!(user.password_hash(), Some("$2b$12$fakehash"));
        assert!(user.updated_at() > original_updated_at);
    }

    #[test]
    fn with_all_fields_preserves_values() {
        let id = UserId::new();
        let created = Utc::now() - chrono::Duration::days(30);
        let updated = Utc::now() - chrono::Duration::days(1);

        let user = User::with_all_fields(
            id,
            "b@msrit.edu".to_string(),
            "Bob".to_string(),
            Some("$2b$12$fakehash".to_string()),
            Role::Admin,
            true,
            created,
            updated,
        );

        assert_eq!(user.id(), id);
        assert_eq!(user.email(), "b@msrit.edu");
        assert_eq!(user.name(), "Bob");
        assert!(user.is_verified());
        assert!(user.role().is_admin());
        assert_eq!(user.created_at(), created);
        assert_eq!(user.updated_at(), updated);
    }

    #[test]
    fn user_serialization_roundtrip() {
        let mut user = test_user();
        user.mark_verified();

        let json = serde_json::to_string(&user).expect("serialize");
        let parsed: User = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(user, parsed);
    }
}
