//! Role types for access control.
//!
//! The platform has exactly two roles. All authorization checks go through
//! the single `is_admin` predicate rather than ad-hoc string comparisons.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access role assigned to a user at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Standard user with access to their own data.
    User,
    /// Administrator with access to the admin surface.
    Admin,
}

impl Role {
    /// Returns true if this role has admin privileges.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns the canonical storage form of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a role from its storage form fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError {
    /// The value that failed to parse.
    pub value: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.value)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(ParseRoleError {
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_is_admin() {
        assert!(!Role::User.is_admin());
        assert!(Role::Admin.is_admin());
    }

    #[test]
    fn role_default_is_user() {
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn role_storage_roundtrip() {
        for role in [Role::User, Role::Admin] {
            let parsed: Role = role.as_str().parse().expect("should parse");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn role_parse_unknown() {
        let err = "superuser".parse::<Role>().unwrap_err();
        assert_eq!(err.value, "superuser");
    }

    #[test]
    fn role_serialization_format() {
        assert_eq!(serde_json::to_string(&Role::Admin).expect("serialize"), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::User).expect("serialize"), "\"user\"");
    }
}
