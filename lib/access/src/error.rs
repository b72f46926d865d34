//! Flow-level error taxonomy for the access subsystem.
//!
//! Lookup misses and expiries share one variant so responses never reveal
//! which condition failed; the same applies to bad credentials. Store
//! failures are mapped into `Internal` at the flow boundary.

use std::fmt;

/// Errors surfaced by the registration, login, verification, and session
/// flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Malformed or disallowed input, e.g. a non-institutional email.
    Validation { message: String },
    /// Token or session lookup missed or was past expiry. Deliberately does
    /// not distinguish the two.
    NotFoundOrExpired,
    /// Duplicate registration for an existing email.
    Conflict,
    /// Bad password or bad Basic credentials. Deliberately generic.
    AuthenticationFailed,
    /// Outbound email could not be delivered. Soft failure: committed rows
    /// stand.
    Delivery { detail: String },
    /// Store or hashing failure mapped at the flow boundary.
    Internal { details: String },
}

impl AccessError {
    /// Returns the user-visible message for this error.
    ///
    /// Messages are deliberately generic for the variants where detail
    /// would leak account existence or token state.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message } => message.clone(),
            Self::NotFoundOrExpired => "Invalid or expired token".to_string(),
            Self::Conflict => "User already exists. Please login.".to_string(),
            Self::AuthenticationFailed => "Invalid email or password".to_string(),
            Self::Delivery { detail } => {
                format!("Account created. Email service error: {detail}")
            }
            Self::Internal { .. } => "Internal server error".to_string(),
        }
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { message } => write!(f, "validation failed: {message}"),
            Self::NotFoundOrExpired => write!(f, "token not found or expired"),
            Self::Conflict => write!(f, "user already exists"),
            Self::AuthenticationFailed => write!(f, "authentication failed"),
            Self::Delivery { detail } => write!(f, "email delivery failed: {detail}"),
            Self::Internal { details } => write!(f, "internal error: {details}"),
        }
    }
}

impl std::error::Error for AccessError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_surfaced() {
        let err = AccessError::Validation {
            message: "Only @msrit.edu emails are allowed".to_string(),
        };
        assert!(err.user_message().contains("@msrit.edu"));
    }

    #[test]
    fn not_found_and_expired_share_one_message() {
        // A single variant covers both conditions, so the surfaced text
        // cannot distinguish them.
        assert_eq!(
            AccessError::NotFoundOrExpired.user_message(),
            "Invalid or expired token"
        );
    }

    #[test]
    fn authentication_failure_is_generic() {
        let err = AccessError::AuthenticationFailed;
        let msg = err.user_message();
        assert!(!msg.contains("verified"));
        assert!(!msg.contains("exists"));
    }

    #[test]
    fn internal_details_never_reach_the_user() {
        let err = AccessError::Internal {
            details: "connection refused to db:5432".to_string(),
        };
        assert!(!err.user_message().contains("5432"));
    }

    #[test]
    fn delivery_failure_mentions_the_account_was_created() {
        let err = AccessError::Delivery {
            detail: "provider timeout".to_string(),
        };
        assert!(err.user_message().contains("Account created"));
    }
}
