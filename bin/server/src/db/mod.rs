//! Database repositories for the credential store.
//!
//! This module provides data access for:
//! - User accounts
//! - Single-use login (verification / magic-link) tokens
//! - Device session tokens
//! - Admin session tokens

pub mod admin_tokens;
pub mod devices;
pub mod tokens;
pub mod users;

pub use admin_tokens::AdminTokenRepository;
pub use devices::DeviceTokenRepository;
pub use tokens::LoginTokenRepository;
pub use users::UserRepository;

/// Returns true if the error is a uniqueness-constraint violation.
///
/// Concurrent registrations race on the users email constraint; the loser
/// must see a conflict, not a crash.
#[must_use]
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
