//! Authentication module for the Jobsta server.
//!
//! This module provides:
//! - Registration, verification, login, logout, and password routes
//! - Device-token session issuance and resolution
//! - Authentication extractors for Axum routes
//!
//! # Session Model
//!
//! Device sessions hold a high-entropy secret in an HTTP-only cookie; the
//! store keeps only a bcrypt hash. Resolution therefore scans the
//! non-expired rows and verifies the cookie against each stored hash, an
//! O(active-sessions) cost per request that is acceptable at this scale.
//! The incoming cookie is never re-hashed for an equality lookup: bcrypt
//! salts per row, so such a lookup can never match.
//!
//! Admin sessions (see [`crate::admin`]) use the opposite design: the
//! stored value is the capability itself, looked up directly. The two
//! mechanisms are never mixed.

pub mod middleware;
pub mod routes;
pub mod session;

use jobsta_access::PasswordHasher;
use jobsta_mail::Mailer;
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::{AuthConfig, SessionConfig};

pub use middleware::{OptionalUser, RequireAdminRole, RequireUser};
pub use routes::{change_password, login, logout, register, set_password, verify};

/// Shared application state.
pub struct AppState {
    /// Database connection pool.
    pub db_pool: PgPool,
    /// Hashing service for passwords and device secrets.
    pub hasher: PasswordHasher,
    /// Outbound email collaborator.
    pub mailer: Arc<dyn Mailer>,
    /// Session configuration.
    pub session_config: SessionConfig,
    /// Registration gating and operator credentials.
    pub auth_config: AuthConfig,
    /// External base URL for emailed links.
    pub base_url: String,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        db_pool: PgPool,
        hasher: PasswordHasher,
        mailer: Arc<dyn Mailer>,
        session_config: SessionConfig,
        auth_config: AuthConfig,
        base_url: String,
    ) -> Self {
        Self {
            db_pool,
            hasher,
            mailer,
            session_config,
            auth_config,
            base_url,
        }
    }
}
