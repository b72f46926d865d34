//! Centralized server configuration.
//!
//! Strongly-typed configuration loaded via the `config` crate from
//! environment variables. Constructed once in `main` and carried through
//! [`AppState`](crate::auth::AppState); flows never reach for ambient
//! globals.

use jobsta_mail::MailConfig;
use serde::Deserialize;

/// Server configuration composed from section configs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// PostgreSQL database connection URL.
    pub database_url: String,

    /// Address the HTTP listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// External base URL used when building emailed links.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,

    /// Registration and admin-credential configuration.
    pub auth: AuthConfig,

    /// Outbound mail configuration.
    #[serde(default)]
    pub mail: MailConfig,
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Whether to set the Secure flag on cookies (requires HTTPS).
    /// Defaults to true for production safety; set to false for local HTTP
    /// development.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,

    /// Interval between expired-token cleanup runs, in seconds.
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_secure_cookies() -> bool {
    true
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secure_cookies: default_secure_cookies(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
        }
    }
}

/// Registration gating and operator credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Email domain suffix registration is restricted to.
    #[serde(default = "default_allowed_email_domain")]
    pub allowed_email_domain: String,

    /// The one reserved address auto-escalated to the admin role.
    #[serde(default = "default_bootstrap_admin_email")]
    pub bootstrap_admin_email: String,

    /// Operator username for the admin Basic-auth exchange.
    pub admin_username: String,

    /// Operator password for the admin Basic-auth exchange.
    pub admin_password: String,
}

fn default_allowed_email_domain() -> String {
    "@msrit.edu".to_string()
}

fn default_bootstrap_admin_email() -> String {
    "admin@msrit.edu".to_string()
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_config_has_correct_defaults() {
        let config = SessionConfig::default();
        assert!(config.secure_cookies);
        assert_eq!(config.cleanup_interval_seconds, 300);
    }

    #[test]
    fn auth_defaults_gate_on_institutional_domain() {
        assert_eq!(default_allowed_email_domain(), "@msrit.edu");
        assert_eq!(default_bootstrap_admin_email(), "admin@msrit.edu");
    }
}
