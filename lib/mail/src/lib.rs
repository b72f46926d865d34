//! Outbound email collaborator for the Jobsta platform.
//!
//! Email delivery is an external concern behind the [`Mailer`] trait:
//! `send(to, subject, body, html?)` yields a [`DeliveryReport`] and never
//! errors past its boundary. Provider failures, timeouts, and non-success
//! responses all collapse into a failed report with a detail string.
//!
//! Two implementations exist:
//! - [`ResendMailer`]: the Resend HTTP API with a bounded request timeout.
//! - [`LogMailer`]: log-only, always reports delivered. Used when delivery
//!   is suppressed or no API key is configured.

pub mod messages;
pub mod resend;

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

pub use messages::EmailMessage;
pub use resend::ResendMailer;

/// Outcome of a delivery attempt.
///
/// The boolean-plus-detail shape is deliberate: callers treat delivery
/// failure as a soft warning, never as a flow error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Whether the provider accepted the message.
    pub delivered: bool,
    /// Provider error detail when delivery failed.
    pub detail: Option<String>,
}

impl DeliveryReport {
    /// A successful delivery.
    #[must_use]
    pub fn delivered() -> Self {
        Self {
            delivered: true,
            detail: None,
        }
    }

    /// A failed delivery with a provider detail string.
    #[must_use]
    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            delivered: false,
            detail: Some(detail.into()),
        }
    }
}

/// External email sender contract.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends a message. Must not panic or error past this boundary.
    async fn send(&self, to: &str, subject: &str, body: &str, html: Option<&str>)
    -> DeliveryReport;
}

/// Mail configuration, environment-sourced by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Resend API key. When absent, mail falls back to log-only delivery.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sender address.
    #[serde(default = "default_sender_address")]
    pub sender_address: String,

    /// Human-readable sender name.
    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    /// When set, messages are logged instead of sent and delivery reports
    /// success.
    #[serde(default)]
    pub suppress_send: bool,
}

fn default_sender_address() -> String {
    "onboarding@resend.dev".to_string()
}

fn default_sender_name() -> String {
    "Jobsta".to_string()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            sender_address: default_sender_address(),
            sender_name: default_sender_name(),
            suppress_send: false,
        }
    }
}

impl MailConfig {
    /// Returns the RFC 5322 `From` value.
    #[must_use]
    pub fn sender(&self) -> String {
        format!("{} <{}>", self.sender_name, self.sender_address)
    }

    /// Builds the mailer this configuration describes.
    ///
    /// With an API key and delivery not suppressed this is the Resend
    /// client; otherwise the log-only mailer.
    #[must_use]
    pub fn build(&self) -> Arc<dyn Mailer> {
        if self.suppress_send || self.api_key.is_none() {
            Arc::new(LogMailer)
        } else {
            Arc::new(ResendMailer::new(self.clone()))
        }
    }
}

/// Log-only mailer. Reports every message as delivered.
#[derive(Debug, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        _html: Option<&str>,
    ) -> DeliveryReport {
        tracing::info!(to, subject, "mail suppressed");
        tracing::debug!(body, "mail suppressed body");
        DeliveryReport::delivered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_combines_name_and_address() {
        let config = MailConfig::default();
        assert_eq!(config.sender(), "Jobsta <onboarding@resend.dev>");
    }

    #[test]
    fn delivery_report_constructors() {
        assert!(DeliveryReport::delivered().delivered);
        let failed = DeliveryReport::failed("timeout");
        assert!(!failed.delivered);
        assert_eq!(failed.detail.as_deref(), Some("timeout"));
    }

    #[tokio::test]
    async fn log_mailer_always_reports_delivered() {
        let report = LogMailer
            .send("a@msrit.edu", "Hello", "body", None)
            .await;
        assert!(report.delivered);
        assert!(report.detail.is_none());
    }
}
