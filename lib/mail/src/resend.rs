//! Resend HTTP API mailer.
//!
//! A thin client over `POST /emails`. The request timeout bounds how long a
//! slow provider can stall a flow; a timeout is reported as a failed
//! delivery, not an error.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use crate::{DeliveryReport, MailConfig, Mailer};

const API_URL: &str = "https://api.resend.com/emails";

/// Bound on a single provider call.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Mailer backed by the Resend HTTP API.
pub struct ResendMailer {
    http: reqwest::Client,
    config: MailConfig,
}

impl ResendMailer {
    /// Creates a client for the given configuration.
    #[must_use]
    pub fn new(config: MailConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { http, config }
    }

    /// Builds the provider request payload.
    fn payload(&self, to: &str, subject: &str, body: &str, html: Option<&str>) -> serde_json::Value {
        let mut payload = json!({
            "from": self.config.sender(),
            "to": [to],
            "subject": subject,
            "text": body,
        });
        if let Some(html) = html {
            payload["html"] = json!(html);
        }
        payload
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        html: Option<&str>,
    ) -> DeliveryReport {
        if self.config.suppress_send {
            tracing::info!(to, subject, "mail suppressed");
            return DeliveryReport::delivered();
        }

        let Some(api_key) = self.config.api_key.as_deref() else {
            tracing::error!(to, subject, "mail not sent: no API key configured");
            return DeliveryReport::failed("no API key configured");
        };

        let payload = self.payload(to, subject, body, html);
        let response = self
            .http
            .post(API_URL)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(to, subject, "mail sent");
                DeliveryReport::delivered()
            }
            Ok(resp) => {
                let status = resp.status();
                let detail = resp
                    .text()
                    .await
                    .unwrap_or_else(|_| "unreadable provider response".to_string());
                tracing::error!(to, subject, %status, detail, "mail provider rejected message");
                DeliveryReport::failed(format!("provider returned {status}"))
            }
            Err(e) => {
                // Timeouts and connection failures land here.
                tracing::error!(to, subject, error = %e, "mail send failed");
                DeliveryReport::failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> MailConfig {
        MailConfig {
            api_key: Some("re_test_key".to_string()),
            sender_address: "noreply@jobsta.example".to_string(),
            sender_name: "Jobsta".to_string(),
            suppress_send: false,
        }
    }

    #[test]
    fn payload_includes_sender_and_recipient() {
        let mailer = ResendMailer::new(test_config());
        let payload = mailer.payload("a@msrit.edu", "Hello", "body text", None);

        assert_eq!(payload["from"], "Jobsta <noreply@jobsta.example>");
        assert_eq!(payload["to"][0], "a@msrit.edu");
        assert_eq!(payload["subject"], "Hello");
        assert_eq!(payload["text"], "body text");
        assert!(payload.get("html").is_none());
    }

    #[test]
    fn payload_carries_optional_html() {
        let mailer = ResendMailer::new(test_config());
        let payload = mailer.payload("a@msrit.edu", "Hello", "body", Some("<p>body</p>"));
        assert_eq!(payload["html"], "<p>body</p>");
    }

    #[tokio::test]
    async fn suppressed_send_reports_delivered_without_network() {
        let mut config = test_config();
        config.suppress_send = true;
        let mailer = ResendMailer::new(config);

        let report = mailer.send("a@msrit.edu", "Hello", "body", None).await;
        assert!(report.delivered);
    }

    #[tokio::test]
    async fn missing_api_key_reports_failure() {
        let mut config = test_config();
        config.api_key = None;
        let mailer = ResendMailer::new(config);

        let report = mailer.send("a@msrit.edu", "Hello", "body", None).await;
        assert!(!report.delivered);
        assert!(report.detail.expect("detail").contains("API key"));
    }
}
