//! Resend client for transactional email delivery

use crate::config::EmailConfig;
use crate::error::{NotifyError, Result};
use base64::{engine::general_purpose, Engine as _};
use log::debug;
use notify_types::EmailMessage;
use serde_json::{json, Value};

/// Email delivery capability. `send` performs a synchronous network call
/// and must run on a thread where blocking is allowed.
pub trait EmailDispatch: Send + Sync {
    /// Whether provider credentials are present
    fn is_configured(&self) -> bool;

    /// Deliver one message, blocking until the provider answers
    fn send(&self, message: &EmailMessage) -> Result<()>;
}

pub struct ResendClient {
    config: EmailConfig,
}

impl ResendClient {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_payload(&self, message: &EmailMessage) -> Value {
        let mut payload = json!({
            "from": message.from,
            "to": [message.to],
            "subject": message.subject,
            "text": message.text,
            "html": message.html,
        });

        // Resend expects base64 content + encoding for binary attachments
        if let Some(attachment) = &message.attachment {
            payload["attachments"] = json!([{
                "filename": attachment.filename,
                "content": general_purpose::STANDARD.encode(&attachment.bytes),
                "encoding": "base64",
            }]);
        }

        payload
    }
}

impl EmailDispatch for ResendClient {
    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn send(&self, message: &EmailMessage) -> Result<()> {
        if !self.is_configured() {
            return Err(NotifyError::Config(
                "Resend credentials are missing; cannot send email".to_string(),
            ));
        }

        // A blocking client must not be constructed on an async runtime
        // thread, so it is built here, per send.
        let http_client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        let url = format!("{}/emails", self.config.base_url.trim_end_matches('/'));
        debug!("Dispatching email to {} via {}", message.to, url);

        let response = http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&self.build_payload(message))
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NotifyError::ServiceUnavailable(format!(
                "Resend returned {}: {}",
                status, error_text
            )));
        }

        Ok(())
    }
}
