use bmx_common::Secret;
use log::*;
use thiserror::Error;

use crate::config::MailConfig;

/// A fully rendered notification message, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Could not reach the mail endpoint: {0}")]
    TransportError(String),
    #[error("The mail endpoint rejected the message: {0}")]
    EndpointError(String),
}

/// The outbound mail transport. Mail delivery is an external collaborator; all the server knows
/// is the `send(address, subject, text, html)` contract, and every call is best-effort.
#[derive(Clone)]
pub enum MailTransport {
    /// POSTs each message as JSON to an HTTP mail API.
    Http(HttpMailer),
    /// Writes each message to the log. Used when no endpoint is configured.
    Log,
}

impl MailTransport {
    pub fn from_config(config: &MailConfig) -> Self {
        match &config.endpoint {
            Some(endpoint) => {
                Self::Http(HttpMailer::new(endpoint.clone(), config.sender.clone(), config.api_key.clone()))
            },
            None => Self::Log,
        }
    }

    pub async fn send(&self, message: MailMessage) -> Result<(), MailerError> {
        match self {
            Self::Http(mailer) => mailer.send(message).await,
            Self::Log => {
                info!("📧️ [log-only] To: {}. Subject: {}", message.to, message.subject);
                Ok(())
            },
        }
    }
}

#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    sender: String,
    api_key: Secret<String>,
}

impl HttpMailer {
    pub fn new(endpoint: String, sender: String, api_key: Secret<String>) -> Self {
        Self { client: reqwest::Client::new(), endpoint, sender, api_key }
    }

    pub async fn send(&self, message: MailMessage) -> Result<(), MailerError> {
        let payload = serde_json::json!({
            "from": self.sender,
            "to": message.to,
            "subject": message.subject,
            "text": message.text,
            "html": message.html,
        });
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.reveal())
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailerError::TransportError(e.to_string()))?;
        if !response.status().is_success() {
            return Err(MailerError::EndpointError(response.status().to_string()));
        }
        debug!("📧️ Mail to {} handed to the endpoint", message.to);
        Ok(())
    }
}
