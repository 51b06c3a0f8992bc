//! Delivery of rendered emails through the Resend HTTP API.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A fully rendered message ready to hand to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("Missing Resend API key")]
    MissingApiKey,

    #[error("Failed to reach email provider: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Invalid response from email provider: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Sends one email and returns whatever the provider answered with.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send(&self, email: OutgoingEmail) -> Result<Value, MailerError>;
}

#[derive(Deserialize)]
struct ResendErrorBody {
    message: Option<String>,
}

#[derive(Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ResendMailer {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    fn emails_url(&self) -> String {
        format!("{}/emails", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<Value, MailerError> {
        let api_key = self.api_key.as_deref().ok_or(MailerError::MissingApiKey)?;

        tracing::debug!("Posting email for '{}' to {}", email.to, self.emails_url());

        let response = self
            .client
            .post(self.emails_url())
            .bearer_auth(api_key)
            .json(&email)
            .send()
            .await
            .map_err(MailerError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ResendErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| status.to_string());
            return Err(MailerError::Rejected { status, message });
        }

        response.json::<Value>().await.map_err(MailerError::Decode)
    }
}
