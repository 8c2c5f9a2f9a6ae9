use crate::types::{DigestError, EmailMessage, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

/// External email transport. One call delivers one batch of discrete
/// messages and reports success or a structured error for the whole call.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send_batch(&self, messages: &[EmailMessage]) -> Result<()>;
}

/// Resend-style HTTP batch client: POSTs the whole batch as a JSON array to
/// a single endpoint with bearer authentication.
pub struct ResendTransport {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl ResendTransport {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, "https://api.resend.com/emails/batch")
    }

    /// Point the client at a different endpoint, e.g. a local test server.
    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl EmailTransport for ResendTransport {
    async fn send_batch(&self, messages: &[EmailMessage]) -> Result<()> {
        debug!("Submitting batch of {} messages", messages.len());

        let payload: Vec<Value> = messages
            .iter()
            .map(|message| {
                let headers: serde_json::Map<String, Value> = message
                    .headers
                    .iter()
                    .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                    .collect();

                json!({
                    "from": message.from,
                    "to": [message.to],
                    "subject": message.subject,
                    "html": message.html,
                    "text": message.text,
                    "reply_to": message.reply_to,
                    "headers": headers,
                })
            })
            .collect();

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DigestError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|value| {
                    value
                        .get("message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or(body);
            return Err(DigestError::Transport(format!("HTTP {}: {}", status, reason)));
        }

        info!("Batch of {} messages accepted by transport", messages.len());
        Ok(())
    }
}

/// Transport that logs every message and sends nothing. Used by the binary's
/// dry-run mode.
pub struct DryRunTransport;

#[async_trait]
impl EmailTransport for DryRunTransport {
    async fn send_batch(&self, messages: &[EmailMessage]) -> Result<()> {
        for message in messages {
            info!("[dry run] would send to {}: {}", message.to, message.subject);
        }
        Ok(())
    }
}
