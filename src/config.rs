use crate::types::{DigestError, Result};
use std::env;

/// Process-wide configuration, loaded once at startup and passed by reference
/// into the service. Never read lazily from the environment afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secret for signing unsubscribe tokens.
    pub hmac_secret: String,
    /// Bearer credential the scheduler trigger must present.
    pub cron_secret: String,
    /// API key for the live email transport. Optional so dry runs work
    /// without transport credentials.
    pub resend_api_key: Option<String>,
    /// Domain used when composing unsubscribe links.
    pub domain: String,
    /// Sender address for outgoing digests.
    pub email_from: String,
    pub email_reply_to: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let domain = env::var("DOMAIN").unwrap_or_else(|_| "hardstyleevents.com".to_string());
        let email_from =
            env::var("EMAIL_FROM").unwrap_or_else(|_| format!("notifications@{}", domain));

        Ok(Self {
            hmac_secret: required("HMAC_SECRET")?,
            cron_secret: required("CRON_SECRET")?,
            resend_api_key: env::var("RESEND_API_KEY").ok(),
            domain,
            email_from,
            email_reply_to: env::var("EMAIL_REPLY_TO").ok(),
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| DigestError::Config(format!("{} environment variable is not set", name)))
}
