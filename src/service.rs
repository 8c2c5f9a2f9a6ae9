use crate::config::Config;
use crate::fetcher::FetchPage;
use crate::orchestrator::DigestOrchestrator;
use crate::signer::TokenSigner;
use crate::store::SubscriptionStore;
use crate::transport::EmailTransport;
use crate::types::{DigestError, Result, RunSummary, UnsubscribeOutcome};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Operations the core exposes to its callers: the authenticated weekly
/// trigger and unsubscribe-by-token. Constructed once at process start with
/// its collaborators injected.
pub struct DigestService {
    orchestrator: DigestOrchestrator,
    store: Arc<dyn SubscriptionStore>,
    signer: TokenSigner,
    cron_secret: String,
}

impl DigestService {
    pub fn new(
        config: &Config,
        store: Arc<dyn SubscriptionStore>,
        fetcher: Arc<dyn FetchPage>,
        transport: Arc<dyn EmailTransport>,
    ) -> Self {
        Self {
            orchestrator: DigestOrchestrator::new(config, store.clone(), fetcher, transport),
            store,
            signer: TokenSigner::new(config.hmac_secret.clone()),
            cron_secret: config.cron_secret.clone(),
        }
    }

    /// Run the weekly digest. The bearer credential is checked before any
    /// work begins; a mismatch has no side effects.
    pub async fn run_weekly(&self, bearer: &str) -> Result<RunSummary> {
        self.authorize_trigger(bearer)?;
        self.orchestrator.run().await
    }

    /// Same as `run_weekly` with an explicit reference date.
    pub async fn run_weekly_for_date(&self, bearer: &str, today: NaiveDate) -> Result<RunSummary> {
        self.authorize_trigger(bearer)?;
        self.orchestrator.run_for_date(today).await
    }

    fn authorize_trigger(&self, bearer: &str) -> Result<()> {
        if bearer != self.cron_secret {
            warn!("Rejecting trigger with invalid credential");
            return Err(DigestError::Auth("invalid trigger credential".to_string()));
        }
        Ok(())
    }

    /// Deactivate a subscription from an unsubscribe link slug of the form
    /// `{id}.{signature}`. The slug must be exactly two dot-separated parts;
    /// the signature is verified before any store access; deactivation is
    /// idempotent, so an already-inactive subscription reports success.
    pub async fn unsubscribe(&self, slug: &str) -> Result<UnsubscribeOutcome> {
        let parts: Vec<&str> = slug.split('.').collect();
        if parts.len() != 2 {
            return Ok(failure("Invalid unsubscribe link format"));
        }
        let (token, signature) = (parts[0], parts[1]);

        if !self.signer.verify(token, signature) {
            warn!("Rejecting unsubscribe request with invalid signature");
            return Ok(failure("Invalid unsubscribe link"));
        }

        let id = match Uuid::parse_str(token) {
            Ok(id) => id,
            Err(_) => return Ok(failure("Subscription not found")),
        };

        let state = match self.store.find_subscription(id).await? {
            Some(state) => state,
            None => return Ok(failure("Subscription not found")),
        };

        if !state.is_active {
            return Ok(success("Already unsubscribed"));
        }

        self.store.deactivate_subscription(id).await?;
        info!("Unsubscribed subscription {}", id);
        Ok(success("Successfully unsubscribed"))
    }
}

fn success(message: &str) -> UnsubscribeOutcome {
    UnsubscribeOutcome {
        success: true,
        message: message.to_string(),
    }
}

fn failure(message: &str) -> UnsubscribeOutcome {
    UnsubscribeOutcome {
        success: false,
        message: message.to_string(),
    }
}
