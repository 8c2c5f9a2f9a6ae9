use crate::config::Config;
use crate::dispatcher::BatchDispatcher;
use crate::extractor::EventExtractor;
use crate::fetcher::FetchPage;
use crate::grouper::group_subscriptions;
use crate::renderer::DigestRenderer;
use crate::signer::TokenSigner;
use crate::store::SubscriptionStore;
use crate::transport::EmailTransport;
use crate::types::{EmailMessage, Event, Result, RunSummary, Subscription};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{error, info};

/// Drives one full weekly run: load active subscriptions, group them by
/// location and category, and per group extract events, render one
/// personalized email per subscription, and dispatch in batches. Per-group
/// and per-batch failures land in the run summary; only a store failure on
/// the initial listing aborts the run.
pub struct DigestOrchestrator {
    store: Arc<dyn SubscriptionStore>,
    extractor: EventExtractor,
    dispatcher: BatchDispatcher,
    renderer: DigestRenderer,
    signer: TokenSigner,
    domain: String,
    email_from: String,
    email_reply_to: Option<String>,
}

impl DigestOrchestrator {
    pub fn new(
        config: &Config,
        store: Arc<dyn SubscriptionStore>,
        fetcher: Arc<dyn FetchPage>,
        transport: Arc<dyn EmailTransport>,
    ) -> Self {
        let signer = TokenSigner::new(config.hmac_secret.clone());

        Self {
            store,
            extractor: EventExtractor::new(fetcher),
            dispatcher: BatchDispatcher::new(transport),
            renderer: DigestRenderer::new(signer.clone(), config.domain.clone()),
            signer,
            domain: config.domain.clone(),
            email_from: config.email_from.clone(),
            email_reply_to: config.email_reply_to.clone(),
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        self.run_for_date(Utc::now().date_naive()).await
    }

    /// Run with an explicit reference date for the week window.
    pub async fn run_for_date(&self, today: NaiveDate) -> Result<RunSummary> {
        let subscriptions = self.store.list_active_subscriptions().await?;

        let mut summary = RunSummary {
            total_subscriptions: subscriptions.len(),
            ..Default::default()
        };

        let groups = group_subscriptions(&subscriptions);
        info!(
            "Starting digest run: {} subscriptions in {} groups",
            summary.total_subscriptions,
            groups.len()
        );

        // No cross-group ordering guarantee; groups are independent and a
        // failed one never blocks the rest.
        for subs in groups.into_values() {
            let location_name = subs[0].location_name.clone();
            let category_name = subs[0].category_name.clone();
            let event_url = subs[0].location_event_url.clone();

            info!(
                "Processing {} subscriptions for {} - {}",
                subs.len(),
                location_name,
                category_name
            );

            let events = match self.extractor.extract(&event_url, today).await {
                Ok(events) => events,
                Err(e) => {
                    error!("Error processing {}: {}", location_name, e);
                    summary
                        .errors
                        .push(format!("Failed to process {}: {}", location_name, e));
                    continue;
                }
            };

            let messages: Vec<EmailMessage> = subs
                .iter()
                .map(|sub| self.build_message(sub, &events, today))
                .collect();

            let outcome = self.dispatcher.dispatch(&messages, &location_name).await;
            summary.emails_sent += outcome.emails_sent;
            summary.errors.extend(outcome.errors);
        }

        info!(
            "Digest run complete: {} emails sent, {} errors",
            summary.emails_sent,
            summary.errors.len()
        );

        Ok(summary)
    }

    /// Render one personalized email. Recipients in the same group differ
    /// only in the destination address and the embedded unsubscribe links.
    fn build_message(
        &self,
        subscription: &Subscription,
        events: &[Event],
        today: NaiveDate,
    ) -> EmailMessage {
        let subscription_id = subscription.id.to_string();
        let digest = self.renderer.render(
            events,
            &subscription.location_name,
            &subscription.category_name,
            &subscription_id,
            today,
        );
        let links = self.signer.unsubscribe_links(&subscription_id, &self.domain);

        EmailMessage {
            from: format!("Event Digest <{}>", self.email_from),
            to: subscription.user_email.clone(),
            subject: digest.subject,
            html: digest.html,
            text: digest.text,
            reply_to: self.email_reply_to.clone(),
            headers: vec![
                (
                    "List-Unsubscribe".to_string(),
                    format!(
                        "<{}>, <mailto:unsubscribe@{}?subject=unsubscribe>",
                        links.api_url, self.domain
                    ),
                ),
                (
                    "List-Unsubscribe-Post".to_string(),
                    "List-Unsubscribe=One-Click".to_string(),
                ),
            ],
        }
    }
}
