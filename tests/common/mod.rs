#![allow(dead_code)]

use async_trait::async_trait;
use event_digest::{
    Config, DigestError, EmailMessage, EmailTransport, FetchPage, Result, Subscription,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// Serves canned HTML per URL; unknown URLs fail like an unreachable page.
pub struct MockFetcher {
    pages: HashMap<String, String>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

#[async_trait]
impl FetchPage for MockFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| DigestError::Fetch {
                url: url.to_string(),
                reason: "HTTP 503 Service Unavailable: Service Unavailable".to_string(),
            })
    }
}

/// Records every submitted batch and can be told to fail one call.
pub struct RecordingTransport {
    batches: Mutex<Vec<Vec<EmailMessage>>>,
    calls: AtomicUsize,
    fail_on_call: Option<usize>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            fail_on_call: None,
        }
    }

    /// Fail the nth `send_batch` call (1-based); all other calls succeed.
    pub fn failing_on_call(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::new()
        }
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches
            .lock()
            .unwrap()
            .iter()
            .map(|batch| batch.len())
            .collect()
    }

    /// Recipients across all attempted batches, in submission order.
    pub fn recipients(&self) -> Vec<String> {
        self.batches
            .lock()
            .unwrap()
            .iter()
            .flatten()
            .map(|message| message.to.clone())
            .collect()
    }

    pub fn messages(&self) -> Vec<EmailMessage> {
        self.batches.lock().unwrap().iter().flatten().cloned().collect()
    }
}

#[async_trait]
impl EmailTransport for RecordingTransport {
    async fn send_batch(&self, messages: &[EmailMessage]) -> Result<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.batches.lock().unwrap().push(messages.to_vec());

        if self.fail_on_call == Some(call) {
            return Err(DigestError::Transport(
                "simulated transport failure".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        hmac_secret: "test-hmac-secret".to_string(),
        cron_secret: "test-cron-secret".to_string(),
        resend_api_key: None,
        domain: "digest.test".to_string(),
        email_from: "notifications@digest.test".to_string(),
        email_reply_to: None,
    }
}

pub fn subscription(
    email: &str,
    location_id: Uuid,
    location_name: &str,
    event_url: &str,
    category_id: Uuid,
    category_name: &str,
) -> Subscription {
    Subscription {
        id: Uuid::new_v4(),
        user_email: email.to_string(),
        location_id,
        location_name: location_name.to_string(),
        location_event_url: event_url.to_string(),
        category_id,
        category_name: category_name.to_string(),
        is_active: true,
    }
}

pub fn message_to(to: &str) -> EmailMessage {
    EmailMessage {
        from: "Event Digest <notifications@digest.test>".to_string(),
        to: to.to_string(),
        subject: "subject".to_string(),
        html: "<p>html</p>".to_string(),
        text: "text".to_string(),
        reply_to: None,
        headers: Vec::new(),
    }
}

/// One seven-cell listing row in the source page's shape.
pub fn event_row(
    date_time: &str,
    title: &str,
    tags: &str,
    price_age: &str,
    organizers: &str,
    links: &str,
    date_sortable: &str,
) -> String {
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        date_time, title, tags, price_age, organizers, links, date_sortable
    )
}

pub fn listing_page(rows: &[String]) -> String {
    format!(
        "<html><body><table><tbody>{}</tbody></table></body></html>",
        rows.join("\n")
    )
}
