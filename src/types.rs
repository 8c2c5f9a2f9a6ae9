use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One event scraped from a location's listing page. Never persisted; lives
/// only for the duration of a single digest render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub date_time: String,
    pub title: String,
    pub tags: String,
    pub price_age: String,
    pub organizers: String,
    /// May embed rebuilt `<a href="...">text</a>` markup.
    pub links: String,
    /// Source-page sortable date in `YYYY/MM/DD` form.
    pub date_sortable: String,
}

/// An active subscription joined with its user, category, and location
/// details. Owned by the external store; read-only input to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub user_email: String,
    pub location_id: Uuid,
    pub location_name: String,
    pub location_event_url: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub is_active: bool,
}

/// Grouping key for subscriptions that share extraction and rendering inputs.
/// Keyed by ids, not names, so two differently-identified rows with equal
/// names stay separate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub location_id: Uuid,
    pub category_id: Uuid,
}

/// A fully rendered per-recipient email, ready for the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub reply_to: Option<String>,
    pub headers: Vec<(String, String)>,
}

/// Aggregate result of one full weekly-digest run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub total_subscriptions: usize,
    pub emails_sent: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsubscribeOutcome {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unauthorized: {0}")]
    Auth(String),

    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("email transport error: {0}")]
    Transport(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DigestError>;
