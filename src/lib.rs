pub mod config;
pub mod dispatcher;
pub mod extractor;
pub mod fetcher;
pub mod grouper;
pub mod orchestrator;
pub mod renderer;
pub mod service;
pub mod signer;
pub mod store;
pub mod table;
pub mod transport;
pub mod types;
pub mod utils;

pub use config::Config;
pub use dispatcher::{BatchDispatcher, DispatchOutcome, BATCH_SIZE};
pub use extractor::{EventExtractor, DEFAULT_KEYWORDS};
pub use fetcher::{FetchPage, PageFetcher};
pub use grouper::group_subscriptions;
pub use orchestrator::DigestOrchestrator;
pub use renderer::{DigestRenderer, RenderedDigest};
pub use service::DigestService;
pub use signer::{TokenSigner, UnsubscribeLinks};
pub use store::{subscription_from_row, MemoryStore, SubscriptionState, SubscriptionStore};
pub use transport::{DryRunTransport, EmailTransport, ResendTransport};
pub use types::*;
