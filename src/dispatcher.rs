use crate::transport::EmailTransport;
use crate::types::EmailMessage;
use std::sync::Arc;
use tracing::{error, info};

/// Hard per-call message ceiling enforced by the external transport.
/// Chunking exists purely to respect it.
pub const BATCH_SIZE: usize = 100;

/// What one group's dispatch produced: a count of delivered emails and the
/// errors of any failed batches. Never an `Err`; partial failure is the
/// normal case.
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    pub emails_sent: usize,
    pub errors: Vec<String>,
}

/// Slices a group's rendered emails into fixed-size batches and submits each
/// independently. A batch failure is recorded against that batch and never
/// blocks the remaining ones.
pub struct BatchDispatcher {
    transport: Arc<dyn EmailTransport>,
    batch_size: usize,
}

impl BatchDispatcher {
    pub fn new(transport: Arc<dyn EmailTransport>) -> Self {
        Self::with_batch_size(transport, BATCH_SIZE)
    }

    pub fn with_batch_size(transport: Arc<dyn EmailTransport>, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch size must be positive");
        Self {
            transport,
            batch_size,
        }
    }

    pub async fn dispatch(
        &self,
        messages: &[EmailMessage],
        location_name: &str,
    ) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();

        for batch in messages.chunks(self.batch_size) {
            match self.transport.send_batch(batch).await {
                Ok(()) => {
                    outcome.emails_sent += batch.len();
                    info!(
                        "Successfully sent {} emails for {}",
                        batch.len(),
                        location_name
                    );
                }
                Err(e) => {
                    error!("Batch send failed for {}: {}", location_name, e);
                    outcome
                        .errors
                        .push(format!("Batch send failed for {}: {}", location_name, e));
                }
            }
        }

        outcome
    }
}
