mod common;

use common::{message_to, RecordingTransport};
use event_digest::BatchDispatcher;
use std::collections::HashSet;
use std::sync::Arc;

fn messages(count: usize) -> Vec<event_digest::EmailMessage> {
    (0..count)
        .map(|i| message_to(&format!("user{}@example.test", i)))
        .collect()
}

#[tokio::test]
async fn partitions_into_order_preserving_batches_with_remainder_last() {
    let transport = Arc::new(RecordingTransport::new());
    let dispatcher = BatchDispatcher::new(transport.clone());

    let outcome = dispatcher.dispatch(&messages(250), "Bay Area").await;

    assert_eq!(transport.batch_sizes(), vec![100, 100, 50]);
    assert_eq!(outcome.emails_sent, 250);
    assert!(outcome.errors.is_empty());

    // Every recipient covered exactly once, in input order.
    let recipients = transport.recipients();
    assert_eq!(recipients.len(), 250);
    assert_eq!(
        recipients.iter().collect::<HashSet<_>>().len(),
        250,
        "recipients should not repeat across batches"
    );
    assert_eq!(recipients[0], "user0@example.test");
    assert_eq!(recipients[249], "user249@example.test");
}

#[tokio::test]
async fn exact_multiple_of_batch_size_has_no_stub_batch() {
    let transport = Arc::new(RecordingTransport::new());
    let dispatcher = BatchDispatcher::new(transport.clone());

    let outcome = dispatcher.dispatch(&messages(200), "Bay Area").await;

    assert_eq!(transport.batch_sizes(), vec![100, 100]);
    assert_eq!(outcome.emails_sent, 200);
}

#[tokio::test]
async fn no_messages_means_no_transport_calls() {
    let transport = Arc::new(RecordingTransport::new());
    let dispatcher = BatchDispatcher::new(transport.clone());

    let outcome = dispatcher.dispatch(&[], "Bay Area").await;

    assert!(transport.batch_sizes().is_empty());
    assert_eq!(outcome.emails_sent, 0);
}

#[tokio::test]
async fn failed_middle_batch_does_not_block_the_rest() {
    let transport = Arc::new(RecordingTransport::failing_on_call(2));
    let dispatcher = BatchDispatcher::new(transport.clone());

    let outcome = dispatcher.dispatch(&messages(250), "Bay Area").await;

    // All three batches attempted; only the failed one missing from the count.
    assert_eq!(transport.batch_sizes(), vec![100, 100, 50]);
    assert_eq!(outcome.emails_sent, 150);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("Bay Area"));
    assert!(outcome.errors[0].contains("simulated transport failure"));
}

#[tokio::test]
async fn custom_batch_size_is_respected() {
    let transport = Arc::new(RecordingTransport::new());
    let dispatcher = BatchDispatcher::with_batch_size(transport.clone(), 3);

    let outcome = dispatcher.dispatch(&messages(7), "Bay Area").await;

    assert_eq!(transport.batch_sizes(), vec![3, 3, 1]);
    assert_eq!(outcome.emails_sent, 7);
}
