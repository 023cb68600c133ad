//! Tests for the FIFO ordering policy.

use super::*;
use crate::message::QueueName;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};

fn standard_queue() -> QueueDescriptor {
    QueueDescriptor::new(QueueName::new("orders".to_string()).unwrap())
}

fn fifo_queue() -> QueueDescriptor {
    QueueDescriptor::new(QueueName::new("orders.fifo".to_string()).unwrap())
}

/// Deterministic token source counting how often it is drawn from
struct CountingTokenSource {
    counter: AtomicU64,
}

impl CountingTokenSource {
    fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }
}

impl DedupTokenSource for CountingTokenSource {
    fn next_token(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("token-{n}")
    }
}

#[test]
fn test_standard_queue_gets_no_ordering() {
    let policy = FifoOrderingPolicy::new("default".to_string());
    let message = Message::new(json!({"task": "noop"}))
        .with_group_id("group-a".to_string())
        .with_deduplication_id("dedup-a".to_string());

    // Even explicit ids stay off the wire for unordered queues
    assert_eq!(policy.compute_ordering(&message, &standard_queue()), None);
}

#[test]
fn test_fifo_queue_always_gets_both_ids() {
    let policy = FifoOrderingPolicy::new("default".to_string());
    let message = Message::new(json!({"task": "noop"}));

    let ordering = policy.compute_ordering(&message, &fifo_queue()).unwrap();
    assert!(!ordering.group_id.is_empty());
    assert!(!ordering.deduplication_id.is_empty());
}

#[test]
fn test_explicit_ids_pass_through() {
    let policy = FifoOrderingPolicy::new("default".to_string());
    let message = Message::new(json!({"task": "noop"}))
        .with_group_id("order-42".to_string())
        .with_deduplication_id("receipt-42".to_string());

    let ordering = policy.compute_ordering(&message, &fifo_queue()).unwrap();
    assert_eq!(ordering.group_id, "order-42");
    assert_eq!(ordering.deduplication_id, "receipt-42");
}

#[test]
fn test_group_id_falls_back_to_default() {
    let policy = FifoOrderingPolicy::new("checkout".to_string());
    let message = Message::new(json!({"task": "noop"}));

    let ordering = policy.compute_ordering(&message, &fifo_queue()).unwrap();
    assert_eq!(ordering.group_id, "checkout");
}

#[test]
fn test_explicit_dedup_id_is_stable_across_calls() {
    let policy = FifoOrderingPolicy::new("default".to_string());
    let message = Message::new(json!({"task": "noop"}))
        .with_deduplication_id("stable-id".to_string());

    let first = policy.compute_ordering(&message, &fifo_queue()).unwrap();
    let second = policy.compute_ordering(&message, &fifo_queue()).unwrap();
    assert_eq!(first.deduplication_id, second.deduplication_id);
}

#[test]
fn test_generated_dedup_ids_are_fresh_per_call() {
    let policy = FifoOrderingPolicy::with_token_source(
        "default".to_string(),
        std::sync::Arc::new(CountingTokenSource::new()),
    );
    let message = Message::new(json!({"task": "noop"}));

    let first = policy.compute_ordering(&message, &fifo_queue()).unwrap();
    let second = policy.compute_ordering(&message, &fifo_queue()).unwrap();
    assert_ne!(first.deduplication_id, second.deduplication_id);
}

#[test]
fn test_uuid_source_generates_distinct_tokens() {
    let policy = FifoOrderingPolicy::new("default".to_string());
    let message = Message::new(json!({"task": "noop"}));

    let first = policy.compute_ordering(&message, &fifo_queue()).unwrap();
    let second = policy.compute_ordering(&message, &fifo_queue()).unwrap();
    assert_ne!(first.deduplication_id, second.deduplication_id);
}

#[test]
fn test_explicit_dedup_id_never_draws_a_token() {
    let source = std::sync::Arc::new(CountingTokenSource::new());
    let policy = FifoOrderingPolicy::with_token_source("default".to_string(), source.clone());
    let message = Message::new(json!({"task": "noop"}))
        .with_deduplication_id("stable-id".to_string());

    policy.compute_ordering(&message, &fifo_queue());
    assert_eq!(source.counter.load(Ordering::SeqCst), 0);
}
