//! Tests for the in-memory provider.

use super::*;
use std::collections::HashMap;

fn queue(name: &str) -> QueueName {
    QueueName::new(name.to_string()).unwrap()
}

fn request_for(url: QueueUrl) -> SubmitRequest {
    SubmitRequest {
        queue_url: url,
        body: r#"{"task":"noop"}"#.to_string(),
        attributes: HashMap::new(),
        delay_seconds: None,
        ordering: None,
    }
}

#[tokio::test]
async fn test_lookup_of_registered_queue() {
    let provider = InMemoryProvider::new();
    let orders = queue("orders");
    provider.create_queue(&orders);

    let url = provider.lookup_queue_url(&orders).await.unwrap();
    assert_eq!(url.as_str(), "memory://orders");
}

#[tokio::test]
async fn test_lookup_of_unknown_queue_fails() {
    let provider = InMemoryProvider::new();
    let error = provider.lookup_queue_url(&queue("nowhere")).await.unwrap_err();

    assert!(matches!(error, PublishError::QueueNotFound { .. }));
}

#[tokio::test]
async fn test_submissions_are_recorded_per_queue() {
    let provider = InMemoryProvider::new();
    let orders = queue("orders");
    let invoices = queue("invoices");
    provider.create_queue(&orders);
    provider.create_queue(&invoices);

    let orders_url = provider.lookup_queue_url(&orders).await.unwrap();
    provider.submit(&request_for(orders_url)).await.unwrap();

    assert_eq!(provider.submissions(&orders).len(), 1);
    assert!(provider.submissions(&invoices).is_empty());
}

#[tokio::test]
async fn test_submit_to_unknown_url_fails() {
    let provider = InMemoryProvider::new();
    let request = request_for(QueueUrl::new("memory://ghost".to_string()));

    let error = provider.submit(&request).await.unwrap_err();
    assert!(matches!(error, PublishError::QueueNotFound { .. }));
}

#[tokio::test]
async fn test_submit_returns_distinct_message_ids() {
    let provider = InMemoryProvider::new();
    let orders = queue("orders");
    provider.create_queue(&orders);
    let url = provider.lookup_queue_url(&orders).await.unwrap();

    let first = provider.submit(&request_for(url.clone())).await.unwrap();
    let second = provider.submit(&request_for(url)).await.unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_visibility_extensions_are_recorded() {
    let provider = InMemoryProvider::new();
    let orders = queue("orders");
    provider.create_queue(&orders);
    let url = provider.lookup_queue_url(&orders).await.unwrap();

    provider
        .extend_visibility(&url, "tag-1", 1800)
        .await
        .unwrap();

    let extensions = provider.visibility_extensions(&orders);
    assert_eq!(
        extensions,
        vec![VisibilityExtension {
            delivery_tag: "tag-1".to_string(),
            timeout_seconds: 1800,
        }]
    );
}

#[tokio::test]
async fn test_registering_a_queue_twice_keeps_its_records() {
    let provider = InMemoryProvider::new();
    let orders = queue("orders");
    provider.create_queue(&orders);
    let url = provider.lookup_queue_url(&orders).await.unwrap();
    provider.submit(&request_for(url)).await.unwrap();

    provider.create_queue(&orders);
    assert_eq!(provider.submissions(&orders).len(), 1);
}
