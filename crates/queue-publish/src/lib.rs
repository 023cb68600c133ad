//! # Queue Publish
//!
//! Outbound publishing adapter for delivering task and event messages to a
//! managed, at-least-once, optionally-FIFO queue service.
//!
//! This library provides:
//! - Logical-to-physical queue handle resolution with per-name caching
//! - Canonical wire-body encoding with first-class message attributes
//! - ETA-based delayed delivery, suppressed on ordered queues
//! - FIFO group/deduplication id assembly with safe defaulting
//! - Redelivery handling via visibility extension instead of re-publish
//!
//! ## Module Organization
//!
//! - [`error`] - Error types for all publish operations
//! - [`message`] - Message, queue name, and descriptor types
//! - [`config`] - Publisher configuration
//! - [`encode`] - Wire body encoding
//! - [`schedule`] - Delivery delay policy
//! - [`ordering`] - FIFO ordering policy
//! - [`client`] - Provider trait and submit parameter types
//! - [`resolver`] - Cached queue handle resolution
//! - [`publisher`] - The orchestrating publisher
//! - [`providers`] - AWS SQS and in-memory provider implementations

// Module declarations
pub mod client;
pub mod config;
pub mod encode;
pub mod error;
pub mod message;
pub mod ordering;
pub mod providers;
pub mod publisher;
pub mod resolver;
pub mod schedule;

// Re-export commonly used types at crate root for convenience
pub use client::{PublishAck, QueueProvider, SubmitRequest};
pub use config::{PublisherConfig, MAX_DELAY_SECONDS};
pub use encode::{EncodedMessage, MessageEncoder};
pub use error::{ConfigurationError, EncodingError, PublishError, ValidationError};
pub use message::{
    Message, MessageHeaders, MessageId, MessageProperties, QueueDescriptor, QueueKind, QueueName,
    QueueUrl, Timestamp, FIFO_SUFFIX,
};
pub use ordering::{DedupTokenSource, FifoOrdering, FifoOrderingPolicy, UuidTokenSource};
pub use providers::{AwsSqsProvider, InMemoryProvider};
pub use publisher::MessagePublisher;
pub use resolver::QueueHandleResolver;
pub use schedule::DeliverySchedule;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
