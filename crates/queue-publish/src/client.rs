//! Provider trait and submit parameter types.

use crate::error::PublishError;
use crate::message::{MessageId, QueueName, QueueUrl};
use crate::ordering::FifoOrdering;
use async_trait::async_trait;
use std::collections::HashMap;

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

/// Assembled parameters for one submit call.
///
/// `delay_seconds` and `ordering` are mutually exclusive on the wire: the
/// publisher attaches a delay only for standard queues and ordering only for
/// FIFO queues. Providers map the fields as-is and must not invent either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub queue_url: QueueUrl,
    pub body: String,
    pub attributes: HashMap<String, String>,
    /// Seconds to hold the message before it becomes visible; omitted when
    /// zero or when the queue is ordered
    pub delay_seconds: Option<u32>,
    /// Group and deduplication ids; present exactly when the queue is ordered
    pub ordering: Option<FifoOrdering>,
}

/// Acknowledgment returned from a publish call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishAck {
    /// A new message was submitted and assigned an id by the service
    Submitted { message_id: MessageId },
    /// A redelivered message had its visibility window extended; no body
    /// was submitted
    VisibilityExtended,
}

/// Interface implemented by queue service backends.
///
/// Implementations are handed an already-authenticated transport; they never
/// retry on their own, and they surface every failure as a typed
/// [`PublishError`] so the enclosing broker framework can decide whether to
/// retry.
#[async_trait]
pub trait QueueProvider: Send + Sync {
    /// Translate a logical queue name into the physical handle used by
    /// subsequent operations. May perform a network round trip; callers
    /// cache the result per name.
    async fn lookup_queue_url(&self, queue: &QueueName) -> Result<QueueUrl, PublishError>;

    /// Submit a new message with the assembled parameters
    async fn submit(&self, request: &SubmitRequest) -> Result<MessageId, PublishError>;

    /// Extend the visibility window of a previously delivered message,
    /// identified by its receipt token
    async fn extend_visibility(
        &self,
        queue_url: &QueueUrl,
        delivery_tag: &str,
        timeout_seconds: u32,
    ) -> Result<(), PublishError>;
}
