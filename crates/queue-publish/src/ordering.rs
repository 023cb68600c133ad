//! FIFO ordering policy: group and deduplication ids.

use crate::message::{Message, QueueDescriptor, QueueKind};
use std::sync::Arc;

/// Ordering parameters attached to a FIFO submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FifoOrdering {
    /// Ordering partition key; messages sharing it deliver in order
    pub group_id: String,
    /// Token the service uses to collapse duplicate submissions
    pub deduplication_id: String,
}

/// Source of generated deduplication tokens.
///
/// Injected so the ordering policy stays unit-testable without patching a
/// global generator.
pub trait DedupTokenSource: Send + Sync {
    /// Produce a fresh token; called once per generated id
    fn next_token(&self) -> String;
}

/// Production token source backed by random UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokenSource;

impl DedupTokenSource for UuidTokenSource {
    fn next_token(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Computes ordering parameters for FIFO queues.
#[derive(Clone)]
pub struct FifoOrderingPolicy {
    default_group_id: String,
    tokens: Arc<dyn DedupTokenSource>,
}

impl FifoOrderingPolicy {
    /// Create the policy with the configured fallback group
    pub fn new(default_group_id: String) -> Self {
        Self::with_token_source(default_group_id, Arc::new(UuidTokenSource))
    }

    /// Create the policy with an explicit token source
    pub fn with_token_source(default_group_id: String, tokens: Arc<dyn DedupTokenSource>) -> Self {
        Self {
            default_group_id,
            tokens,
        }
    }

    /// Compute ordering parameters for delivering `message` to `queue`.
    ///
    /// Standard queues get `None`; the service may reject or silently ignore
    /// group/dedup fields on unordered queues, so they are never sent there.
    ///
    /// On FIFO queues the group id falls back to the configured default (an
    /// empty group id is invalid for ordered delivery) and the deduplication
    /// id falls back to a token generated fresh on every call. Generated
    /// tokens are never cached across calls: reusing one would make the
    /// service collapse logically distinct messages inside its dedup window.
    /// Callers that want idempotent retries supply their own stable id.
    pub fn compute_ordering(
        &self,
        message: &Message,
        queue: &QueueDescriptor,
    ) -> Option<FifoOrdering> {
        match queue.kind() {
            QueueKind::Standard => None,
            QueueKind::Fifo => {
                let group_id = message
                    .properties
                    .message_group_id
                    .clone()
                    .unwrap_or_else(|| self.default_group_id.clone());

                let deduplication_id = message
                    .properties
                    .message_deduplication_id
                    .clone()
                    .unwrap_or_else(|| self.tokens.next_token());

                Some(FifoOrdering {
                    group_id,
                    deduplication_id,
                })
            }
        }
    }
}

impl std::fmt::Debug for FifoOrderingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FifoOrderingPolicy")
            .field("default_group_id", &self.default_group_id)
            .finish()
    }
}

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod tests;
