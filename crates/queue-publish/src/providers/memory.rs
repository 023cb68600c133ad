//! In-memory queue provider for testing and development.
//!
//! This provider records every submission and visibility extension instead
//! of delivering anywhere, so tests can assert on the exact wire parameters
//! a publish produced. It is intended for:
//! - Unit and integration testing of publisher consumers
//! - Development and prototyping without queue infrastructure

use crate::client::{QueueProvider, SubmitRequest};
use crate::error::PublishError;
use crate::message::{MessageId, QueueName, QueueUrl};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

// ============================================================================
// Internal Storage Structures
// ============================================================================

/// A recorded visibility-extension call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityExtension {
    pub delivery_tag: String,
    pub timeout_seconds: u32,
}

/// State of a single registered queue
struct InMemoryQueue {
    url: QueueUrl,
    submissions: Vec<SubmitRequest>,
    visibility_extensions: Vec<VisibilityExtension>,
}

impl InMemoryQueue {
    fn new(name: &QueueName) -> Self {
        Self {
            url: QueueUrl::new(format!("memory://{name}")),
            submissions: Vec::new(),
            visibility_extensions: Vec::new(),
        }
    }
}

/// Thread-safe storage for all registered queues
#[derive(Default)]
struct QueueStorage {
    queues: HashMap<QueueName, InMemoryQueue>,
}

impl QueueStorage {
    fn queue_by_url_mut(&mut self, url: &QueueUrl) -> Option<&mut InMemoryQueue> {
        self.queues.values_mut().find(|queue| &queue.url == url)
    }
}

// ============================================================================
// InMemoryProvider
// ============================================================================

/// In-memory queue provider implementation
pub struct InMemoryProvider {
    storage: Arc<RwLock<QueueStorage>>,
}

impl InMemoryProvider {
    /// Create a provider with no registered queues
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(QueueStorage::default())),
        }
    }

    /// Register a queue so lookups against it succeed
    pub fn create_queue(&self, name: &QueueName) {
        let mut storage = self.storage.write().expect("queue storage poisoned");
        storage
            .queues
            .entry(name.clone())
            .or_insert_with(|| InMemoryQueue::new(name));
    }

    /// Get the submissions recorded against a queue
    pub fn submissions(&self, name: &QueueName) -> Vec<SubmitRequest> {
        let storage = self.storage.read().expect("queue storage poisoned");
        storage
            .queues
            .get(name)
            .map(|queue| queue.submissions.clone())
            .unwrap_or_default()
    }

    /// Get the visibility extensions recorded against a queue
    pub fn visibility_extensions(&self, name: &QueueName) -> Vec<VisibilityExtension> {
        let storage = self.storage.read().expect("queue storage poisoned");
        storage
            .queues
            .get(name)
            .map(|queue| queue.visibility_extensions.clone())
            .unwrap_or_default()
    }
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueueProvider for InMemoryProvider {
    async fn lookup_queue_url(&self, queue: &QueueName) -> Result<QueueUrl, PublishError> {
        let storage = self.storage.read().expect("queue storage poisoned");
        storage
            .queues
            .get(queue)
            .map(|q| q.url.clone())
            .ok_or_else(|| PublishError::QueueNotFound {
                queue_name: queue.to_string(),
            })
    }

    async fn submit(&self, request: &SubmitRequest) -> Result<MessageId, PublishError> {
        let mut storage = self.storage.write().expect("queue storage poisoned");
        let queue = storage.queue_by_url_mut(&request.queue_url).ok_or_else(|| {
            PublishError::QueueNotFound {
                queue_name: request.queue_url.to_string(),
            }
        })?;

        queue.submissions.push(request.clone());
        Ok(MessageId::new())
    }

    async fn extend_visibility(
        &self,
        queue_url: &QueueUrl,
        delivery_tag: &str,
        timeout_seconds: u32,
    ) -> Result<(), PublishError> {
        let mut storage = self.storage.write().expect("queue storage poisoned");
        let queue = storage
            .queue_by_url_mut(queue_url)
            .ok_or_else(|| PublishError::QueueNotFound {
                queue_name: queue_url.to_string(),
            })?;

        queue.visibility_extensions.push(VisibilityExtension {
            delivery_tag: delivery_tag.to_string(),
            timeout_seconds,
        });
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let storage = self.storage.read().expect("queue storage poisoned");
        f.debug_struct("InMemoryProvider")
            .field("queues", &storage.queues.len())
            .finish()
    }
}
