//! Queue handle resolution with per-name caching.

use crate::client::QueueProvider;
use crate::error::PublishError;
use crate::message::{QueueName, QueueUrl};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Maps logical queue names to physical handles.
///
/// Resolution hits the provider once per name; the result is cached for the
/// resolver's lifetime since repeated publishes to the same queue are the
/// common case. The cache is read-mostly: concurrent publishes share read
/// locks, and only a miss takes the write lock.
pub struct QueueHandleResolver {
    provider: Arc<dyn QueueProvider>,
    cache: RwLock<HashMap<QueueName, QueueUrl>>,
}

impl QueueHandleResolver {
    /// Create a resolver over the given provider
    pub fn new(provider: Arc<dyn QueueProvider>) -> Self {
        Self {
            provider,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the physical handle for `queue`.
    ///
    /// An unknown queue surfaces [`PublishError::QueueNotFound`]; failed
    /// lookups are not cached, so a later call retries the provider.
    pub async fn resolve(&self, queue: &QueueName) -> Result<QueueUrl, PublishError> {
        {
            let cache = self.cache.read().await;
            if let Some(url) = cache.get(queue) {
                return Ok(url.clone());
            }
        }

        let url = self.provider.lookup_queue_url(queue).await?;
        debug!(queue = %queue, url = %url, "resolved queue handle");

        let mut cache = self.cache.write().await;
        let entry = cache.entry(queue.clone()).or_insert(url);
        Ok(entry.clone())
    }
}

impl std::fmt::Debug for QueueHandleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueHandleResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
