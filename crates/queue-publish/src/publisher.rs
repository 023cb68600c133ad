//! Message publisher: the orchestrating component.

use crate::client::{PublishAck, QueueProvider, SubmitRequest};
use crate::config::PublisherConfig;
use crate::encode::{EncodedMessage, MessageEncoder};
use crate::error::PublishError;
use crate::message::{Message, QueueDescriptor, QueueKind, QueueName};
use crate::ordering::{DedupTokenSource, FifoOrderingPolicy, UuidTokenSource};
use crate::resolver::QueueHandleResolver;
use crate::schedule::DeliverySchedule;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

#[cfg(test)]
#[path = "publisher_tests.rs"]
mod tests;

/// Delivery path for one publish call.
///
/// Exactly one variant applies per call: submit parameters can only be
/// assembled on the new-message path, and the redelivery path carries
/// nothing but the receipt token.
enum Dispatch {
    /// The service already delivered this message once; buy more processing
    /// time instead of publishing a duplicate
    Redelivery { delivery_tag: String },
    /// First submission of an encoded body
    NewMessage { encoded: EncodedMessage },
}

impl Dispatch {
    /// Classify a message into its delivery path.
    ///
    /// A redelivered message without a receipt token cannot have its
    /// visibility extended and falls through to the submit path.
    fn classify(encoder: &MessageEncoder, message: &Message) -> Result<Self, PublishError> {
        if message.redelivered {
            if let Some(tag) = &message.properties.delivery_tag {
                return Ok(Self::Redelivery {
                    delivery_tag: tag.clone(),
                });
            }
        }

        Ok(Self::NewMessage {
            encoded: encoder.encode(message)?,
        })
    }
}

/// Publishes outbound messages to the queue service.
///
/// Each publish call is independent and synchronous from the caller's
/// perspective; a single publisher instance is safe to share across
/// concurrent callers. The only shared mutable state is the handle cache
/// inside the resolver.
///
/// The publisher performs no internal retries. Every failure is returned
/// typed so the enclosing broker framework, which owns backoff policy, can
/// classify it via [`PublishError::is_transient`].
pub struct MessagePublisher {
    provider: Arc<dyn QueueProvider>,
    resolver: QueueHandleResolver,
    encoder: MessageEncoder,
    schedule: DeliverySchedule,
    ordering: FifoOrderingPolicy,
    config: PublisherConfig,
}

impl MessagePublisher {
    /// Create a publisher over the given provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(
        provider: Arc<dyn QueueProvider>,
        config: PublisherConfig,
    ) -> Result<Self, PublishError> {
        Self::with_token_source(provider, config, Arc::new(UuidTokenSource))
    }

    /// Create a publisher with an explicit deduplication token source
    pub fn with_token_source(
        provider: Arc<dyn QueueProvider>,
        config: PublisherConfig,
        tokens: Arc<dyn DedupTokenSource>,
    ) -> Result<Self, PublishError> {
        config.validate()?;

        Ok(Self {
            resolver: QueueHandleResolver::new(provider.clone()),
            encoder: MessageEncoder::new(config.transport_safe_encoding),
            schedule: DeliverySchedule::new(config.max_delay_seconds),
            ordering: FifoOrderingPolicy::with_token_source(
                config.default_group_id.clone(),
                tokens,
            ),
            provider,
            config,
        })
    }

    /// Get the active configuration
    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    /// Deliver `message` to the queue named `queue_name`.
    ///
    /// A redelivered message carrying a receipt token has its visibility
    /// window extended and is never submitted a second time. A new message
    /// is encoded and submitted with the delay and ordering parameters the
    /// queue variant allows: standard queues may carry a delay, FIFO queues
    /// carry group/dedup ids and never a delay.
    pub async fn publish(
        &self,
        queue_name: &QueueName,
        message: Message,
    ) -> Result<PublishAck, PublishError> {
        let queue = QueueDescriptor::new(queue_name.clone());
        let queue_url = self.resolver.resolve(queue.name()).await?;

        match Dispatch::classify(&self.encoder, &message)? {
            Dispatch::Redelivery { delivery_tag } => {
                debug!(
                    queue = %queue.name(),
                    "extending visibility for redelivered message"
                );
                self.provider
                    .extend_visibility(
                        &queue_url,
                        &delivery_tag,
                        self.config.visibility_extension_seconds,
                    )
                    .await?;
                Ok(PublishAck::VisibilityExtended)
            }
            Dispatch::NewMessage { encoded } => {
                let delay = self.schedule.compute_delay(&message, &queue, Utc::now())?;
                let ordering = self.ordering.compute_ordering(&message, &queue);

                let delay_seconds = match queue.kind() {
                    // Ordered queues reject per-message delay outright
                    QueueKind::Fifo => None,
                    QueueKind::Standard => (delay > 0).then_some(delay),
                };

                let request = SubmitRequest {
                    queue_url,
                    body: encoded.body,
                    attributes: encoded.attributes,
                    delay_seconds,
                    ordering,
                };

                let message_id = self.provider.submit(&request).await?;
                debug!(
                    queue = %queue.name(),
                    message_id = %message_id,
                    delay = delay,
                    "submitted message"
                );
                Ok(PublishAck::Submitted { message_id })
            }
        }
    }
}

impl std::fmt::Debug for MessagePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagePublisher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
