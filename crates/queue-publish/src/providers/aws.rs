//! AWS SQS provider implementation.
//!
//! This provider implements the `QueueProvider` trait over an already-
//! authenticated `aws_sdk_sqs::Client`. Credential resolution, request
//! signing, connection pooling, and network timeouts all live in the SDK
//! client handed in at construction; this module owns only the mapping
//! between submit parameters and the SQS wire calls:
//!
//! - `GetQueueUrl` for handle resolution
//! - `SendMessage` for new-message submission
//! - `ChangeMessageVisibility` for redelivery visibility extension
//!
//! ## Wire constraints
//!
//! - `DelaySeconds` is attached only when the request carries one; the
//!   publisher never produces a delay for a FIFO queue.
//! - `MessageGroupId`/`MessageDeduplicationId` are attached only when the
//!   request carries ordering parameters.
//! - Bodies above the 256 KiB service limit are rejected before the call.

use crate::client::{QueueProvider, SubmitRequest};
use crate::error::{EncodingError, PublishError};
use crate::message::{MessageId, QueueName, QueueUrl};
use async_trait::async_trait;
use aws_sdk_sqs::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_sqs::types::MessageAttributeValue;
use aws_sdk_sqs::Client;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

#[cfg(test)]
#[path = "aws_tests.rs"]
mod tests;

/// Maximum SQS message body size in bytes
const MAX_BODY_BYTES: usize = 256 * 1024;

/// AWS SQS queue provider implementation
///
/// Thread-safe; the SDK client is internally reference-counted and the
/// provider holds no other state, so a single instance can serve all
/// concurrent publishes.
#[derive(Clone)]
pub struct AwsSqsProvider {
    client: Client,
}

impl AwsSqsProvider {
    /// Create a provider over an already-authenticated SQS client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a provider from the ambient AWS environment (region,
    /// credential chain, endpoint overrides)
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config))
    }
}

impl std::fmt::Debug for AwsSqsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSqsProvider").finish_non_exhaustive()
    }
}

/// Map SQS message attributes into their wire representation
fn build_message_attributes(
    attributes: &HashMap<String, String>,
) -> Result<Option<HashMap<String, MessageAttributeValue>>, PublishError> {
    if attributes.is_empty() {
        return Ok(None);
    }

    let mut wire = HashMap::with_capacity(attributes.len());
    for (key, value) in attributes {
        let attribute = MessageAttributeValue::builder()
            .data_type("String")
            .string_value(value)
            .build()
            .map_err(|_| {
                PublishError::Encoding(EncodingError::InvalidAttribute { key: key.clone() })
            })?;
        wire.insert(key.clone(), attribute);
    }

    Ok(Some(wire))
}

/// Map an SDK failure to the publish error taxonomy.
///
/// Classification drives the caller's retry decision, so transport-level
/// failures (timeouts, connection errors) and service-side errors must land
/// on transient variants while authentication and missing-queue errors land
/// on fatal ones.
fn map_sdk_error<E>(operation: &str, error: SdkError<E>) -> PublishError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    match &error {
        SdkError::TimeoutError(_) => PublishError::Timeout {
            operation: operation.to_string(),
        },
        SdkError::DispatchFailure(failure) if failure.is_timeout() => PublishError::Timeout {
            operation: operation.to_string(),
        },
        SdkError::DispatchFailure(failure) => PublishError::ConnectionFailed {
            message: failure
                .as_connector_error()
                .map(|cause| cause.to_string())
                .unwrap_or_else(|| format!("{operation} dispatch failed")),
        },
        _ => {
            let code = error.code().unwrap_or("Unknown").to_string();
            let message = error
                .message()
                .unwrap_or("no detail from service")
                .to_string();

            match code.as_str() {
                "AWS.SimpleQueueService.NonExistentQueue" | "QueueDoesNotExist" => {
                    PublishError::QueueNotFound {
                        queue_name: message,
                    }
                }
                "InvalidClientTokenId" | "UnrecognizedClientException"
                | "SignatureDoesNotMatch" | "AccessDenied" | "AccessDeniedException" => {
                    PublishError::AuthenticationFailed {
                        message: format!("{code}: {message}"),
                    }
                }
                _ => PublishError::Service { code, message },
            }
        }
    }
}

#[async_trait]
impl QueueProvider for AwsSqsProvider {
    async fn lookup_queue_url(&self, queue: &QueueName) -> Result<QueueUrl, PublishError> {
        let output = self
            .client
            .get_queue_url()
            .queue_name(queue.as_str())
            .send()
            .await
            .map_err(|error| match &error {
                SdkError::ServiceError(service) if service.err().is_queue_does_not_exist() => {
                    PublishError::QueueNotFound {
                        queue_name: queue.to_string(),
                    }
                }
                _ => map_sdk_error("GetQueueUrl", error),
            })?;

        let url = output
            .queue_url()
            .ok_or_else(|| PublishError::Service {
                code: "MissingQueueUrl".to_string(),
                message: format!("GetQueueUrl returned no URL for '{queue}'"),
            })?;

        debug!(queue = %queue, "resolved SQS queue url");
        Ok(QueueUrl::new(url.to_string()))
    }

    async fn submit(&self, request: &SubmitRequest) -> Result<MessageId, PublishError> {
        if request.body.len() > MAX_BODY_BYTES {
            return Err(PublishError::MessageTooLarge {
                size: request.body.len(),
                max_size: MAX_BODY_BYTES,
            });
        }

        let attributes = build_message_attributes(&request.attributes)?;

        let output = self
            .client
            .send_message()
            .queue_url(request.queue_url.as_str())
            .message_body(&request.body)
            .set_message_attributes(attributes)
            .set_delay_seconds(request.delay_seconds.map(|delay| delay as i32))
            .set_message_group_id(
                request
                    .ordering
                    .as_ref()
                    .map(|ordering| ordering.group_id.clone()),
            )
            .set_message_deduplication_id(
                request
                    .ordering
                    .as_ref()
                    .map(|ordering| ordering.deduplication_id.clone()),
            )
            .send()
            .await
            .map_err(|error| map_sdk_error("SendMessage", error))?;

        // The service always assigns an id on success; fall back to a local
        // one rather than failing an otherwise-delivered message
        let message_id = output
            .message_id()
            .and_then(|id| MessageId::from_str(id).ok())
            .unwrap_or_default();

        Ok(message_id)
    }

    async fn extend_visibility(
        &self,
        queue_url: &QueueUrl,
        delivery_tag: &str,
        timeout_seconds: u32,
    ) -> Result<(), PublishError> {
        self.client
            .change_message_visibility()
            .queue_url(queue_url.as_str())
            .receipt_handle(delivery_tag)
            .visibility_timeout(timeout_seconds as i32)
            .send()
            .await
            .map_err(|error| map_sdk_error("ChangeMessageVisibility", error))?;

        Ok(())
    }
}
