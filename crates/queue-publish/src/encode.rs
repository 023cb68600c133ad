//! Wire body encoding for outbound messages.

use crate::error::EncodingError;
use crate::message::{Message, MessageHeaders, MessageProperties};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use std::collections::HashMap;

/// Result of encoding a message for submission.
///
/// `attributes` is the side channel extracted from the message properties:
/// message attributes are a first-class wire concept and must never appear
/// inside the serialized body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMessage {
    /// Canonical wire body
    pub body: String,
    /// First-class message attributes, empty when the message carries none
    pub attributes: HashMap<String, String>,
}

/// Serialized shape of the message on the wire
#[derive(Serialize)]
struct WireEnvelope<'a> {
    body: &'a serde_json::Value,
    headers: &'a MessageHeaders,
    properties: MessageProperties,
}

/// Serializes messages into their canonical wire body.
///
/// The mode is fixed at construction, not per call: either plain JSON, or
/// JSON wrapped in a base64 layer for queues whose transport restricts the
/// character set.
#[derive(Debug, Clone, Copy)]
pub struct MessageEncoder {
    transport_safe: bool,
}

impl MessageEncoder {
    /// Create an encoder; `transport_safe` enables the base64 wrapping layer
    pub fn new(transport_safe: bool) -> Self {
        Self { transport_safe }
    }

    /// Encode `message` into its wire body, extracting message attributes.
    ///
    /// Pure function of the message and the configured mode. A payload that
    /// cannot be serialized is a caller bug and is never retried.
    pub fn encode(&self, message: &Message) -> Result<EncodedMessage, EncodingError> {
        let mut properties = message.properties.clone();
        let attributes = std::mem::take(&mut properties.message_attributes);

        let envelope = WireEnvelope {
            body: &message.body,
            headers: &message.headers,
            properties,
        };

        let serialized = serde_json::to_string(&envelope)?;
        let body = if self.transport_safe {
            STANDARD.encode(serialized.as_bytes())
        } else {
            serialized
        };

        Ok(EncodedMessage { body, attributes })
    }
}

#[cfg(test)]
#[path = "encode_tests.rs"]
mod tests;
