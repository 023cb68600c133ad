//! Message and queue types for publish operations.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Suffix marking a queue as FIFO (ordered, deduplicating).
pub const FIFO_SUFFIX: &str = ".fifo";

// ============================================================================
// Core Domain Identifiers
// ============================================================================

/// Validated logical queue name.
///
/// Names are 1-80 ASCII characters: alphanumeric, hyphens, and underscores.
/// A trailing `.fifo` suffix is the one place a dot is allowed; it marks the
/// queue as ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueName(String);

impl QueueName {
    /// Create new queue name with validation
    pub fn new(name: String) -> Result<Self, ValidationError> {
        if name.is_empty() || name.len() > 80 {
            return Err(ValidationError::OutOfRange {
                field: "queue_name".to_string(),
                message: "must be 1-80 characters".to_string(),
            });
        }

        // The base name excludes the FIFO suffix; dots are valid nowhere else
        let base = name.strip_suffix(FIFO_SUFFIX).unwrap_or(&name);
        if base.is_empty() {
            return Err(ValidationError::InvalidFormat {
                field: "queue_name".to_string(),
                message: "FIFO suffix requires a base name".to_string(),
            });
        }

        if !base
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidFormat {
                field: "queue_name".to_string(),
                message: "only ASCII alphanumeric, hyphens, and underscores allowed".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Check whether the name carries the FIFO suffix
    pub fn is_fifo(&self) -> bool {
        self.0.ends_with(FIFO_SUFFIX)
    }

    /// Get queue name as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueueName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QueueName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

/// Resolved physical queue handle, opaque to callers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueUrl(String);

impl QueueUrl {
    /// Wrap a resolved handle
    pub fn new(url: String) -> Self {
        Self(url)
    }

    /// Get handle as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueueUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier assigned to a submitted message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Generate new random message ID
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get message ID as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "message_id".to_string(),
            });
        }

        Ok(Self(s.to_string()))
    }
}

/// Timestamp wrapper for consistent time handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create timestamp for current time
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create timestamp from DateTime
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get underlying DateTime
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dt = s.parse::<DateTime<Utc>>()?;
        Ok(Self::from_datetime(dt))
    }
}

// ============================================================================
// Queue Descriptor
// ============================================================================

/// Queue variant, precomputed from the name suffix.
///
/// Downstream policy matches on this exhaustively so the FIFO suppression
/// rules cannot be skipped by a forgotten string test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueKind {
    /// Unordered, high-throughput queue; supports delayed delivery
    Standard,
    /// Ordered queue; requires group/dedup ids, rejects per-message delay
    Fifo,
}

/// Logical queue name with its derived variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueDescriptor {
    name: QueueName,
    kind: QueueKind,
}

impl QueueDescriptor {
    /// Derive the descriptor from a validated name.
    ///
    /// Invariant: `kind == Fifo` exactly when the name ends with `.fifo`.
    pub fn new(name: QueueName) -> Self {
        let kind = if name.is_fifo() {
            QueueKind::Fifo
        } else {
            QueueKind::Standard
        };
        Self { name, kind }
    }

    /// Get queue name
    pub fn name(&self) -> &QueueName {
        &self.name
    }

    /// Get queue variant
    pub fn kind(&self) -> QueueKind {
        self.kind
    }

    /// Check if the queue is ordered
    pub fn is_fifo(&self) -> bool {
        self.kind == QueueKind::Fifo
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Delivery headers carried alongside the message body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageHeaders {
    /// Earliest delivery time, RFC 3339
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,

    /// Remaining headers, passed through untouched
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl MessageHeaders {
    /// Parse the `eta` header, if present.
    ///
    /// A malformed timestamp is a caller bug and surfaces as a validation
    /// error rather than silently delivering immediately.
    pub fn parsed_eta(&self) -> Result<Option<Timestamp>, ValidationError> {
        match &self.eta {
            None => Ok(None),
            Some(raw) => raw
                .parse::<Timestamp>()
                .map(Some)
                .map_err(|e| ValidationError::InvalidFormat {
                    field: "eta".to_string(),
                    message: e.to_string(),
                }),
        }
    }
}

/// Delivery properties carried alongside the message body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageProperties {
    /// Receipt token identifying a previously delivered message; present
    /// only on redeliveries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_tag: Option<String>,

    /// Ordering partition key, FIFO queues only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_group_id: Option<String>,

    /// Caller-supplied deduplication token, FIFO queues only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_deduplication_id: Option<String>,

    /// First-class wire attributes; extracted before encoding, never part
    /// of the serialized body
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub message_attributes: HashMap<String, String>,

    /// Remaining properties, passed through untouched
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A message to be delivered through the queue service.
///
/// Constructed by the caller immediately before publish and consumed exactly
/// once; nothing is retained after the call returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub body: serde_json::Value,
    #[serde(default)]
    pub headers: MessageHeaders,
    #[serde(default)]
    pub properties: MessageProperties,
    #[serde(default)]
    pub redelivered: bool,
}

impl Message {
    /// Create new message with body
    pub fn new(body: serde_json::Value) -> Self {
        Self {
            body,
            headers: MessageHeaders::default(),
            properties: MessageProperties::default(),
            redelivered: false,
        }
    }

    /// Set the earliest delivery time
    pub fn with_eta(mut self, eta: Timestamp) -> Self {
        self.headers.eta = Some(eta.as_datetime().to_rfc3339());
        self
    }

    /// Set the ordering group for FIFO delivery
    pub fn with_group_id(mut self, group_id: String) -> Self {
        self.properties.message_group_id = Some(group_id);
        self
    }

    /// Set a stable deduplication id for idempotent FIFO retries
    pub fn with_deduplication_id(mut self, deduplication_id: String) -> Self {
        self.properties.message_deduplication_id = Some(deduplication_id);
        self
    }

    /// Add a first-class message attribute
    pub fn with_attribute(mut self, key: String, value: String) -> Self {
        self.properties.message_attributes.insert(key, value);
        self
    }

    /// Mark the message as a redelivery carrying the given receipt token
    pub fn as_redelivery(mut self, delivery_tag: String) -> Self {
        self.properties.delivery_tag = Some(delivery_tag);
        self.redelivered = true;
        self
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
