//! Delivery schedule policy: requested ETA to wire delay.

use crate::error::ValidationError;
use crate::message::{Message, QueueDescriptor, QueueKind};
use chrono::{DateTime, Utc};

/// Computes the delay-before-visible value for a message.
///
/// Pure policy; `now` is injected so the conversion is fully testable.
#[derive(Debug, Clone)]
pub struct DeliverySchedule {
    max_delay_seconds: u32,
}

impl DeliverySchedule {
    /// Create the policy with the service's delay ceiling
    pub fn new(max_delay_seconds: u32) -> Self {
        Self { max_delay_seconds }
    }

    /// Compute the delay in whole seconds for delivering `message` to `queue`.
    ///
    /// FIFO queues do not support per-message delay; the requested ETA is
    /// suppressed to `0` rather than rejected so ordering-sensitive
    /// producers never block on a schedule the service cannot honor.
    ///
    /// For standard queues the requested `eta - now` interval is truncated
    /// toward zero to whole seconds and clamped to `[0, max_delay_seconds]`.
    /// An ETA already in the past delivers immediately; it is not an error.
    pub fn compute_delay(
        &self,
        message: &Message,
        queue: &QueueDescriptor,
        now: DateTime<Utc>,
    ) -> Result<u32, ValidationError> {
        match queue.kind() {
            QueueKind::Fifo => Ok(0),
            QueueKind::Standard => {
                let eta = match message.headers.parsed_eta()? {
                    Some(eta) => eta,
                    None => return Ok(0),
                };

                // num_seconds truncates toward zero, the pinned rounding choice
                let requested = (eta.as_datetime() - now).num_seconds();
                let clamped = requested.clamp(0, i64::from(self.max_delay_seconds));

                Ok(clamped as u32)
            }
        }
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
