//! Publisher configuration.

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Service ceiling on per-message delay, in seconds.
pub const MAX_DELAY_SECONDS: u32 = 900;

/// Configuration for publisher initialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Wrap the serialized body in an additional text-safe encoding layer
    pub transport_safe_encoding: bool,

    /// Visibility window granted to a redelivered message instead of
    /// publishing it a second time
    pub visibility_extension_seconds: u32,

    /// Ceiling applied to computed delivery delays
    pub max_delay_seconds: u32,

    /// Ordering group used when a FIFO message supplies none
    pub default_group_id: String,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            transport_safe_encoding: false,
            visibility_extension_seconds: 1800,
            max_delay_seconds: MAX_DELAY_SECONDS,
            default_group_id: "default".to_string(),
        }
    }
}

impl PublisherConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.visibility_extension_seconds == 0 {
            return Err(ConfigurationError::Invalid {
                message: "visibility_extension_seconds must be positive".to_string(),
            });
        }

        if self.max_delay_seconds > MAX_DELAY_SECONDS {
            return Err(ConfigurationError::Invalid {
                message: format!(
                    "max_delay_seconds {} exceeds the service ceiling of {}",
                    self.max_delay_seconds, MAX_DELAY_SECONDS
                ),
            });
        }

        if self.default_group_id.is_empty() {
            // An empty group id is invalid for ordered delivery
            return Err(ConfigurationError::Invalid {
                message: "default_group_id must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
