//! Exchange configuration.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

/// What a failed load does to the live model.
///
/// An empty path always clears; this only decides the missing-file and
/// unparsable-file cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadFailurePolicy {
    /// Replace the live model with nothing.
    #[default]
    Clear,
    /// Leave the live model in place.
    KeepCurrent,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    pub load_queue_capacity: usize,
    pub swap_queue_capacity: usize,
    pub dispose_queue_capacity: usize,
    /// How long the worker sleeps waiting for commands before checking the
    /// dispose queue again.
    pub poll_interval_ms: u64,
    pub failure_policy: LoadFailurePolicy,
    /// Initial maximum block size handed to freshly loaded models.
    pub max_block_size: usize,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            load_queue_capacity: 16,
            swap_queue_capacity: 4,
            dispose_queue_capacity: 8,
            poll_interval_ms: 5,
            failure_policy: LoadFailurePolicy::Clear,
            max_block_size: 512,
        }
    }
}

impl ExchangeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.load_queue_capacity == 0
            || self.swap_queue_capacity == 0
            || self.dispose_queue_capacity == 0
        {
            return Err(Error::InvalidConfig(
                "queue capacities must be non-zero".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "poll_interval_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
