//! Top-level configuration, loadable from TOML.
//!
//! ```toml
//! notification_capacity = 32
//! diagnostics_interval_ms = 1000.0
//!
//! [processor]
//! sample_rate = 44100.0
//! max_block_size = 256
//! fade_time_ms = 20.0
//!
//! [exchange]
//! failure_policy = "keep_current"
//! ```

use crate::error::{Error, Result};
use ampswap_core::ProcessorConfig;
use ampswap_neural::ExchangeConfig;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AmpConfig {
    pub processor: ProcessorConfig,
    pub exchange: ExchangeConfig,
    /// Slots in the render → controller notification queue.
    pub notification_capacity: usize,
    /// Emit a render trace record this often. `None` disables the tap.
    pub diagnostics_interval_ms: Option<f32>,
}

impl Default for AmpConfig {
    fn default() -> Self {
        Self {
            processor: ProcessorConfig::default(),
            exchange: ExchangeConfig::default(),
            notification_capacity: 32,
            diagnostics_interval_ms: None,
        }
    }
}

impl AmpConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.processor.validate()?;
        self.exchange.validate()?;
        if self.notification_capacity == 0 {
            return Err(Error::InvalidNotificationCapacity);
        }
        Ok(())
    }

    /// The exchange config with the block size the processor will use.
    pub(crate) fn exchange_for_processor(&self) -> ExchangeConfig {
        ExchangeConfig {
            max_block_size: self.processor.max_block_size,
            ..self.exchange.clone()
        }
    }
}
