//! Builder for configuring and constructing an [`AmpProcessor`].

use crate::config::AmpConfig;
use crate::error::{Error, Result};
use crate::params::AmpParams;
use crate::{notify, AmpController, AmpProcessor};
use ampswap_neural::{LoadFailurePolicy, ModelExchange, ModelLoader};
use std::sync::Arc;

/// Starts the model worker and wires the render and control sides together.
///
/// # Example
///
/// ```ignore
/// use ampswap::prelude::*;
///
/// let (mut amp, mut control) = AmpProcessor::builder()
///     .sample_rate(48000.0)
///     .max_block_size(256)
///     .loader(|path: &Path| load_nam_file(path))
///     .build()?;
///
/// control.set_model_path("/models/plexi.nam")?;
///
/// // audio thread
/// amp.process(&input, &mut output);
///
/// // UI thread
/// while let Some(n) = control.poll() {
///     println!("{:?}", n);
/// }
/// ```
#[derive(Default)]
pub struct AmpProcessorBuilder {
    config: AmpConfig,
    loader: Option<Box<dyn ModelLoader>>,
}

impl AmpProcessorBuilder {
    /// Replace the whole configuration, e.g. one read with
    /// [`AmpConfig::from_toml_str`].
    pub fn config(mut self, config: AmpConfig) -> Self {
        self.config = config;
        self
    }

    pub fn loader(mut self, loader: impl ModelLoader) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Default: 48000
    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.config.processor.sample_rate = sample_rate;
        self
    }

    /// Default: 512
    pub fn max_block_size(mut self, frames: usize) -> Self {
        self.config.processor.max_block_size = frames;
        self
    }

    /// Default: 20 ms
    pub fn fade_time_ms(mut self, ms: f32) -> Self {
        self.config.processor.fade_time_ms = ms;
        self
    }

    /// Default: 40 ms
    pub fn warmup_time_ms(mut self, ms: f32) -> Self {
        self.config.processor.warmup_time_ms = ms;
        self
    }

    pub fn failure_policy(mut self, policy: LoadFailurePolicy) -> Self {
        self.config.exchange.failure_policy = policy;
        self
    }

    pub fn notification_capacity(mut self, capacity: usize) -> Self {
        self.config.notification_capacity = capacity;
        self
    }

    pub fn diagnostics_interval_ms(mut self, ms: f32) -> Self {
        self.config.diagnostics_interval_ms = Some(ms);
        self
    }

    pub fn build(self) -> Result<(AmpProcessor, AmpController)> {
        let loader = self.loader.ok_or(Error::MissingLoader)?;
        self.config.validate()?;

        let (handle, rt) =
            ModelExchange::start_boxed(loader, self.config.exchange_for_processor())?;
        let (tx, rx) = notify::channel(self.config.notification_capacity);
        let params = Arc::new(AmpParams::default());

        tracing::debug!(
            "Building amp processor: {} Hz, max block {}",
            self.config.processor.sample_rate,
            self.config.processor.max_block_size
        );

        let processor = AmpProcessor::new(
            self.config.processor,
            self.config.diagnostics_interval_ms,
            params.clone(),
            rt,
            tx,
        );
        let controller = AmpController::new(params, handle, rx);

        Ok((processor, controller))
    }
}
