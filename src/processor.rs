//! The per-block render step.
//!
//! Each block, in order:
//!
//! 1. apply at most one pending model swap
//! 2. publish any armed notifications
//! 3. advance the bypass crossfade
//! 4. if hard bypass applies, copy input to output and stop
//! 5. smooth and apply input gain, feeding the dry delay line
//! 6. run the live model (or pass through when none is loaded)
//! 7. smooth and apply output gain, then mix against the delayed dry signal
//!
//! Host blocks longer than `max_block_size` are rendered as several
//! sub-blocks.

use crate::diagnostics::{DiagnosticsTap, RenderSnapshot};
use crate::error::Result;
use crate::notify::{Notification, NotificationSender};
use crate::params::{AmpParams, BlockParams};
use crate::AmpProcessorBuilder;

use ampswap_core::{
    db_to_gain, Crossfade, CrossfadePhase, DryDelayBuffer, GainSmoother, ProcessorConfig,
};
use ampswap_neural::{LoadOutcome, RtExchange};
use std::sync::Arc;

pub struct AmpProcessor {
    config: ProcessorConfig,
    diagnostics_interval_ms: Option<f32>,
    params: Arc<AmpParams>,
    exchange: RtExchange,
    notifications: NotificationSender,

    crossfade: Crossfade,
    input_gain: GainSmoother,
    output_gain: GainSmoother,
    delay: DryDelayBuffer,

    /// Gained input, one max-size block.
    staged: Vec<f32>,
    /// Model output, one max-size block.
    wet: Vec<f32>,

    diagnostics: DiagnosticsTap,
    last_swap: Option<LoadOutcome>,
}

impl AmpProcessor {
    pub fn builder() -> AmpProcessorBuilder {
        AmpProcessorBuilder::default()
    }

    pub(crate) fn new(
        config: ProcessorConfig,
        diagnostics_interval_ms: Option<f32>,
        params: Arc<AmpParams>,
        exchange: RtExchange,
        notifications: NotificationSender,
    ) -> Self {
        let max = config.max_block_size;
        let mut crossfade = Crossfade::new(&config);
        crossfade.reset(!params.enabled());

        Self {
            crossfade,
            input_gain: GainSmoother::new(1.0, config.smoothing_coeff),
            output_gain: GainSmoother::new(1.0, config.smoothing_coeff),
            delay: DryDelayBuffer::for_block(config.fade_time_samples(), max),
            staged: vec![0.0; max],
            wet: vec![0.0; max],
            diagnostics: DiagnosticsTap::new(diagnostics_interval_ms, config.sample_rate),
            diagnostics_interval_ms,
            config,
            params,
            exchange,
            notifications,
            last_swap: None,
        }
    }

    // =========================================================================
    // Setup (not real-time safe)
    // =========================================================================

    /// Adopt a new sample rate and maximum block size.
    ///
    /// Reallocates the delay line and scratch buffers and tells the live
    /// model and the loader about the new maximum. Crossfade state is kept.
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> Result<()> {
        let config = ProcessorConfig {
            sample_rate,
            max_block_size,
            ..self.config.clone()
        };
        config.validate()?;

        self.crossfade.configure(&config);
        self.delay.set_len(DryDelayBuffer::required_len(
            config.fade_time_samples(),
            max_block_size,
        ));
        self.staged.resize(max_block_size, 0.0);
        self.wet.resize(max_block_size, 0.0);
        self.diagnostics
            .set_sample_rate(self.diagnostics_interval_ms, sample_rate);

        if max_block_size != self.config.max_block_size {
            self.exchange.set_max_block_size(max_block_size);
        }

        tracing::debug!(
            "Prepared: {} Hz, max block {}, delay {} samples",
            sample_rate,
            max_block_size,
            self.delay.len()
        );

        self.config = config;
        Ok(())
    }

    /// Return to a settled, fully processed state, as on plugin activation.
    pub fn reset(&mut self) {
        self.crossfade.reset(false);
        self.input_gain.set_immediate(1.0);
        self.output_gain.set_immediate(1.0);
        self.delay.clear();
    }

    // =========================================================================
    // Real-time
    // =========================================================================

    /// Render `input` into `output`. Processes `min(input.len(), output.len())`
    /// frames.
    ///
    /// An empty call still applies a pending swap and publishes notifications.
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) {
        let frames = input.len().min(output.len());
        let max = self.config.max_block_size;

        if frames == 0 {
            self.begin_block();
            return;
        }

        for (src, dst) in input[..frames]
            .chunks(max)
            .zip(output[..frames].chunks_mut(max))
        {
            self.staged[..src.len()].copy_from_slice(src);
            self.render_block(dst);
        }
    }

    /// Render `buffer` in place.
    pub fn process_in_place(&mut self, buffer: &mut [f32]) {
        let max = self.config.max_block_size;

        if buffer.is_empty() {
            self.begin_block();
            return;
        }

        for chunk in buffer.chunks_mut(max) {
            self.staged[..chunk.len()].copy_from_slice(chunk);
            self.render_block(chunk);
        }
    }

    /// Block-boundary work: apply a pending swap, read the controls once and
    /// publish armed notifications.
    fn begin_block(&mut self) -> BlockParams {
        if let Some(outcome) = self.exchange.apply_pending() {
            self.delay.clear();
            self.last_swap = Some(outcome);
        }

        let params = self.params.snapshot();
        if self.params.take_path_announcement() {
            self.exchange.request_path_announcement();
        }
        self.publish_notifications();
        params
    }

    /// Render one block whose raw input is already in `staged[..output.len()]`.
    fn render_block(&mut self, output: &mut [f32]) {
        let n = output.len();
        let max = self.config.max_block_size;

        let params = self.begin_block();

        self.crossfade.advance(params.enabled, n);

        if self.crossfade.allows_hard_bypass(params.hard_bypass) {
            let input = &self.staged[..n];
            output.copy_from_slice(input);
            // Keep the dry line continuous for when bypass is lifted.
            self.delay.write_slice(input);
            self.record_diagnostics(n);
            return;
        }

        let levels = self.exchange.recommended_levels();
        self.input_gain
            .set_target(db_to_gain(params.input_db + levels.input_db));
        self.output_gain
            .set_target(db_to_gain(params.output_db + levels.output_db));

        let staged = &mut self.staged[..n];
        self.input_gain.apply_gain(staged);
        self.delay.write_slice(staged);

        let wet = &mut self.wet[..n];
        match self.exchange.model() {
            Some(model) => model.process(staged, wet),
            None => wet.copy_from_slice(staged),
        }

        for (i, (out, &w)) in output.iter_mut().zip(wet.iter()).enumerate() {
            let w = w * self.output_gain.next_sample();
            let weights = self.crossfade.next_weights();
            let dry = self.delay.read_at(max + n - i);
            *out = weights.mix(w, dry);
        }

        self.record_diagnostics(n);
    }

    /// Push armed notifications. A flag is only cleared once its push lands.
    fn publish_notifications(&mut self) {
        if self.exchange.path_announcement_pending()
            && self
                .notifications
                .try_send(Notification::ModelPath(*self.exchange.model_path()))
        {
            self.exchange.clear_path_announcement();
        }

        if self.exchange.levels_announcement_pending()
            && self.notifications.try_send(Notification::RecommendedLevels(
                self.exchange.recommended_levels(),
            ))
        {
            self.exchange.clear_levels_announcement();
        }
    }

    #[inline]
    fn record_diagnostics(&mut self, frames: usize) {
        if self.diagnostics.is_enabled() {
            let snapshot = self.snapshot();
            self.diagnostics.record(frames, &snapshot);
        }
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            phase: self.crossfade.phase(),
            bypass_requested: self.crossfade.is_bypassed(),
            fade_position: self.crossfade.position(),
            mix_gain: self.crossfade.mix_gain(),
            input_gain: self.input_gain.current(),
            output_gain: self.output_gain.current(),
            warmup_remaining: self.crossfade.warmup_remaining(),
            model_loaded: self.exchange.has_model(),
        }
    }

    pub fn phase(&self) -> CrossfadePhase {
        self.crossfade.phase()
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn has_model(&self) -> bool {
        self.exchange.has_model()
    }

    /// Outcome of the most recent swap applied by this processor.
    pub fn last_swap(&self) -> Option<LoadOutcome> {
        self.last_swap
    }

    /// Samples of dry-path delay. Equal to the maximum block size.
    pub fn latency_samples(&self) -> usize {
        self.config.max_block_size
    }
}
