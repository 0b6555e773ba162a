//! Rate-limited render tracing.

use ampswap_core::CrossfadePhase;

/// State of the render step after the most recent block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSnapshot {
    pub phase: CrossfadePhase,
    /// Whether bypass was requested for the last block.
    pub bypass_requested: bool,
    pub fade_position: f32,
    pub mix_gain: f32,
    pub input_gain: f32,
    pub output_gain: f32,
    pub warmup_remaining: usize,
    pub model_loaded: bool,
}

/// Emits one `trace` record per interval of rendered audio. Disabled
/// when constructed without an interval.
#[derive(Debug, Clone)]
pub struct DiagnosticsTap {
    interval_samples: Option<usize>,
    elapsed: usize,
}

impl DiagnosticsTap {
    pub fn new(interval_ms: Option<f32>, sample_rate: f64) -> Self {
        Self {
            interval_samples: Self::interval_samples(interval_ms, sample_rate),
            elapsed: 0,
        }
    }

    fn interval_samples(interval_ms: Option<f32>, sample_rate: f64) -> Option<usize> {
        let ms = interval_ms.filter(|ms| *ms > 0.0)?;
        Some(((ms as f64 * sample_rate / 1000.0) as usize).max(1))
    }

    /// Rescale the interval, keeping it enabled or disabled as it was.
    pub fn set_sample_rate(&mut self, interval_ms: Option<f32>, sample_rate: f64) {
        self.interval_samples = Self::interval_samples(interval_ms, sample_rate);
        self.elapsed = 0;
    }

    pub fn is_enabled(&self) -> bool {
        self.interval_samples.is_some()
    }

    /// Count `frames` rendered samples; returns `true` when a record was due.
    #[inline]
    pub fn record(&mut self, frames: usize, snapshot: &RenderSnapshot) -> bool {
        let Some(interval) = self.interval_samples else {
            return false;
        };

        self.elapsed += frames;
        if self.elapsed < interval {
            return false;
        }
        self.elapsed %= interval;

        tracing::trace!(
            phase = ?snapshot.phase,
            bypass_requested = snapshot.bypass_requested,
            fade_position = snapshot.fade_position,
            mix_gain = snapshot.mix_gain,
            input_gain = snapshot.input_gain,
            output_gain = snapshot.output_gain,
            warmup_remaining = snapshot.warmup_remaining,
            model_loaded = snapshot.model_loaded,
            "render"
        );
        true
    }
}
