//! Inference model and loader traits.
//!
//! The model itself is opaque: it turns a block of samples into a block of
//! samples and recommends input/output level trims. How it gets there is the
//! provider's business.

use crate::error::ModelError;
use std::path::Path;

/// A loaded inference model.
///
/// Owned by exactly one thread at a time. `process` is called from the
/// real-time thread and must not allocate, block or panic.
pub trait AmpModel: Send {
    /// Process `input` into `output`. Both slices have the same length, at
    /// most the last value passed to [`set_max_block_size`](Self::set_max_block_size).
    fn process(&mut self, input: &[f32], output: &mut [f32]);

    /// Suggested input trim in dB.
    fn recommended_input_db(&self) -> f32 {
        0.0
    }

    /// Suggested output trim in dB.
    fn recommended_output_db(&self) -> f32 {
        0.0
    }

    /// Called off the real-time thread whenever the host's maximum block
    /// size changes, and once right after loading.
    fn set_max_block_size(&mut self, _frames: usize) {}
}

/// The two level trims a model recommends.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RecommendedLevels {
    pub input_db: f32,
    pub output_db: f32,
}

impl RecommendedLevels {
    pub fn of(model: Option<&dyn AmpModel>) -> Self {
        match model {
            Some(m) => Self {
                input_db: m.recommended_input_db(),
                output_db: m.recommended_output_db(),
            },
            None => Self::default(),
        }
    }
}

/// Builds models from files. Runs on the worker thread only.
pub trait ModelLoader: Send + 'static {
    fn load(&mut self, path: &Path) -> Result<Box<dyn AmpModel>, ModelError>;
}

impl<F> ModelLoader for F
where
    F: FnMut(&Path) -> Result<Box<dyn AmpModel>, ModelError> + Send + 'static,
{
    fn load(&mut self, path: &Path) -> Result<Box<dyn AmpModel>, ModelError> {
        self(path)
    }
}
