//! Test helpers and fixtures for ampswap integration tests.
//!
//! Models are described by small text files holding three numbers:
//! `gain input_db output_db`. The loader records on which thread every model
//! is dropped.

#![allow(dead_code)]


use ampswap::prelude::*;
use ampswap::ModelPath;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const TEST_SAMPLE_RATE: f64 = 48000.0;
pub const TEST_BLOCK_SIZE: usize = 64;

/// Names of the threads models were dropped on, in drop order.
#[derive(Clone, Default)]
pub struct DropLog(Arc<Mutex<Vec<Option<String>>>>);

impl DropLog {
    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn threads(&self) -> Vec<Option<String>> {
        self.0.lock().unwrap().clone()
    }
}

/// Scales its input; reports fixed recommended levels.
pub struct ScaleModel {
    gain: f32,
    input_db: f32,
    output_db: f32,
    drops: DropLog,
}

impl AmpModel for ScaleModel {
    fn process(&mut self, input: &[f32], output: &mut [f32]) {
        for (o, i) in output.iter_mut().zip(input) {
            *o = i * self.gain;
        }
    }

    fn recommended_input_db(&self) -> f32 {
        self.input_db
    }

    fn recommended_output_db(&self) -> f32 {
        self.output_db
    }
}

impl Drop for ScaleModel {
    fn drop(&mut self) {
        let name = std::thread::current().name().map(String::from);
        self.drops.0.lock().unwrap().push(name);
    }
}

pub fn scale_loader(drops: DropLog) -> impl ModelLoader {
    move |path: &Path| -> Result<Box<dyn AmpModel>, ModelError> {
        let text = std::fs::read_to_string(path)?;
        let values: Vec<f32> = text
            .split_whitespace()
            .map(|v| v.parse::<f32>())
            .collect::<Result<_, _>>()
            .map_err(|e| ModelError::Parse(e.to_string()))?;
        match values[..] {
            [gain, input_db, output_db] => Ok(Box::new(ScaleModel {
                gain,
                input_db,
                output_db,
                drops: drops.clone(),
            })),
            _ => Err(ModelError::Parse(format!("expected 3 values, got {}", values.len()))),
        }
    }
}

pub fn model_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".nam")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

pub fn test_amp(drops: DropLog) -> (AmpProcessor, AmpController) {
    test_amp_with(drops, LoadFailurePolicy::Clear, 32)
}

pub fn test_amp_with(
    drops: DropLog,
    policy: LoadFailurePolicy,
    notification_capacity: usize,
) -> (AmpProcessor, AmpController) {
    let mut config = AmpConfig::default();
    config.processor.sample_rate = TEST_SAMPLE_RATE;
    config.processor.max_block_size = TEST_BLOCK_SIZE;
    config.exchange.poll_interval_ms = 1;
    config.exchange.failure_policy = policy;
    config.notification_capacity = notification_capacity;

    AmpProcessor::builder()
        .config(config)
        .loader(scale_loader(drops))
        .build()
        .unwrap()
}

/// Render silent blocks until `done` holds, up to a few seconds.
pub fn render_until(amp: &mut AmpProcessor, mut done: impl FnMut(&AmpProcessor) -> bool) -> bool {
    let input = vec![0.0f32; TEST_BLOCK_SIZE];
    let mut output = vec![0.0f32; TEST_BLOCK_SIZE];
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        amp.process(&input, &mut output);
        if done(amp) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    false
}

/// Submit `path` and render until the model path it produced is reported.
/// Returns every notification seen on the way.
pub fn load_and_wait(
    amp: &mut AmpProcessor,
    control: &mut AmpController,
    path: &str,
) -> Vec<Notification> {
    control.set_model_path(path).unwrap();
    let expected = if Path::new(path).exists() {
        ModelPath::new(path).unwrap()
    } else {
        ModelPath::empty()
    };

    let mut seen = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    let input = vec![0.0f32; TEST_BLOCK_SIZE];
    let mut output = vec![0.0f32; TEST_BLOCK_SIZE];
    while Instant::now() < deadline {
        amp.process(&input, &mut output);
        control.drain(|n| seen.push(n));
        let reported = seen.iter().any(|n| *n == Notification::ModelPath(expected));
        let levels = seen
            .iter()
            .any(|n| matches!(n, Notification::RecommendedLevels(_)));
        if reported && levels {
            break;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    seen
}

pub fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    false
}

pub fn generate_sine(frequency: f64, sample_rate: f64, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            (2.0 * std::f64::consts::PI * frequency * t).sin() as f32
        })
        .collect()
}
