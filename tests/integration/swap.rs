//! Model exchange through the full processor: load, replace, clear, teardown.

use crate::helpers::tolerances::FLOAT_EPSILON;
use crate::helpers::*;
use ampswap::prelude::*;
use ampswap::{LoadOutcome, ModelPath};

const WORKER: &str = "ampswap-model-worker";

#[test]
fn test_loaded_model_processes_audio() {
    let drops = DropLog::default();
    let (mut amp, mut control) = test_amp(drops.clone());
    let file = model_file("-1.0 0.0 0.0");

    load_and_wait(&mut amp, &mut control, file.path().to_str().unwrap());
    assert!(amp.has_model());
    assert_eq!(amp.last_swap(), Some(LoadOutcome::Loaded));

    let input = generate_sine(440.0, TEST_SAMPLE_RATE, TEST_BLOCK_SIZE);
    let mut output = vec![0.0; TEST_BLOCK_SIZE];
    amp.process(&input, &mut output);

    for (o, i) in output.iter().zip(&input) {
        assert!((o + i).abs() < FLOAT_EPSILON, "{} != -{}", o, i);
    }
}

#[test]
fn test_displaced_models_destroyed_on_worker() {
    let drops = DropLog::default();
    let (mut amp, mut control) = test_amp(drops.clone());
    let a = model_file("1.0 0.0 0.0");
    let b = model_file("2.0 0.0 0.0");

    load_and_wait(&mut amp, &mut control, a.path().to_str().unwrap());
    load_and_wait(&mut amp, &mut control, b.path().to_str().unwrap());
    load_and_wait(&mut amp, &mut control, "");
    assert!(!amp.has_model());

    assert!(wait_for(|| drops.len() == 2));
    for thread in drops.threads() {
        assert_eq!(thread.as_deref(), Some(WORKER));
    }
}

#[test]
fn test_teardown_hands_live_model_to_worker() {
    let drops = DropLog::default();
    let (mut amp, mut control) = test_amp(drops.clone());
    let file = model_file("1.0 0.0 0.0");

    load_and_wait(&mut amp, &mut control, file.path().to_str().unwrap());
    assert!(amp.has_model());

    drop(amp);
    drop(control);

    // Dropping the last endpoint joins the worker after its final drain.
    assert_eq!(drops.threads(), vec![Some(WORKER.to_string())]);
}

#[test]
fn test_render_thread_never_destroys_models() {
    let drops = DropLog::default();
    let (mut amp, mut control) = test_amp(drops.clone());
    let files: Vec<_> = (1..=5).map(|i| model_file(&format!("{} 0.0 0.0", i))).collect();

    for file in &files {
        control.set_model_path(file.path()).unwrap();
    }
    let last = ModelPath::from_path(files[4].path()).unwrap();
    let mut seen_last = false;
    let reported = render_until(&mut amp, |_| {
        control.drain(|n| seen_last |= n == Notification::ModelPath(last));
        seen_last
    });

    assert!(reported);
    assert!(wait_for(|| drops.len() == 4));
    let here = std::thread::current().name().map(String::from);
    assert!(drops.threads().iter().all(|t| *t != here));
}

#[test]
fn test_clear_resets_levels_and_passes_through() {
    let drops = DropLog::default();
    let (mut amp, mut control) = test_amp(drops.clone());
    let file = model_file("-1.0 -6.0 3.0");

    load_and_wait(&mut amp, &mut control, file.path().to_str().unwrap());
    assert_eq!(
        control.recommended_levels(),
        RecommendedLevels {
            input_db: -6.0,
            output_db: 3.0
        }
    );

    let seen = load_and_wait(&mut amp, &mut control, "");
    assert!(seen.contains(&Notification::RecommendedLevels(RecommendedLevels::default())));
    assert_eq!(amp.last_swap(), Some(LoadOutcome::Cleared));
    assert!(control.model_path().is_empty());
    assert_eq!(control.recommended_levels(), RecommendedLevels::default());

    // Gains settle back to unity; with no model the wet path is the input.
    let input = vec![0.5f32; TEST_BLOCK_SIZE];
    let mut output = vec![0.0; TEST_BLOCK_SIZE];
    for _ in 0..400 {
        amp.process(&input, &mut output);
    }
    assert!((output[TEST_BLOCK_SIZE - 1] - 0.5).abs() < 1e-3);
}

#[test]
fn test_missing_file_clears_model() {
    let drops = DropLog::default();
    let (mut amp, mut control) = test_amp(drops.clone());
    let file = model_file("1.0 0.0 0.0");

    load_and_wait(&mut amp, &mut control, file.path().to_str().unwrap());
    load_and_wait(&mut amp, &mut control, "/nonexistent.nam");

    assert!(!amp.has_model());
    assert_eq!(amp.last_swap(), Some(LoadOutcome::NotFound));
    assert!(control.model_path().is_empty());
}

#[test]
fn test_keep_current_policy_ignores_failed_loads() {
    let drops = DropLog::default();
    let (mut amp, mut control) =
        test_amp_with(drops.clone(), LoadFailurePolicy::KeepCurrent, 32);
    let a = model_file("1.0 0.0 0.0");
    let broken = model_file("not a model");
    let b = model_file("2.0 0.0 0.0");

    load_and_wait(&mut amp, &mut control, a.path().to_str().unwrap());

    // Requests are resolved in order, so by the time b is reported both
    // failures have been seen by the render step.
    control.set_model_path("/nonexistent.nam").unwrap();
    control.set_model_path(broken.path()).unwrap();
    let seen = load_and_wait(&mut amp, &mut control, b.path().to_str().unwrap());

    let paths: Vec<_> = seen
        .iter()
        .filter_map(|n| match n {
            Notification::ModelPath(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(paths, vec![ModelPath::from_path(b.path()).unwrap()]);
    assert_eq!(amp.last_swap(), Some(LoadOutcome::Loaded));
}

#[test]
fn test_oversized_path_is_rejected() {
    let drops = DropLog::default();
    let (mut amp, mut control) = test_amp(drops.clone());
    let file = model_file("1.0 0.0 0.0");
    load_and_wait(&mut amp, &mut control, file.path().to_str().unwrap());

    let long = format!("/{}", "a".repeat(2048));
    assert!(control.set_model_path(&long).is_err());

    assert!(render_until(&mut amp, |a| !a.has_model()));
    assert_eq!(amp.last_swap(), Some(LoadOutcome::Invalid));
}
