//! Path and level notifications reaching the controller.

use crate::helpers::*;
use ampswap::prelude::*;
use ampswap::ModelPath;

fn silence(amp: &mut AmpProcessor, blocks: usize) {
    let input = vec![0.0f32; TEST_BLOCK_SIZE];
    let mut output = vec![0.0f32; TEST_BLOCK_SIZE];
    for _ in 0..blocks {
        amp.process(&input, &mut output);
    }
}

#[test]
fn test_each_swap_notifies_once() {
    let (mut amp, mut control) = test_amp(DropLog::default());
    let file = model_file("1.0 -3.0 1.5");
    let path = ModelPath::from_path(file.path()).unwrap();

    let seen = load_and_wait(&mut amp, &mut control, path.as_str());
    assert_eq!(
        seen,
        vec![
            Notification::ModelPath(path),
            Notification::RecommendedLevels(RecommendedLevels {
                input_db: -3.0,
                output_db: 1.5,
            }),
        ]
    );
    assert_eq!(control.model_path(), &path);

    silence(&mut amp, 20);
    assert_eq!(control.poll(), None);
}

#[test]
fn test_model_path_reports_applied_not_requested() {
    let (mut amp, mut control) = test_amp(DropLog::default());
    let file = model_file("1.0 0.0 0.0");

    control.set_model_path(file.path()).unwrap();
    assert!(control.model_path().is_empty());

    load_and_wait(&mut amp, &mut control, file.path().to_str().unwrap());
    assert_eq!(control.model_path().as_path(), file.path());
}

#[test]
fn test_path_reannouncement() {
    let (mut amp, mut control) = test_amp(DropLog::default());
    let file = model_file("1.0 0.0 0.0");
    let path = ModelPath::from_path(file.path()).unwrap();
    load_and_wait(&mut amp, &mut control, path.as_str());

    control.request_model_path();
    silence(&mut amp, 1);
    assert_eq!(control.poll(), Some(Notification::ModelPath(path)));
    assert_eq!(control.poll(), None);

    silence(&mut amp, 5);
    assert_eq!(control.poll(), None);
}

#[test]
fn test_full_queue_delays_but_never_drops() {
    let (mut amp, mut control) =
        test_amp_with(DropLog::default(), LoadFailurePolicy::Clear, 1);
    let file = model_file("1.0 2.0 -2.0");
    let path = ModelPath::from_path(file.path()).unwrap();
    control.set_model_path(file.path()).unwrap();

    // Only one slot: the path goes first, the levels wait for room.
    assert!(render_until(&mut amp, |a| a.has_model()));
    assert_eq!(control.poll(), Some(Notification::ModelPath(path)));
    assert_eq!(control.poll(), None);

    silence(&mut amp, 1);
    assert_eq!(
        control.poll(),
        Some(Notification::RecommendedLevels(RecommendedLevels {
            input_db: 2.0,
            output_db: -2.0,
        }))
    );

    silence(&mut amp, 5);
    assert_eq!(control.poll(), None);
    assert_eq!(control.model_path(), &path);
}
