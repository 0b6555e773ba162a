//! Bypass crossfade behavior through the full render step.
//!
//! At 48 kHz with a 20 ms fade and a 40 ms warm-up, re-enabling the effect
//! holds the output fully dry for 1920 samples, then fades to wet over 960.

use crate::helpers::*;
use ampswap::prelude::*;
use ampswap::CrossfadePhase;

/// Input sample `t` of a deterministic test signal.
fn signal(t: usize) -> f32 {
    ((t as f32) * 0.013).sin() * 0.5 + 0.25
}

/// Drives a processor with [`signal`] and keeps the global sample index.
struct Session {
    amp: AmpProcessor,
    control: AmpController,
    t: usize,
}

impl Session {
    fn block(&mut self, frames: usize) -> (Vec<f32>, Vec<f32>) {
        let input: Vec<f32> = (self.t..self.t + frames).map(signal).collect();
        let mut output = vec![0.0; frames];
        self.amp.process(&input, &mut output);
        self.t += frames;
        (input, output)
    }

    fn run(&mut self, samples: usize) {
        let mut left = samples;
        while left > 0 {
            let n = left.min(TEST_BLOCK_SIZE);
            self.block(n);
            left -= n;
        }
    }
}

/// A session with an inverting model loaded and the effect fully bypassed.
fn bypassed_session(hard_bypass: bool) -> (Session, tempfile::NamedTempFile) {
    let (mut amp, mut control) = test_amp(DropLog::default());
    let file = model_file("-1.0 0.0 0.0");
    load_and_wait(&mut amp, &mut control, file.path().to_str().unwrap());

    control.set_hard_bypass(hard_bypass);
    control.set_enabled(false);
    let mut session = Session {
        amp,
        control,
        t: 0,
    };
    // Long enough for the mix gain to settle well past the dry threshold.
    session.run(20_000);
    assert_eq!(session.amp.phase(), CrossfadePhase::Bypassed);
    (session, file)
}

#[test]
fn test_warmup_holds_output_dry() {
    let (mut s, _file) = bypassed_session(false);
    s.control.set_enabled(true);

    let start = s.t;
    for block in 0..30 {
        let (_, output) = s.block(TEST_BLOCK_SIZE);
        for (i, out) in output.iter().enumerate() {
            // Dry tap: unity-gained input delayed by one max-size block.
            let expected = signal(start + block * TEST_BLOCK_SIZE + i - TEST_BLOCK_SIZE);
            assert_eq!(*out, expected, "sample {}", block * TEST_BLOCK_SIZE + i);
        }
        let snap = s.amp.snapshot();
        assert_eq!(snap.fade_position, 1.0);
        if block < 29 {
            assert_eq!(snap.phase, CrossfadePhase::WarmingUp);
        }
    }

    let snap = s.amp.snapshot();
    assert_eq!(snap.warmup_remaining, 0);
    assert!(snap.model_loaded);
}

#[test]
fn test_fade_out_after_warmup() {
    let (mut s, _file) = bypassed_session(false);
    s.control.set_enabled(true);
    s.run(1920);
    assert_eq!(s.amp.snapshot().fade_position, 1.0);

    let step = TEST_BLOCK_SIZE as f32 / 960.0;
    let mut previous = 1.0;
    for _ in 0..14 {
        s.block(TEST_BLOCK_SIZE);
        let position = s.amp.snapshot().fade_position;
        assert!((previous - position - step).abs() < 1e-4);
        previous = position;
    }

    // 2880 samples after the transition, give or take one block of rounding
    s.run(2 * TEST_BLOCK_SIZE);
    assert_eq!(s.amp.snapshot().fade_position, 0.0);
    assert_eq!(s.amp.phase(), CrossfadePhase::Active);

    // The smoothed mix eventually lets only the wet (inverted) signal through.
    s.run(30_000);
    let (input, output) = s.block(TEST_BLOCK_SIZE);
    for (o, i) in output.iter().zip(&input) {
        assert!((o + i).abs() < 1e-4, "{} vs {}", o, i);
    }
}

#[test]
fn test_irregular_blocks_respect_warmup() {
    let (mut s, _file) = bypassed_session(false);
    s.control.set_enabled(true);

    let sizes = [17, 61, 3, 64, 29, 1, 50, 33];
    let mut held = 0;
    for &n in sizes.iter().cycle() {
        s.block(n);
        if s.amp.snapshot().fade_position < 1.0 {
            break;
        }
        held += n;
        assert!(held < 10_000);
    }

    assert!(held >= 1920, "only held dry for {} samples", held);
}

#[test]
fn test_bypass_while_bypassed_is_stable() {
    let (mut s, _file) = bypassed_session(false);
    for _ in 0..50 {
        s.block(TEST_BLOCK_SIZE);
        let snap = s.amp.snapshot();
        assert_eq!(snap.fade_position, 1.0);
        assert_eq!(snap.phase, CrossfadePhase::Bypassed);
    }
}

#[test]
fn test_hard_bypass_passes_input_verbatim() {
    let (mut s, _file) = bypassed_session(true);
    s.control.set_input_db(12.0);

    let (input, output) = s.block(TEST_BLOCK_SIZE);
    assert_eq!(input, output);
}

#[test]
fn test_brief_reenable_restarts_warmup() {
    let (mut s, _file) = bypassed_session(false);

    s.control.set_enabled(true);
    s.run(1000);
    s.control.set_enabled(false);
    s.block(TEST_BLOCK_SIZE);
    s.control.set_enabled(true);

    s.block(TEST_BLOCK_SIZE);
    let snap = s.amp.snapshot();
    assert_eq!(snap.fade_position, 1.0);
    assert_eq!(snap.warmup_remaining, 1920 - TEST_BLOCK_SIZE);
}
