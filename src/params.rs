//! Host-facing parameters, shared lock-free between controller and render.

use ampswap_core::{AtomicFlag, AtomicFloat, ParameterRange};

/// The four controls a host exposes, plus the path re-announcement request.
///
/// Written by [`AmpController`](crate::AmpController), read once per block
/// by [`AmpProcessor`](crate::AmpProcessor).
#[derive(Debug)]
pub struct AmpParams {
    input_db: AtomicFloat,
    output_db: AtomicFloat,
    enabled: AtomicFlag,
    hard_bypass: AtomicFlag,
    announce_path: AtomicFlag,
}

impl Default for AmpParams {
    fn default() -> Self {
        Self {
            input_db: AtomicFloat::new(0.0),
            output_db: AtomicFloat::new(0.0),
            enabled: AtomicFlag::new(true),
            hard_bypass: AtomicFlag::new(false),
            announce_path: AtomicFlag::new(false),
        }
    }
}

impl AmpParams {
    /// Range of both level controls.
    pub fn level_range() -> ParameterRange {
        ParameterRange::level_db()
    }

    /// Range of the enable and hard-bypass switches.
    pub fn switch_range(default_on: bool) -> ParameterRange {
        ParameterRange::toggle(default_on)
    }

    pub fn set_input_db(&self, db: f32) {
        self.input_db.set(Self::level_range().clamp(db));
    }

    pub fn set_output_db(&self, db: f32) {
        self.output_db.set(Self::level_range().clamp(db));
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    pub fn set_hard_bypass(&self, hard_bypass: bool) {
        self.hard_bypass.set(hard_bypass);
    }

    pub fn input_db(&self) -> f32 {
        self.input_db.get()
    }

    pub fn output_db(&self) -> f32 {
        self.output_db.get()
    }

    pub fn enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn hard_bypass(&self) -> bool {
        self.hard_bypass.get()
    }

    pub(crate) fn request_path_announcement(&self) {
        self.announce_path.set(true);
    }

    pub(crate) fn take_path_announcement(&self) -> bool {
        self.announce_path.take()
    }

    /// Read every control once for the coming block.
    #[inline]
    pub fn snapshot(&self) -> BlockParams {
        BlockParams {
            input_db: self.input_db.get(),
            output_db: self.output_db.get(),
            enabled: self.enabled.get(),
            hard_bypass: self.hard_bypass.get(),
        }
    }
}

/// Control values frozen for the duration of one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockParams {
    pub input_db: f32,
    pub output_db: f32,
    pub enabled: bool,
    pub hard_bypass: bool,
}
