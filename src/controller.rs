//! Non-real-time control surface.

use crate::error::Result;
use crate::notify::{Notification, NotificationReceiver};
use crate::params::AmpParams;
use ampswap_neural::{LoadHandle, ModelPath, RecommendedLevels};
use std::path::Path;
use std::sync::Arc;

/// Host/UI side of an [`AmpProcessor`](crate::AmpProcessor).
///
/// Sets parameters, requests model loads and tracks what the render step
/// has actually applied. The model path and recommended levels reported
/// here are only updated by [`poll`](Self::poll), from notifications the
/// render step emits after a swap.
pub struct AmpController {
    params: Arc<AmpParams>,
    loader: LoadHandle,
    notifications: NotificationReceiver,
    model_path: ModelPath,
    recommended: RecommendedLevels,
}

impl AmpController {
    pub(crate) fn new(
        params: Arc<AmpParams>,
        loader: LoadHandle,
        notifications: NotificationReceiver,
    ) -> Self {
        Self {
            params,
            loader,
            notifications,
            model_path: ModelPath::empty(),
            recommended: RecommendedLevels::default(),
        }
    }

    // ===== Parameters =====

    /// Input level in dB, clamped to [-20, 20].
    pub fn set_input_db(&self, db: f32) {
        self.params.set_input_db(db);
    }

    /// Output level in dB, clamped to [-20, 20].
    pub fn set_output_db(&self, db: f32) {
        self.params.set_output_db(db);
    }

    /// Set input level from a normalized (0.0-1.0) host value.
    pub fn set_input_normalized(&self, value: f32) {
        self.params
            .set_input_db(AmpParams::level_range().denormalize(value));
    }

    /// Set output level from a normalized (0.0-1.0) host value.
    pub fn set_output_normalized(&self, value: f32) {
        self.params
            .set_output_db(AmpParams::level_range().denormalize(value));
    }

    /// Input level as a normalized (0.0-1.0) host value.
    pub fn input_normalized(&self) -> f32 {
        AmpParams::level_range().normalize(self.params.input_db())
    }

    /// Output level as a normalized (0.0-1.0) host value.
    pub fn output_normalized(&self) -> f32 {
        AmpParams::level_range().normalize(self.params.output_db())
    }

    /// Set the enable switch from a normalized host value (>= 0.5 is on).
    pub fn set_enabled_normalized(&self, value: f32) {
        self.params
            .set_enabled(AmpParams::switch_range(true).denormalize(value) >= 0.5);
    }

    /// Set the hard-bypass switch from a normalized host value (>= 0.5 is on).
    pub fn set_hard_bypass_normalized(&self, value: f32) {
        self.params
            .set_hard_bypass(AmpParams::switch_range(false).denormalize(value) >= 0.5);
    }

    /// `false` crossfades to dry.
    pub fn set_enabled(&self, enabled: bool) {
        self.params.set_enabled(enabled);
    }

    /// Skip all processing once fully bypassed.
    pub fn set_hard_bypass(&self, hard_bypass: bool) {
        self.params.set_hard_bypass(hard_bypass);
    }

    pub fn params(&self) -> &Arc<AmpParams> {
        &self.params
    }

    // ===== Model state =====

    /// Request a model load. An empty path unloads the current model.
    pub fn set_model_path(&self, path: impl AsRef<Path>) -> Result<()> {
        self.loader.submit_load(path)?;
        Ok(())
    }

    pub fn clear_model(&self) -> Result<()> {
        self.loader.submit_clear()?;
        Ok(())
    }

    /// Path of the most recently applied model, as last reported.
    pub fn model_path(&self) -> &ModelPath {
        &self.model_path
    }

    /// Recommended trims of the live model, as last reported.
    pub fn recommended_levels(&self) -> RecommendedLevels {
        self.recommended
    }

    /// Ask the render step to report the current model path again.
    pub fn request_model_path(&self) {
        self.params.request_path_announcement();
    }

    /// A second handle for submitting loads from another thread.
    pub fn load_handle(&self) -> LoadHandle {
        self.loader.clone()
    }

    // ===== Notifications =====

    /// Take the next notification, updating the reported state.
    pub fn poll(&mut self) -> Option<Notification> {
        let notification = self.notifications.try_recv()?;
        match notification {
            Notification::ModelPath(path) => self.model_path = path,
            Notification::RecommendedLevels(levels) => self.recommended = levels,
        }
        Some(notification)
    }

    /// Drain all pending notifications into `f`.
    pub fn drain(&mut self, mut f: impl FnMut(Notification)) -> usize {
        let mut count = 0;
        while let Some(notification) = self.poll() {
            f(notification);
            count += 1;
        }
        count
    }
}
