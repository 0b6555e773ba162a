//! The two endpoints of the model exchange.
//!
//! [`ModelExchange::start`] spawns the worker and returns:
//!
//! - a [`LoadHandle`] for non-real-time callers (state restore, UI actions),
//!   which only ever enqueues load requests;
//! - an [`RtExchange`] owned by the audio thread, which holds the live model,
//!   applies at most one pending swap per block boundary and sends the
//!   displaced model back to the worker for destruction.
//!
//! The live model is touched only by the thread that owns the
//! [`RtExchange`], and only between blocks, so no lock guards it.

use crate::config::ExchangeConfig;
use crate::error::{Error, Result};
use crate::message::{DisposeMessage, LoadOutcome, LoadRequest, SwapMessage, WorkerCommand};
use crate::model::{AmpModel, ModelLoader, RecommendedLevels};
use crate::path::ModelPath;
use crate::worker::Worker;

use crossbeam_channel::{SendTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Worker lifetime, shared by both endpoints. The worker stops when the
/// last endpoint goes away.
struct ExchangeShared {
    commands: Sender<WorkerCommand>,
    running: Arc<AtomicBool>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl ExchangeShared {
    fn shutdown(&self) {
        self.running.store(false, Ordering::Release);
        let _ = self.commands.try_send(WorkerCommand::Shutdown);
        if let Some(handle) = self.thread.lock().take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ExchangeShared {
    fn drop(&mut self) {
        self.shutdown();
    }
}

pub struct ModelExchange;

impl ModelExchange {
    /// Spawn the worker and build both endpoints.
    pub fn start(
        loader: impl ModelLoader,
        config: ExchangeConfig,
    ) -> Result<(LoadHandle, RtExchange)> {
        Self::start_boxed(Box::new(loader), config)
    }

    pub fn start_boxed(
        loader: Box<dyn ModelLoader>,
        config: ExchangeConfig,
    ) -> Result<(LoadHandle, RtExchange)> {
        config.validate()?;

        let (cmd_tx, cmd_rx) = crossbeam_channel::bounded(config.load_queue_capacity);
        let (swap_tx, swap_rx) = HeapRb::<SwapMessage>::new(config.swap_queue_capacity).split();
        let (dispose_tx, dispose_rx) =
            HeapRb::<DisposeMessage>::new(config.dispose_queue_capacity).split();

        let running = Arc::new(AtomicBool::new(true));
        let worker = Worker {
            loader,
            policy: config.failure_policy,
            max_block_size: config.max_block_size,
            poll_interval: config.poll_interval(),
            swaps: swap_tx,
            disposals: dispose_rx,
        };
        let thread = worker.spawn(cmd_rx, running.clone())?;

        let shared = Arc::new(ExchangeShared {
            commands: cmd_tx,
            running,
            thread: Mutex::new(Some(thread)),
        });

        let handle = LoadHandle {
            shared: shared.clone(),
        };
        let rt = RtExchange {
            swaps: swap_rx,
            disposals: dispose_tx,
            pending_dispose: None,
            live: None,
            live_path: ModelPath::empty(),
            announce_path: false,
            announce_levels: false,
            teardown_poll: config.poll_interval(),
            shared,
        };

        Ok((handle, rt))
    }
}

/// Non-real-time side: submits load requests.
#[derive(Clone)]
pub struct LoadHandle {
    shared: Arc<ExchangeShared>,
}

impl LoadHandle {
    /// Ask the worker to load `path`. An empty path unloads the live model.
    ///
    /// Returns immediately. A path too long for a message is still forwarded
    /// (as a failed load) and reported back as an error.
    pub fn submit_load(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let s = path
            .to_str()
            .ok_or_else(|| Error::InvalidPath(path.to_string_lossy().into_owned()))?;
        self.submit(LoadRequest::from_path_str(s))
    }

    /// Equivalent to `submit_load("")`.
    pub fn submit_clear(&self) -> Result<()> {
        self.submit(LoadRequest::Clear)
    }

    pub fn submit(&self, request: LoadRequest) -> Result<()> {
        self.send(WorkerCommand::Load(request))?;
        if let LoadRequest::Oversized { len } = request {
            return Err(Error::PathTooLong {
                len,
                max: crate::path::MAX_PATH_LEN - 1,
            });
        }
        Ok(())
    }

    fn send(&self, command: WorkerCommand) -> Result<()> {
        match self.shared.commands.try_send(command) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Model load queue full, dropping request");
                Err(Error::QueueFull)
            }
            Err(TrySendError::Disconnected(_)) => Err(Error::WorkerDisconnected),
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }
}

/// Real-time side: owns the live model.
pub struct RtExchange {
    swaps: HeapCons<SwapMessage>,
    disposals: HeapProd<DisposeMessage>,
    /// A displaced model the dispose queue had no room for yet.
    pending_dispose: Option<DisposeMessage>,
    live: Option<Box<dyn AmpModel>>,
    live_path: ModelPath,
    announce_path: bool,
    announce_levels: bool,
    teardown_poll: Duration,
    shared: Arc<ExchangeShared>,
}

impl RtExchange {
    /// Apply at most one pending swap. Call only between blocks.
    ///
    /// Never allocates or frees: the displaced model travels to the worker
    /// inside a [`DisposeMessage`]. If the dispose queue is full, the swap
    /// waits in its own queue until a later block boundary.
    ///
    /// Returns the outcome of the swap that changed the live model, if any.
    pub fn apply_pending(&mut self) -> Option<LoadOutcome> {
        if let Some(message) = self.pending_dispose.take() {
            if let Err(message) = self.disposals.try_push(message) {
                self.pending_dispose = Some(message);
                return None;
            }
        }

        let mut message = self.swaps.try_pop()?;

        if !message.replaces_live() {
            // Failed load under a keep-current policy: nothing owned, nothing to free.
            return None;
        }

        let old = std::mem::replace(&mut self.live, message.model.take());
        self.live_path = message.path;

        if let Err(rejected) = self.disposals.try_push(DisposeMessage { model: old }) {
            self.pending_dispose = Some(rejected);
        }

        self.announce_path = true;
        self.announce_levels = true;
        Some(message.outcome)
    }

    /// The live model, read once at the start of a block.
    #[inline]
    pub fn model(&mut self) -> Option<&mut (dyn AmpModel + 'static)> {
        self.live.as_deref_mut()
    }

    #[inline]
    pub fn has_model(&self) -> bool {
        self.live.is_some()
    }

    /// Path of the most recently applied swap.
    #[inline]
    pub fn model_path(&self) -> &ModelPath {
        &self.live_path
    }

    /// Recommended trims of the live model, zero when none is loaded.
    #[inline]
    pub fn recommended_levels(&self) -> RecommendedLevels {
        RecommendedLevels::of(self.live.as_deref())
    }

    /// Whether a swap is waiting to be applied.
    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.swaps.is_empty()
    }

    /// Re-announce the current path on the next block (e.g. a UI attaching).
    #[inline]
    pub fn request_path_announcement(&mut self) {
        self.announce_path = true;
    }

    #[inline]
    pub fn path_announcement_pending(&self) -> bool {
        self.announce_path
    }

    #[inline]
    pub fn levels_announcement_pending(&self) -> bool {
        self.announce_levels
    }

    #[inline]
    pub fn clear_path_announcement(&mut self) {
        self.announce_path = false;
    }

    #[inline]
    pub fn clear_levels_announcement(&mut self) {
        self.announce_levels = false;
    }

    /// Propagate a new maximum block size to the live model and to models
    /// loaded from now on. Not real-time safe.
    pub fn set_max_block_size(&mut self, frames: usize) {
        if let Some(model) = self.live.as_deref_mut() {
            model.set_max_block_size(frames);
        }
        if self
            .shared
            .commands
            .try_send(WorkerCommand::SetMaxBlockSize(frames))
            .is_err()
        {
            tracing::warn!("Could not forward max block size {} to model worker", frames);
        }
    }
}

impl RtExchange {
    /// Move the models of undelivered swaps into `leftovers`.
    fn drain_swaps_into(&mut self, leftovers: &mut Vec<DisposeMessage>) {
        while let Some(mut swap) = self.swaps.try_pop() {
            if let Some(model) = swap.model.take() {
                leftovers.push(DisposeMessage { model: Some(model) });
            }
        }
    }
}

impl Drop for RtExchange {
    fn drop(&mut self) {
        // Teardown is not real-time: wait as long as it takes for every model
        // still owned here to reach the worker.
        let mut leftovers = Vec::new();
        leftovers.extend(self.pending_dispose.take());
        if let Some(model) = self.live.take() {
            leftovers.push(DisposeMessage { model: Some(model) });
        }
        self.drain_swaps_into(&mut leftovers);

        while let Some(message) = leftovers.pop() {
            let message = match self.disposals.try_push(message) {
                Ok(()) => continue,
                Err(rejected) => rejected,
            };

            match self
                .shared
                .commands
                .send_timeout(WorkerCommand::Dispose(message), self.teardown_poll)
            {
                Ok(()) => {}
                Err(SendTimeoutError::Timeout(command)) => {
                    // The worker may be blocked delivering a swap; make room.
                    if let WorkerCommand::Dispose(message) = command {
                        leftovers.push(message);
                    }
                    self.drain_swaps_into(&mut leftovers);
                }
                Err(SendTimeoutError::Disconnected(_)) => {
                    tracing::warn!(
                        "Model worker gone, dropping {} model(s) on teardown",
                        leftovers.len() + 1
                    );
                    break;
                }
            }
        }
    }
}
