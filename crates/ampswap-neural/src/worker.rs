//! Non-real-time model worker.
//!
//! One thread per exchange. It owns the loader, checks files, builds models
//! and destroys the ones the real-time side has let go of. Everything here
//! may block or allocate.

use crate::config::LoadFailurePolicy;
use crate::error::{Error, Result};
use crate::message::{DisposeMessage, LoadOutcome, LoadRequest, SwapMessage, WorkerCommand};
use crate::model::ModelLoader;
use crate::path::MAX_PATH_LEN;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use ringbuf::traits::{Consumer, Producer};
use ringbuf::{HeapCons, HeapProd};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

pub(crate) struct Worker {
    pub(crate) loader: Box<dyn ModelLoader>,
    pub(crate) policy: LoadFailurePolicy,
    pub(crate) max_block_size: usize,
    pub(crate) poll_interval: Duration,
    pub(crate) swaps: HeapProd<SwapMessage>,
    pub(crate) disposals: HeapCons<DisposeMessage>,
}

impl Worker {
    pub(crate) fn spawn(
        self,
        commands: Receiver<WorkerCommand>,
        running: Arc<AtomicBool>,
    ) -> Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name("ampswap-model-worker".into())
            .spawn(move || self.run(commands, &running))
            .map_err(|e| Error::WorkerSpawn(e.to_string()))
    }

    fn run(mut self, commands: Receiver<WorkerCommand>, running: &AtomicBool) {
        tracing::info!("Model worker started");

        while running.load(Ordering::Acquire) {
            match commands.recv_timeout(self.poll_interval) {
                Ok(WorkerCommand::Load(request)) => {
                    let message = resolve_load(
                        self.loader.as_mut(),
                        request,
                        self.policy,
                        self.max_block_size,
                    );
                    self.deliver(message, running);
                }
                Ok(WorkerCommand::SetMaxBlockSize(frames)) => {
                    tracing::debug!("Max block size for new models: {}", frames);
                    self.max_block_size = frames;
                }
                Ok(WorkerCommand::Dispose(message)) => {
                    if message.model.is_some() {
                        tracing::debug!("Destroyed model handed over at teardown");
                    }
                    drop(message);
                }
                Ok(WorkerCommand::Shutdown) => break,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => std::thread::sleep(self.poll_interval),
            }

            self.drain_disposals();
        }

        self.drain_disposals();
        for command in commands.try_iter() {
            if let WorkerCommand::Dispose(message) = command {
                drop(message);
            }
        }
        tracing::info!("Model worker stopped");
    }

    /// Hand a swap to the real-time side, waiting for room if its queue is
    /// full. Gives up (and drops the message here) on shutdown.
    fn deliver(&mut self, mut message: SwapMessage, running: &AtomicBool) {
        loop {
            match self.swaps.try_push(message) {
                Ok(()) => return,
                Err(rejected) => {
                    message = rejected;
                    if !running.load(Ordering::Acquire) {
                        tracing::debug!("Dropping undelivered swap on shutdown");
                        return;
                    }
                    tracing::trace!("Swap queue full, waiting");
                    self.drain_disposals();
                    std::thread::sleep(self.poll_interval);
                }
            }
        }
    }

    fn drain_disposals(&mut self) -> usize {
        let mut destroyed = 0;
        while let Some(message) = self.disposals.try_pop() {
            if message.model.is_some() {
                destroyed += 1;
            }
            drop(message);
        }
        if destroyed > 0 {
            tracing::debug!("Destroyed {} displaced model(s)", destroyed);
        }
        destroyed
    }
}

/// Turn a load request into the swap message the real-time side will apply.
///
/// Missing files are expected (stale session paths) and logged at debug
/// level; files that exist but fail to load are logged as errors.
pub(crate) fn resolve_load(
    loader: &mut dyn ModelLoader,
    request: LoadRequest,
    policy: LoadFailurePolicy,
    max_block_size: usize,
) -> SwapMessage {
    let clear_on_failure = policy == LoadFailurePolicy::Clear;

    match request {
        LoadRequest::Clear => {
            tracing::debug!("Clearing model");
            SwapMessage::empty(LoadOutcome::Cleared, true)
        }
        LoadRequest::Oversized { len } => {
            tracing::error!(
                "Model path is too long ({} bytes, max {})",
                len,
                MAX_PATH_LEN - 1
            );
            SwapMessage::empty(LoadOutcome::Invalid, clear_on_failure)
        }
        LoadRequest::Load(path) => {
            if !path.as_path().exists() {
                tracing::debug!("Model file not found: '{}'", path);
                return SwapMessage::empty(LoadOutcome::NotFound, clear_on_failure);
            }

            tracing::debug!("Staging model change: '{}'", path);

            let result = catch_unwind(AssertUnwindSafe(|| loader.load(path.as_path())));
            match result {
                Ok(Ok(mut model)) => {
                    model.set_max_block_size(max_block_size);
                    tracing::info!("Loaded model '{}'", path);
                    SwapMessage::loaded(model, path)
                }
                Ok(Err(e)) => {
                    tracing::error!("Unable to load model from '{}': {}", path, e);
                    SwapMessage::empty(LoadOutcome::Invalid, clear_on_failure)
                }
                Err(_) => {
                    tracing::error!("Model loader panicked on '{}'", path);
                    SwapMessage::empty(LoadOutcome::Invalid, clear_on_failure)
                }
            }
        }
    }
}
