//! Background motion worker.
//!
//! Spawns a thread that exclusively owns one `MotionController` and executes
//! requests from a bounded channel strictly one at a time, so two moves of the
//! same actuator can never overlap. A move in progress always runs to
//! completion.
//!
//! Each `MotionWorker` spawns exactly one thread that is shut down and joined
//! when the worker is dropped.
use crossbeam_channel as xch;
use servo_traits::{Servo, StateSink};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::command::Command;
use crate::controller::MotionController;
use crate::error::{Result, ServoError};

/// Work items accepted by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotionRequest {
    /// Move to the starting level and report.
    Init,
    /// Decoded level/duration.
    Move(Command),
    /// Raw `"<prefix> <level>:<duration>"` string.
    Raw(String),
    /// Re-send the current state.
    Refresh,
}

pub struct MotionWorker {
    tx: Option<xch::Sender<MotionRequest>>,
    completed: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
    /// Set on drop so queued requests are skipped instead of executed
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl MotionWorker {
    /// Move `controller` onto a worker thread with a queue of `capacity` requests.
    pub fn spawn<S, K>(mut controller: MotionController<S, K>, capacity: usize) -> Self
    where
        S: Servo + Send + 'static,
        K: StateSink + Send + 'static,
    {
        let (tx, rx) = xch::bounded::<MotionRequest>(capacity.max(1));
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let completed = Arc::new(AtomicU64::new(0));
        let completed_clone = completed.clone();
        let failed = Arc::new(AtomicU64::new(0));
        let failed_clone = failed.clone();

        let join_handle = std::thread::spawn(move || {
            // recv() fails once every sender is gone and the queue is drained
            while let Ok(req) = rx.recv() {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("motion worker received shutdown signal");
                    break;
                }
                let res = match &req {
                    MotionRequest::Init => controller.init(),
                    MotionRequest::Move(cmd) => controller.be_smart(cmd.level, cmd.duration_s),
                    MotionRequest::Raw(raw) => controller.handle_command(raw),
                    MotionRequest::Refresh => {
                        controller.refresh();
                        Ok(())
                    }
                };
                if let Err(e) = res {
                    failed_clone.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(error = %e, ?req, "motion request failed");
                }
                completed_clone.fetch_add(1, Ordering::Relaxed);
            }
            tracing::trace!("motion worker thread exiting cleanly");
        });

        Self {
            tx: Some(tx),
            completed,
            failed,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Queue a request, blocking while the queue is full.
    pub fn submit(&self, req: MotionRequest) -> Result<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| eyre::Report::new(ServoError::WorkerStopped))?;
        tx.send(req)
            .map_err(|_| eyre::Report::new(ServoError::WorkerStopped))
    }

    /// Queue a request without blocking. Returns `Ok(false)` when the queue is full.
    pub fn try_submit(&self, req: MotionRequest) -> Result<bool> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| eyre::Report::new(ServoError::WorkerStopped))?;
        match tx.try_send(req) {
            Ok(()) => Ok(true),
            Err(xch::TrySendError::Full(_)) => Ok(false),
            Err(xch::TrySendError::Disconnected(_)) => {
                Err(eyre::Report::new(ServoError::WorkerStopped))
            }
        }
    }

    /// Requests processed so far (successful or not).
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Requests that returned an error.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Execute everything already queued, then stop the thread.
    pub fn finish(mut self) {
        self.tx.take();
        self.join();
    }

    fn join(&mut self) {
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("motion worker joined"),
                Err(e) => tracing::warn!(?e, "motion worker panicked during shutdown"),
            }
        }
    }
}

impl Drop for MotionWorker {
    fn drop(&mut self) {
        // Skip whatever is still queued; the in-flight move finishes first.
        self.shutdown.store(true, Ordering::Relaxed);
        self.tx.take();
        self.join();
    }
}
