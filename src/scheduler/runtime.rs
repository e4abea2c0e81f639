//! # Tokio-backed scheduler
//!
//! [`TokioScheduler`] spawns deferred work onto a tokio runtime through a
//! [`TaskTracker`], so callers can wait for in-flight work to drain, and a
//! [`CancellationToken`], so shutdown both rejects new work and stops what is running.
//!
//! ## Lifecycle
//! ```text
//! submit(work) ──► token cancelled? ──► yes ─► Err(SchedulerError::Closed)
//!                        │
//!                        no
//!                        ▼
//!           tracker.spawn_on(select { token.cancelled(), work }, handle)
//! ```

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::error::SchedulerError;
use crate::scheduler::{Deferred, Scheduler};

/// Scheduler running deferred work on a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
    tracker: TaskTracker,
    token: CancellationToken,
}

impl TokioScheduler {
    /// Creates a scheduler spawning onto `handle`.
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            tracker: TaskTracker::new(),
            token: CancellationToken::new(),
        }
    }

    /// Resolves the ambient runtime of the calling thread.
    ///
    /// Returns [`SchedulerError::NoRuntime`] when called outside a tokio runtime.
    pub fn current() -> Result<Self, SchedulerError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| SchedulerError::NoRuntime)
    }

    /// Cancels in-flight work and rejects further submissions.
    pub fn shutdown(&self) {
        self.token.cancel();
        self.tracker.close();
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) was called.
    pub fn is_shutdown(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Number of submitted tasks that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Waits until every submitted task has finished.
    ///
    /// Work submitted while waiting is waited for as well.
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        if !self.token.is_cancelled() {
            self.tracker.reopen();
        }
    }
}

impl Scheduler for TokioScheduler {
    /// Spawns `work` on the tracked runtime.
    ///
    /// Returns [`SchedulerError::Closed`] after [`TokioScheduler::shutdown`], including
    /// when the shutdown races this call.
    fn submit(&self, work: Deferred) -> Result<(), SchedulerError> {
        if self.token.is_cancelled() {
            return Err(SchedulerError::Closed);
        }
        let token = self.token.clone();
        self.tracker.spawn_on(
            async move {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {}
                    _ = work => {}
                }
            },
            &self.handle,
        );
        // A shutdown that lands between the check and the spawn cancels the task before
        // its first poll, so the work never runs and must be reported as rejected.
        if self.token.is_cancelled() {
            return Err(SchedulerError::Closed);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "tokio"
    }
}
