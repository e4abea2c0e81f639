use std::sync::Arc;

use crate::{
    core::{EmitterConfig, EventEmitter},
    scheduler::{DetachedScheduler, Scheduler, TokioScheduler},
};

/// Builder for constructing an [`EventEmitter`] with an explicit scheduler.
pub struct EmitterBuilder {
    cfg: EmitterConfig,
    scheduler: Option<Arc<dyn Scheduler>>,
}

impl EmitterBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: EmitterConfig) -> Self {
        Self {
            cfg,
            scheduler: None,
        }
    }

    /// Sets the scheduler deferred listener work is submitted to.
    ///
    /// The scheduler is shared, not owned: shutting it down is the caller's business.
    pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Builds and returns the emitter.
    ///
    /// Without an explicit scheduler, the ambient tokio runtime is resolved **once**, here:
    /// - inside a runtime → [`TokioScheduler`] bound to it
    /// - outside → [`DetachedScheduler`] (deferred listeners make `emit` fail with
    ///   [`SchedulerError::NoRuntime`](crate::SchedulerError::NoRuntime))
    pub fn build(self) -> EventEmitter {
        let scheduler = self.scheduler.unwrap_or_else(ambient_scheduler);
        EventEmitter::from_parts(self.cfg, scheduler)
    }
}

fn ambient_scheduler() -> Arc<dyn Scheduler> {
    match TokioScheduler::current() {
        Ok(sched) => Arc::new(sched),
        Err(_) => Arc::new(DetachedScheduler),
    }
}
