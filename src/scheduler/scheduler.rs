//! # Core scheduler trait
//!
//! `Scheduler` is the only seam between the emitter and asynchronous execution. The emitter
//! hands it a fully prepared `'static` future and never looks back: no join handle, no result.
//!
//! ## Contract
//! - `submit` must not block and must not poll the work inline.
//! - A scheduler that can no longer run work returns an error instead of dropping it silently;
//!   that error surfaces to the caller of `emit`.
//! - The scheduler is owned outside the emitter; the emitter only holds a shared handle.

use std::future::Future;
use std::pin::Pin;

use crate::error::SchedulerError;

/// Work submitted to a scheduler.
pub type Deferred = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Executes deferred listener work.
pub trait Scheduler: Send + Sync + 'static {
    /// Hands `work` over for eventual execution.
    fn submit(&self, work: Deferred) -> Result<(), SchedulerError>;

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Scheduler used when no async runtime was available at construction.
///
/// Every submission fails with [`SchedulerError::NoRuntime`]; purely synchronous
/// listeners are unaffected.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedScheduler;

impl Scheduler for DetachedScheduler {
    fn submit(&self, _work: Deferred) -> Result<(), SchedulerError> {
        Err(SchedulerError::NoRuntime)
    }

    fn name(&self) -> &'static str {
        "detached"
    }
}
