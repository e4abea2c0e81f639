//! # Schedulers for deferred listener work.
//!
//! - [`Scheduler`] is the extension point: "submit this future for eventual execution".
//! - [`TokioScheduler`] is the default, bound to a tokio runtime handle.
//! - [`DetachedScheduler`] stands in when no runtime exists; it rejects every submission.

mod runtime;
mod scheduler;

pub use runtime::TokioScheduler;
pub use scheduler::{Deferred, DetachedScheduler, Scheduler};
