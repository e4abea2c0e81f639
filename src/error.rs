//! Error types used by the emitter, its listeners and its scheduler.
//!
//! This module defines four error enums:
//!
//! - [`ListenerError`] — a listener failed while being invoked (or while its deferred work ran).
//! - [`RegistryError`] — a registry operation was called with arguments it cannot honor.
//! - [`SchedulerError`] — the scheduler refused deferred work.
//! - [`EmitError`] — what [`EventEmitter::emit`](crate::EventEmitter::emit) surfaces to its caller.
//!
//! The types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use thiserror::Error;

/// # Errors produced by listener invocations.
///
/// These never escape [`emit`](crate::EventEmitter::emit): they are isolated per listener
/// and optionally re-emitted on the error event.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// The listener returned an error.
    #[error("listener failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// The listener panicked; the payload was caught and converted.
    #[error("listener panicked: {info}")]
    Panicked {
        /// Panic message (or `"unknown panic"` for non-string payloads).
        info: String,
    },
}

impl ListenerError {
    /// Shorthand for [`ListenerError::Failed`].
    ///
    /// # Example
    /// ```
    /// use eventvisor::ListenerError;
    ///
    /// let err = ListenerError::fail("boom");
    /// assert_eq!(err.to_string(), "listener failed: boom");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        ListenerError::Failed {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Failed { .. } => "listener_failed",
            ListenerError::Panicked { .. } => "listener_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ListenerError::Failed { error } => format!("error: {error}"),
            ListenerError::Panicked { info } => format!("panic: {info}"),
        }
    }

    /// Converts a caught panic payload into [`ListenerError::Panicked`].
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send + 'static)) -> Self {
        let info = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        ListenerError::Panicked { info }
    }
}

impl From<String> for ListenerError {
    fn from(error: String) -> Self {
        ListenerError::Failed { error }
    }
}

impl From<&str> for ListenerError {
    fn from(error: &str) -> Self {
        ListenerError::fail(error)
    }
}

/// # Errors produced by registry operations.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// `remove_listener` was called with an identity not registered for the event.
    #[error("listener is not registered for event {event:?}")]
    UnknownListener {
        /// The event the lookup was made against.
        event: String,
    },
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventvisor::RegistryError;
    ///
    /// let err = RegistryError::UnknownListener { event: "ready".into() };
    /// assert_eq!(err.as_label(), "registry_unknown_listener");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::UnknownListener { .. } => "registry_unknown_listener",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegistryError::UnknownListener { event } => {
                format!("unknown listener for event={event}")
            }
        }
    }
}

/// # Errors produced when submitting deferred work to a scheduler.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// The scheduler has been shut down and accepts no more work.
    #[error("scheduler is shut down")]
    Closed,

    /// No async runtime was available when the scheduler was resolved.
    #[error("no async runtime available to run deferred listener work")]
    NoRuntime,
}

impl SchedulerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SchedulerError::Closed => "scheduler_closed",
            SchedulerError::NoRuntime => "scheduler_no_runtime",
        }
    }
}

/// # Errors surfaced by `emit` to its caller.
///
/// Listener failures are never part of this type; only environment problems are.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    /// A listener's deferred result could not be handed to the scheduler.
    #[error("failed to schedule deferred listener work: {0}")]
    Scheduler(#[from] SchedulerError),
}

impl EmitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitError::Scheduler(e) => e.as_label(),
        }
    }
}
