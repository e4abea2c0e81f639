//! # Emitter configuration.
//!
//! Provides [`EmitterConfig`], the settings shared by every handle of one emitter.
//!
//! Config is used in one place: `EventEmitter::builder(config)`.

use std::borrow::Cow;

/// Configuration for an [`EventEmitter`](crate::EventEmitter).
///
/// ## Field semantics
/// - `error_event`: name of the event listener failures are re-emitted on
/// - `emit_errors`: re-emit listener failures on `error_event` (`false` = swallow silently)
/// - `catch_panics`: isolate panicking listeners like erroring ones (`false` = panic unwinds through `emit`)
///
/// ## Notes
/// All fields are public; use struct update syntax over `Default` to override one.
#[derive(Clone, Debug)]
pub struct EmitterConfig {
    /// Conventional error event.
    ///
    /// Listeners registered here receive `Args` with the [`ListenerError`](crate::ListenerError)
    /// at position 0 and the originating event name under `"event"`.
    pub error_event: Cow<'static, str>,

    /// Whether listener failures are re-emitted on [`error_event`](Self::error_event).
    ///
    /// Failures of error-event listeners are never re-emitted.
    pub emit_errors: bool,

    /// Whether a panic in a synchronous listener is caught and treated as a failure.
    ///
    /// Deferred work is always isolated, since it runs on the scheduler.
    pub catch_panics: bool,
}

impl EmitterConfig {
    /// Returns `true` if failures raised while dispatching `event` should be re-emitted.
    #[inline]
    pub fn reports_errors_for(&self, event: &str) -> bool {
        self.emit_errors && event != self.error_event
    }
}

impl Default for EmitterConfig {
    /// Default configuration:
    ///
    /// - `error_event = "error"`
    /// - `emit_errors = true`
    /// - `catch_panics = true`
    fn default() -> Self {
        Self {
            error_event: Cow::Borrowed("error"),
            emit_errors: true,
            catch_panics: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_event_never_reports_itself() {
        let cfg = EmitterConfig::default();
        assert!(cfg.reports_errors_for("data"));
        assert!(!cfg.reports_errors_for("error"));
    }

    #[test]
    fn test_disabled_reporting() {
        let cfg = EmitterConfig {
            emit_errors: false,
            ..EmitterConfig::default()
        };
        assert!(!cfg.reports_errors_for("data"));
    }

    #[test]
    fn test_custom_error_event() {
        let cfg = EmitterConfig {
            error_event: "failure".into(),
            ..EmitterConfig::default()
        };
        assert!(cfg.reports_errors_for("error"));
        assert!(!cfg.reports_errors_for("failure"));
    }
}
