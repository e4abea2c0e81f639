//! # LogWriter — error-event reporter
//!
//! A minimal collaborator that listens on the emitter's error event and reports each
//! listener failure through `tracing`. Use it for tests, demos, or as a template for
//! a real reporter. The emitter itself never logs.
//!
//! ## Example output (with a `tracing_subscriber::fmt` subscriber installed)
//! ```text
//! WARN eventvisor: listener failure event="data" label="listener_failed" message="error: boom"
//! WARN eventvisor: listener failure event="data" label="listener_panicked" message="panic: oops"
//! ```

use crate::core::EventEmitter;
use crate::error::ListenerError;
use crate::listeners::{Args, Listener};

/// Error-event writer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Registers a reporting listener on `emitter`'s error event and returns it,
    /// so it can be removed again.
    pub fn attach(self, emitter: &EventEmitter) -> Listener {
        emitter.on(&emitter.config().error_event, self.listener())
    }

    /// Builds the reporting listener without registering it.
    pub fn listener(self) -> Listener {
        Listener::sync(|args| {
            write(args);
            Ok(())
        })
    }
}

fn write(args: &Args) {
    let event = args.named::<String>("event").map_or("unknown", String::as_str);
    match args.get::<ListenerError>(0) {
        Some(err) => tracing::warn!(
            target: "eventvisor",
            event,
            label = err.as_label(),
            message = %err.as_message(),
            "listener failure"
        ),
        None => tracing::warn!(target: "eventvisor", event, "error event without ListenerError payload"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EmitterConfig, scheduler::DetachedScheduler};
    use std::sync::Arc;

    #[test]
    fn test_attach_registers_on_error_event() {
        let ee = EventEmitter::builder(EmitterConfig {
            error_event: "failure".into(),
            ..EmitterConfig::default()
        })
        .with_scheduler(Arc::new(DetachedScheduler))
        .build();

        let l = LogWriter::new().attach(&ee);
        assert_eq!(ee.listeners("failure"), vec![l.clone()]);

        ee.on("data", Listener::sync(|_| Err("boom".into())));
        assert_eq!(ee.emit_unit("data"), Ok(true));
        assert_eq!(ee.emit("failure", Args::new().with(1u8)), Ok(true));

        assert!(ee.remove_listener("failure", &l).is_ok());
    }
}
