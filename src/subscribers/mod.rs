//! # Built-in collaborators.
//!
//! The emitter core reports nothing by itself; collaborators subscribe to its error
//! event instead.
//!
//! - [`LogWriter`]: reports listener failures through `tracing` (`logging` feature).

mod log;

pub use log::LogWriter;
