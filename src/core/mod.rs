//! # Core emitter.
//!
//! - [`EventEmitter`]: registration, removal, enumeration and dispatch
//! - [`WeakEmitter`]: non-owning handle for listeners that call back into their emitter
//! - [`EmitterBuilder`]: configuration plus scheduler injection
//! - [`EmitterConfig`]: error-event and panic-isolation settings
//!
//! The registry itself (`registry.rs`) is internal; all access goes through the emitter.

mod builder;
mod config;
mod emitter;
mod registry;

pub use builder::EmitterBuilder;
pub use config::EmitterConfig;
pub use emitter::{EventEmitter, WeakEmitter};
