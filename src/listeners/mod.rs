//! # Listener abstraction and emit payload.
//!
//! - [`Listener`] is an identity-carrying callable, shared as an `Arc` internally.
//! - [`Reaction`] tells the dispatch loop whether a listener finished or deferred work.
//! - [`Args`] is the positional/named payload passed through `emit`.

mod args;
mod listener;

pub use args::Args;
pub use listener::{BoxListenerFuture, Listener, ListenerKey, Reaction};
