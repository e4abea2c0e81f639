//! # eventvisor
//!
//! **Eventvisor** is an in-process publish/subscribe registry for Rust.
//!
//! Callers register listeners under named events and trigger synchronous dispatch to
//! every listener registered for that event at emit time. Listeners may hand back a
//! future instead of finishing inline; the emitter passes it to a scheduler and moves on.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     on("data", l1)   once("data", l2)   on("error", e1)
//!            │                │                  │
//!            ▼                ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventEmitter (cheap-clone handle)                                │
//! │  - Registry: event name → ordered, key-unique listener set        │
//! │  - Scheduler: where deferred listener work runs                   │
//! │  - EmitterConfig: error event name, panic isolation               │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ emit("data", args)
//!        ▼
//!   snapshot ──► l1(&args) ──► l2(&args) ──► ...
//!                   │             │
//!                   │ Err/panic   │ Reaction::Deferred(fut)
//!                   ▼             ▼
//!         emit("error", [err])  scheduler.submit(fut) ──► runs later
//!                                                         └─ Err/panic ──► emit("error", [err])
//! ```
//!
//! ### Lifecycle of a one-shot listener
//! ```text
//! once(event, l) ──► entry{once, ticket}
//! emit(event)    ──► claim(entry) ── won ──► l(&args)
//!                                  └ lost ─► skip (a nested emit already fired it)
//! ```
//!
//! ## Features
//! | Area              | Description                                                      | Key types / traits                        |
//! |-------------------|------------------------------------------------------------------|-------------------------------------------|
//! | **Registry**      | Register, remove, enumerate and emit named events.               | [`EventEmitter`]                          |
//! | **Listeners**     | Identity-carrying callables, sync or deferred.                   | [`Listener`], [`Reaction`], [`Args`]      |
//! | **Scheduling**    | Pluggable execution of deferred listener work.                   | [`Scheduler`], [`TokioScheduler`]         |
//! | **Errors**        | Typed errors for listeners, registry and scheduling.             | [`ListenerError`], [`EmitError`]          |
//! | **Configuration** | Error-event convention and panic isolation.                      | [`EmitterConfig`], [`EmitterBuilder`]     |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] that reports listener failures via `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventvisor::{Args, EventEmitter, Listener, ListenerError, TokioScheduler};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scheduler = Arc::new(TokioScheduler::current()?);
//!     let ee = EventEmitter::builder(Default::default())
//!         .with_scheduler(scheduler.clone())
//!         .build();
//!
//!     // Synchronous listener
//!     ee.on("greet", Listener::sync(|args: &Args| {
//!         println!("hello, {}", args.get::<&str>(0).copied().unwrap_or("stranger"));
//!         Ok(())
//!     }));
//!
//!     // Deferred listener, fires once
//!     ee.once("greet", Listener::deferred(|_args: &Args| async move {
//!         println!("hello from the scheduler");
//!         Ok::<_, ListenerError>(())
//!     }));
//!
//!     assert!(ee.emit("greet", Args::new().with("world"))?);
//!     scheduler.wait_idle().await;
//!     assert_eq!(ee.listener_count("greet"), 1);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod listeners;
mod scheduler;

#[cfg(feature = "logging")]
mod subscribers;

// ---- Public re-exports ----

pub use core::{EmitterBuilder, EmitterConfig, EventEmitter, WeakEmitter};
pub use error::{EmitError, ListenerError, RegistryError, SchedulerError};
pub use listeners::{Args, BoxListenerFuture, Listener, ListenerKey, Reaction};
pub use scheduler::{Deferred, DetachedScheduler, Scheduler, TokioScheduler};

// Optional: expose a built-in error-event reporter.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
