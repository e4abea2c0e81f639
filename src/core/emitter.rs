//! # Event emitter - registration and synchronous dispatch.
//!
//! [`EventEmitter`] maps event names to ordered listener sets and invokes them on `emit`.
//!
//! ## Dispatch
//! ```text
//! emit(event, args)
//!     │
//!     ├─► snapshot = registry[event].clone()          (lock held only here)
//!     │
//!     └─► for entry in snapshot (registration order):
//!            ├─ once? ──► claim(entry) ── lost ──► skip (already fired)
//!            ├─ call listener(&args)          (panics caught → ListenerError::Panicked)
//!            │     ├─ Ok(Done)           ──► next
//!            │     ├─ Ok(Deferred(fut))  ──► scheduler.submit(fut) ── Err ──► return Err(EmitError)
//!            │     └─ Err(err)           ──► emit(error_event, [err, event=...]) ──► next
//!            └─ ...
//! returns Ok(!snapshot.is_empty())
//! ```
//!
//! ## Rules
//! - **Snapshot isolation**: listeners added during an emit fire from the next emit on;
//!   listeners removed during an emit still fire within it (except consumed one-shots).
//! - **Error isolation**: a failing listener is neither removed nor retried; dispatch goes on.
//! - **No feedback loop**: failures of error-event listeners are swallowed.
//! - **Fire-and-forget**: deferred work is never awaited; its failures reach the error
//!   event once it runs, if the emitter is still alive.
//! - **Reentrancy**: every method takes `&self` and the registry lock is never held
//!   while a listener runs, so listeners may register, remove and emit freely.
//!   A listener that calls back into its own emitter should capture a [`WeakEmitter`]:
//!   a strong [`EventEmitter`] stored in the registry keeps the registry alive forever.
//! - **Rejected one-shots**: a `once` entry is consumed before its listener runs; if the
//!   scheduler then rejects its deferred work, the entry stays consumed.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use futures::FutureExt;

use crate::core::registry::Registry;
use crate::core::{EmitterBuilder, EmitterConfig};
use crate::error::{EmitError, ListenerError, RegistryError};
use crate::listeners::{Args, BoxListenerFuture, Listener, Reaction};
use crate::scheduler::Scheduler;

struct Inner {
    registry: Registry,
    scheduler: Arc<dyn Scheduler>,
    cfg: EmitterConfig,
}

/// In-process publish/subscribe registry.
///
/// Cheap to clone: clones are handles to the same registry.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use eventvisor::{Args, EventEmitter, Listener};
///
/// let ee = EventEmitter::new();
/// let seen = Arc::new(AtomicU32::new(0));
///
/// let s = Arc::clone(&seen);
/// ee.on("data", Listener::sync(move |args: &Args| {
///     s.fetch_add(*args.get::<u32>(0).unwrap_or(&0), Ordering::SeqCst);
///     Ok(())
/// }));
///
/// assert_eq!(ee.emit("data", Args::new().with(5u32)), Ok(true));
/// assert_eq!(ee.emit("nobody", Args::new()), Ok(false));
/// assert_eq!(seen.load(Ordering::SeqCst), 5);
/// ```
#[derive(Clone)]
pub struct EventEmitter {
    inner: Arc<Inner>,
}

impl EventEmitter {
    /// Creates an emitter with default configuration and the ambient scheduler.
    ///
    /// See [`EmitterBuilder::build`] for how the scheduler is resolved.
    #[must_use]
    pub fn new() -> Self {
        Self::builder(EmitterConfig::default()).build()
    }

    /// Creates a builder with the given configuration.
    #[must_use]
    pub fn builder(cfg: EmitterConfig) -> EmitterBuilder {
        EmitterBuilder::new(cfg)
    }

    pub(crate) fn from_parts(cfg: EmitterConfig, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: Registry::new(),
                scheduler,
                cfg,
            }),
        }
    }

    /// Registers `listener` for `event` and returns it.
    ///
    /// Registering the same listener again for the same event replaces its entry at the
    /// original position; it is still invoked once per emit.
    pub fn on(&self, event: &str, listener: Listener) -> Listener {
        self.inner.registry.insert(event, listener.clone(), false);
        listener
    }

    /// Registers `listener` to fire on the next emit of `event` only.
    ///
    /// The entry removes itself right before the listener runs. The returned value is the
    /// original listener, so it can be passed to [`remove_listener`](Self::remove_listener)
    /// before it fires.
    pub fn once(&self, event: &str, listener: Listener) -> Listener {
        self.inner.registry.insert(event, listener.clone(), true);
        listener
    }

    /// Returns a registration closure bound to `event`, equivalent to calling [`on`](Self::on).
    ///
    /// # Example
    /// ```rust
    /// use eventvisor::{EventEmitter, Listener};
    ///
    /// let ee = EventEmitter::new();
    /// let on_ready = ee.on_fn("ready");
    /// let l = on_ready(Listener::sync(|_| Ok(())));
    /// assert_eq!(ee.listeners("ready"), vec![l]);
    /// ```
    pub fn on_fn(&self, event: &str) -> impl Fn(Listener) -> Listener + Send + Sync + 'static {
        let emitter = self.clone();
        let event = event.to_owned();
        move |listener| emitter.on(&event, listener)
    }

    /// Returns a registration closure bound to `event`, equivalent to calling [`once`](Self::once).
    pub fn once_fn(&self, event: &str) -> impl Fn(Listener) -> Listener + Send + Sync + 'static {
        let emitter = self.clone();
        let event = event.to_owned();
        move |listener| emitter.once(&event, listener)
    }

    /// Invokes every listener registered for `event` at call time, in registration order.
    ///
    /// Returns `Ok(true)` if at least one listener was registered, `Ok(false)` otherwise.
    ///
    /// Listener failures never surface here. The only error is a scheduler refusing a
    /// listener's deferred work; dispatch stops at that listener.
    pub fn emit(&self, event: &str, args: Args) -> Result<bool, EmitError> {
        self.inner.emit(event, &args)
    }

    /// Shorthand for emitting `event` with no arguments.
    pub fn emit_unit(&self, event: &str) -> Result<bool, EmitError> {
        self.emit(event, Args::new())
    }

    /// Removes `listener` from `event`.
    ///
    /// Returns [`RegistryError::UnknownListener`] if it is not registered for that event.
    pub fn remove_listener(&self, event: &str, listener: &Listener) -> Result<(), RegistryError> {
        self.inner.registry.remove(event, listener.key())
    }

    /// Removes all listeners of `event`, or of every event when `None`.
    pub fn remove_all_listeners(&self, event: Option<&str>) {
        self.inner.registry.clear(event);
    }

    /// Listeners of `event` in registration order (original listeners, also for `once`).
    pub fn listeners(&self, event: &str) -> Vec<Listener> {
        self.inner.registry.listeners(event)
    }

    /// Number of listeners registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner.registry.count(event)
    }

    /// Returns `true` if `event` has at least one listener.
    pub fn has_listeners(&self, event: &str) -> bool {
        self.listener_count(event) > 0
    }

    /// Names of all events known to the registry, in sorted order.
    ///
    /// An event stays known after its listeners are removed one by one or through
    /// `remove_all_listeners(Some(..))`; `remove_all_listeners(None)` forgets every name.
    pub fn event_names(&self) -> Vec<String> {
        self.inner.registry.names()
    }

    /// The scheduler deferred listener work is submitted to.
    pub fn scheduler(&self) -> &Arc<dyn Scheduler> {
        &self.inner.scheduler
    }

    /// The configuration this emitter was built with.
    pub fn config(&self) -> &EmitterConfig {
        &self.inner.cfg
    }

    /// Creates a [`WeakEmitter`] that does not keep the registry alive.
    pub fn downgrade(&self) -> WeakEmitter {
        WeakEmitter {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Non-owning handle to an [`EventEmitter`].
///
/// Listeners that need to call back into the emitter they are registered on capture this
/// instead of a clone, so the registry is freed once the last [`EventEmitter`] is dropped.
///
/// # Example
/// ```rust
/// use eventvisor::{EventEmitter, Listener};
///
/// let ee = EventEmitter::new();
/// let weak = ee.downgrade();
/// ee.on("ping", Listener::sync(move |_| {
///     if let Some(ee) = weak.upgrade() {
///         ee.emit_unit("pong").map_err(|e| e.to_string())?;
///     }
///     Ok(())
/// }));
/// assert_eq!(ee.emit_unit("ping"), Ok(true));
/// ```
#[derive(Clone)]
pub struct WeakEmitter {
    inner: Weak<Inner>,
}

impl WeakEmitter {
    /// Returns a strong handle if the emitter is still alive.
    pub fn upgrade(&self) -> Option<EventEmitter> {
        self.inner.upgrade().map(|inner| EventEmitter { inner })
    }
}

impl fmt::Debug for WeakEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEmitter")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("events", &self.event_names())
            .field("scheduler", &self.inner.scheduler.name())
            .field("cfg", &self.inner.cfg)
            .finish()
    }
}

impl Inner {
    fn emit(self: &Arc<Self>, event: &str, args: &Args) -> Result<bool, EmitError> {
        let snapshot = self.registry.snapshot(event);
        if snapshot.is_empty() {
            return Ok(false);
        }

        for entry in &snapshot {
            if entry.once && !self.registry.claim(event, entry.key, entry.ticket) {
                continue;
            }
            match self.invoke(&entry.listener, args) {
                Ok(Reaction::Done) => {}
                Ok(Reaction::Deferred(fut)) => self.schedule(event, fut)?,
                Err(err) => self.report(event, err)?,
            }
        }
        Ok(true)
    }

    fn invoke(&self, listener: &Listener, args: &Args) -> Result<Reaction, ListenerError> {
        if !self.cfg.catch_panics {
            return listener.call(args);
        }
        panic::catch_unwind(AssertUnwindSafe(|| listener.call(args)))
            .unwrap_or_else(|payload| Err(ListenerError::from_panic(payload.as_ref())))
    }

    fn schedule(self: &Arc<Self>, event: &str, fut: BoxListenerFuture) -> Result<(), EmitError> {
        let weak: Weak<Inner> = Arc::downgrade(self);
        let event = event.to_owned();

        let work = async move {
            let outcome = AssertUnwindSafe(fut)
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(ListenerError::from_panic(payload.as_ref())));

            if let (Err(err), Some(inner)) = (outcome, weak.upgrade()) {
                // Nobody is left to receive a scheduling failure here.
                let _ = inner.report(&event, err);
            }
        };
        self.scheduler.submit(Box::pin(work))?;
        Ok(())
    }

    fn report(self: &Arc<Self>, event: &str, err: ListenerError) -> Result<(), EmitError> {
        if !self.cfg.reports_errors_for(event) {
            return Ok(());
        }
        let args = Args::new().with(err).with_named("event", event.to_owned());
        self.emit(&self.cfg.error_event, &args).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::DetachedScheduler;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn detached() -> EventEmitter {
        EventEmitter::builder(EmitterConfig::default())
            .with_scheduler(Arc::new(DetachedScheduler))
            .build()
    }

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, tag: &'static str) -> Listener {
        let log = Arc::clone(log);
        Listener::sync(move |_| {
            log.lock().push(tag);
            Ok(())
        })
    }

    #[test]
    fn test_emit_in_registration_order() {
        let ee = detached();
        let log = Arc::new(Mutex::new(Vec::new()));
        ee.on("e", recorder(&log, "a"));
        ee.on("e", recorder(&log, "b"));
        ee.on("e", recorder(&log, "c"));

        assert_eq!(ee.emit_unit("e"), Ok(true));
        assert_eq!(*log.lock(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_reentrant_emit_fires_once_listener_once() {
        let ee = detached();
        let log = Arc::new(Mutex::new(Vec::new()));

        let weak = ee.downgrade();
        let nested = Arc::new(AtomicBool::new(false));
        ee.on(
            "e",
            Listener::sync(move |_| {
                if nested.swap(true, Ordering::SeqCst) {
                    return Ok(());
                }
                match weak.upgrade() {
                    Some(ee) => ee.emit_unit("e").map(|_| ()).map_err(|e| e.to_string().into()),
                    None => Ok(()),
                }
            }),
        );
        ee.once("e", recorder(&log, "once"));

        // The outer emit's snapshot still holds the one-shot entry, but the nested emit
        // consumed it first.
        assert_eq!(ee.emit_unit("e"), Ok(true));
        assert_eq!(*log.lock(), vec!["once"]);
    }

    #[test]
    fn test_listener_added_during_emit_waits_for_next() {
        let ee = detached();
        let log = Arc::new(Mutex::new(Vec::new()));
        let late = recorder(&log, "late");

        let weak = ee.downgrade();
        ee.on(
            "e",
            Listener::sync(move |_| {
                if let Some(ee) = weak.upgrade() {
                    ee.on("e", late.clone());
                }
                Ok(())
            }),
        );

        ee.emit_unit("e").expect("emit");
        assert!(log.lock().is_empty());
        ee.emit_unit("e").expect("emit");
        assert_eq!(*log.lock(), vec!["late"]);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let ee = detached();
        let log = Arc::new(Mutex::new(Vec::new()));
        let errors = Arc::new(Mutex::new(Vec::new()));

        ee.on("e", Listener::sync(|_| panic!("listener blew up")));
        ee.on("e", recorder(&log, "after"));
        let sink = Arc::clone(&errors);
        ee.on(
            "error",
            Listener::sync(move |args| {
                if let Some(err) = args.get::<ListenerError>(0) {
                    sink.lock().push(err.clone());
                }
                Ok(())
            }),
        );

        assert_eq!(ee.emit_unit("e"), Ok(true));
        assert_eq!(*log.lock(), vec!["after"]);
        assert_eq!(
            *errors.lock(),
            vec![ListenerError::Panicked {
                info: "listener blew up".into()
            }]
        );
        assert_eq!(ee.listener_count("e"), 2);
    }

    #[test]
    fn test_failing_error_listener_does_not_loop() {
        let ee = detached();
        ee.on("error", Listener::sync(|_| Err(ListenerError::fail("again"))));
        ee.on("e", Listener::sync(|_| Err(ListenerError::fail("first"))));

        assert_eq!(ee.emit_unit("e"), Ok(true));
        assert_eq!(ee.emit_unit("error"), Ok(true));
    }

    #[test]
    fn test_emit_errors_disabled() {
        let ee = EventEmitter::builder(EmitterConfig {
            emit_errors: false,
            ..EmitterConfig::default()
        })
        .with_scheduler(Arc::new(DetachedScheduler))
        .build();
        let log = Arc::new(Mutex::new(Vec::new()));
        ee.on("error", recorder(&log, "error"));
        ee.on("e", Listener::sync(|_| Err("nope".into())));

        assert_eq!(ee.emit_unit("e"), Ok(true));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_deferred_without_runtime_fails_emit() {
        let ee = detached();
        let log = Arc::new(Mutex::new(Vec::new()));
        ee.on("e", Listener::deferred(|_| async { Ok(()) }));
        ee.on("e", recorder(&log, "after"));

        assert_eq!(
            ee.emit_unit("e"),
            Err(EmitError::Scheduler(
                crate::error::SchedulerError::NoRuntime
            ))
        );
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_registration_closures() {
        let ee = detached();
        let log = Arc::new(Mutex::new(Vec::new()));
        let on_e = ee.on_fn("e");
        let once_e = ee.once_fn("e");

        let a = on_e(recorder(&log, "on"));
        let b = once_e(recorder(&log, "once"));
        assert_eq!(ee.listeners("e"), vec![a, b]);

        ee.emit_unit("e").expect("emit");
        ee.emit_unit("e").expect("emit");
        assert_eq!(*log.lock(), vec!["on", "once", "on"]);
    }

    #[test]
    fn test_debug_lists_events() {
        let ee = detached();
        ee.on("ready", Listener::sync(|_| Ok(())));
        let out = format!("{ee:?}");
        assert!(out.contains("ready"));
        assert!(out.contains("detached"));
    }

    #[test]
    fn test_weak_handle_releases_registry() {
        let ee = detached();
        let sentinel = Arc::new(());
        let watch = Arc::downgrade(&sentinel);

        let weak = ee.downgrade();
        ee.on(
            "e",
            Listener::sync(move |_| {
                if let Some(ee) = weak.upgrade() {
                    ee.emit_unit("other").map_err(|e| e.to_string())?;
                }
                Ok(())
            }),
        );
        ee.on(
            "e",
            Listener::sync(move |_| {
                let _ = &sentinel;
                Ok(())
            }),
        );
        assert_eq!(ee.emit_unit("e"), Ok(true));

        let weak = ee.downgrade();
        drop(ee);
        assert!(weak.upgrade().is_none());
        assert!(watch.upgrade().is_none());
    }

    #[test]
    fn test_rejected_once_stays_consumed() {
        let ee = detached();
        ee.once("e", Listener::deferred(|_| async { Ok(()) }));

        assert!(ee.emit_unit("e").is_err());
        assert_eq!(ee.listener_count("e"), 0);
        assert_eq!(ee.emit_unit("e"), Ok(false));
    }

    struct CallsBack(WeakEmitter);

    impl Drop for CallsBack {
        fn drop(&mut self) {
            if let Some(ee) = self.0.upgrade() {
                let _ = ee.listener_count("other");
            }
        }
    }

    fn holding(guard: CallsBack) -> Listener {
        Listener::sync(move |_| {
            let _ = &guard;
            Ok(())
        })
    }

    #[test]
    fn test_listener_dropped_outside_lock() {
        let ee = detached();

        ee.on("e", holding(CallsBack(ee.downgrade())));
        ee.remove_all_listeners(None);

        ee.on("e", holding(CallsBack(ee.downgrade())));
        ee.remove_all_listeners(Some("e"));

        let l = ee.once("e", holding(CallsBack(ee.downgrade())));
        drop(l);
        assert_eq!(ee.emit_unit("e"), Ok(true));
        assert_eq!(ee.listener_count("e"), 0);
    }
}
