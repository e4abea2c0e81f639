//! # Function-backed listener (`Listener`)
//!
//! [`Listener`] wraps a closure `F: Fn(&Args) -> Result<Reaction, ListenerError>` behind an `Arc`.
//! The address of that shared closure is the listener's **identity** ([`ListenerKey`]):
//! clones of a `Listener` are the same listener, two separately built listeners never are,
//! even when they wrap identical code.
//!
//! ## Reactions
//! - [`Reaction::Done`]: the listener finished its work synchronously.
//! - [`Reaction::Deferred`]: the listener produced a future; the emitter hands it to its
//!   scheduler and does not wait for it.
//!
//! ## Example
//! ```rust
//! use eventvisor::{Args, Listener, ListenerError};
//!
//! let sync = Listener::sync(|args: &Args| {
//!     println!("got {:?}", args.get::<u32>(0));
//!     Ok(())
//! });
//!
//! let deferred = Listener::deferred(|_args: &Args| async move {
//!     // async work...
//!     Ok::<_, ListenerError>(())
//! });
//!
//! assert_eq!(sync, sync.clone());
//! assert_ne!(sync, deferred);
//! ```

use std::fmt;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::pin::Pin;
use std::sync::Arc;

use crate::error::ListenerError;
use crate::listeners::Args;

/// Boxed future produced by a deferred listener.
pub type BoxListenerFuture = Pin<Box<dyn Future<Output = Result<(), ListenerError>> + Send + 'static>>;

type ListenerFn = dyn Fn(&Args) -> Result<Reaction, ListenerError> + Send + Sync + 'static;

/// What a listener hands back to the dispatch loop.
pub enum Reaction {
    /// Work is complete.
    Done,
    /// Work continues in this future, to be run by the emitter's scheduler.
    Deferred(BoxListenerFuture),
}

impl Reaction {
    /// Wraps a future into [`Reaction::Deferred`].
    pub fn deferred<Fut>(fut: Fut) -> Self
    where
        Fut: Future<Output = Result<(), ListenerError>> + Send + 'static,
    {
        Reaction::Deferred(Box::pin(fut))
    }
}

impl fmt::Debug for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reaction::Done => f.write_str("Done"),
            Reaction::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

/// Identity of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerKey(usize);

/// A callable registered against an event.
#[derive(Clone)]
pub struct Listener {
    f: Arc<ListenerFn>,
}

impl Listener {
    /// Creates a listener from a closure that decides its own [`Reaction`].
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Args) -> Result<Reaction, ListenerError> + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Creates a listener that always completes synchronously.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&Args) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        Self::new(move |args| f(args).map(|()| Reaction::Done))
    }

    /// Creates a listener whose work is a future, built fresh on every invocation.
    ///
    /// The closure runs synchronously inside `emit` (so it can copy what it needs out of
    /// [`Args`]); the future it returns runs later on the scheduler.
    pub fn deferred<F, Fut>(f: F) -> Self
    where
        F: Fn(&Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ListenerError>> + Send + 'static,
    {
        Self::new(move |args| Ok(Reaction::deferred(f(args))))
    }

    /// Returns this listener's identity.
    pub fn key(&self) -> ListenerKey {
        ListenerKey(Arc::as_ptr(&self.f) as *const () as usize)
    }

    /// Invokes the listener.
    pub fn call(&self, args: &Args) -> Result<Reaction, ListenerError> {
        (self.f)(args)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Listener {}

impl Hash for Listener {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener").field(&self.key()).finish()
    }
}
