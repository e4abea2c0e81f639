//! # Listener registry - event name to ordered listener set.
//!
//! ## Architecture
//! ```text
//! Registry
//!   └─ Mutex<State>
//!        ├─ events: BTreeMap<String, ListenerSet>
//!        │            └─ [Entry{key, listener, once, ticket}, ...]  (registration order)
//!        └─ next_ticket
//! ```
//!
//! ## Rules
//! - Keys are unique per event; re-registering a key replaces the entry in place.
//! - An event never touched reads as an empty set.
//! - The lock is held only for bookkeeping, never while a listener runs or is dropped:
//!   evicted entries leave the critical section before their destructors run.
//! - A one-shot entry is consumed by [`Registry::claim`], which succeeds only for the
//!   exact registration (ticket) that was snapshotted.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::error::RegistryError;
use crate::listeners::{Listener, ListenerKey};

/// One registration of a listener against an event.
#[derive(Clone, Debug)]
pub(crate) struct Entry {
    pub(crate) key: ListenerKey,
    pub(crate) listener: Listener,
    pub(crate) once: bool,
    pub(crate) ticket: u64,
}

/// Ordered, key-unique entries of one event.
#[derive(Default, Debug)]
struct ListenerSet {
    entries: Vec<Entry>,
}

impl ListenerSet {
    /// Inserts or replaces in place; returns the replaced entry.
    fn upsert(&mut self, entry: Entry) -> Option<Entry> {
        match self.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(slot) => Some(std::mem::replace(slot, entry)),
            None => {
                self.entries.push(entry);
                None
            }
        }
    }

    fn position(&self, key: ListenerKey) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }
}

#[derive(Default)]
struct State {
    events: BTreeMap<String, ListenerSet>,
    next_ticket: u64,
}

/// Thread-safe mapping from event name to listener set.
#[derive(Default)]
pub(crate) struct Registry {
    state: Mutex<State>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` under `event`, replacing an entry with the same key in place.
    pub(crate) fn insert(&self, event: &str, listener: Listener, once: bool) {
        let replaced = {
            let mut state = self.state.lock();
            let ticket = state.next_ticket;
            state.next_ticket += 1;

            let entry = Entry {
                key: listener.key(),
                listener,
                once,
                ticket,
            };
            state
                .events
                .entry(event.to_owned())
                .or_default()
                .upsert(entry)
        };
        drop(replaced);
    }

    /// Removes the entry keyed by `key`.
    pub(crate) fn remove(&self, event: &str, key: ListenerKey) -> Result<(), RegistryError> {
        let removed = {
            let mut state = self.state.lock();
            state.events.get_mut(event).and_then(|set| {
                let idx = set.position(key)?;
                Some(set.entries.remove(idx))
            })
        };
        match removed {
            Some(_) => Ok(()),
            None => Err(RegistryError::UnknownListener {
                event: event.to_owned(),
            }),
        }
    }

    /// Removes the one-shot entry `(key, ticket)` if it is still registered.
    ///
    /// Returns `true` if this call removed it, i.e. the caller owns its single invocation.
    pub(crate) fn claim(&self, event: &str, key: ListenerKey, ticket: u64) -> bool {
        let claimed = {
            let mut state = self.state.lock();
            state.events.get_mut(event).and_then(|set| {
                let idx = set.position(key)?;
                if set.entries[idx].ticket != ticket {
                    return None;
                }
                Some(set.entries.remove(idx))
            })
        };
        claimed.is_some()
    }

    /// Clears one event (its name stays known) or, with `None`, the whole mapping.
    pub(crate) fn clear(&self, event: Option<&str>) {
        let mut evicted: Vec<ListenerSet> = Vec::new();
        {
            let mut state = self.state.lock();
            match event {
                Some(name) => {
                    if let Some(set) = state.events.get_mut(name) {
                        evicted.push(std::mem::take(set));
                    }
                }
                None => evicted.extend(std::mem::take(&mut state.events).into_values()),
            }
        }
        drop(evicted);
    }

    /// Ordered copy of the entries of `event`.
    pub(crate) fn snapshot(&self, event: &str) -> Vec<Entry> {
        self.state
            .lock()
            .events
            .get(event)
            .map(|set| set.entries.clone())
            .unwrap_or_default()
    }

    pub(crate) fn listeners(&self, event: &str) -> Vec<Listener> {
        self.state
            .lock()
            .events
            .get(event)
            .map(|set| set.entries.iter().map(|e| e.listener.clone()).collect())
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, event: &str) -> usize {
        self.state
            .lock()
            .events
            .get(event)
            .map_or(0, |set| set.entries.len())
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.state.lock().events.keys().cloned().collect()
    }
}
