//! # Emit payload (`Args`)
//!
//! [`Args`] carries whatever an emitter caller hands to its listeners: an ordered
//! list of positional values plus a set of named values. Values are type-erased
//! (`Any + Send + Sync`) and shared, so cloning an `Args` is a handful of `Arc` bumps.
//!
//! Listeners read values back with a typed lookup; a missing value and a value of
//! another type both yield `None`.
//!
//! ## Example
//! ```rust
//! use eventvisor::Args;
//!
//! let args = Args::new().with(1u32).with_named("data", 2i64);
//!
//! assert_eq!(args.get::<u32>(0), Some(&1));
//! assert_eq!(args.named::<i64>("data"), Some(&2));
//! assert_eq!(args.get::<String>(0), None);
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

type Value = Arc<dyn Any + Send + Sync>;

/// Positional and named arguments passed through `emit` to every listener.
#[derive(Clone, Default)]
pub struct Args {
    positional: Vec<Value>,
    named: Vec<(String, Value)>,
}

impl Args {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional value.
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.positional.push(Arc::new(value));
        self
    }

    /// Sets a named value, replacing any previous value under the same name.
    #[must_use]
    pub fn with_named<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        let name = name.into();
        let value: Value = Arc::new(value);
        match self.named.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.named.push((name, value)),
        }
        self
    }

    /// Returns the positional value at `index` if it has type `T`.
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.positional.get(index)?.downcast_ref::<T>()
    }

    /// Returns the named value `name` if it has type `T`.
    pub fn named<T: Any>(&self, name: &str) -> Option<&T> {
        self.named
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.downcast_ref::<T>())
    }

    /// Number of positional values.
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    /// `true` when there are neither positional nor named values.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Names of the named values, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named.iter().map(|(n, _)| n.as_str())
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("positional", &self.positional.len())
            .field("named", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_lookup_by_type() {
        let args = Args::new().with(7u8).with("seven".to_string());
        assert_eq!(args.len(), 2);
        assert_eq!(args.get::<u8>(0), Some(&7));
        assert_eq!(args.get::<String>(1).map(String::as_str), Some("seven"));
        assert_eq!(args.get::<u8>(1), None);
        assert_eq!(args.get::<u8>(5), None);
    }

    #[test]
    fn test_named_replaces_previous_value() {
        let args = Args::new().with_named("k", 1u32).with_named("k", 2u32);
        assert_eq!(args.named::<u32>("k"), Some(&2));
        assert_eq!(args.names().collect::<Vec<_>>(), vec!["k"]);
        assert_eq!(args.named::<u32>("missing"), None);
    }

    #[test]
    fn test_empty() {
        assert!(Args::new().is_empty());
        assert!(!Args::new().with_named("x", ()).is_empty());
        assert_eq!(Args::new().with_named("x", ()).len(), 0);
    }

    #[test]
    fn test_clone_shares_values() {
        let args = Args::new().with(vec![1, 2, 3]);
        let copy = args.clone();
        let a = args.get::<Vec<i32>>(0).map(|v| v as *const Vec<i32>);
        let b = copy.get::<Vec<i32>>(0).map(|v| v as *const Vec<i32>);
        assert_eq!(a, b);
    }
}
