//! Handler registry holding the four backend operations.
//!
//! Each slot is either unbound or bound to a closure of a fixed shape:
//!
//! | Slot | Signature | Unbound result |
//! |---|---|---|
//! | update | `() -> i32` | `1` (nothing to refresh) |
//! | check | `(kind, key) -> i32` | `-1` |
//! | lookup | `(kind, key, &mut ValueBuf) -> i32` | `-1` |
//! | fetch | `(kind, &mut ValueBuf) -> i32` | `-1` |
//!
//! Binding a slot again replaces the previous closure.
//!
//! # Example
//!
//! ```
//! use table_api::handler::{HandlerRegistry, ValueBuf, FOUND, NOT_FOUND};
//!
//! let mut registry = HandlerRegistry::new();
//! registry.on_check(|_kind, key| if key.to_bytes() == b"a" { FOUND } else { NOT_FOUND });
//!
//! assert_eq!(registry.check(0, c"a"), FOUND);
//! assert_eq!(registry.check(0, c"b"), NOT_FOUND);
//! assert_eq!(registry.fetch(0, &mut ValueBuf::default()), -1);
//! ```

use std::ffi::CStr;
use std::fmt;

use super::ValueBuf;

/// Success / found. For LOOKUP and FETCH the value is sent along.
pub const FOUND: i32 = 1;

/// Not found / false.
pub const NOT_FOUND: i32 = 0;

/// Backend error, or operation not supported.
pub const ERROR: i32 = -1;

/// Result of an UPDATE with no handler bound.
pub const DEFAULT_UPDATE_RESULT: i32 = FOUND;

/// Result of CHECK, LOOKUP or FETCH with no handler bound.
pub const DEFAULT_QUERY_RESULT: i32 = ERROR;

/// Refresh handler.
pub type UpdateHandler = Box<dyn FnMut() -> i32 + Send>;

/// Existence-check handler, called with the operation kind and key.
pub type CheckHandler = Box<dyn FnMut(i32, &CStr) -> i32 + Send>;

/// Lookup handler; writes the value for `key` into the buffer.
pub type LookupHandler = Box<dyn FnMut(i32, &CStr, &mut ValueBuf) -> i32 + Send>;

/// Fetch handler; writes the next value of `kind` into the buffer.
pub type FetchHandler = Box<dyn FnMut(i32, &mut ValueBuf) -> i32 + Send>;

/// Names of the four slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Update,
    Check,
    Lookup,
    Fetch,
}

/// The backend's operations.
#[derive(Default)]
pub struct HandlerRegistry {
    update: Option<UpdateHandler>,
    check: Option<CheckHandler>,
    lookup: Option<LookupHandler>,
    fetch: Option<FetchHandler>,
}

impl HandlerRegistry {
    /// Create a registry with every slot unbound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the update operation.
    pub fn on_update<F>(&mut self, handler: F)
    where
        F: FnMut() -> i32 + Send + 'static,
    {
        self.update = Some(Box::new(handler));
    }

    /// Bind the check operation.
    pub fn on_check<F>(&mut self, handler: F)
    where
        F: FnMut(i32, &CStr) -> i32 + Send + 'static,
    {
        self.check = Some(Box::new(handler));
    }

    /// Bind the lookup operation.
    pub fn on_lookup<F>(&mut self, handler: F)
    where
        F: FnMut(i32, &CStr, &mut ValueBuf) -> i32 + Send + 'static,
    {
        self.lookup = Some(Box::new(handler));
    }

    /// Bind the fetch operation.
    pub fn on_fetch<F>(&mut self, handler: F)
    where
        F: FnMut(i32, &mut ValueBuf) -> i32 + Send + 'static,
    {
        self.fetch = Some(Box::new(handler));
    }

    /// Whether a slot has a handler.
    pub fn is_bound(&self, slot: Slot) -> bool {
        match slot {
            Slot::Update => self.update.is_some(),
            Slot::Check => self.check.is_some(),
            Slot::Lookup => self.lookup.is_some(),
            Slot::Fetch => self.fetch.is_some(),
        }
    }

    /// Run the update operation.
    pub fn update(&mut self) -> i32 {
        match &mut self.update {
            Some(handler) => handler(),
            None => DEFAULT_UPDATE_RESULT,
        }
    }

    /// Run the check operation.
    pub fn check(&mut self, kind: i32, key: &CStr) -> i32 {
        match &mut self.check {
            Some(handler) => handler(kind, key),
            None => DEFAULT_QUERY_RESULT,
        }
    }

    /// Run the lookup operation.
    pub fn lookup(&mut self, kind: i32, key: &CStr, value: &mut ValueBuf) -> i32 {
        match &mut self.lookup {
            Some(handler) => handler(kind, key, value),
            None => DEFAULT_QUERY_RESULT,
        }
    }

    /// Run the fetch operation.
    pub fn fetch(&mut self, kind: i32, value: &mut ValueBuf) -> i32 {
        match &mut self.fetch {
            Some(handler) => handler(kind, value),
            None => DEFAULT_QUERY_RESULT,
        }
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("update", &self.update.is_some())
            .field("check", &self.check.is_some())
            .field("lookup", &self.lookup.is_some())
            .field("fetch", &self.fetch.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbound_defaults() {
        let mut registry = HandlerRegistry::new();
        let mut value = ValueBuf::default();

        assert_eq!(registry.update(), 1);
        assert_eq!(registry.check(0, c"k"), -1);
        assert_eq!(registry.lookup(0, c"k", &mut value), -1);
        assert_eq!(registry.fetch(0, &mut value), -1);
        assert!(value.is_empty());
    }

    #[test]
    fn test_bound_handlers_are_called() {
        let mut registry = HandlerRegistry::new();
        registry.on_update(|| 0);
        registry.on_lookup(|kind, key, value| {
            assert_eq!(kind, 2);
            assert_eq!(key.to_bytes(), b"k");
            value.set("x").map(|_| FOUND).unwrap_or(ERROR)
        });

        let mut value = ValueBuf::default();
        assert_eq!(registry.update(), 0);
        assert_eq!(registry.lookup(2, c"k", &mut value), FOUND);
        assert_eq!(value.as_bytes(), b"x");
    }

    #[test]
    fn test_rebinding_keeps_last() {
        let mut registry = HandlerRegistry::new();
        registry.on_check(|_, _| 0);
        registry.on_check(|_, _| 1);
        registry.on_check(|_, _| -7);

        assert_eq!(registry.check(0, c"any"), -7);
    }

    #[test]
    fn test_handlers_keep_state() {
        let mut registry = HandlerRegistry::new();
        let mut calls = 0;
        registry.on_fetch(move |_, value| {
            calls += 1;
            value.set(&calls.to_string()).map(|_| FOUND).unwrap_or(ERROR)
        });

        let mut value = ValueBuf::default();
        registry.fetch(0, &mut value);
        registry.fetch(0, &mut value);
        assert_eq!(value.as_bytes(), b"2");
    }

    #[test]
    fn test_is_bound() {
        let mut registry = HandlerRegistry::new();
        assert!(!registry.is_bound(Slot::Fetch));
        registry.on_fetch(|_, _| NOT_FOUND);
        assert!(registry.is_bound(Slot::Fetch));
        assert!(!registry.is_bound(Slot::Update));
        assert!(format!("{:?}", registry).contains("fetch: true"));
    }
}
