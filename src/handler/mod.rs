//! Handler module - the backend's operations.
//!
//! Provides:
//! - [`HandlerRegistry`] - the four optional operation slots
//! - [`ValueBuf`] - bounded output buffer for LOOKUP and FETCH
//! - result code constants shared with the host
//!
//! # Example
//!
//! ```
//! use table_api::handler::{HandlerRegistry, FOUND, NOT_FOUND};
//!
//! let mut registry = HandlerRegistry::new();
//!
//! registry.on_lookup(|_kind, key, value| {
//!     if key.to_bytes() == b"root" {
//!         value.set("admin@example.org").map_or(-1, |_| FOUND)
//!     } else {
//!         NOT_FOUND
//!     }
//! });
//! ```

mod registry;
mod value;

pub use registry::{
    CheckHandler, FetchHandler, HandlerRegistry, LookupHandler, Slot, UpdateHandler,
    DEFAULT_QUERY_RESULT, DEFAULT_UPDATE_RESULT, ERROR, FOUND, NOT_FOUND,
};
pub use value::{ValueBuf, DEFAULT_VALUE_CAPACITY};
