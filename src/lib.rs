//! # table-api
//!
//! Rust SDK for writing mail-server table backends.
//!
//! A table backend is a child process that answers key lookups for its
//! host (aliases, domains, credentials, ...). The host talks to it over a
//! socketpair on file descriptor 0 using small binary messages.
//!
//! ## Protocol
//!
//! - **OPEN** (version): handshake, answered with an empty OK
//! - **UPDATE**: refresh the backend's data, answered with a result code
//! - **CHECK** (kind, key): existence check, answered with a result code
//! - **LOOKUP** (kind, key): answered with a result code and, when found, the value
//! - **FETCH** (kind): answered with a result code and, when found, a value
//! - **CLOSE**: stop serving, no answer
//!
//! Result codes: `1` found, `0` not found, negative for errors or
//! operations the backend does not implement.
//!
//! Any malformed message is a protocol violation: the session stops with
//! [`TableError::Protocol`] and the process is expected to exit.
//!
//! ## Example
//!
//! ```ignore
//! use table_api::TableApi;
//! use table_api::handler::{FOUND, NOT_FOUND};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     TableApi::new()
//!         .on_lookup(|_kind, key, value| match key.to_bytes() {
//!             b"root" => value.set("admin@example.org").map_or(-1, |_| FOUND),
//!             _ => NOT_FOUND,
//!         })
//!         .dispatch_stdio_or_exit()
//!         .await;
//! }
//! ```

pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod protocol;
pub mod service;
pub mod session;
pub mod transport;

mod api;

pub use api::TableApi;
pub use error::{ProtocolError, TableError, ValueError};
pub use handler::{HandlerRegistry, ValueBuf};
pub use service::TableService;
pub use session::{Session, SessionConfig, SessionEnd};
