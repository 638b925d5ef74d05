//! Backend entry point.
//!
//! [`TableApi`] collects the backend's handlers and settings, then runs the
//! session to completion:
//!
//! 1. Adopt the channel (fd 0, or any async stream)
//! 2. Wait for OPEN from the host
//! 3. Serve UPDATE / CHECK / LOOKUP / FETCH one at a time
//! 4. Return when the host sends CLOSE or goes away
//!
//! # Example
//!
//! ```ignore
//! use table_api::{TableApi, handler::{FOUND, NOT_FOUND}};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     TableApi::new()
//!         .on_check(|_kind, key| if key.to_bytes() == b"example.org" { FOUND } else { NOT_FOUND })
//!         .dispatch_stdio_or_exit()
//!         .await;
//! }
//! ```

use std::ffi::CStr;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::Result;
use crate::handler::{HandlerRegistry, ValueBuf};
use crate::session::{Session, SessionConfig, SessionEnd};

/// Builder for a table backend.
#[derive(Debug, Default)]
pub struct TableApi {
    handlers: HandlerRegistry,
    config: SessionConfig,
}

impl TableApi {
    /// Create a backend with no handlers and default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the update (refresh) operation.
    ///
    /// Without it, UPDATE always succeeds.
    pub fn on_update<F>(mut self, handler: F) -> Self
    where
        F: FnMut() -> i32 + Send + 'static,
    {
        self.handlers.on_update(handler);
        self
    }

    /// Bind the existence-check operation.
    ///
    /// Without it, CHECK answers -1.
    pub fn on_check<F>(mut self, handler: F) -> Self
    where
        F: FnMut(i32, &CStr) -> i32 + Send + 'static,
    {
        self.handlers.on_check(handler);
        self
    }

    /// Bind the lookup operation.
    ///
    /// Without it, LOOKUP answers -1.
    pub fn on_lookup<F>(mut self, handler: F) -> Self
    where
        F: FnMut(i32, &CStr, &mut ValueBuf) -> i32 + Send + 'static,
    {
        self.handlers.on_lookup(handler);
        self
    }

    /// Bind the fetch operation.
    ///
    /// Without it, FETCH answers -1.
    pub fn on_fetch<F>(mut self, handler: F) -> Self
    where
        F: FnMut(i32, &mut ValueBuf) -> i32 + Send + 'static,
    {
        self.handlers.on_fetch(handler);
        self
    }

    /// Replace the handler registry wholesale.
    pub fn handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Set the largest accepted inbound frame, header included.
    ///
    /// Default: 16384
    pub fn max_frame_size(mut self, size: usize) -> Self {
        self.config.max_frame_size = size;
        self
    }

    /// Set the read buffer size.
    ///
    /// Default: 65535
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = size;
        self
    }

    /// Set the value buffer capacity for LOOKUP and FETCH, NUL included.
    ///
    /// Default: 4096
    pub fn value_capacity(mut self, capacity: usize) -> Self {
        self.config.value_capacity = capacity;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the session over `io` until it ends.
    pub async fn dispatch<T>(self, io: T) -> Result<SessionEnd>
    where
        T: AsyncRead + AsyncWrite + Unpin,
    {
        Session::new(io, self.handlers, &self.config).run().await
    }

    /// Run the session over file descriptor 0.
    #[cfg(unix)]
    pub async fn dispatch_stdio(self) -> Result<SessionEnd> {
        let channel = crate::transport::stdin_channel()?;
        self.dispatch(channel).await
    }

    /// Run the session over file descriptor 0 and exit the process on a
    /// protocol violation or when the channel cannot be set up.
    #[cfg(unix)]
    pub async fn dispatch_stdio_or_exit(self) -> SessionEnd {
        match self.dispatch_stdio().await {
            Ok(end) => end,
            Err(e) => {
                tracing::error!("table-api: exiting: {}", e);
                std::process::exit(1);
            }
        }
    }
}
