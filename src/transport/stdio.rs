//! Channel on file descriptor 0.
//!
//! # Example
//!
//! ```ignore
//! use table_api::transport::stdin_channel;
//!
//! let channel = stdin_channel()?;
//! ```

use std::os::fd::AsFd;

use tokio::net::UnixStream;

use crate::error::Result;

/// Adopt standard input as a bidirectional socket channel.
///
/// The descriptor is duplicated, so the process-wide stdin handle stays
/// valid. Must be called from within a tokio runtime.
pub fn stdin_channel() -> Result<UnixStream> {
    let fd = std::io::stdin().as_fd().try_clone_to_owned()?;
    let stream = std::os::unix::net::UnixStream::from(fd);
    stream.set_nonblocking(true)?;
    Ok(UnixStream::from_std(stream)?)
}
