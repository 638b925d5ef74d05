//! Transport module - the channel to the host.
//!
//! The host starts a table process with one end of a socketpair as its
//! standard input. Sessions are generic over any `AsyncRead + AsyncWrite`,
//! so tests can use `tokio::io::duplex` instead.

#[cfg(unix)]
mod stdio;

#[cfg(unix)]
pub use stdio::stdin_channel;
