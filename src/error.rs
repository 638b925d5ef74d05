//! Error types for table-api.
//!
//! Two disjoint classes of failure exist:
//!
//! - [`ProtocolError`]: the peer sent something the protocol does not
//!   allow. The byte stream can no longer be trusted, so the session must
//!   end and the process must exit. These are never turned into result codes.
//! - Application outcomes (not found, unsupported, backend failure) are not
//!   errors at all at this layer: they travel back to the host as the
//!   signed result code of the reply.

use thiserror::Error;

/// A fatal violation of the table protocol.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A field was read past the payload length declared by the frame.
    #[error("bad msg len: wanted {wanted} bytes, {remaining} remaining")]
    LengthExceeded { wanted: usize, remaining: usize },

    /// A message was fully handled but payload bytes were left over.
    #[error("bogus data: {0} trailing bytes")]
    TrailingBytes(usize),

    /// CHECK or LOOKUP carried no key bytes.
    #[error("no key")]
    MissingKey,

    /// CHECK or LOOKUP key does not end with a NUL terminator.
    #[error("key not NUL-terminated")]
    UnterminatedKey,

    /// OPEN announced a protocol version other than ours.
    #[error("bad API version: expected {expected}, got {got}")]
    VersionMismatch { expected: u32, got: u32 },

    /// The message type tag is not part of the protocol.
    #[error("bad message {0}")]
    UnknownMessage(u32),

    /// A request arrived before the channel was opened.
    #[error("message {0} received before OPEN")]
    NotOpen(u32),

    /// A frame header declared a length outside the allowed range.
    #[error("bad frame length {len} (min {min}, max {max})")]
    BadFrameLength { len: usize, min: usize, max: usize },
}

/// Main error type for all table-api operations.
#[derive(Debug, Error)]
pub enum TableError {
    /// I/O error on the channel.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unrecoverable protocol violation.
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolError),
}

impl TableError {
    /// Whether this error must terminate the whole process.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, TableError::Protocol(_))
    }
}

/// Error returned to a backend callback that tried to produce a value the
/// reply cannot carry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The value does not fit the bounded output buffer.
    #[error("value of {len} bytes exceeds capacity of {capacity} bytes")]
    TooLong { len: usize, capacity: usize },

    /// The value contains a NUL byte and would be cut short on the wire.
    #[error("value contains an embedded NUL byte")]
    EmbeddedNul,
}

/// Result type alias using TableError.
pub type Result<T> = std::result::Result<T, TableError>;
