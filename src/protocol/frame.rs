//! Frame struct with typed accessors.
//!
//! Represents one complete message: header plus payload.
//! Uses `bytes::Bytes` so the payload can be split off the read buffer
//! without copying.
//!
//! # Example
//!
//! ```
//! use table_api::protocol::{Frame, Header, MessageType};
//! use bytes::Bytes;
//!
//! let header = Header::new(MessageType::Update.as_u32(), 0, 1);
//! let frame = Frame::new(header, Bytes::new());
//!
//! assert_eq!(frame.message_type(), Some(MessageType::Update));
//! assert!(frame.payload().is_empty());
//! ```

use bytes::Bytes;

use super::wire_format::{Header, MessageType, HEADER_SIZE};
use crate::error::ProtocolError;

/// A complete protocol frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Decoded header.
    pub header: Header,
    /// Payload bytes.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame from header and payload.
    pub fn new(header: Header, payload: Bytes) -> Self {
        Self { header, payload }
    }

    /// Create a frame from a type tag and raw bytes (copies data).
    ///
    /// Fails with [`ProtocolError::BadFrameLength`] when the payload does
    /// not fit in one frame.
    pub fn from_parts(msg_type: u32, payload: &[u8], pid: u32) -> Result<Self, ProtocolError> {
        Ok(Self {
            header: Header::try_new(msg_type, payload.len(), pid)?,
            payload: Bytes::copy_from_slice(payload),
        })
    }

    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the raw type tag.
    #[inline]
    pub fn type_tag(&self) -> u32 {
        self.header.msg_type
    }

    /// Get the decoded message type, if known.
    #[inline]
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::from_u32(self.header.msg_type)
    }
}

/// Build a complete frame as a single byte vector.
///
/// # Example
///
/// ```
/// use table_api::protocol::{build_frame, Header, MessageType, HEADER_SIZE};
///
/// let header = Header::new(MessageType::Ok.as_u32(), 4, 1);
/// let bytes = build_frame(&header, &1i32.to_ne_bytes());
/// assert_eq!(bytes.len(), HEADER_SIZE + 4);
/// ```
pub fn build_frame(header: &Header, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(&header.encode());
    buf.extend_from_slice(payload);
    buf
}
