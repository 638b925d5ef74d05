//! Wire format encoding and decoding.
//!
//! Every message on the channel is prefixed with a 16-byte header:
//! ```text
//! ┌──────────┬────────┬────────┬──────────┬──────────┐
//! │ Type     │ Length │ Flags  │ Peer ID  │ PID      │
//! │ 4 bytes  │ 2 bytes│ 2 bytes│ 4 bytes  │ 4 bytes  │
//! │ uint32   │ uint16 │ uint16 │ uint32   │ uint32   │
//! └──────────┴────────┴────────┴──────────┴──────────┘
//! ```
//!
//! All integers are in host byte order: both ends of the channel always
//! live on the same machine. `Length` counts the header itself.

use crate::error::ProtocolError;

/// Header size in bytes (fixed, exactly 16).
pub const HEADER_SIZE: usize = 16;

/// Default maximum frame size, header included.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16384;

/// Largest length the 16-bit header field can carry.
pub const MAX_FRAME_LEN: usize = u16::MAX as usize;

/// Protocol version announced by the host in OPEN.
pub const PROTOCOL_VERSION: u32 = 1;

/// Message type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MessageType {
    /// Reply to any request.
    Ok = 0,
    /// Failure reply (never produced by this side).
    Fail = 1,
    /// Handshake carrying the protocol version.
    Open = 2,
    /// Ask the table process to stop.
    Close = 3,
    /// Ask the backend to refresh its data.
    Update = 4,
    /// Existence check for a key.
    Check = 5,
    /// Single-value lookup for a key.
    Lookup = 6,
    /// Fetch the next value of a kind.
    Fetch = 7,
}

impl MessageType {
    /// Decode a type tag, `None` for tags outside the protocol.
    pub fn from_u32(tag: u32) -> Option<Self> {
        Some(match tag {
            0 => Self::Ok,
            1 => Self::Fail,
            2 => Self::Open,
            3 => Self::Close,
            4 => Self::Update,
            5 => Self::Check,
            6 => Self::Lookup,
            7 => Self::Fetch,
            _ => return None,
        })
    }

    /// The wire tag.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Decoded header from wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Message type tag (see [`MessageType`]).
    pub msg_type: u32,
    /// Total frame length including this header.
    pub len: u16,
    /// Reserved, always 0.
    pub flags: u16,
    /// Peer identifier, always 0 for table traffic.
    pub peer_id: u32,
    /// PID of the sending process.
    pub pid: u32,
}

impl Header {
    /// Create a header for a payload of `payload_len` bytes.
    ///
    /// `len` saturates at `u16::MAX` when the payload does not fit; use
    /// [`Header::try_new`] when the payload size is not already bounded.
    pub fn new(msg_type: u32, payload_len: usize, pid: u32) -> Self {
        let len = payload_len.saturating_add(HEADER_SIZE).min(MAX_FRAME_LEN);
        Self {
            msg_type,
            len: len as u16,
            flags: 0,
            peer_id: 0,
            pid,
        }
    }

    /// Create a header, rejecting payloads whose frame would not fit the
    /// 16-bit length field.
    pub fn try_new(msg_type: u32, payload_len: usize, pid: u32) -> Result<Self, ProtocolError> {
        match payload_len.checked_add(HEADER_SIZE) {
            Some(len) if len <= MAX_FRAME_LEN => Ok(Self::new(msg_type, payload_len, pid)),
            _ => Err(ProtocolError::BadFrameLength {
                len: payload_len.saturating_add(HEADER_SIZE),
                min: HEADER_SIZE,
                max: MAX_FRAME_LEN,
            }),
        }
    }

    /// Payload length implied by `len`.
    #[inline]
    pub fn payload_len(&self) -> usize {
        (self.len as usize).saturating_sub(HEADER_SIZE)
    }

    /// Encode header to bytes (host order).
    ///
    /// # Example
    ///
    /// ```
    /// use table_api::protocol::{Header, MessageType, HEADER_SIZE};
    ///
    /// let header = Header::new(MessageType::Ok.as_u32(), 4, 42);
    /// let bytes = header.encode();
    /// assert_eq!(bytes.len(), HEADER_SIZE);
    /// assert_eq!(Header::decode(&bytes), Some(header));
    /// ```
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        self.encode_into(&mut buf);
        buf
    }

    /// Encode header into an existing buffer.
    ///
    /// # Panics
    ///
    /// Panics if buffer is smaller than `HEADER_SIZE` (16 bytes).
    pub fn encode_into(&self, buf: &mut [u8]) {
        buf[0..4].copy_from_slice(&self.msg_type.to_ne_bytes());
        buf[4..6].copy_from_slice(&self.len.to_ne_bytes());
        buf[6..8].copy_from_slice(&self.flags.to_ne_bytes());
        buf[8..12].copy_from_slice(&self.peer_id.to_ne_bytes());
        buf[12..16].copy_from_slice(&self.pid.to_ne_bytes());
    }

    /// Decode header from bytes (host order).
    ///
    /// Returns `None` if buffer is too short.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_SIZE {
            return None;
        }
        Some(Self {
            msg_type: u32::from_ne_bytes([buf[0], buf[1], buf[2], buf[3]]),
            len: u16::from_ne_bytes([buf[4], buf[5]]),
            flags: u16::from_ne_bytes([buf[6], buf[7]]),
            peer_id: u32::from_ne_bytes([buf[8], buf[9], buf[10], buf[11]]),
            pid: u32::from_ne_bytes([buf[12], buf[13], buf[14], buf[15]]),
        })
    }

    /// Check that `len` covers at least the header and at most `max_frame_size`.
    pub fn validate(&self, max_frame_size: usize) -> Result<(), ProtocolError> {
        let len = self.len as usize;
        if len < HEADER_SIZE || len > max_frame_size {
            return Err(ProtocolError::BadFrameLength {
                len,
                min: HEADER_SIZE,
                max: max_frame_size,
            });
        }
        Ok(())
    }
}
