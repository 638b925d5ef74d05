//! Frame buffer for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` for buffer management.
//! Implements a state machine for handling fragmented frames:
//! - `WaitingForHeader`: Need at least 16 bytes
//! - `WaitingForPayload`: Header parsed, need N more payload bytes
//!
//! Unlike a batch decoder, frames are handed out one at a time through
//! [`FrameBuffer::next_frame`]: the session must be able to stop between
//! two buffered frames when the first one is CLOSE.
//!
//! # Example
//!
//! ```
//! use table_api::protocol::{build_frame, FrameBuffer, Header, MessageType};
//!
//! let mut buffer = FrameBuffer::new();
//! let bytes = build_frame(&Header::new(MessageType::Update.as_u32(), 0, 1), b"");
//!
//! buffer.extend(&bytes[..3]);
//! assert!(buffer.next_frame().unwrap().is_none());
//!
//! buffer.extend(&bytes[3..]);
//! let frame = buffer.next_frame().unwrap().unwrap();
//! assert_eq!(frame.message_type(), Some(MessageType::Update));
//! ```

use bytes::{Bytes, BytesMut};

use super::wire_format::{Header, DEFAULT_MAX_FRAME_SIZE, HEADER_SIZE};
use super::Frame;
use crate::error::ProtocolError;

/// State machine for frame parsing.
#[derive(Debug, Clone)]
enum State {
    /// Waiting for complete header (need 16 bytes).
    WaitingForHeader,
    /// Header parsed, waiting for payload bytes.
    WaitingForPayload { header: Header, remaining: usize },
}

/// Buffer for accumulating incoming bytes and extracting complete frames.
pub struct FrameBuffer {
    /// Accumulated bytes from channel reads.
    buffer: BytesMut,
    /// Current parsing state.
    state: State,
    /// Maximum allowed frame size, header included.
    max_frame_size: usize,
}

impl FrameBuffer {
    /// Create a new frame buffer with default settings.
    pub fn new() -> Self {
        Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
    }

    /// Create a new frame buffer with a custom frame size limit.
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(max_frame_size.max(HEADER_SIZE)),
            state: State::WaitingForHeader,
            max_frame_size,
        }
    }

    /// Append data to the buffer without extracting frames.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to extract a single frame from the buffer.
    ///
    /// Returns:
    /// - `Ok(Some(frame))` if a complete frame was extracted
    /// - `Ok(None)` if more data is needed
    /// - `Err(...)` if a header declares an impossible length
    pub fn next_frame(&mut self) -> Result<Option<Frame>, ProtocolError> {
        match &self.state {
            State::WaitingForHeader => {
                if self.buffer.len() < HEADER_SIZE {
                    return Ok(None);
                }

                let header = match Header::decode(&self.buffer[..HEADER_SIZE]) {
                    Some(header) => header,
                    None => return Ok(None),
                };
                header.validate(self.max_frame_size)?;

                let _ = self.buffer.split_to(HEADER_SIZE);

                let remaining = header.payload_len();
                if remaining == 0 {
                    return Ok(Some(Frame::new(header, Bytes::new())));
                }

                self.state = State::WaitingForPayload { header, remaining };
                self.next_frame()
            }

            State::WaitingForPayload { header, remaining } => {
                let remaining = *remaining;

                if self.buffer.len() < remaining {
                    return Ok(None);
                }

                let payload = self.buffer.split_to(remaining).freeze();
                let header = *header;

                self.state = State::WaitingForHeader;

                Ok(Some(Frame::new(header, payload)))
            }
        }
    }

    /// Get the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[cfg(test)]
    fn state_name(&self) -> &'static str {
        match &self.state {
            State::WaitingForHeader => "WaitingForHeader",
            State::WaitingForPayload { .. } => "WaitingForPayload",
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{build_frame, MessageType};

    fn make_frame_bytes(msg_type: MessageType, payload: &[u8]) -> Vec<u8> {
        build_frame(&Header::new(msg_type.as_u32(), payload.len(), 1), payload)
    }

    #[test]
    fn test_single_complete_frame() {
        let mut buffer = FrameBuffer::new();
        buffer.extend(&make_frame_bytes(MessageType::Check, b"\0\0\0\0a\0"));

        let frame = buffer.next_frame().unwrap().unwrap();
        assert_eq!(frame.message_type(), Some(MessageType::Check));
        assert_eq!(frame.payload(), b"\0\0\0\0a\0");
        assert!(buffer.is_empty());
        assert!(buffer.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_frames_handed_out_one_at_a_time() {
        let mut buffer = FrameBuffer::new();
        let mut combined = make_frame_bytes(MessageType::Close, b"");
        combined.extend(make_frame_bytes(MessageType::Update, b""));
        buffer.extend(&combined);

        let first = buffer.next_frame().unwrap().unwrap();
        assert_eq!(first.message_type(), Some(MessageType::Close));
        assert_eq!(buffer.len(), HEADER_SIZE);

        let second = buffer.next_frame().unwrap().unwrap();
        assert_eq!(second.message_type(), Some(MessageType::Update));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_fragmented_header() {
        let mut buffer = FrameBuffer::new();
        let bytes = make_frame_bytes(MessageType::Fetch, &0i32.to_ne_bytes());

        buffer.extend(&bytes[..5]);
        assert!(buffer.next_frame().unwrap().is_none());
        assert_eq!(buffer.state_name(), "WaitingForHeader");

        buffer.extend(&bytes[5..]);
        let frame = buffer.next_frame().unwrap().unwrap();
        assert_eq!(frame.message_type(), Some(MessageType::Fetch));
    }

    #[test]
    fn test_fragmented_payload() {
        let mut buffer = FrameBuffer::new();
        let payload = b"\x01\0\0\0postmaster@example.org\0";
        let bytes = make_frame_bytes(MessageType::Lookup, payload);

        let partial = HEADER_SIZE + 6;
        buffer.extend(&bytes[..partial]);
        assert!(buffer.next_frame().unwrap().is_none());
        assert_eq!(buffer.state_name(), "WaitingForPayload");

        buffer.extend(&bytes[partial..]);
        let frame = buffer.next_frame().unwrap().unwrap();
        assert_eq!(frame.payload(), payload);
        assert_eq!(buffer.state_name(), "WaitingForHeader");
    }

    #[test]
    fn test_byte_at_a_time() {
        let mut buffer = FrameBuffer::new();
        let bytes = make_frame_bytes(MessageType::Open, &1u32.to_ne_bytes());

        let mut frames = Vec::new();
        for byte in &bytes {
            buffer.extend(&[*byte]);
            if let Some(frame) = buffer.next_frame().unwrap() {
                frames.push(frame);
            }
        }

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].payload(), &1u32.to_ne_bytes());
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let mut buffer = FrameBuffer::with_max_frame_size(64);
        let header = Header::new(MessageType::Check.as_u32(), 100, 1);
        buffer.extend(&header.encode());

        let err = buffer.next_frame().unwrap_err();
        assert!(matches!(err, ProtocolError::BadFrameLength { max: 64, .. }));
    }

    #[test]
    fn test_undersized_len_rejected() {
        let mut buffer = FrameBuffer::new();
        let mut header = Header::new(MessageType::Update.as_u32(), 0, 1);
        header.len = 3;
        buffer.extend(&header.encode());

        assert!(buffer.next_frame().is_err());
    }
}
