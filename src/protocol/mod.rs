//! Protocol module - wire format, framing, payload cursor and replies.
//!
//! This module implements the binary protocol spoken on the channel:
//! - 16-byte header encoding/decoding
//! - Frame buffer for accumulating partial reads
//! - Cursor for bounds-checked payload parsing
//! - Reply builder for the single response frame of a request

mod cursor;
mod frame;
mod frame_buffer;
mod reply;
mod wire_format;

pub use cursor::Cursor;
pub use frame::{build_frame, Frame};
pub use frame_buffer::FrameBuffer;
pub use reply::ReplyBuilder;
pub use wire_format::{
    Header, MessageType, DEFAULT_MAX_FRAME_SIZE, HEADER_SIZE, MAX_FRAME_LEN, PROTOCOL_VERSION,
};
