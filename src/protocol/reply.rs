//! Outgoing reply assembly.
//!
//! A [`ReplyBuilder`] is created for each dispatched request. The first
//! field added allocates the frame; [`ReplyBuilder::close`] hands back the
//! encoded frame so the session can write it in one go. Requests that
//! produce no reply (CLOSE) never allocate anything.

use bytes::{BufMut, Bytes, BytesMut};

use super::wire_format::{Header, MessageType, HEADER_SIZE};

/// Initial payload capacity of a reply frame.
const INITIAL_CAPACITY: usize = 1024;

/// Builder for the single reply frame of one request.
#[derive(Debug)]
pub struct ReplyBuilder {
    pid: u32,
    buf: Option<BytesMut>,
}

impl ReplyBuilder {
    /// Create an empty builder; nothing is allocated yet.
    pub fn new(pid: u32) -> Self {
        Self { pid, buf: None }
    }

    fn frame(&mut self) -> &mut BytesMut {
        self.buf.get_or_insert_with(|| {
            let mut buf = BytesMut::with_capacity(HEADER_SIZE + INITIAL_CAPACITY);
            // Header is written on close, once the length is known.
            buf.put_bytes(0, HEADER_SIZE);
            buf
        })
    }

    /// Make sure a reply is sent even if no field gets added.
    pub fn ack(&mut self) {
        self.frame();
    }

    /// Append a host-order `i32`.
    pub fn add_i32(&mut self, value: i32) {
        self.frame().put_slice(&value.to_ne_bytes());
    }

    /// Append `data` followed by a NUL terminator.
    pub fn add_str(&mut self, data: &[u8]) {
        let frame = self.frame();
        frame.extend_from_slice(data);
        frame.put_u8(0);
    }

    /// Finish the frame, or `None` if the request has no reply.
    pub fn close(self) -> Option<Bytes> {
        let mut buf = self.buf?;
        let header = Header::new(MessageType::Ok.as_u32(), buf.len() - HEADER_SIZE, self.pid);
        header.encode_into(&mut buf[..HEADER_SIZE]);
        Some(buf.freeze())
    }
}
