//! Session loop.
//!
//! A [`Session`] owns the channel, the frame buffer, the dispatcher and the
//! handlers. It serves strictly one request at a time:
//!
//! 1. If a complete frame is buffered, dispatch it
//! 2. Stop if it was CLOSE, otherwise write the reply
//! 3. If nothing is buffered, wait for more bytes
//!
//! CLOSE, the peer closing the channel and I/O failures all end the session
//! normally with a [`SessionEnd`]. Only protocol violations come back as an
//! error, and those must bring the process down.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::handler::{HandlerRegistry, DEFAULT_VALUE_CAPACITY};
use crate::protocol::{FrameBuffer, DEFAULT_MAX_FRAME_SIZE, HEADER_SIZE};

/// Default read buffer size.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 65535;

/// Size of the result code that precedes a value in a reply.
const RESULT_SIZE: usize = 4;

/// Configuration for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Largest accepted inbound frame, header included.
    pub max_frame_size: usize,
    /// Bytes requested from the channel per read.
    pub read_buffer_size: usize,
    /// Capacity of the value buffer handed to LOOKUP and FETCH handlers,
    /// NUL terminator included.
    pub value_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            value_capacity: DEFAULT_VALUE_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Value capacity, clamped so a reply always fits in one frame.
    pub fn effective_value_capacity(&self) -> usize {
        let limit = u16::MAX as usize - HEADER_SIZE - RESULT_SIZE;
        self.value_capacity.clamp(1, limit)
    }
}

/// How a session ended.
#[derive(Debug)]
pub enum SessionEnd {
    /// The host sent CLOSE.
    Closed,
    /// The host closed the channel.
    PeerClosed,
    /// Reading from or writing to the channel failed.
    TransportError(io::Error),
}

/// One table session over a bidirectional channel.
pub struct Session<T> {
    io: T,
    frames: FrameBuffer,
    dispatcher: Dispatcher,
    handlers: HandlerRegistry,
    read_buf: Vec<u8>,
}

impl<T> Session<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a session; nothing is read until [`Session::run`].
    pub fn new(io: T, handlers: HandlerRegistry, config: &SessionConfig) -> Self {
        Self {
            io,
            frames: FrameBuffer::with_max_frame_size(config.max_frame_size),
            dispatcher: Dispatcher::new(std::process::id(), config.effective_value_capacity()),
            handlers,
            read_buf: vec![0u8; config.read_buffer_size.max(HEADER_SIZE)],
        }
    }

    /// Serve requests until the session ends.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Protocol`](crate::TableError::Protocol) when the
    /// host violates the protocol. No reply is written for the offending
    /// message.
    pub async fn run(mut self) -> Result<SessionEnd> {
        info!(handlers = ?self.handlers, "table-api: session started");

        let end = self.serve().await?;
        match &end {
            SessionEnd::Closed => info!("table-api: closed by host"),
            SessionEnd::PeerClosed => warn!("table-api: pipe closed"),
            SessionEnd::TransportError(e) => warn!("table-api: channel error: {}", e),
        }
        Ok(end)
    }

    async fn serve(&mut self) -> Result<SessionEnd> {
        loop {
            let next = self
                .frames
                .next_frame()
                .inspect_err(|e| warn!("table-api: {}", e))?;
            if let Some(frame) = next {
                let reply = self.dispatcher.dispatch(&frame, &mut self.handlers)?;

                if self.dispatcher.is_closed() {
                    return Ok(SessionEnd::Closed);
                }

                if let Some(reply) = reply {
                    debug!(len = reply.len(), "table-api: reply");
                    if let Err(e) = self.flush(&reply).await {
                        return Ok(SessionEnd::TransportError(e));
                    }
                }
                continue;
            }

            match self.io.read(&mut self.read_buf).await {
                Ok(0) => return Ok(SessionEnd::PeerClosed),
                Ok(n) => self.frames.extend(&self.read_buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Ok(SessionEnd::TransportError(e)),
            }
        }
    }

    async fn flush(&mut self, reply: &[u8]) -> io::Result<()> {
        self.io.write_all(reply).await?;
        self.io.flush().await
    }
}
