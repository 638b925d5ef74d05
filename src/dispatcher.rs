//! Protocol state machine.
//!
//! The [`Dispatcher`] takes one complete inbound frame at a time, checks its
//! payload with a [`Cursor`], runs the matching handler and builds the reply:
//!
//! ```text
//!            OPEN (version ok)              CLOSE
//! AwaitingOpen ───────────────► Ready ───────────────► Closed
//!      │                          │ UPDATE / CHECK / LOOKUP / FETCH / OPEN
//!      │ anything else            └──────────► Ready (+ reply)
//!      └──────────► ProtocolError
//! ```
//!
//! Every violation is returned as a [`ProtocolError`]; the dispatcher never
//! tries to skip a bad message because the byte stream can no longer be
//! trusted after one.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::error::ProtocolError;
use crate::handler::{HandlerRegistry, ValueBuf, FOUND};
use crate::protocol::{Cursor, Frame, MessageType, ReplyBuilder, PROTOCOL_VERSION};
use crate::service::kind_name;

/// Dispatcher states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing but OPEN is accepted.
    AwaitingOpen,
    /// Handshake done, requests are served.
    Ready,
    /// CLOSE received; the session must stop.
    Closed,
}

/// Per-session protocol state machine.
#[derive(Debug)]
pub struct Dispatcher {
    state: State,
    pid: u32,
    value_capacity: usize,
}

impl Dispatcher {
    /// Create a dispatcher waiting for OPEN.
    ///
    /// `pid` goes into reply headers, `value_capacity` bounds the values
    /// LOOKUP and FETCH handlers may produce.
    pub fn new(pid: u32, value_capacity: usize) -> Self {
        Self {
            state: State::AwaitingOpen,
            pid,
            value_capacity,
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether CLOSE has been received.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    /// Handle one inbound frame.
    ///
    /// Returns the encoded reply, or `None` for messages without one.
    pub fn dispatch(
        &mut self,
        frame: &Frame,
        handlers: &mut HandlerRegistry,
    ) -> Result<Option<Bytes>, ProtocolError> {
        self.dispatch_inner(frame, handlers).inspect_err(|e| {
            warn!(msg_type = frame.type_tag(), "table-api: {}", e);
        })
    }

    fn dispatch_inner(
        &mut self,
        frame: &Frame,
        handlers: &mut HandlerRegistry,
    ) -> Result<Option<Bytes>, ProtocolError> {
        let tag = frame.type_tag();
        let msg = frame
            .message_type()
            .ok_or(ProtocolError::UnknownMessage(tag))?;

        match (self.state, msg) {
            (State::AwaitingOpen, MessageType::Open) | (State::Ready, _) => {}
            _ => return Err(ProtocolError::NotOpen(tag)),
        }

        let mut cursor = Cursor::new(frame.payload());
        let mut reply = ReplyBuilder::new(self.pid);

        match msg {
            MessageType::Open => {
                let version = cursor.read_u32()?;
                cursor.finish()?;

                if version != PROTOCOL_VERSION {
                    return Err(ProtocolError::VersionMismatch {
                        expected: PROTOCOL_VERSION,
                        got: version,
                    });
                }

                debug!(version, "table-api: open");
                self.state = State::Ready;
                reply.ack();
            }

            MessageType::Update => {
                cursor.finish()?;

                let r = handlers.update();
                debug!(result = r, "table-api: update");
                reply.add_i32(r);
            }

            MessageType::Close => {
                // Whatever follows CLOSE is ignored, payload included.
                debug!(ignored = cursor.remaining(), "table-api: close");
                self.state = State::Closed;
            }

            MessageType::Check => {
                let kind = cursor.read_i32()?;
                let key = cursor.key()?;
                cursor.finish()?;

                let r = handlers.check(kind, key);
                debug!(service = kind_name(kind), ?key, result = r, "table-api: check");
                reply.add_i32(r);
            }

            MessageType::Lookup => {
                let kind = cursor.read_i32()?;
                let key = cursor.key()?;
                cursor.finish()?;

                let mut value = ValueBuf::with_capacity(self.value_capacity);
                let r = handlers.lookup(kind, key, &mut value);
                debug!(service = kind_name(kind), ?key, result = r, "table-api: lookup");

                reply.add_i32(r);
                if r == FOUND {
                    reply.add_str(value.as_bytes());
                }
            }

            MessageType::Fetch => {
                let kind = cursor.read_i32()?;
                cursor.finish()?;

                let mut value = ValueBuf::with_capacity(self.value_capacity);
                let r = handlers.fetch(kind, &mut value);
                debug!(service = kind_name(kind), result = r, "table-api: fetch");

                reply.add_i32(r);
                if r == FOUND {
                    reply.add_str(value.as_bytes());
                }
            }

            MessageType::Ok | MessageType::Fail => {
                return Err(ProtocolError::UnknownMessage(tag));
            }
        }

        Ok(reply.close())
    }
}
