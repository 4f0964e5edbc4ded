//! Typed protocol commands and their wire encoding.
//!
//! [`Command`] is a closed sum over the six protocol operations. It is an
//! enum rather than a trait object so that dispatch code gets
//! exhaustiveness checking when new operations are added.

use bytes::{BufMut, Bytes};

use crate::errors::{ProtocolError, Result};

/// Maximum PUB payload size in bytes (8 MiB).
///
/// Enforced on both the decode path (before the payload is read) and the
/// encode path.
pub const MAX_PAYLOAD: usize = 8 * 1024 * 1024;

/// Tag identifying a command variant without its payload.
///
/// Useful for routing and logging decisions that do not need the command's
/// fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Keepalive probe.
    Ping,
    /// Keepalive response.
    Pong,
    /// Connection handshake.
    Connect,
    /// Subscription registration.
    Sub,
    /// Message publication.
    Pub,
    /// Subscription removal.
    Unsub,
}

/// One decoded protocol command.
///
/// # Invariants
///
/// - For [`Command::Pub`], `len` equals `msg.len()`. The decoder enforces
///   this by populating `len` from the payload it actually read, and
///   [`Command::encode`] writes the actual payload length into the header
///   line, so the equality survives a round trip.
///
/// The `subject` and `msg` buffers are owned by the command: the decoder
/// hands out fresh [`Bytes`] per decode, so they stay valid after the next
/// decode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `PING\r\n`
    Ping,

    /// `PONG\r\n`
    Pong,

    /// `CONNECT {}\r\n` — the options block is the literal two bytes `{}`;
    /// anything else is rejected during decode.
    Connect,

    /// `SUB <subject> <sid>\r\n`
    Sub {
        /// Subscription pattern; may contain `*` and a terminal `>`.
        subject: Bytes,
        /// Client-local subscription identifier.
        sid: i64,
    },

    /// `PUB <subject> <nbytes>\r\n<payload>\r\n`
    Pub {
        /// Literal subject; wildcards are not permitted.
        subject: Bytes,
        /// Payload length in bytes; equal to `msg.len()`.
        len: i64,
        /// Payload bytes.
        msg: Bytes,
    },

    /// `UNSUB <sid>\r\n`
    Unsub {
        /// Client-local subscription identifier to remove.
        sid: i64,
    },
}

impl Command {
    /// The tag for this command.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Ping => Kind::Ping,
            Self::Pong => Kind::Pong,
            Self::Connect => Kind::Connect,
            Self::Sub { .. } => Kind::Sub,
            Self::Pub { .. } => Kind::Pub,
            Self::Unsub { .. } => Kind::Unsub,
        }
    }

    /// Encode this command into `dst` in wire format.
    ///
    /// For [`Command::Pub`], the header line carries the actual payload
    /// length, keeping the `len == msg.len()` invariant on the wire
    /// regardless of the `len` field's value.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::PayloadTooLarge`] if a PUB payload exceeds
    /// [`MAX_PAYLOAD`].
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        match self {
            Self::Ping => dst.put_slice(b"PING\r\n"),
            Self::Pong => dst.put_slice(b"PONG\r\n"),
            Self::Connect => dst.put_slice(b"CONNECT {}\r\n"),
            Self::Sub { subject, sid } => {
                dst.put_slice(b"SUB ");
                dst.put_slice(subject);
                dst.put_slice(b" ");
                dst.put_slice(sid.to_string().as_bytes());
                dst.put_slice(b"\r\n");
            },
            Self::Pub { subject, msg, .. } => {
                if msg.len() > MAX_PAYLOAD {
                    return Err(ProtocolError::PayloadTooLarge {
                        size: msg.len(),
                        max: MAX_PAYLOAD,
                    });
                }

                dst.put_slice(b"PUB ");
                dst.put_slice(subject);
                dst.put_slice(b" ");
                dst.put_slice(msg.len().to_string().as_bytes());
                dst.put_slice(b"\r\n");
                dst.put_slice(msg);
                dst.put_slice(b"\r\n");
            },
            Self::Unsub { sid } => {
                dst.put_slice(b"UNSUB ");
                dst.put_slice(sid.to_string().as_bytes());
                dst.put_slice(b"\r\n");
            },
        }

        Ok(())
    }
}
