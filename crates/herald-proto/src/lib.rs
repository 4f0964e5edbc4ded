//! Wire codec for the herald publish/subscribe protocol.
//!
//! This crate contains the transport-facing half of the broker core: a
//! table-driven, byte-at-a-time decoder that turns a stream of protocol
//! bytes into typed [`Command`] values, and the matching encoder.
//!
//! # Wire grammar
//!
//! The protocol is a CRLF-delimited line protocol. Commands are
//! case-sensitive upper-case; the only delimiter is `\r\n`:
//!
//! ```text
//! PING\r\n
//! PONG\r\n
//! CONNECT {}\r\n
//! SUB <subject> <sid>\r\n
//! UNSUB <sid>\r\n
//! PUB <subject> <nbytes>\r\n<payload>\r\n
//! ```
//!
//! Subjects are dot-delimited alphanumeric tokens. SUB patterns may use the
//! wildcards `*` (single token) and `>` (terminal, multi-token); PUB
//! subjects may not.
//!
//! # Design
//!
//! - **Table-driven**: header parsing is a walk over a dense
//!   `[state][byte]` transition table built at compile time. Malformed
//!   input lands in the error state deterministically, never in a panic.
//! - **Chunk-tolerant**: the decoder reads the header one byte at a time,
//!   so it produces identical results for any chunking of the input,
//!   including one byte per read.
//! - **Bounded allocation**: scratch buffers are reused across calls;
//!   only the buffers handed out inside the returned [`Command`] are
//!   freshly allocated, so callers may retain them past the next decode.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod commands;
mod decoder;
mod errors;
mod states;

pub use commands::{Command, Kind, MAX_PAYLOAD};
pub use decoder::{parse_digits, Decoder};
pub use errors::{ProtocolError, Result};
