//! Error types for the herald wire protocol.
//!
//! Transport and protocol errors are fatal to the connection: there is no
//! framing to resynchronize on after corruption, so the caller must discard
//! the decoder once any of these is returned.

use std::io;

use thiserror::Error;

/// Errors that can occur while decoding or encoding protocol commands.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The underlying transport read failed, or hit end-of-stream
    /// mid-command.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The byte stream violated the command grammar.
    #[error("bad parse: {reason}")]
    BadParse {
        /// Which grammar rule the stream violated.
        reason: &'static str,
    },

    /// A PUB declared a payload larger than
    /// [`MAX_PAYLOAD`](crate::MAX_PAYLOAD).
    ///
    /// Once this is returned the stream position is undefined and the
    /// decoder must be abandoned.
    #[error("payload too large: {size} bytes exceeds maximum {max}")]
    PayloadTooLarge {
        /// Declared payload size in bytes.
        size: usize,
        /// Maximum allowed payload size in bytes.
        max: usize,
    },

    /// A PUB payload disagreed with its declared framing.
    #[error("bad payload: {reason}")]
    BadPayload {
        /// Which framing rule the payload violated.
        reason: &'static str,
    },
}

/// Convenient Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
