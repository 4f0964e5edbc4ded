//! Pull decoder over a buffered byte source.
//!
//! One [`Decoder::decode`] call consumes exactly one command's worth of
//! bytes and returns the typed [`Command`]. The header line is read one
//! byte at a time through the transition table, so the decoder behaves
//! identically for any chunking of the underlying stream; the PUB payload
//! is the only multi-byte read.

use std::io::{BufRead, BufReader, Read};

use bytes::{Bytes, BytesMut};

use crate::{
    commands::{Command, Kind, MAX_PAYLOAD},
    errors::{ProtocolError, Result},
    states::{State, TRANSITIONS},
};

/// Per-field accumulation buffers, reused across decode calls.
///
/// Reuse keeps steady-state decoding allocation-free for the header; the
/// buffers handed out in the returned [`Command`] are fresh copies, so
/// callers may retain them past the next decode.
#[derive(Debug, Default)]
struct Scratch {
    kind: Option<Kind>,
    subject: Vec<u8>,
    sid: Vec<u8>,
    nbytes: Vec<u8>,
}

impl Scratch {
    fn reset(&mut self) {
        self.kind = None;
        self.subject.clear();
        self.sid.clear();
        self.nbytes.clear();
    }
}

/// Streaming decoder for the herald wire protocol.
///
/// The `R: BufRead` bound is the buffering contract: an already-buffered
/// source (a [`BufReader`], a [`std::io::Cursor`], a byte slice) is used
/// as-is and never double-wrapped. Unbuffered sources go through
/// [`Decoder::from_reader`], which wraps them exactly once.
///
/// A decoder serves one connection: at most one `decode` call may be in
/// progress at a time, and once `decode` returns any error the stream
/// position is unreliable and the decoder must be discarded.
#[derive(Debug)]
pub struct Decoder<R> {
    reader: R,
    scratch: Scratch,
}

impl<R: Read> Decoder<BufReader<R>> {
    /// Create a decoder over an unbuffered byte source.
    pub fn from_reader(reader: R) -> Self {
        Self::new(BufReader::new(reader))
    }
}

impl<R: BufRead> Decoder<R> {
    /// Create a decoder over a buffered byte source.
    pub fn new(reader: R) -> Self {
        Self { reader, scratch: Scratch::default() }
    }

    /// Decode the next command from the stream.
    ///
    /// Blocks until one complete command has been consumed. Successive
    /// calls stream successive commands.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::Io`] — the underlying read failed, or the stream
    ///   ended mid-command (`UnexpectedEof`).
    /// - [`ProtocolError::BadParse`] — the byte stream violated the
    ///   grammar: wrong keyword, bad subject token, missing CRLF, or a
    ///   non-digit/overflowing digit run where an integer is required.
    /// - [`ProtocolError::PayloadTooLarge`] — a PUB declared more than
    ///   [`MAX_PAYLOAD`] bytes.
    /// - [`ProtocolError::BadPayload`] — the payload's trailing CRLF was
    ///   absent.
    pub fn decode(&mut self) -> Result<Command> {
        self.scratch.reset();

        let mut state = State::Start;
        loop {
            let byte = self.read_byte()?;
            state = TRANSITIONS[state as usize][byte as usize];

            match state {
                State::Error => {
                    return Err(ProtocolError::BadParse { reason: "unexpected byte" });
                },

                // Keyword recognized; remember which command this is.
                State::CmdPing => self.scratch.kind = Some(Kind::Ping),
                State::CmdPong => self.scratch.kind = Some(Kind::Pong),
                State::CmdConnect => self.scratch.kind = Some(Kind::Connect),
                State::CmdSub => self.scratch.kind = Some(Kind::Sub),
                State::CmdPub => self.scratch.kind = Some(Kind::Pub),
                State::CmdUnsub => self.scratch.kind = Some(Kind::Unsub),

                // Field accumulation.
                State::SubSubject
                | State::SubSubjectDot
                | State::SubSubjectStar
                | State::SubSubjectGt
                | State::PubSubject
                | State::PubSubjectDot => self.scratch.subject.push(byte),
                State::SubSid | State::UnsubSid => self.scratch.sid.push(byte),
                State::PubNumBytes => self.scratch.nbytes.push(byte),

                // The payload cannot be parsed from the table.
                State::PubPayload => return self.read_payload(),

                State::Done => return self.materialize(),

                _ => {},
            }
        }
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.reader.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    /// Read exactly the declared number of payload bytes plus the trailing
    /// CRLF, and materialize the PUB.
    fn read_payload(&mut self) -> Result<Command> {
        let declared = parse_digits(&self.scratch.nbytes)?;
        if declared as u64 > MAX_PAYLOAD as u64 {
            return Err(ProtocolError::PayloadTooLarge {
                size: declared as usize,
                max: MAX_PAYLOAD,
            });
        }

        let mut msg = BytesMut::zeroed(declared as usize);
        self.reader.read_exact(&mut msg)?;

        if self.read_byte()? != b'\r' || self.read_byte()? != b'\n' {
            return Err(ProtocolError::BadPayload { reason: "missing trailing CRLF" });
        }

        let msg = msg.freeze();
        Ok(Command::Pub {
            subject: Bytes::copy_from_slice(&self.scratch.subject),
            len: msg.len() as i64,
            msg,
        })
    }

    /// Build the command for a completed non-PUB header line.
    fn materialize(&mut self) -> Result<Command> {
        match self.scratch.kind {
            Some(Kind::Ping) => Ok(Command::Ping),
            Some(Kind::Pong) => Ok(Command::Pong),
            Some(Kind::Connect) => Ok(Command::Connect),
            Some(Kind::Sub) => Ok(Command::Sub {
                subject: Bytes::copy_from_slice(&self.scratch.subject),
                sid: parse_digits(&self.scratch.sid)?,
            }),
            Some(Kind::Unsub) => Ok(Command::Unsub { sid: parse_digits(&self.scratch.sid)? }),
            // PUB finishes through read_payload, never through Done.
            Some(Kind::Pub) | None => {
                Err(ProtocolError::BadParse { reason: "unknown command kind" })
            },
        }
    }
}

/// Parse a run of ASCII digits as a non-negative `i64`.
///
/// # Errors
///
/// Returns [`ProtocolError::BadParse`] for empty input, any non-digit
/// byte, and any value exceeding `i64::MAX`. The overflow check runs
/// before each accumulation step, so no intermediate wraps.
pub fn parse_digits(digits: &[u8]) -> Result<i64> {
    if digits.is_empty() {
        return Err(ProtocolError::BadParse { reason: "empty digits" });
    }

    let mut n: i64 = 0;
    for &byte in digits {
        if !byte.is_ascii_digit() {
            return Err(ProtocolError::BadParse { reason: "invalid digit" });
        }

        let digit = i64::from(byte - b'0');
        if n > (i64::MAX - digit) / 10 {
            return Err(ProtocolError::BadParse { reason: "i64 overflow" });
        }
        n = n * 10 + digit;
    }

    Ok(n)
}
