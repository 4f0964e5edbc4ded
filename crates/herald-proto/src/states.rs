//! Decoder states and the dense byte-transition table.
//!
//! The table is a `[state][byte]` array covering all 256 byte values per
//! state. It is pure data, built by a `const fn` at compile time; entries
//! not explicitly set stay at [`State::Error`], so every malformed byte
//! lands in the error state without any branching in the decode loop.

/// Decoder state.
///
/// Keyword states spell out the command word one byte at a time
/// (`CmdC` .. `CmdConnect` and so on); the remaining states track field
/// boundaries within a command's header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum State {
    /// Sink state for any byte with no explicit transition.
    Error = 0,
    /// Before the first byte of a command.
    Start,

    /// `\r` seen at the end of a header line.
    CrEnd,
    /// Complete command parsed.
    Done,

    // CONNECT {}\r\n
    CmdC,
    CmdCo,
    CmdCon,
    CmdConn,
    CmdConne,
    CmdConnec,
    CmdConnect,
    ConnectSpace,
    ConnectLbrace,
    ConnectRbrace,

    // PING\r\n
    CmdP,
    CmdPi,
    CmdPin,
    CmdPing,

    // PONG\r\n (shares CmdP)
    CmdPo,
    CmdPon,
    CmdPong,

    // SUB <subject> <sid>\r\n
    CmdS,
    CmdSu,
    CmdSub,
    SubSpace,
    SubSubject,
    SubSubjectSpace,
    SubSubjectDot,
    SubSubjectStar,
    SubSubjectGt,
    SubSid,

    // PUB <subject> <nbytes>\r\n<payload>\r\n (shares CmdP)
    CmdPu,
    CmdPub,
    PubSpace,
    PubSubject,
    PubSubjectSpace,
    PubSubjectDot,
    PubNumBytes,
    PubCr,
    /// Header line complete; control leaves the table to read the payload.
    PubPayload,

    // UNSUB <sid>\r\n
    CmdU,
    CmdUn,
    CmdUns,
    CmdUnsu,
    CmdUnsub,
    UnsubSpace,
    UnsubSid,
}

pub(crate) const STATE_COUNT: usize = State::UnsubSid as usize + 1;

pub(crate) type TransitionTable = [[State; 256]; STATE_COUNT];

/// The decoder's transition table: `TRANSITIONS[state][byte]` is the next
/// state.
pub(crate) static TRANSITIONS: TransitionTable = build_transitions();

const fn build_transitions() -> TransitionTable {
    let mut t = [[State::Error; 256]; STATE_COUNT];

    // CONNECT {}\r\n
    t[State::Start as usize][b'C' as usize] = State::CmdC;
    t[State::CmdC as usize][b'O' as usize] = State::CmdCo;
    t[State::CmdCo as usize][b'N' as usize] = State::CmdCon;
    t[State::CmdCon as usize][b'N' as usize] = State::CmdConn;
    t[State::CmdConn as usize][b'E' as usize] = State::CmdConne;
    t[State::CmdConne as usize][b'C' as usize] = State::CmdConnec;
    t[State::CmdConnec as usize][b'T' as usize] = State::CmdConnect;
    t[State::CmdConnect as usize][b' ' as usize] = State::ConnectSpace;
    t[State::ConnectSpace as usize][b'{' as usize] = State::ConnectLbrace;
    t[State::ConnectLbrace as usize][b'}' as usize] = State::ConnectRbrace;
    t[State::ConnectRbrace as usize][b'\r' as usize] = State::CrEnd;
    t[State::CrEnd as usize][b'\n' as usize] = State::Done;

    // PING\r\n
    t[State::Start as usize][b'P' as usize] = State::CmdP;
    t[State::CmdP as usize][b'I' as usize] = State::CmdPi;
    t[State::CmdPi as usize][b'N' as usize] = State::CmdPin;
    t[State::CmdPin as usize][b'G' as usize] = State::CmdPing;
    t[State::CmdPing as usize][b'\r' as usize] = State::CrEnd;

    // PONG\r\n
    t[State::CmdP as usize][b'O' as usize] = State::CmdPo;
    t[State::CmdPo as usize][b'N' as usize] = State::CmdPon;
    t[State::CmdPon as usize][b'G' as usize] = State::CmdPong;
    t[State::CmdPong as usize][b'\r' as usize] = State::CrEnd;

    // SUB <subject> <sid>\r\n
    t[State::Start as usize][b'S' as usize] = State::CmdS;
    t[State::CmdS as usize][b'U' as usize] = State::CmdSu;
    t[State::CmdSu as usize][b'B' as usize] = State::CmdSub;
    t[State::CmdSub as usize][b' ' as usize] = State::SubSpace;

    // PUB <subject> <nbytes>\r\n
    t[State::CmdP as usize][b'U' as usize] = State::CmdPu;
    t[State::CmdPu as usize][b'B' as usize] = State::CmdPub;
    t[State::CmdPub as usize][b' ' as usize] = State::PubSpace;

    // UNSUB <sid>\r\n
    t[State::Start as usize][b'U' as usize] = State::CmdU;
    t[State::CmdU as usize][b'N' as usize] = State::CmdUn;
    t[State::CmdUn as usize][b'S' as usize] = State::CmdUns;
    t[State::CmdUns as usize][b'U' as usize] = State::CmdUnsu;
    t[State::CmdUnsu as usize][b'B' as usize] = State::CmdUnsub;
    t[State::CmdUnsub as usize][b' ' as usize] = State::UnsubSpace;

    // Subject and digit-run transitions over the alphanumeric byte classes.
    let mut b: usize = 0;
    while b < 256 {
        let c = b as u8;

        if c.is_ascii_alphanumeric() {
            // SUB subjects: start, continue, and continue past a dot.
            t[State::SubSpace as usize][b] = State::SubSubject;
            t[State::SubSubject as usize][b] = State::SubSubject;
            t[State::SubSubjectDot as usize][b] = State::SubSubject;

            // PUB subjects: same shape, no wildcard states.
            t[State::PubSpace as usize][b] = State::PubSubject;
            t[State::PubSubject as usize][b] = State::PubSubject;
            t[State::PubSubjectDot as usize][b] = State::PubSubject;
        }

        if c.is_ascii_digit() {
            t[State::SubSubjectSpace as usize][b] = State::SubSid;
            t[State::SubSid as usize][b] = State::SubSid;

            t[State::PubSubjectSpace as usize][b] = State::PubNumBytes;
            t[State::PubNumBytes as usize][b] = State::PubNumBytes;

            t[State::UnsubSpace as usize][b] = State::UnsubSid;
            t[State::UnsubSid as usize][b] = State::UnsubSid;
        }

        b += 1;
    }

    // SUB subjects may start with a wildcard.
    t[State::SubSpace as usize][b'*' as usize] = State::SubSubjectStar;
    t[State::SubSpace as usize][b'>' as usize] = State::SubSubjectGt;

    // A dot may be followed by a token or a wildcard.
    t[State::SubSubject as usize][b'.' as usize] = State::SubSubjectDot;
    t[State::SubSubjectDot as usize][b'*' as usize] = State::SubSubjectStar;
    t[State::SubSubjectDot as usize][b'>' as usize] = State::SubSubjectGt;

    // `*` must be followed by a dot or end the subject.
    t[State::SubSubjectStar as usize][b'.' as usize] = State::SubSubjectDot;
    t[State::SubSubjectStar as usize][b' ' as usize] = State::SubSubjectSpace;

    // `>` must end the subject.
    t[State::SubSubjectGt as usize][b' ' as usize] = State::SubSubjectSpace;

    t[State::SubSubject as usize][b' ' as usize] = State::SubSubjectSpace;
    t[State::SubSid as usize][b'\r' as usize] = State::CrEnd;

    t[State::PubSubject as usize][b'.' as usize] = State::PubSubjectDot;
    t[State::PubSubject as usize][b' ' as usize] = State::PubSubjectSpace;

    // The payload cannot be parsed from the table; after the header's CRLF
    // the decoder reads exactly <nbytes> bytes and verifies the trailing
    // CRLF itself.
    t[State::PubNumBytes as usize][b'\r' as usize] = State::PubCr;
    t[State::PubCr as usize][b'\n' as usize] = State::PubPayload;

    t[State::UnsubSid as usize][b'\r' as usize] = State::CrEnd;

    t
}
