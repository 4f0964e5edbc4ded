//! Property-based tests for the wire codec.
//!
//! Invariants covered:
//! - encoding any valid command then decoding yields the same command
//! - decoding is invariant under re-chunking of the input, down to one
//!   byte per read
//! - digit-run parsing is exact at the `i64` boundary
//!
//! Subjects and patterns come from [`herald_harness::strategies`], the
//! same generators the trie suite uses.

use std::io::BufReader;

use bytes::Bytes;
use herald_harness::{
    strategies::{lookup_subject, sub_pattern},
    ChunkedReader,
};
use herald_proto::{parse_digits, Command, Decoder, ProtocolError};
use proptest::prelude::*;

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Ping),
        Just(Command::Pong),
        Just(Command::Connect),
        (sub_pattern(), 0i64..=i64::MAX).prop_map(|(subject, sid)| Command::Sub {
            subject: Bytes::from(subject.into_bytes()),
            sid,
        }),
        (lookup_subject(), prop::collection::vec(any::<u8>(), 0..64)).prop_map(
            |(subject, msg)| Command::Pub {
                subject: Bytes::from(subject.into_bytes()),
                len: msg.len() as i64,
                msg: Bytes::from(msg),
            }
        ),
        (0i64..=i64::MAX).prop_map(|sid| Command::Unsub { sid }),
    ]
}

#[test]
fn prop_grammar_round_trip() {
    proptest!(|(commands in prop::collection::vec(command(), 0..8))| {
        let mut wire = Vec::new();
        for command in &commands {
            command.encode(&mut wire).expect("valid command should encode");
        }

        let mut decoder = Decoder::new(wire.as_slice());
        for (i, want) in commands.iter().enumerate() {
            let got = decoder.decode().unwrap_or_else(|e| panic!("decode {}: {:?}", i, e));
            prop_assert_eq!(&got, want, "decode index {}", i);
        }

        // Nothing but EOF remains.
        prop_assert!(matches!(decoder.decode(), Err(ProtocolError::Io(_))));
    });
}

#[test]
fn prop_chunk_invariance() {
    proptest!(|(
        commands in prop::collection::vec(command(), 1..6),
        chunk in 1usize..16,
    )| {
        let mut wire = Vec::new();
        for command in &commands {
            command.encode(&mut wire).expect("valid command should encode");
        }

        let mut decoder =
            Decoder::new(BufReader::new(ChunkedReader::new(wire.clone(), chunk)));
        for (i, want) in commands.iter().enumerate() {
            let got = decoder
                .decode()
                .unwrap_or_else(|e| panic!("chunk {} decode {}: {:?}", chunk, i, e));
            prop_assert_eq!(&got, want, "chunk {} decode index {}", chunk, i);
        }
    });
}

#[test]
fn prop_parse_digits_matches_integer_value() {
    proptest!(|(value in 0i64..=i64::MAX)| {
        let digits = value.to_string();
        prop_assert_eq!(parse_digits(digits.as_bytes()).expect("in-range digits parse"), value);
    });
}

#[test]
fn prop_parse_digits_rejects_past_the_boundary() {
    proptest!(|(beyond in 0u64..=u64::MAX - i64::MAX as u64 - 1)| {
        // Everything in (i64::MAX, u64::MAX] overflows.
        let digits = (i64::MAX as u64 + 1 + beyond).to_string();
        let is_overflow = matches!(
            parse_digits(digits.as_bytes()),
            Err(ProtocolError::BadParse { reason: "i64 overflow" })
        );
        prop_assert!(is_overflow);
    });
}

#[test]
fn prop_parse_digits_rejects_non_digits() {
    proptest!(|(input in "[0-9]{0,5}[a-zA-Z .-][0-9a-zA-Z]{0,5}")| {
        prop_assert!(parse_digits(input.as_bytes()).is_err());
    });
}

#[test]
fn parse_digits_boundary_values() {
    assert_eq!(parse_digits(b"0").expect("should parse"), 0);
    assert_eq!(
        parse_digits(b"9223372036854775807").expect("should parse"),
        9_223_372_036_854_775_807
    );
    assert!(parse_digits(b"9223372036854775808").is_err());
    assert!(parse_digits(b"92233720368547758070").is_err());
    assert!(parse_digits(b"").is_err());
}
