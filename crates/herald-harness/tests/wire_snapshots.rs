//! Snapshot tests for wire-format stability.
//!
//! Hex snapshots of every command's encoding. If the wire format drifts,
//! these fail before any peer notices.

use bytes::Bytes;
use herald_proto::Command;
use insta::assert_snapshot;

fn command_to_hex(command: &Command) -> String {
    let mut wire = Vec::new();
    command.encode(&mut wire).expect("encoding should succeed");
    hex::encode(&wire)
}

#[test]
fn snapshot_ping() {
    assert_snapshot!(command_to_hex(&Command::Ping), @"50494e470d0a");
}

#[test]
fn snapshot_pong() {
    assert_snapshot!(command_to_hex(&Command::Pong), @"504f4e470d0a");
}

#[test]
fn snapshot_connect() {
    assert_snapshot!(command_to_hex(&Command::Connect), @"434f4e4e454354207b7d0d0a");
}

#[test]
fn snapshot_sub() {
    let sub = Command::Sub { subject: Bytes::from_static(b"foo.bar"), sid: 42 };
    assert_snapshot!(command_to_hex(&sub), @"53554220666f6f2e6261722034320d0a");
}

#[test]
fn snapshot_sub_wildcard() {
    let sub = Command::Sub { subject: Bytes::from_static(b"foo.>"), sid: 7 };
    assert_snapshot!(command_to_hex(&sub), @"53554220666f6f2e3e20370d0a");
}

#[test]
fn snapshot_unsub() {
    let unsub = Command::Unsub { sid: 9001 };
    assert_snapshot!(command_to_hex(&unsub), @"554e53554220393030310d0a");
}

#[test]
fn snapshot_pub() {
    let publish = Command::Pub {
        subject: Bytes::from_static(b"foo.bar"),
        len: 5,
        msg: Bytes::from_static(b"hello"),
    };
    assert_snapshot!(command_to_hex(&publish), @"50554220666f6f2e62617220350d0a68656c6c6f0d0a");
}

#[test]
fn snapshot_pub_empty_payload() {
    let publish = Command::Pub {
        subject: Bytes::from_static(b"foo"),
        len: 0,
        msg: Bytes::new(),
    };
    assert_snapshot!(command_to_hex(&publish), @"50554220666f6f20300d0a0d0a");
}
