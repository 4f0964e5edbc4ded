//! Fuzzer for the wire decoder.
//!
//! Feeds arbitrary byte streams to the decoder: every input must yield a
//! sequence of commands followed by a typed error, never a panic. Every
//! successfully decoded command is additionally re-encoded and re-decoded
//! to pin the round-trip invariant.

#![no_main]

use herald_proto::{Command, Decoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = Decoder::new(data);

    // Each successful decode consumes at least one byte, so this loop
    // terminates for every finite input.
    let mut decoded: Vec<Command> = Vec::new();
    loop {
        match decoder.decode() {
            Ok(command) => decoded.push(command),
            Err(_) => break,
        }
    }

    for command in decoded {
        let mut wire = Vec::new();
        command.encode(&mut wire).expect("decoded command should re-encode");

        let mut redecoder = Decoder::new(wire.as_slice());
        let again = redecoder.decode().expect("re-encoded command should decode");
        assert_eq!(command, again, "round trip changed the command");
    }
});
