//! Test harness for the herald broker core.
//!
//! This crate provides the infrastructure the integration suite needs to
//! exercise the codec and trie the way a real deployment would: byte
//! streams arriving in arbitrary chunks, generated subjects and patterns
//! shared by every property suite, and multiple clients sharing one
//! dispatcher.
//!
//! The interesting assertions live in this crate's `tests/` directory;
//! the library itself only holds reusable pieces.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod chunked;
pub mod strategies;

pub use chunked::ChunkedReader;
