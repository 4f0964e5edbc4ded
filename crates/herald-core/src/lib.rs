//! Routing core of the herald publish/subscribe broker.
//!
//! This crate holds the broker's shared routing state and the logic that
//! drives it from decoded wire commands. It performs no I/O of its own:
//! transports hand decoded [`Command`](herald_proto::Command)s in, and the
//! dispatcher hands [`DispatchAction`](dispatch::DispatchAction)s back for
//! the driver to execute.
//!
//! ```text
//! transport bytes
//!       ↓
//! herald-proto::Decoder
//!       ↓ Command
//! dispatch::Dispatcher ──► trie::SubjectTrie
//!       ↓                      (AddSub / RemoveSub on SUB / UNSUB,
//! DispatchAction                Lookup on PUB)
//!       ↓
//! driver writes to subscriber transports
//! ```
//!
//! # Modules
//!
//! - [`subject`]: token and wildcard rules shared by the register and
//!   lookup paths
//! - [`trie`]: concurrent token-partitioned subject trie with a reverse
//!   index for O(1) removal
//! - [`dispatch`]: consumes commands, drives the trie, returns actions

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod dispatch;
pub mod subject;
pub mod trie;

pub use dispatch::{DispatchAction, DispatchError, Dispatcher};
pub use subject::{valid_lookup, valid_sub, LookupError, SubError};
pub use trie::{RemoveError, SubjectTrie, Subscription};
