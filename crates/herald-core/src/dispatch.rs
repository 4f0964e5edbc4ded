//! Command dispatch over the subject trie.
//!
//! The dispatcher is the consumer side of the codec: it takes one decoded
//! [`Command`] at a time and translates it into trie operations plus a
//! list of [`DispatchAction`]s for the driver to execute. It follows the
//! action pattern: no I/O happens here, so the same dispatcher drives real
//! transports and test harnesses alike.
//!
//! Dispatch-level failures are recoverable by design: an invalid pattern,
//! an unknown unsubscribe key, or a malformed publish subject rejects that
//! one command and leaves both the trie and the connection intact. Only
//! transport and protocol errors (raised by the decoder, not here) kill a
//! connection.

use std::collections::HashSet;

use bytes::Bytes;
use thiserror::Error;

use herald_proto::Command;

use crate::{
    subject::{LookupError, SubError},
    trie::{RemoveError, SubjectTrie, Subscription},
};

/// Actions returned by the dispatcher for the driver to execute.
///
/// `H` is the delivery handle type registered with each subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchAction<H> {
    /// Write a PONG to the client that sent a PING.
    Pong {
        /// The pinging client's delivery handle.
        handle: H,
    },

    /// Write a PUB message to one matched subscriber.
    Deliver {
        /// The subscriber's delivery handle.
        handle: H,
        /// Subject the message was published under.
        subject: Bytes,
        /// Message payload.
        msg: Bytes,
    },
}

/// A command was rejected at the dispatch layer.
///
/// All variants are recoverable: the offending command is dropped and the
/// connection continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// SUB carried an invalid pattern.
    #[error(transparent)]
    InvalidSub(#[from] SubError),

    /// PUB carried an invalid subject.
    #[error(transparent)]
    InvalidLookup(#[from] LookupError),

    /// UNSUB referenced an unknown `(client_id, sid)` key.
    #[error(transparent)]
    UnknownSubscription(#[from] RemoveError),

    /// A hand-built command carried a subject that is not valid UTF-8.
    ///
    /// Subjects decoded from the wire are always ASCII, so this only
    /// arises for commands constructed in process.
    #[error("subject is not valid utf-8")]
    SubjectNotUtf8,
}

/// Consumes decoded commands and drives the subject trie.
pub struct Dispatcher<H> {
    trie: SubjectTrie<H>,
}

impl<H: Clone> Dispatcher<H> {
    /// Create a dispatcher over an empty trie.
    #[must_use]
    pub fn new() -> Self {
        Self { trie: SubjectTrie::new() }
    }

    /// The underlying subscription trie.
    #[must_use]
    pub fn trie(&self) -> &SubjectTrie<H> {
        &self.trie
    }

    /// Process one command from `client_id` and return the actions to
    /// execute.
    ///
    /// `handle` is the sending client's delivery handle; it is cloned into
    /// new subscriptions and PONG replies.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] when the command is rejected. The trie
    /// is never left half-updated: a rejected command performs no
    /// mutation.
    pub fn handle(
        &self,
        client_id: i64,
        handle: &H,
        command: Command,
    ) -> Result<Vec<DispatchAction<H>>, DispatchError> {
        match command {
            Command::Connect | Command::Pong => Ok(Vec::new()),

            Command::Ping => Ok(vec![DispatchAction::Pong { handle: handle.clone() }]),

            Command::Sub { subject, sid } => {
                let pattern = subject_str(&subject)?;
                self.trie.add_sub(
                    pattern,
                    Subscription { client_id, sid, handle: handle.clone() },
                )?;
                Ok(Vec::new())
            },

            Command::Unsub { sid } => {
                self.trie.remove_sub(client_id, sid)?;
                Ok(Vec::new())
            },

            Command::Pub { subject, msg, .. } => {
                let matched = self.trie.lookup(subject_str(&subject)?)?;

                // The trie returns every matching record; a subscriber
                // registered under overlapping patterns gets one delivery.
                let mut seen = HashSet::with_capacity(matched.len());
                let mut actions = Vec::with_capacity(matched.len());
                for record in matched {
                    if seen.insert((record.client_id, record.sid)) {
                        actions.push(DispatchAction::Deliver {
                            handle: record.handle,
                            subject: subject.clone(),
                            msg: msg.clone(),
                        });
                    }
                }

                tracing::debug!(
                    subject = %String::from_utf8_lossy(&subject),
                    deliveries = actions.len(),
                    "published"
                );

                Ok(actions)
            },
        }
    }
}

impl<H: Clone> Default for Dispatcher<H> {
    fn default() -> Self {
        Self::new()
    }
}

fn subject_str(subject: &Bytes) -> Result<&str, DispatchError> {
    std::str::from_utf8(subject).map_err(|_| DispatchError::SubjectNotUtf8)
}
