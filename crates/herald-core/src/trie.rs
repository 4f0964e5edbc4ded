//! Concurrent subject-match trie.
//!
//! Subscriptions are stored in a trie partitioned by subject token: each
//! edge is one token, and a subscription registered under `a.b.c` lives in
//! the node three edges below the root. Wildcard edges are ordinary edges
//! whose token is `*` or `>`; the matching rules give them their meaning.
//!
//! # Structure
//!
//! Nodes live in a slot arena indexed by [`NodeId`], with the root fixed
//! at slot 0. Each node keeps a back-pointer to its parent and the edge
//! token through which the parent reaches it, which is what removal needs
//! to prune emptied branches bottom-up. A two-level reverse index
//! (`client_id → sid → NodeId`) resolves removals without re-walking the
//! pattern.
//!
//! # Concurrency
//!
//! One read/write lock guards the whole structure: lookups take the
//! shared side and copy matching records out before releasing; add and
//! remove take the exclusive side. No operation suspends or performs I/O
//! while holding the lock.
//!
//! # Lifecycle invariants
//!
//! - An index entry exists iff at least one matching `(client_id, sid)`
//!   record exists in the pointed-to node's subscription list.
//! - A node is created lazily when `add_sub` walks through a missing
//!   token, and destroyed by `remove_sub` exactly when it has no
//!   subscriptions, no children, and is not the root.

use std::{
    collections::HashMap,
    sync::RwLock,
};

use thiserror::Error;

use crate::subject::{valid_lookup, valid_sub, LookupError, SubError};

/// One registered subscription.
///
/// The `(client_id, sid)` pair is the unique removal key; the trie itself
/// never deduplicates on it, so inserting the same key twice leaves two
/// records. `H` is the caller's delivery handle (a writer, a channel, a
/// test label) and is cloned into lookup results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription<H> {
    /// Broker-assigned client identifier.
    pub client_id: i64,
    /// Client-local subscription identifier.
    pub sid: i64,
    /// Delivery handle for the subscriber's transport.
    pub handle: H,
}

/// A removal referenced a `(client_id, sid)` key with no live
/// subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RemoveError {
    /// No subscription is registered under the given key.
    #[error("no subscription")]
    NoSubscription,
}

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug)]
struct Node<H> {
    /// Token edge through which the parent reaches this node; empty for
    /// the root.
    key: String,
    /// Parent slot; `None` only for the root.
    parent: Option<NodeId>,
    children: HashMap<String, NodeId>,
    subs: Vec<Subscription<H>>,
}

impl<H> Node<H> {
    fn new(key: String, parent: NodeId) -> Self {
        Self { key, parent: Some(parent), children: HashMap::new(), subs: Vec::new() }
    }

    fn root() -> Self {
        Self { key: String::new(), parent: None, children: HashMap::new(), subs: Vec::new() }
    }
}

#[derive(Debug)]
struct TrieInner<H> {
    /// Slot arena; vacated slots are recycled through `free`.
    nodes: Vec<Option<Node<H>>>,
    free: Vec<NodeId>,
    /// Reverse index: `client_id → sid → node holding the records`.
    index: HashMap<i64, HashMap<i64, NodeId>>,
}

impl<H> TrieInner<H> {
    fn node(&self, id: NodeId) -> &Node<H> {
        self.nodes[id].as_ref().expect("live NodeId points at a vacant slot")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<H> {
        self.nodes[id].as_mut().expect("live NodeId points at a vacant slot")
    }

    fn alloc(&mut self, node: Node<H>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = Some(node);
                id
            },
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            },
        }
    }

    fn release(&mut self, id: NodeId) -> Node<H> {
        let node = self.nodes[id].take().expect("released NodeId points at a vacant slot");
        self.free.push(id);
        node
    }

    fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Collect every record matching the remaining tokens at `id`.
    ///
    /// At each level three edges can contribute: the exact literal, the
    /// `*` edge (consuming one token), and the `>` edge, whose records
    /// match any non-empty remaining suffix outright.
    fn collect_matches(&self, id: NodeId, tokens: &[&str], out: &mut Vec<Subscription<H>>)
    where
        H: Clone,
    {
        let node = self.node(id);

        let Some((first, rest)) = tokens.split_first() else {
            out.extend(node.subs.iter().cloned());
            return;
        };

        if let Some(&child) = node.children.get(*first) {
            self.collect_matches(child, rest, out);
        }

        if let Some(&star) = node.children.get("*") {
            self.collect_matches(star, rest, out);
        }

        if let Some(&gt) = node.children.get(">") {
            out.extend(self.node(gt).subs.iter().cloned());
        }
    }

    /// Detach `id` and every emptied ancestor, stopping at the first node
    /// that still has subscriptions or children, or at the root.
    fn prune(&mut self, id: NodeId) {
        let mut cur = id;
        while cur != ROOT {
            {
                let node = self.node(cur);
                if !node.subs.is_empty() || !node.children.is_empty() {
                    break;
                }
            }

            let node = self.release(cur);
            let parent = node.parent.expect("non-root node has a parent");
            self.node_mut(parent).children.remove(&node.key);
            cur = parent;
        }
    }
}

/// Concurrent token-partitioned trie mapping subjects to subscriptions.
///
/// See the [module-level documentation](crate::trie) for structure and
/// invariants.
///
/// # Panics
///
/// All operations panic if the internal lock is poisoned, that is, if a
/// thread panicked while holding it. No trie operation panics while
/// holding the lock, so this is unreachable in normal use.
#[derive(Debug)]
pub struct SubjectTrie<H> {
    inner: RwLock<TrieInner<H>>,
}

impl<H> SubjectTrie<H> {
    /// Create an empty trie containing only the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(TrieInner {
                nodes: vec![Some(Node::root())],
                free: Vec::new(),
                index: HashMap::new(),
            }),
        }
    }

    /// Register `record` under `pattern`.
    ///
    /// Walks from the root creating missing token nodes, appends the
    /// record to the terminal node's list, and points the reverse index at
    /// that node. Duplicate `(client_id, sid)` keys are not checked: a
    /// second add appends another record and re-points the index entry.
    ///
    /// # Errors
    ///
    /// Returns [`SubError`] if `pattern` violates the pattern rules; the
    /// trie is unchanged.
    pub fn add_sub(&self, pattern: &str, record: Subscription<H>) -> Result<(), SubError> {
        let tokens = valid_sub(pattern)?;

        let mut inner = self.inner.write().expect("subject trie lock poisoned");

        let mut cur = ROOT;
        for token in tokens {
            cur = match inner.node(cur).children.get(token).copied() {
                Some(child) => child,
                None => {
                    let child = inner.alloc(Node::new(token.to_string(), cur));
                    inner.node_mut(cur).children.insert(token.to_string(), child);
                    child
                },
            };
        }

        tracing::debug!(
            client_id = record.client_id,
            sid = record.sid,
            pattern,
            "registered subscription"
        );

        inner.index.entry(record.client_id).or_default().insert(record.sid, cur);
        inner.node_mut(cur).subs.push(record);

        Ok(())
    }

    /// Return every record whose pattern matches `subject`.
    ///
    /// The result is the flat concatenation of all matches in unspecified
    /// order, with no deduplication: a subscriber registered under two
    /// overlapping patterns appears twice, and deduping is the caller's
    /// job. Records are copied out under the shared lock.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if `subject` is empty, has empty tokens, or
    /// contains a wildcard.
    pub fn lookup(&self, subject: &str) -> Result<Vec<Subscription<H>>, LookupError>
    where
        H: Clone,
    {
        let tokens = valid_lookup(subject)?;

        let inner = self.inner.read().expect("subject trie lock poisoned");

        let mut matches = Vec::new();
        inner.collect_matches(ROOT, &tokens, &mut matches);
        Ok(matches)
    }

    /// Remove every record registered under `(client_id, sid)`.
    ///
    /// Resolves the node through the reverse index, deletes the index
    /// entry, compacts the node's record list in one in-place pass
    /// (removing all duplicates at once; survivor order is not preserved),
    /// and prunes any branch the removal emptied.
    ///
    /// # Errors
    ///
    /// Returns [`RemoveError::NoSubscription`] if no subscription is
    /// registered under the key; the trie is unchanged.
    pub fn remove_sub(&self, client_id: i64, sid: i64) -> Result<(), RemoveError> {
        let mut inner = self.inner.write().expect("subject trie lock poisoned");

        let Some(sids) = inner.index.get_mut(&client_id) else {
            return Err(RemoveError::NoSubscription);
        };
        let Some(node_id) = sids.remove(&sid) else {
            return Err(RemoveError::NoSubscription);
        };
        if sids.is_empty() {
            inner.index.remove(&client_id);
        }

        let node = inner.node_mut(node_id);
        let mut i = 0;
        while i < node.subs.len() {
            if node.subs[i].client_id == client_id && node.subs[i].sid == sid {
                node.subs.swap_remove(i);
            } else {
                i += 1;
            }
        }

        inner.prune(node_id);

        tracing::debug!(client_id, sid, "removed subscription");

        Ok(())
    }

    /// Number of live nodes, including the root.
    ///
    /// Useful for asserting pruning behavior in tests.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.read().expect("subject trie lock poisoned").live_nodes()
    }
}

impl<H> Default for SubjectTrie<H> {
    fn default() -> Self {
        Self::new()
    }
}
