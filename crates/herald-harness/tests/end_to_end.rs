//! End-to-end scenarios: bytes in, deliveries out.
//!
//! Each scenario runs the full pipeline a broker connection would: raw
//! bytes through the decoder, decoded commands through the dispatcher,
//! trie lookups into delivery actions.

use std::io::Cursor;

use bytes::Bytes;
use herald_core::{DispatchAction, DispatchError, Dispatcher, SubjectTrie, Subscription};
use herald_proto::Decoder;

/// Decode every command in `wire` and dispatch it for `client_id`,
/// collecting all resulting actions. The handle is the client id itself.
fn run_client(
    dispatcher: &Dispatcher<i64>,
    client_id: i64,
    wire: &[u8],
) -> Result<Vec<DispatchAction<i64>>, DispatchError> {
    let mut decoder = Decoder::new(Cursor::new(wire));
    let mut actions = Vec::new();

    loop {
        match decoder.decode() {
            Ok(command) => actions.extend(dispatcher.handle(client_id, &client_id, command)?),
            Err(_) => break,
        }
    }

    Ok(actions)
}

fn delivered_handles(actions: &[DispatchAction<i64>]) -> Vec<i64> {
    let mut handles: Vec<i64> = actions
        .iter()
        .filter_map(|action| match action {
            DispatchAction::Deliver { handle, .. } => Some(*handle),
            DispatchAction::Pong { .. } => None,
        })
        .collect();
    handles.sort_unstable();
    handles
}

#[test]
fn publish_reaches_literal_star_and_gt_subscribers() {
    let dispatcher = Dispatcher::new();

    run_client(&dispatcher, 1, b"SUB a.b 1\r\n").expect("should subscribe");
    run_client(&dispatcher, 2, b"SUB a.* 2\r\n").expect("should subscribe");
    run_client(&dispatcher, 3, b"SUB a.> 3\r\n").expect("should subscribe");
    run_client(&dispatcher, 4, b"SUB x.y 4\r\n").expect("should subscribe");

    let actions = run_client(&dispatcher, 9, b"PUB a.b 2\r\nhi\r\n").expect("should publish");
    assert_eq!(delivered_handles(&actions), vec![1, 2, 3]);

    for action in &actions {
        if let DispatchAction::Deliver { subject, msg, .. } = action {
            assert_eq!(subject, &Bytes::from_static(b"a.b"));
            assert_eq!(msg, &Bytes::from_static(b"hi"));
        }
    }
}

#[test]
fn trie_returns_duplicates_dispatch_delivers_once() {
    // Same client and sid under two overlapping patterns: the trie keeps
    // and returns both records, the dispatcher collapses them to one
    // delivery.
    let trie = SubjectTrie::new();
    trie.add_sub("foo.bar", Subscription { client_id: 1, sid: 5, handle: () })
        .expect("should add");
    trie.add_sub("foo.*", Subscription { client_id: 1, sid: 5, handle: () })
        .expect("should add");
    assert_eq!(trie.lookup("foo.bar").expect("should look up").len(), 2);

    let dispatcher = Dispatcher::new();
    run_client(&dispatcher, 1, b"SUB foo.bar 5\r\nSUB foo.* 5\r\n").expect("should subscribe");

    let actions = run_client(&dispatcher, 2, b"PUB foo.bar 1\r\nx\r\n").expect("should publish");
    assert_eq!(delivered_handles(&actions), vec![1]);
}

#[test]
fn root_gt_subscriber_sees_every_subject() {
    let dispatcher = Dispatcher::new();
    run_client(&dispatcher, 99, b"SUB > 1\r\n").expect("should subscribe");

    for wire in [
        b"PUB foo 1\r\nx\r\n".as_slice(),
        b"PUB foo.bar 1\r\nx\r\n",
        b"PUB a.b.c.d 1\r\nx\r\n",
    ] {
        let actions = run_client(&dispatcher, 5, wire).expect("should publish");
        assert_eq!(delivered_handles(&actions), vec![99], "wire {:?}", wire);
    }
}

#[test]
fn full_session_lifecycle() {
    let dispatcher = Dispatcher::new();

    // Subscriber connects, subscribes, is pinged back, unsubscribes.
    let actions = run_client(
        &dispatcher,
        1,
        b"CONNECT {}\r\nPING\r\nSUB orders.> 11\r\n",
    )
    .expect("session should dispatch");
    assert_eq!(actions, vec![DispatchAction::Pong { handle: 1 }]);

    let actions =
        run_client(&dispatcher, 2, b"PUB orders.eu.created 4\r\nship\r\n").expect("should publish");
    assert_eq!(delivered_handles(&actions), vec![1]);

    run_client(&dispatcher, 1, b"UNSUB 11\r\n").expect("should unsubscribe");

    let actions =
        run_client(&dispatcher, 2, b"PUB orders.eu.created 4\r\nship\r\n").expect("should publish");
    assert!(delivered_handles(&actions).is_empty());

    // The trie pruned the dead branch back to the root.
    assert_eq!(dispatcher.trie().node_count(), 1);
}

#[test]
fn unsub_for_unknown_sid_is_recoverable() {
    let dispatcher = Dispatcher::new();

    let result = run_client(&dispatcher, 1, b"UNSUB 7\r\n");
    assert!(matches!(result, Err(DispatchError::UnknownSubscription(_))));

    // The connection carries on afterwards.
    run_client(&dispatcher, 1, b"SUB foo 7\r\n").expect("should subscribe");
    let actions = run_client(&dispatcher, 2, b"PUB foo 1\r\nx\r\n").expect("should publish");
    assert_eq!(delivered_handles(&actions), vec![1]);
}

#[test]
fn sids_are_scoped_per_client() {
    let dispatcher = Dispatcher::new();

    // Two clients use the same sid; removing one leaves the other.
    run_client(&dispatcher, 1, b"SUB foo 7\r\n").expect("should subscribe");
    run_client(&dispatcher, 2, b"SUB foo 7\r\n").expect("should subscribe");

    run_client(&dispatcher, 1, b"UNSUB 7\r\n").expect("should unsubscribe");

    let actions = run_client(&dispatcher, 3, b"PUB foo 1\r\nx\r\n").expect("should publish");
    assert_eq!(delivered_handles(&actions), vec![2]);
}
