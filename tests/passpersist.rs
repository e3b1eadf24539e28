//! Pass-persist protocol integration tests: full sessions over in-memory
//! streams, exactly as snmpd would drive them.

mod common;

use common::run_session;
use snmp_subagent::oid;
use snmp_subagent::passpersist::PassPersistExtension;
use snmp_subagent::smi::{SmiLeaf, SmiNode};
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// A flat tree with scalars directly under the root.
fn flat_tree() -> SmiNode {
    SmiNode::with_children(vec![
        SmiNode::from(SmiLeaf::integer(42)),
        SmiNode::from(SmiLeaf::string("webfarm")),
    ])
}

/// A scalar-group layout: two subtrees of leaves under the root, the way
/// a MIB lays out its object groups.
fn grouped_tree() -> SmiNode {
    SmiNode::with_children(vec![
        SmiNode::with_children(vec![
            SmiNode::from(SmiLeaf::integer(42)),
            SmiNode::from(SmiLeaf::string("webfarm")),
        ]),
        SmiNode::with_children(vec![
            SmiNode::from(SmiLeaf::gauge32(7)),
            SmiNode::from(SmiLeaf::ip_address([192, 0, 2, 1])),
        ]),
    ])
}

#[tokio::test]
async fn get_resolves_an_integer_leaf() {
    let output = run_session(
        oid!(1, 3, 6, 1, 4, 1, 899),
        flat_tree,
        "get\n.1.3.6.1.4.1.899.1\n",
    )
    .await;

    assert_eq!(output, ".1.3.6.1.4.1.899.1\ninteger\n42\n");
}

#[tokio::test]
async fn get_resolves_nested_leaves() {
    let root = oid!(1, 3, 6, 1, 4, 1, 899);

    let output = run_session(root.clone(), grouped_tree, "get\n.1.3.6.1.4.1.899.2.1\n").await;
    assert_eq!(output, ".1.3.6.1.4.1.899.2.1\ngauge\n7\n");

    let output = run_session(root, grouped_tree, "get\n.1.3.6.1.4.1.899.2.2\n").await;
    assert_eq!(output, ".1.3.6.1.4.1.899.2.2\nipaddress\n192.0.2.1\n");
}

#[tokio::test]
async fn getnext_at_end_of_mib_is_none() {
    // The last leaf of the tree.
    let output = run_session(
        oid!(1, 3, 6, 1, 4, 1, 899),
        grouped_tree,
        "getnext\n.1.3.6.1.4.1.899.2.2\n",
    )
    .await;

    assert_eq!(output, "None\n");
}

#[tokio::test]
async fn getnext_walks_the_whole_subtree() {
    // Walk exactly as snmpwalk would: feed each returned OID back in.
    let root = oid!(1, 3, 6, 1, 4, 1, 899);
    let input = "getnext\n.1.3.6.1.4.1.899\n\
                 getnext\n.1.3.6.1.4.1.899.1.1\n\
                 getnext\n.1.3.6.1.4.1.899.1.2\n\
                 getnext\n.1.3.6.1.4.1.899.2.1\n\
                 getnext\n.1.3.6.1.4.1.899.2.2\n";

    let output = run_session(root, grouped_tree, input).await;

    assert_eq!(
        output,
        ".1.3.6.1.4.1.899.1.1\ninteger\n42\n\
         .1.3.6.1.4.1.899.1.2\nstring\nwebfarm\n\
         .1.3.6.1.4.1.899.2.1\ngauge\n7\n\
         .1.3.6.1.4.1.899.2.2\nipaddress\n192.0.2.1\n\
         None\n"
    );
}

#[tokio::test]
async fn ping_and_commands_are_case_insensitive() {
    let root = oid!(1, 3, 6, 1, 4, 1, 899);
    let output = run_session(
        root,
        grouped_tree,
        "PING\nGET\n.1.3.6.1.4.1.899.1.1\nGETNEXT\n.1.3.6.1.4.1.899.1.1\n",
    )
    .await;

    assert_eq!(
        output,
        "PONG\n\
         .1.3.6.1.4.1.899.1.1\ninteger\n42\n\
         .1.3.6.1.4.1.899.1.2\nstring\nwebfarm\n"
    );
}

#[tokio::test]
async fn unresolvable_get_is_none() {
    let root = oid!(1, 3, 6, 1, 4, 1, 899);

    // Past the last sibling.
    let output = run_session(root.clone(), grouped_tree, "get\n.1.3.6.1.4.1.899.9\n").await;
    assert_eq!(output, "None\n");

    // A subtree position has no value.
    let output = run_session(root, grouped_tree, "get\n.1.3.6.1.4.1.899.2\n").await;
    assert_eq!(output, "None\n");
}

#[tokio::test]
async fn blank_line_ends_the_session() {
    let root = oid!(1, 3, 6, 1, 4, 1, 899);
    let output = run_session(root, grouped_tree, "\nget\n.1.3.6.1.4.1.899.1.1\n").await;
    assert_eq!(output, "");
}

#[tokio::test]
async fn root_request_refreshes_before_answering() {
    let polls = Arc::new(AtomicI64::new(0));
    let counter = Arc::clone(&polls);

    // Each rebuild stamps the poll number into the tree.
    let refresh = move || {
        let poll = counter.fetch_add(1, Ordering::SeqCst);
        SmiNode::with_children(vec![SmiNode::with_children(vec![SmiNode::from(
            SmiLeaf::integer(poll),
        )])])
    };

    let root = oid!(1, 3, 6, 1, 4, 1, 899);
    let input = "getnext\n.1.3.6.1.4.1.899\n\
                 get\n.1.3.6.1.4.1.899.1.1\n\
                 getnext\n.1.3.6.1.4.1.899\n";
    let output = run_session(root, refresh, input).await;

    // Poll 0 is the initial snapshot. The first root request rebuilds to
    // poll 1 and must answer from it; the non-root GET reuses that tree;
    // the second root request rebuilds again.
    assert_eq!(
        output,
        ".1.3.6.1.4.1.899.1.1\ninteger\n1\n\
         .1.3.6.1.4.1.899.1.1\ninteger\n1\n\
         .1.3.6.1.4.1.899.1.1\ninteger\n2\n"
    );
    assert_eq!(polls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn malformed_oid_line_fails_the_session() {
    let root = oid!(1, 3, 6, 1, 4, 1, 899);
    let mut extension = PassPersistExtension::new(root, grouped_tree);

    let mut output = Vec::new();
    let result = extension
        .serve(
            Cursor::new(b"get\n1.3.6.1.4.1.899.1\n".to_vec()),
            &mut output,
        )
        .await;

    // Missing leading dot: the serve loop returns the parse error.
    assert!(result.is_err());
}

#[tokio::test]
async fn oid_outside_the_registered_root_fails_the_session() {
    let root = oid!(1, 3, 6, 1, 4, 1, 899);
    let mut extension = PassPersistExtension::new(root, grouped_tree);

    let mut output = Vec::new();
    let result = extension
        .serve(
            Cursor::new(b"getnext\n.1.3.6.1.4.1.900\n".to_vec()),
            &mut output,
        )
        .await;

    assert!(result.is_err());
}
