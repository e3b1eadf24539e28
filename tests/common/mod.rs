//! Shared test infrastructure for snmp-subagent.
//!
//! Provides SMI tree fixtures and a driver that runs a full pass-persist
//! session over in-memory streams.

// Allow dead code since not all test files use all utilities
#![allow(dead_code)]

use snmp_subagent::oid::Oid;
use snmp_subagent::passpersist::PassPersistExtension;
use snmp_subagent::smi::{LeafValue, SmiLeaf, SmiNode};
use std::io::Cursor;

/// A subtree of `n` integer leaves valued `1..=n`.
pub fn leaf_group(n: i64) -> SmiNode {
    SmiNode::with_children((1..=n).map(|i| SmiNode::from(SmiLeaf::integer(i))).collect())
}

/// The three-sibling-group tree used by the GETNEXT scenarios: an outer
/// subtree holding three groups of ten integer leaves each.
pub fn three_groups() -> SmiNode {
    SmiNode::with_children(vec![leaf_group(10), leaf_group(10), leaf_group(10)])
}

/// [`three_groups`] plus a fourth sibling that is itself a subtree of two
/// ten-leaf subtrees.
pub fn three_groups_and_nested() -> SmiNode {
    SmiNode::with_children(vec![
        leaf_group(10),
        leaf_group(10),
        leaf_group(10),
        SmiNode::with_children(vec![leaf_group(10), leaf_group(10)]),
    ])
}

/// Extract the integer payload of a leaf node.
pub fn leaf_value(node: &SmiNode) -> i64 {
    match node.value().map(SmiLeaf::value) {
        Some(&LeafValue::Integer(v)) => v,
        other => panic!("expected an integer leaf, got {:?}", other),
    }
}

/// Run a complete pass-persist session: feed `input` to an engine rooted
/// at `root` over the tree produced by `refresh`, and return everything it
/// wrote.
///
/// The session ends at end-of-input, which the engine treats as a clean
/// shutdown.
pub async fn run_session<F>(root: Oid, refresh: F, input: &str) -> String
where
    F: FnMut() -> SmiNode,
{
    let mut extension = PassPersistExtension::new(root, refresh);

    let mut output = Vec::new();
    extension
        .serve(Cursor::new(input.as_bytes().to_vec()), &mut output)
        .await
        .expect("session should shut down cleanly");
    String::from_utf8(output).expect("pass-persist output is ASCII")
}
