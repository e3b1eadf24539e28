//! Read-only walkers over the SMI tree.
//!
//! Both walkers take an OID *relative to the node they are given*: sub-OID
//! component `i` selects the `i`-th child (1-based) at each level. They
//! never mutate the tree.
//!
//! [`get_leaf`] resolves an OID to a node. [`next_leaf`] is the GETNEXT
//! core: it finds the OID of the next reachable leaf strictly after the
//! given position in pre-order, descending through subtrees, advancing
//! across siblings, and backtracking upward when a sibling group is
//! exhausted.

use crate::oid::Oid;
use crate::smi::SmiNode;
use smallvec::SmallVec;

type Arcs = SmallVec<[u32; 16]>;

/// Resolve a node by relative OID.
///
/// Returns `None` for the empty OID, for an out-of-range child index at
/// any level, and for positions below the tree. Resolving *through* a leaf
/// (an OID that drills one level too far) still observes that leaf, so
/// callers that append an instance component reach the value.
///
/// # Examples
///
/// ```
/// use snmp_subagent::smi::{SmiLeaf, SmiNode};
/// use snmp_subagent::walk::get_leaf;
/// use snmp_subagent::oid;
///
/// let inner = SmiNode::with_children(
///     (1..=3).map(|i| SmiNode::from(SmiLeaf::integer(i))).collect(),
/// );
/// let outer = SmiNode::with_children(vec![inner]);
///
/// let leaf = get_leaf(&outer, &oid!(1, 2)).unwrap();
/// assert!(leaf.is_leaf());
/// assert!(get_leaf(&outer, &oid!(2, 1)).is_none());
/// ```
pub fn get_leaf<'a>(node: &'a SmiNode, oid: &Oid) -> Option<&'a SmiNode> {
    get_leaf_arcs(node, oid.arcs())
}

fn get_leaf_arcs<'a>(node: &'a SmiNode, arcs: &[u32]) -> Option<&'a SmiNode> {
    let (&index, rest) = arcs.split_first()?;

    let children = match node {
        // Called on a leaf with arcs left over: promote the leaf itself so
        // callers that drilled one level too far still observe the value.
        SmiNode::Leaf(_) => return Some(node),
        SmiNode::Subtree(children) => children,
    };

    // Child OIDs are 1-based; the offset to the 0-based child vector is
    // applied here and nowhere else.
    if index < 1 || index as usize > children.len() {
        return None;
    }
    let child = &children[index as usize - 1];

    if rest.is_empty() {
        Some(child)
    } else {
        get_leaf_arcs(child, rest)
    }
}

/// Find the OID (relative to `node`) of the next leaf strictly after `oid`
/// in pre-order, or `None` at the end of the MIB within this subtree.
///
/// The empty OID and a trailing `0` component both mean "start at the
/// first child": `.X.0` is SNMP's address of the scalar instance under
/// `X`, so the next lookup treats it as `.X.1`.
///
/// # Examples
///
/// ```
/// use snmp_subagent::smi::{SmiLeaf, SmiNode};
/// use snmp_subagent::walk::next_leaf;
/// use snmp_subagent::oid;
///
/// let group = |n: i64| {
///     SmiNode::with_children((1..=n).map(|i| SmiNode::from(SmiLeaf::integer(i))).collect())
/// };
/// let outer = SmiNode::with_children(vec![group(2), group(2)]);
///
/// assert_eq!(next_leaf(&outer, &oid!()), Some(oid!(1, 1)));
/// assert_eq!(next_leaf(&outer, &oid!(1, 2)), Some(oid!(2, 1)));
/// assert_eq!(next_leaf(&outer, &oid!(2, 2)), None);
/// ```
pub fn next_leaf(node: &SmiNode, oid: &Oid) -> Option<Oid> {
    let mut arcs: Arcs = SmallVec::from_slice(oid.arcs());

    if arcs.is_empty() {
        arcs.push(1);
    }
    if let Some(last) = arcs.last_mut() {
        if *last == 0 {
            *last = 1;
        }
    }

    next_from(node, arcs).map(Oid::new)
}

fn next_from(node: &SmiNode, arcs: Arcs) -> Option<Arcs> {
    let this_branch = get_leaf_arcs(node, &arcs)?;

    match this_branch {
        // A subtree with no children yields no next leaf.
        SmiNode::Subtree(children) if children.is_empty() => return None,

        SmiNode::Subtree(children) => {
            if children[0].is_leaf() {
                // The first child is a leaf - descend to it.
                let mut next = arcs.clone();
                next.push(1);
                return Some(next);
            }

            // The first child is itself a subtree: find its first
            // reachable leaf. If there is none, fall through to the
            // horizontal search from this position.
            if let Some(rel) = next_from(this_branch, SmallVec::from_slice(&[1])) {
                let mut next = arcs.clone();
                next.extend_from_slice(&rel);
                return Some(next);
            }
        }

        // This OID points directly at a leaf - shift horizontally, or
        // upward, to find the next position in the tree.
        SmiNode::Leaf(_) => {}
    }

    // Horizontal advance: the position directly after this one. An arc
    // already at u32::MAX has no in-range sibling, so the probe is skipped
    // and the search moves upward.
    let mut cur = arcs;
    match cur.last_mut() {
        Some(last) => {
            if let Some(sibling) = last.checked_add(1) {
                *last = sibling;
                if get_leaf_arcs(node, &cur).is_some() {
                    return Some(cur);
                }
            }
        }
        None => return None,
    }

    // Upward search: drop the trailing component and advance the new tail
    // until a reachable leaf is found or the prefix is exhausted.
    loop {
        cur.pop();
        let Some(last) = cur.last_mut() else {
            // End of MIB within this subtree.
            return None;
        };
        *last = last.saturating_add(1);

        let mut probe = cur.clone();
        probe.push(1);
        match get_leaf_arcs(node, &probe) {
            Some(SmiNode::Leaf(_)) => return Some(probe),
            Some(SmiNode::Subtree(_)) => return next_from(node, probe),
            None => {}
        }
    }
}
