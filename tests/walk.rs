//! Tree-walker integration tests: GET resolution and GETNEXT traversal
//! over realistic MIB shapes.

mod common;

use common::{leaf_group, leaf_value, three_groups, three_groups_and_nested};
use snmp_subagent::oid;
use snmp_subagent::smi::{SmiLeaf, SmiNode};
use snmp_subagent::walk::{get_leaf, next_leaf};

#[test]
fn get_leaf_in_a_ten_leaf_branch() {
    // Outer subtree containing one inner subtree of ten leaves valued 1..10.
    let outer = SmiNode::with_children(vec![leaf_group(10)]);

    let node = get_leaf(&outer, &oid!(1, 3)).expect("leaf at .1.3");
    assert_eq!(leaf_value(node), 3);

    assert!(get_leaf(&outer, &oid!(2, 1)).is_none());
}

#[test]
fn get_leaf_every_position() {
    let outer = SmiNode::with_children(vec![leaf_group(10)]);

    for i in 1..=10 {
        let node = get_leaf(&outer, &oid!(1, i)).expect("leaf present");
        assert_eq!(leaf_value(node), i as i64);
    }
}

#[test]
fn next_leaf_across_sibling_groups() {
    let outer = three_groups();

    assert_eq!(next_leaf(&outer, &oid!(1, 10)), Some(oid!(2, 1)));
    assert_eq!(next_leaf(&outer, &oid!(2, 10)), Some(oid!(3, 1)));
    // No fourth sibling: end of MIB.
    assert_eq!(next_leaf(&outer, &oid!(3, 10)), None);
}

#[test]
fn next_leaf_with_a_fourth_nested_sibling() {
    let outer = three_groups_and_nested();

    // The end of the third group now descends into the nested branch.
    assert_eq!(next_leaf(&outer, &oid!(3, 10)), Some(oid!(4, 1, 1)));
    assert_eq!(next_leaf(&outer, &oid!(4, 1, 10)), Some(oid!(4, 2, 1)));
    assert_eq!(next_leaf(&outer, &oid!(4, 2, 10)), None);
}

#[test]
fn next_leaf_walk_visits_the_whole_tree_in_order() {
    let outer = three_groups_and_nested();

    let mut visited = Vec::new();
    let mut position = oid!();
    while let Some(next) = next_leaf(&outer, &position) {
        // Each step resolves to a real leaf.
        let node = get_leaf(&outer, &next).expect("walk position resolves");
        assert!(node.is_leaf());

        assert!(visited.last() < Some(&next), "walk must advance");
        visited.push(next.clone());
        position = next;
    }

    // Three groups of ten plus two nested groups of ten.
    assert_eq!(visited.len(), 50);
    assert_eq!(visited.first(), Some(&oid!(1, 1)));
    assert_eq!(visited.last(), Some(&oid!(4, 2, 10)));
}

#[test]
fn next_leaf_instance_zero_addresses_the_scalar() {
    let outer = three_groups();

    // .2.0 is the instance under .2; the next leaf from there is .2.1.
    assert_eq!(next_leaf(&outer, &oid!(2, 0)), Some(oid!(2, 1)));
    assert_eq!(next_leaf(&outer, &oid!(0)), Some(oid!(1, 1)));
}

#[test]
fn walkers_handle_mixed_value_types() {
    let tree = SmiNode::with_children(vec![SmiNode::with_children(vec![
        SmiNode::from(SmiLeaf::string("edge-gw")),
        SmiNode::from(SmiLeaf::counter32(88123)),
        SmiNode::from(SmiLeaf::ip_address([10, 40, 0, 9])),
        SmiNode::from(SmiLeaf::object_id(oid!(1, 3, 6, 1, 4, 1, 898889))),
    ])]);

    let mut position = oid!();
    let mut count = 0;
    while let Some(next) = next_leaf(&tree, &position) {
        assert!(get_leaf(&tree, &next).is_some());
        count += 1;
        position = next;
    }
    assert_eq!(count, 4);
}
