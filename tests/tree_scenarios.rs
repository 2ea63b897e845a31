//! Behavioural scenarios for the reading tree

mod common;

use common::*;
use sensortree::{Reading, ReadingTree};

#[test]
fn test_three_readings_then_late_insert() {
    let mut tree = ReadingTree::from_readings([
        Reading::new(0, 10, 40),
        Reading::new(1, 20, 50),
        Reading::new(2, 30, 60),
    ]);
    assert_eq!(
        tree.enumerate(),
        vec![
            Reading::new(0, 10, 40),
            Reading::new(1, 20, 50),
            Reading::new(2, 30, 60),
        ]
    );

    tree.insert(Reading::new(100, 15, 39));
    assert_eq!(
        tree.enumerate(),
        vec![
            Reading::new(0, 10, 40),
            Reading::new(1, 20, 50),
            Reading::new(2, 30, 60),
            Reading::new(100, 15, 39),
        ]
    );

    assert_eq!(tree.search(100), Some(&Reading::new(100, 15, 39)));
    assert_eq!(tree.search(50), None);
}

#[test]
fn test_duplicate_timestamps_shadow_later_inserts() {
    let first = Reading::new(5, 1, 11);
    let second = Reading::new(5, 2, 22);
    let third = Reading::new(5, 3, 33);
    let tree = ReadingTree::from_readings([first, second, third]);

    // Search stops at the root: the first insertion
    assert_eq!(tree.search(5), Some(&first));

    // All three survive, nested down the left chain
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.depth(), 3);
    assert_eq!(tree.enumerate(), vec![third, second, first]);
    assert_ordering_invariant(&tree);
}

#[test]
fn test_duplicate_below_distinct_root_is_still_first_hit() {
    let tree = ReadingTree::from_readings([
        Reading::new(10, 0, 0),
        Reading::new(5, 1, 0),
        Reading::new(5, 2, 0),
        Reading::new(7, 3, 0),
    ]);

    assert_eq!(tree.search(5).map(|r| r.temperature), Some(1));
    assert_eq!(timestamps(&tree), vec![5, 5, 7, 10]);
    assert_ordering_invariant(&tree);
}

#[test]
fn test_increasing_insertion_builds_right_chain() {
    let n = 64;
    let tree = tree_of(&(1..=n).collect::<Vec<_>>());

    assert_eq!(tree.depth(), n as usize);
    let mut cursor = tree.root();
    let mut expected = 1;
    while let Some(node) = cursor {
        assert_eq!(node.timestamp(), expected);
        assert!(node.left().is_none());
        cursor = node.right();
        expected += 1;
    }
    assert_eq!(expected, n + 1);
}

#[test]
fn test_decreasing_insertion_builds_left_chain() {
    let n = 64;
    let tree = tree_of(&(1..=n).rev().collect::<Vec<_>>());

    assert_eq!(tree.depth(), n as usize);
    let mut cursor = tree.root();
    let mut expected = n;
    while let Some(node) = cursor {
        assert_eq!(node.timestamp(), expected);
        assert!(node.right().is_none());
        cursor = node.left();
        expected -= 1;
    }
    assert_eq!(expected, 0);
    assert_eq!(timestamps(&tree), (1..=n).collect::<Vec<_>>());
}

#[test]
fn test_extend_appends_to_existing_tree() {
    let mut tree = tree_of(&[20, 10]);
    tree.extend([at(30), at(15)]);

    assert_eq!(tree.len(), 4);
    assert_eq!(timestamps(&tree), vec![10, 15, 20, 30]);
    assert_ordering_invariant(&tree);
}

#[test]
fn test_enumeration_is_repeatable_and_non_mutating() {
    let tree = tree_of(&[3, 9, 1, 4, 1, 5]);

    let first = tree.enumerate();
    let second = tree.enumerate();
    assert_eq!(first, second);
    assert!(is_non_decreasing(&first));
    assert_eq!(tree.len(), 6);
}

#[test]
fn test_empty_input_yields_empty_tree() {
    let tree = ReadingTree::from_readings(Vec::new());
    assert!(tree.is_empty());
    assert!(tree.root().is_none());
    assert_eq!(tree.search(0), None);
}
