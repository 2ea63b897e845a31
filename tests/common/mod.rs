//! Shared helpers for integration tests

#![allow(dead_code)]

use sensortree::{Reading, ReadingTree};

/// Reading with only the timestamp set
pub fn at(timestamp: i64) -> Reading {
    Reading::new(timestamp, 0, 0)
}

/// Tree built from bare timestamps in insertion order
pub fn tree_of(timestamps: &[i64]) -> ReadingTree {
    timestamps.iter().copied().map(at).collect()
}

/// In-order timestamps
pub fn timestamps(tree: &ReadingTree) -> Vec<i64> {
    tree.iter().map(|r| r.timestamp).collect()
}

/// True when every adjacent pair is in non-decreasing timestamp order
pub fn is_non_decreasing(readings: &[Reading]) -> bool {
    readings
        .windows(2)
        .all(|pair| pair[0].timestamp <= pair[1].timestamp)
}

/// Walk every node and check the left `<=` / right `>` invariant against its ancestors' bounds.
pub fn assert_ordering_invariant(tree: &ReadingTree) {
    let mut pending = Vec::new();
    if let Some(root) = tree.root() {
        pending.push((root, i64::MIN, i64::MAX, false));
    }

    // (node, lower bound, upper bound, lower bound is exclusive)
    while let Some((node, low, high, low_exclusive)) = pending.pop() {
        let ts = node.timestamp();
        assert!(ts <= high, "{ts} above inclusive bound {high}");
        if low_exclusive {
            assert!(ts > low, "{ts} not above exclusive bound {low}");
        } else {
            assert!(ts >= low, "{ts} below bound {low}");
        }

        if let Some(left) = node.left() {
            pending.push((left, low, ts, low_exclusive));
        }
        if let Some(right) = node.right() {
            pending.push((right, ts, high, true));
        }
    }
}
