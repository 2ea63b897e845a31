//! Timestamp-ordered binary search tree of readings
//!
//! Ordering: for every node, left subtree timestamps are `<=` the node's and
//! right subtree timestamps are `>`. Ties route left, so equal timestamps form
//! a chain instead of overwriting or being rejected.
//!
//! The tree is never rebalanced: shape depends only on insertion
//! order, and monotonic input degenerates into a chain. Every walk here is
//! iterative so such chains cannot exhaust the call stack.
//!
//! Sharing across threads requires one exclusive lock around the whole tree
//! (e.g. `Mutex<ReadingTree>`) for every mutating call.

mod node;
mod traversal;

pub use node::Node;
pub use traversal::{render_in_order, write_in_order, InOrder};

use std::cmp::Ordering;
use std::fmt;

use tracing::debug;

use crate::Reading;
use node::Link;

/// Unbalanced binary search tree keyed by [`Reading::timestamp`].
pub struct ReadingTree {
    root: Link,
    len: usize,
}

impl ReadingTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Build a tree by inserting readings in the order given.
    pub fn from_readings<I>(readings: I) -> Self
    where
        I: IntoIterator<Item = Reading>,
    {
        let mut tree = Self::new();
        tree.extend(readings);
        debug!(nodes = tree.len, depth = tree.depth(), "built reading tree");
        tree
    }

    /// Insert a reading below the existing nodes.
    ///
    /// Exactly one node is allocated; existing nodes only gain a child on the
    /// side the new timestamp descends into.
    pub fn insert(&mut self, reading: Reading) {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = node.slot_for(reading.timestamp);
        }
        *slot = Some(Box::new(Node::leaf(reading)));
        self.len += 1;
    }

    /// Find the reading with the given timestamp.
    ///
    /// The descent stops at the first equal node, so with duplicate
    /// timestamps the one nearest the root (the earliest inserted) wins.
    pub fn search(&self, timestamp: i64) -> Option<&Reading> {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match timestamp.cmp(&node.timestamp()) {
                Ordering::Equal => return Some(node.reading()),
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
            };
        }
        None
    }

    /// Same as [`search`](Self::search), invoking `on_match` on a hit.
    pub fn search_with<F>(&self, timestamp: i64, on_match: F) -> Option<&Reading>
    where
        F: FnOnce(&Reading),
    {
        let found = self.search(timestamp);
        match found {
            Some(reading) => {
                debug!(timestamp, "search hit");
                on_match(reading);
            }
            None => debug!(timestamp, "search miss"),
        }
        found
    }

    /// Iterate readings in ascending timestamp order.
    pub fn iter(&self) -> InOrder<'_> {
        InOrder::new(self.root.as_deref(), self.len)
    }

    /// Visit readings in ascending timestamp order.
    pub fn traverse_in_order<F>(&self, visit: F)
    where
        F: FnMut(&Reading),
    {
        self.iter().for_each(visit);
    }

    /// Collect the in-order sequence.
    pub fn enumerate(&self) -> Vec<Reading> {
        self.iter().copied().collect()
    }

    /// Number of stored readings
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no reading has been inserted
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Root node, if any
    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    /// Nodes on the longest root-to-leaf path (0 when empty).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending: Vec<(&Node, usize)> = self.root().map(|n| (n, 1)).into_iter().collect();

        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            pending.extend(node.left().map(|n| (n, level + 1)));
            pending.extend(node.right().map(|n| (n, level + 1)));
        }

        deepest
    }
}

impl Default for ReadingTree {
    fn default() -> Self {
        Self::new()
    }
}

// Dropping Box<Node> recursively would follow a degenerate chain node by node
// on the call stack.
impl Drop for ReadingTree {
    fn drop(&mut self) {
        let mut pending: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

impl fmt::Debug for ReadingTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadingTree")
            .field("len", &self.len)
            .field("depth", &self.depth())
            .finish()
    }
}

impl Extend<Reading> for ReadingTree {
    fn extend<I: IntoIterator<Item = Reading>>(&mut self, iter: I) {
        for reading in iter {
            self.insert(reading);
        }
    }
}

impl FromIterator<Reading> for ReadingTree {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a> IntoIterator for &'a ReadingTree {
    type Item = &'a Reading;
    type IntoIter = InOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
