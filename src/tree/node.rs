//! Tree node: one reading plus two exclusively owned subtrees
//!
//! Left subtree: every timestamp <= this node's timestamp
//! Right subtree: every timestamp > this node's timestamp

use crate::Reading;

/// Owned link to a child subtree.
pub(crate) type Link = Option<Box<Node>>;

/// Node of a [`ReadingTree`](super::ReadingTree).
///
/// Nodes are only created by insertion; after that the reading is never
/// touched and the only mutation is attaching a child to an empty side.
#[derive(Debug)]
pub struct Node {
    pub(crate) reading: Reading,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl Node {
    pub(crate) fn leaf(reading: Reading) -> Self {
        Self {
            reading,
            left: None,
            right: None,
        }
    }

    /// Reading stored at this node
    #[inline]
    pub fn reading(&self) -> &Reading {
        &self.reading
    }

    /// Timestamp key
    #[inline]
    pub fn timestamp(&self) -> i64 {
        self.reading.timestamp
    }

    /// Subtree holding timestamps <= this node's
    #[inline]
    pub fn left(&self) -> Option<&Node> {
        self.left.as_deref()
    }

    /// Subtree holding timestamps > this node's
    #[inline]
    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }

    /// Check if leaf (no children on either side)
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Pick the side a new timestamp descends into.
    ///
    /// Ties route left.
    #[inline]
    pub(crate) fn slot_for(&mut self, timestamp: i64) -> &mut Link {
        if timestamp <= self.reading.timestamp {
            &mut self.left
        } else {
            &mut self.right
        }
    }
}
