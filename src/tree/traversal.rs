//! In-order traversal without recursion
//!
//! The tree is never rebalanced, so depth can equal the node count.
//! An explicit stack of pending ancestors replaces the call stack:
//! at most `depth` references are held at once.

use std::io::Write;
use std::iter::FusedIterator;

use anyhow::Result;

use super::{Node, ReadingTree};
use crate::Reading;

/// Iterator yielding readings in ascending timestamp order.
///
/// Equal timestamps come out in tree-shape order. One-shot: re-create it with
/// [`ReadingTree::iter`] to enumerate again.
#[derive(Debug, Clone)]
pub struct InOrder<'a> {
    /// Ancestors whose reading and right subtree are still pending
    stack: Vec<&'a Node>,

    /// Readings not yet yielded
    remaining: usize,
}

impl<'a> InOrder<'a> {
    pub(crate) fn new(root: Option<&'a Node>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut cursor: Option<&'a Node>) {
        while let Some(node) = cursor {
            self.stack.push(node);
            cursor = node.left();
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a Reading;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        self.remaining -= 1;
        Some(node.reading())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for InOrder<'_> {}

impl FusedIterator for InOrder<'_> {}

/// Write the in-order listing, one reading per line.
pub fn write_in_order<W: Write>(writer: &mut W, tree: &ReadingTree) -> Result<()> {
    for reading in tree.iter() {
        writeln!(writer, "{reading}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Render the in-order listing into a string (useful for tests and reports).
pub fn render_in_order(tree: &ReadingTree) -> Result<String> {
    let mut buffer = Vec::new();
    write_in_order(&mut buffer, tree)?;
    Ok(String::from_utf8(buffer)?)
}
