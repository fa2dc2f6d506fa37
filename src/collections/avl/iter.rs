//! In-order traversal over an [`AvlMap`](super::AvlMap).

use super::node::{NodeArena, NodeId};
use core::iter::FusedIterator;

/// Ascending iterator yielding `(key, value, depth)`.
///
/// Keeps the path of pending ancestors on an explicit stack, so each step is
/// amortized O(1) and the depth comes for free from the stack entry.
pub struct Iter<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    stack: Vec<(NodeId, usize)>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(arena: &'a NodeArena<K, V>, root: Option<NodeId>, len: usize) -> Self {
        let mut iter = Self {
            arena,
            stack: Vec::new(),
            remaining: len,
        };
        if let Some(root) = root {
            iter.push_leftmost(root, 0);
        }
        iter
    }

    fn push_leftmost(&mut self, mut id: NodeId, mut depth: usize) {
        loop {
            self.stack.push((id, depth));
            match self.arena[id].left {
                Some(left) => {
                    id = left;
                    depth += 1;
                }
                None => break,
            }
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        let arena = self.arena;
        let node = &arena[id];
        if let Some(right) = node.right {
            self.push_leftmost(right, depth + 1);
        }
        self.remaining -= 1;
        Some((&node.key, &node.value, depth))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}
