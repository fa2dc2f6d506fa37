//! Node storage for [`AvlMap`](super::AvlMap).
//!
//! Nodes live in a slot arena and refer to each other through [`NodeId`]
//! handles. The `left`/`right` edges form the ownership tree; `parent` is a
//! plain handle that never keeps a node alive and is never used to release one.
//!
//! Vacant slots are chained into a free list so that churn (insert/remove
//! cycles) reuses storage instead of growing the arena.

use core::fmt;
use core::ops::{Index, IndexMut};

/// Handle of a node inside a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One key/value entry placed in the tree.
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
    // Invariants (after every public operation):
    // height == 1 + max(height(left), height(right)), absent subtree == 0
    // balance_factor == height(left) - height(right), in -1..=1
    pub(crate) height: u32,
    pub(crate) balance_factor: i32,
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            parent: None,
            height: 1,
            balance_factor: 0,
        }
    }
}

enum Slot<K, V> {
    Occupied(Node<K, V>),
    Vacant { next_free: Option<u32> },
}

/// Slot arena owning every node of one tree.
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Slot<K, V>>,
    free_head: Option<u32>,
    len: usize,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    /// Number of live nodes.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Allocates a detached leaf node.
    pub(crate) fn alloc(&mut self, key: K, value: V) -> NodeId {
        self.len += 1;
        let node = Node::leaf(key, value);

        if let Some(idx) = self.free_head {
            let slot = &mut self.slots[idx as usize];
            match *slot {
                Slot::Vacant { next_free } => self.free_head = next_free,
                Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
            }
            *slot = Slot::Occupied(node);
            NodeId(idx)
        } else {
            let idx = u32::try_from(self.slots.len()).expect("node arena exceeded u32::MAX slots");
            self.slots.push(Slot::Occupied(node));
            NodeId(idx)
        }
    }

    /// Releases a node, handing its payload back to the caller.
    ///
    /// The node's edges are not followed; callers unlink it first.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<K, V> {
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match core::mem::replace(&mut self.slots[id.index()], vacant) {
            Slot::Occupied(node) => {
                self.free_head = Some(id.0);
                self.len -= 1;
                node
            }
            Slot::Vacant { .. } => panic!("node {id} released twice"),
        }
    }

    /// Drops every slot and forgets the free list.
    pub(crate) fn reset(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }

    /// Cached height of an optional subtree; absent subtrees have height 0.
    #[inline]
    pub(crate) fn height(&self, id: Option<NodeId>) -> u32 {
        id.map_or(0, |id| self[id].height)
    }

    /// Recomputes the cached height and balance factor of `id` from its
    /// children's cached heights.
    pub(crate) fn update(&mut self, id: NodeId) {
        let (left, right) = {
            let node = &self[id];
            (self.height(node.left), self.height(node.right))
        };
        let node = &mut self[id];
        node.height = 1 + left.max(right);
        node.balance_factor = left as i32 - right as i32;
    }

    /// Number of parent links between `id` and the root.
    pub(crate) fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cursor = self[id].parent;
        while let Some(parent) = cursor {
            depth += 1;
            cursor = self[parent].parent;
        }
        depth
    }

    /// Leftmost node of the subtree rooted at `id`.
    pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self[id].left {
            id = left;
        }
        id
    }

    /// Rightmost node of the subtree rooted at `id`.
    pub(crate) fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self[id].right {
            id = right;
        }
        id
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, child: Option<NodeId>, parent: Option<NodeId>) {
        if let Some(child) = child {
            self[child].parent = parent;
        }
    }
}

impl<K, V> Index<NodeId> for NodeArena<K, V> {
    type Output = Node<K, V>;

    #[inline]
    fn index(&self, id: NodeId) -> &Self::Output {
        match &self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("dangling node handle {id}"),
        }
    }
}

impl<K, V> IndexMut<NodeId> for NodeArena<K, V> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match &mut self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("dangling node handle {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_reuses_released_slots() {
        let mut arena = NodeArena::new();
        let a = arena.alloc("a", 1);
        let b = arena.alloc("b", 2);
        assert_eq!(arena.len(), 2);

        let node = arena.release(a);
        assert_eq!(node.key, "a");
        assert_eq!(arena.len(), 1);

        // Most recently freed slot comes back first.
        let c = arena.alloc("c", 3);
        assert_eq!(c, a);
        assert_eq!(arena[c].key, "c");
        assert_eq!(arena[b].value, 2);
    }

    #[test]
    #[should_panic(expected = "released twice")]
    fn test_double_release_panics() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(1, ());
        arena.release(a);
        arena.release(a);
    }

    #[test]
    fn test_update_and_depth() {
        let mut arena = NodeArena::new();
        let root = arena.alloc(2, ());
        let left = arena.alloc(1, ());
        arena[root].left = Some(left);
        arena[left].parent = Some(root);
        arena.update(left);
        arena.update(root);

        assert_eq!(arena[root].height, 2);
        assert_eq!(arena[root].balance_factor, 1);
        assert_eq!((arena[left].left, arena[left].right), (None, None));
        assert_eq!(arena.depth(root), 0);
        assert_eq!(arena.depth(left), 1);
        assert_eq!(arena.leftmost(root), left);
        assert_eq!(arena.rightmost(root), root);
    }
}
