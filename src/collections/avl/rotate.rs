//! Rotations and the rebalancing rule.
//!
//! Every rotation relinks the child and parent handles of the nodes it moves
//! and refreshes the cached height/balance factor of the two nodes whose
//! subtrees changed. The returned node is the new subtree root; it inherits
//! the parent handle of the node it replaced, and the caller is responsible
//! for pointing the grandparent's child edge at it.

use super::node::{NodeArena, NodeId};
use crate::macros::debug_event;

impl<K, V> NodeArena<K, V> {
    /// Promotes `id.left` above `id`.
    pub(crate) fn rotate_right(&mut self, id: NodeId) -> NodeId {
        let pivot = self[id].left.expect("rotate_right requires a left child");
        debug_event!(node = %id, pivot = %pivot, "rotate right");

        let inner = self[pivot].right;
        self[id].left = inner;
        self.set_parent(inner, Some(id));

        self[pivot].right = Some(id);
        self[pivot].parent = self[id].parent;
        self[id].parent = Some(pivot);

        self.update(id);
        self.update(pivot);
        pivot
    }

    /// Promotes `id.right` above `id`.
    pub(crate) fn rotate_left(&mut self, id: NodeId) -> NodeId {
        let pivot = self[id].right.expect("rotate_left requires a right child");
        debug_event!(node = %id, pivot = %pivot, "rotate left");

        let inner = self[pivot].left;
        self[id].right = inner;
        self.set_parent(inner, Some(id));

        self[pivot].left = Some(id);
        self[pivot].parent = self[id].parent;
        self[id].parent = Some(pivot);

        self.update(id);
        self.update(pivot);
        pivot
    }

    /// Left-heavy node whose left child leans right.
    pub(crate) fn rotate_left_right(&mut self, id: NodeId) -> NodeId {
        let left = self[id].left.expect("rotate_left_right requires a left child");
        let left = self.rotate_left(left);
        self[id].left = Some(left);
        self.rotate_right(id)
    }

    /// Right-heavy node whose right child leans left.
    pub(crate) fn rotate_right_left(&mut self, id: NodeId) -> NodeId {
        let right = self[id].right.expect("rotate_right_left requires a right child");
        let right = self.rotate_right(right);
        self[id].right = Some(right);
        self.rotate_left(id)
    }

    /// Restores the balance invariant at `id`, returning the subtree root.
    ///
    /// Children must already satisfy the invariant and carry fresh cached
    /// heights. The single/double choice uses the non-strict comparison on
    /// the heavy child, so an evenly balanced child gets a single rotation.
    pub(crate) fn balance(&mut self, id: NodeId) -> NodeId {
        self.update(id);
        let factor = self[id].balance_factor;

        if factor > 1 {
            let left = self[id].left.expect("left-heavy node has a left child");
            if self[left].balance_factor >= 0 {
                self.rotate_right(id)
            } else {
                self.rotate_left_right(id)
            }
        } else if factor < -1 {
            let right = self[id].right.expect("right-heavy node has a right child");
            if self[right].balance_factor <= 0 {
                self.rotate_left(id)
            } else {
                self.rotate_right_left(id)
            }
        } else {
            id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Links `keys` into a right-leaning chain and returns its root.
    fn right_chain(arena: &mut NodeArena<i32, ()>, keys: &[i32]) -> NodeId {
        let ids: Vec<_> = keys.iter().map(|&k| arena.alloc(k, ())).collect();
        for pair in ids.windows(2) {
            arena[pair[0]].right = Some(pair[1]);
            arena[pair[1]].parent = Some(pair[0]);
        }
        for &id in ids.iter().rev() {
            arena.update(id);
        }
        ids[0]
    }

    fn left_chain(arena: &mut NodeArena<i32, ()>, keys: &[i32]) -> NodeId {
        let ids: Vec<_> = keys.iter().map(|&k| arena.alloc(k, ())).collect();
        for pair in ids.windows(2) {
            arena[pair[0]].left = Some(pair[1]);
            arena[pair[1]].parent = Some(pair[0]);
        }
        for &id in ids.iter().rev() {
            arena.update(id);
        }
        ids[0]
    }

    fn assert_three_node_shape(arena: &NodeArena<i32, ()>, root: NodeId) {
        let node = &arena[root];
        assert_eq!(node.key, 2);
        assert_eq!(node.parent, None);
        assert_eq!(node.height, 2);
        assert_eq!(node.balance_factor, 0);

        let left = node.left.unwrap();
        let right = node.right.unwrap();
        assert_eq!(arena[left].key, 1);
        assert_eq!(arena[right].key, 3);
        assert_eq!(arena[left].parent, Some(root));
        assert_eq!(arena[right].parent, Some(root));
        for leaf in [left, right] {
            assert_eq!(arena[leaf].height, 1);
            assert_eq!((arena[leaf].left, arena[leaf].right), (None, None));
        }
    }

    #[test]
    fn test_single_left_rotation() {
        let mut arena = NodeArena::new();
        let root = right_chain(&mut arena, &[1, 2, 3]);
        assert_eq!(arena[root].balance_factor, -2);

        let root = arena.balance(root);
        assert_three_node_shape(&arena, root);
    }

    #[test]
    fn test_single_right_rotation() {
        let mut arena = NodeArena::new();
        let root = left_chain(&mut arena, &[3, 2, 1]);
        assert_eq!(arena[root].balance_factor, 2);

        let root = arena.balance(root);
        assert_three_node_shape(&arena, root);
    }

    #[test]
    fn test_left_right_rotation() {
        let mut arena = NodeArena::new();
        // 3 -> left 1 -> right 2
        let root = arena.alloc(3, ());
        let one = arena.alloc(1, ());
        let two = arena.alloc(2, ());
        arena[root].left = Some(one);
        arena[one].parent = Some(root);
        arena[one].right = Some(two);
        arena[two].parent = Some(one);
        arena.update(two);
        arena.update(one);
        assert_eq!(arena[one].balance_factor, -1);

        let root = arena.balance(root);
        assert_three_node_shape(&arena, root);
    }

    #[test]
    fn test_right_left_rotation() {
        let mut arena = NodeArena::new();
        // 1 -> right 3 -> left 2
        let root = arena.alloc(1, ());
        let three = arena.alloc(3, ());
        let two = arena.alloc(2, ());
        arena[root].right = Some(three);
        arena[three].parent = Some(root);
        arena[three].left = Some(two);
        arena[two].parent = Some(three);
        arena.update(two);
        arena.update(three);

        let root = arena.balance(root);
        assert_three_node_shape(&arena, root);
    }

    #[test]
    fn test_balanced_child_takes_single_rotation() {
        // Left child with balance factor 0 (possible after a removal on the
        // right): the tie must resolve to a single right rotation.
        let mut arena = NodeArena::new();
        let root = arena.alloc(50, ());
        let left = arena.alloc(30, ());
        let ll = arena.alloc(20, ());
        let lr = arena.alloc(40, ());
        arena[root].left = Some(left);
        arena[left].parent = Some(root);
        arena[left].left = Some(ll);
        arena[left].right = Some(lr);
        arena[ll].parent = Some(left);
        arena[lr].parent = Some(left);
        arena.update(ll);
        arena.update(lr);
        arena.update(left);
        assert_eq!(arena[left].balance_factor, 0);

        let new_root = arena.balance(root);
        assert_eq!(new_root, left);
        assert_eq!(arena[new_root].right, Some(root));
        assert_eq!(arena[root].left, Some(lr));
        assert_eq!(arena[lr].parent, Some(root));
        assert_eq!(arena[new_root].balance_factor, -1);
        assert_eq!(arena[root].balance_factor, 1);
    }

    #[test]
    fn test_balanced_node_is_untouched() {
        let mut arena = NodeArena::new();
        let root = right_chain(&mut arena, &[1, 2]);
        assert_eq!(arena.balance(root), root);
        assert_eq!(arena[root].balance_factor, -1);
    }
}
