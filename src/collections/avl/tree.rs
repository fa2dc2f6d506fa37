//! `AvlMap`: an ordered map kept height-balanced by AVL rotations.
//!
//! Insertion and removal descend recursively and rebalance every ancestor on
//! the way back up. Subtree heights are cached per node and refreshed along
//! that path, so a rebalance step is O(1) and every operation is O(log n).

use super::iter::Iter;
use super::node::{Node, NodeArena, NodeId};
use crate::macros::debug_event;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

/// Result of [`AvlMap::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsertOutcome {
    /// A new entry was created.
    Inserted,
    /// The key was already present; the stored value was left untouched.
    AlreadyExists,
}

impl InsertOutcome {
    /// Returns `true` for [`InsertOutcome::Inserted`].
    pub fn is_inserted(self) -> bool {
        self == InsertOutcome::Inserted
    }
}

/// An entry located by [`AvlMap::find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Found<'a, K, V> {
    /// The stored key.
    pub key: &'a K,
    /// The stored value.
    pub value: &'a V,
    /// Number of parent links between the entry and the root.
    pub depth: usize,
}

/// An ordered map backed by an AVL tree.
///
/// Keys are unique. Re-inserting an existing key is a no-op that keeps the
/// first value.
pub struct AvlMap<K, V> {
    pub(super) arena: NodeArena<K, V>,
    pub(super) root: Option<NodeId>,
}

impl<K, V> AvlMap<K, V> {
    /// Creates an empty map.
    pub const fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            root: None,
        }
    }

    /// Creates an empty map with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: NodeArena::with_capacity(capacity),
            root: None,
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree; 0 when empty, 1 for a single entry.
    pub fn height(&self) -> usize {
        self.arena.height(self.root) as usize
    }

    /// Returns an in-order iterator yielding `(key, value, depth)`.
    ///
    /// The iterator borrows the map; calling `iter` again restarts the walk.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.arena, self.root, self.len())
    }

    /// Smallest entry.
    pub fn first(&self) -> Option<(&K, &V)> {
        let node = &self.arena[self.arena.leftmost(self.root?)];
        Some((&node.key, &node.value))
    }

    /// Largest entry.
    pub fn last(&self) -> Option<(&K, &V)> {
        let node = &self.arena[self.arena.rightmost(self.root?)];
        Some((&node.key, &node.value))
    }

    /// Releases every entry, children before their parent.
    ///
    /// Returns the number of released entries.
    pub fn clear(&mut self) -> usize {
        let mut released = 0;
        // (node, children already pushed)
        let mut stack: Vec<(NodeId, bool)> = self.root.take().map(|r| (r, false)).into_iter().collect();

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                drop(self.arena.release(id));
                released += 1;
                continue;
            }
            stack.push((id, true));
            let node = &self.arena[id];
            if let Some(right) = node.right {
                stack.push((right, false));
            }
            if let Some(left) = node.left {
                stack.push((left, false));
            }
        }

        debug_assert_eq!(self.arena.len(), 0);
        self.arena.reset();
        debug_event!(released, "tree cleared");
        released
    }
}

impl<K, V> AvlMap<K, V>
where
    K: Ord,
{
    fn locate<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = &self.arena[id];
            cursor = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Returns a reference to the value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.locate(key).map(|id| &self.arena[id].value)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.locate(key).is_some()
    }

    /// Looks up `key` and reports the entry together with its depth.
    pub fn find<Q>(&self, key: &Q) -> Option<Found<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.locate(key)?;
        let node = &self.arena[id];
        Some(Found {
            key: &node.key,
            value: &node.value,
            depth: self.arena.depth(id),
        })
    }

    /// Number of parent links between `key`'s entry and the root.
    pub fn depth_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.locate(key).map(|id| self.arena.depth(id))
    }

    /// Inserts `key` with `value` unless the key is already present.
    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome {
        let (root, outcome) = self.insert_at(self.root, key, value);
        self.arena[root].parent = None;
        self.root = Some(root);
        outcome
    }

    fn insert_at(&mut self, slot: Option<NodeId>, key: K, value: V) -> (NodeId, InsertOutcome) {
        let Some(id) = slot else {
            return (self.arena.alloc(key, value), InsertOutcome::Inserted);
        };

        let (child, outcome, go_left) = match key.cmp(&self.arena[id].key) {
            Ordering::Less => {
                let left = self.arena[id].left;
                let (child, outcome) = self.insert_at(left, key, value);
                (child, outcome, true)
            }
            Ordering::Greater => {
                let right = self.arena[id].right;
                let (child, outcome) = self.insert_at(right, key, value);
                (child, outcome, false)
            }
            Ordering::Equal => return (id, InsertOutcome::AlreadyExists),
        };

        if outcome == InsertOutcome::AlreadyExists {
            return (id, outcome);
        }

        if go_left {
            self.arena[id].left = Some(child);
        } else {
            self.arena[id].right = Some(child);
        }
        self.arena[child].parent = Some(id);
        (self.arena.balance(id), outcome)
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (root, removed) = self.remove_at(self.root, key);
        if removed.is_some() {
            self.arena.set_parent(root, None);
            self.root = root;
        }
        removed
    }

    fn remove_at<Q>(&mut self, slot: Option<NodeId>, key: &Q) -> (Option<NodeId>, Option<V>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(id) = slot else {
            return (None, None);
        };

        match key.cmp(self.arena[id].key.borrow()) {
            Ordering::Less => {
                let left = self.arena[id].left;
                let (child, removed) = self.remove_at(left, key);
                if removed.is_none() {
                    return (Some(id), None);
                }
                self.arena[id].left = child;
                self.arena.set_parent(child, Some(id));
                (Some(self.arena.balance(id)), removed)
            }
            Ordering::Greater => {
                let right = self.arena[id].right;
                let (child, removed) = self.remove_at(right, key);
                if removed.is_none() {
                    return (Some(id), None);
                }
                self.arena[id].right = child;
                self.arena.set_parent(child, Some(id));
                (Some(self.arena.balance(id)), removed)
            }
            Ordering::Equal => {
                let node = &self.arena[id];
                match (node.left, node.right) {
                    (None, None) => {
                        debug_event!(node = %id, "remove leaf");
                        (None, Some(self.arena.release(id).value))
                    }
                    (Some(child), None) | (None, Some(child)) => {
                        debug_event!(node = %id, child = %child, "splice single child");
                        let parent = node.parent;
                        self.arena[child].parent = parent;
                        (Some(child), Some(self.arena.release(id).value))
                    }
                    (Some(_), Some(right)) => {
                        // Keep this node and take over the in-order successor's payload.
                        let (right, successor) = self.remove_min(right);
                        debug_event!(node = %id, "replace with in-order successor");
                        let node = &mut self.arena[id];
                        node.right = right;
                        node.key = successor.key;
                        let old = std::mem::replace(&mut node.value, successor.value);
                        self.arena.set_parent(right, Some(id));
                        (Some(self.arena.balance(id)), Some(old))
                    }
                }
            }
        }
    }

    /// Detaches the leftmost node of the subtree at `id`, rebalancing on the
    /// way back up. Returns the new subtree root and the detached node.
    fn remove_min(&mut self, id: NodeId) -> (Option<NodeId>, Node<K, V>) {
        match self.arena[id].left {
            Some(left) => {
                let (child, min) = self.remove_min(left);
                self.arena[id].left = child;
                self.arena.set_parent(child, Some(id));
                (Some(self.arena.balance(id)), min)
            }
            None => {
                let right = self.arena[id].right;
                let parent = self.arena[id].parent;
                self.arena.set_parent(right, parent);
                (right, self.arena.release(id))
            }
        }
    }
}

impl<K, V> Default for AvlMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter().map(|(k, v, _)| (k, v))).finish()
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a AvlMap<K, V> {
    type Item = (&'a K, &'a V, usize);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
