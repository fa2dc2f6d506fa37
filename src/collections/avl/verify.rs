//! Structural self-check for [`AvlMap`].
//!
//! Walks the whole tree and confirms the invariants the algorithms rely on:
//! strict key order, |balance factor| <= 1, fresh cached heights, parent
//! handles that mirror the owning edges, and a node count equal to `len`.

use super::node::NodeId;
use super::AvlMap;
use core::fmt;

/// First invariant violation found by [`AvlMap::check_invariants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A key breaks the search-tree ordering.
    OutOfOrder {
        /// Node whose key falls outside the range its ancestors allow.
        node: NodeId,
    },
    /// A node's subtrees differ in height by more than one.
    Unbalanced {
        /// Offending node.
        node: NodeId,
        /// Left height minus right height.
        balance_factor: i32,
    },
    /// A cached height or balance factor disagrees with the structure.
    StaleCache {
        /// Offending node.
        node: NodeId,
        /// Cached height.
        cached: u32,
        /// Height recomputed from children.
        actual: u32,
    },
    /// A parent handle does not point at the node owning the edge.
    BrokenParentLink {
        /// Child node.
        node: NodeId,
        /// Parent implied by the owning edge.
        expected: Option<NodeId>,
        /// Parent recorded on the node.
        found: Option<NodeId>,
    },
    /// Reachable node count differs from the arena's live count.
    LengthMismatch {
        /// Nodes reachable from the root.
        reachable: usize,
        /// Live nodes in the arena.
        recorded: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfOrder { node } => write!(f, "key of node {node} is out of order"),
            Self::Unbalanced { node, balance_factor } => {
                write!(f, "node {node} is unbalanced (balance factor {balance_factor})")
            }
            Self::StaleCache { node, cached, actual } => {
                write!(f, "node {node} caches height {cached} but has height {actual}")
            }
            Self::BrokenParentLink { node, expected, found } => write!(
                f,
                "node {node} records parent {} but is owned by {}",
                display_handle(*found),
                display_handle(*expected)
            ),
            Self::LengthMismatch { reachable, recorded } => {
                write!(f, "{reachable} nodes reachable from the root but {recorded} live")
            }
        }
    }
}

fn display_handle(id: Option<NodeId>) -> String {
    id.map_or_else(|| "none".to_owned(), |id| id.to_string())
}

impl std::error::Error for InvariantViolation {}

impl<K: Ord, V> AvlMap<K, V> {
    /// Verifies every structural invariant of the tree.
    ///
    /// Runs in O(n); intended for tests and debugging.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut reachable = 0;
        if let Some(root) = self.root {
            self.check_subtree(root, None, (None, None), &mut reachable)?;
        }
        if reachable != self.len() {
            return Err(InvariantViolation::LengthMismatch {
                reachable,
                recorded: self.len(),
            });
        }
        Ok(())
    }

    /// Returns the recomputed height of the subtree at `id`.
    ///
    /// `bounds` are the exclusive key limits inherited from the ancestors.
    fn check_subtree(
        &self,
        id: NodeId,
        expected_parent: Option<NodeId>,
        bounds: (Option<&K>, Option<&K>),
        reachable: &mut usize,
    ) -> Result<u32, InvariantViolation> {
        *reachable += 1;
        let node = &self.arena[id];
        if node.parent != expected_parent {
            return Err(InvariantViolation::BrokenParentLink {
                node: id,
                expected: expected_parent,
                found: node.parent,
            });
        }

        let (lower, upper) = bounds;
        if lower.is_some_and(|l| node.key <= *l) || upper.is_some_and(|u| node.key >= *u) {
            return Err(InvariantViolation::OutOfOrder { node: id });
        }

        let left = match node.left {
            Some(child) => self.check_subtree(child, Some(id), (lower, Some(&node.key)), reachable)?,
            None => 0,
        };
        let right = match node.right {
            Some(child) => self.check_subtree(child, Some(id), (Some(&node.key), upper), reachable)?,
            None => 0,
        };

        let actual = 1 + left.max(right);
        let balance_factor = left as i32 - right as i32;
        if node.height != actual || node.balance_factor != balance_factor {
            return Err(InvariantViolation::StaleCache {
                node: id,
                cached: node.height,
                actual,
            });
        }
        if !(-1..=1).contains(&balance_factor) {
            return Err(InvariantViolation::Unbalanced { node: id, balance_factor });
        }
        Ok(actual)
    }
}
