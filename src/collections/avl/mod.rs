//! AVL tree map over an index-addressed node arena.
//!
//! - `node`: node layout, arena, height/depth helpers
//! - `rotate`: the four rotations and the rebalancing rule
//! - `tree`: `AvlMap` with insert/remove/lookup
//! - `iter`: in-order traversal
//! - `verify`: structural invariant checks

mod iter;
mod node;
mod rotate;
mod tree;
mod verify;

pub use iter::Iter;
pub use node::NodeId;
pub use tree::{AvlMap, Found, InsertOutcome};
pub use verify::InvariantViolation;
