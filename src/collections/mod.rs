//! Collections backing the dictionary.
//!
//! - `avl`: arena-allocated AVL tree map

pub mod avl;

pub use avl::AvlMap;
