//! # `lexicon` - Ordered Word Dictionary
//!
//! An in-memory word → meaning dictionary backed by a self-balancing AVL tree.
//! Supports point lookup, insertion, deletion, bulk load from a text source and
//! full ordered traversal, with every entry reporting its depth in the tree.
//!
//! ## Guarantees
//!
//! ### Ordering
//! - **Unique keys**: a key is stored at most once. Re-inserting an existing key
//!   is a reported no-op that keeps the first value.
//! - **Sorted traversal**: in-order iteration yields strictly ascending keys.
//!
//! ### Balance
//! - **AVL invariant**: after every public call, each node's left and right
//!   subtree heights differ by at most one, so the height stays within
//!   `1.44 * log2(n + 2)`.
//! - **Bounded work**: heights are cached per node and refreshed only along the
//!   path from a structural change to the root, making insert, remove and
//!   lookup O(log n).
//!
//! ### Memory
//! - **Arena storage**: nodes live in a slot arena addressed by [`NodeId`]
//!   handles. Child edges own; parent handles are navigational only and are
//!   never used to release a node.
//! - **Single release**: [`AvlMap::clear`] releases children before parents and
//!   every node exactly once.
//!
//! ## Architecture
//!
//! 1. **Engine** ([`collections::avl`]): the generic [`AvlMap<K, V>`] with its
//!    rotations, rebalancing rule, in-order [`Iter`](collections::avl::Iter)
//!    and [`check_invariants`](AvlMap::check_invariants).
//! 2. **Dictionary** ([`dictionary`]): [`Dictionary`] fixes the engine to
//!    `String` words and meanings and enforces the word/meaning length limits.
//! 3. **Collaborators**: [`dictionary::loader`] bulk-loads words with an
//!    optional CSV timing log, [`dictionary::session`] drives a dictionary
//!    from the numeric command protocol used by the `lexicon` binary.
//!
//! ## Example
//!
//! ```rust
//! use lexicon::{Dictionary, InsertOutcome};
//!
//! let mut dict = Dictionary::new();
//! dict.insert("cat", "feline").unwrap();
//! dict.insert("ant", "insect").unwrap();
//! dict.insert("bee", "insect that stings").unwrap();
//! assert_eq!(dict.insert("cat", "dog").unwrap(), InsertOutcome::AlreadyExists);
//!
//! let words: Vec<_> = dict.entries().map(|e| e.word).collect();
//! assert_eq!(words, ["ant", "bee", "cat"]);
//!
//! let bee = dict.find("bee").unwrap();
//! assert_eq!(bee.meaning, "insect that stings");
//! assert_eq!(bee.depth, 0);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_wrap)]

mod macros;

pub mod collections;
pub mod dictionary;
pub mod error;

pub use collections::avl::{AvlMap, InsertOutcome, InvariantViolation, NodeId};
pub use dictionary::{Dictionary, Entry, RemoveOutcome};
pub use error::DictionaryError;

// Compile-time assertions for memory layout
const _: () = {
    use core::mem;

    // Handles stay a single u32, and an absent handle costs nothing extra.
    assert!(mem::size_of::<NodeId>() == 4);
    assert!(mem::size_of::<Option<NodeId>>() <= 8);
};
