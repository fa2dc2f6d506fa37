//! Word → meaning dictionary on top of [`AvlMap`].
//!
//! - `loader`: bulk insertion from a whitespace-delimited word source
//! - `session`: the numeric command protocol driving a dictionary
//! - `config`: settings shared by the session and the binary

pub mod config;
pub mod loader;
pub mod session;

use crate::collections::avl::{AvlMap, InsertOutcome, InvariantViolation};
use crate::error::{DictionaryError, Result};
use crate::macros::debug_event;
use serde::Serialize;

/// Longest accepted word, in characters.
pub const MAX_WORD_LEN: usize = 49;
/// Longest stored meaning, in characters; longer meanings are truncated.
pub const MAX_MEANING_LEN: usize = 299;

/// Result of [`Dictionary::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RemoveOutcome {
    /// The word was present and has been removed.
    Removed,
    /// The word was not present.
    NotFound,
}

/// A stored word, as reported by lookups and traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Entry<'a> {
    /// The word.
    pub word: &'a str,
    /// Its meaning.
    pub meaning: &'a str,
    /// Distance from the root of the tree.
    pub depth: usize,
}

/// An ordered word → meaning dictionary.
#[derive(Debug, Default)]
pub struct Dictionary {
    tree: AvlMap<String, String>,
}

impl Dictionary {
    /// Creates an empty dictionary.
    pub const fn new() -> Self {
        Self { tree: AvlMap::new() }
    }

    /// Number of stored words.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if no words are stored.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Height of the underlying tree.
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Adds `word` with `meaning` unless the word is already present.
    ///
    /// Meanings longer than [`MAX_MEANING_LEN`] characters are truncated.
    ///
    /// # Errors
    ///
    /// [`DictionaryError::InvalidWord`] if `word` is empty, contains
    /// whitespace, or is longer than [`MAX_WORD_LEN`] characters.
    pub fn insert(&mut self, word: &str, meaning: &str) -> Result<InsertOutcome> {
        validate_word(word)?;
        let meaning = truncate_chars(meaning, MAX_MEANING_LEN);
        let outcome = self.tree.insert(word.to_owned(), meaning.to_owned());
        if outcome == InsertOutcome::AlreadyExists {
            debug_event!(word, "word already exists");
        }
        Ok(outcome)
    }

    /// Removes `word`.
    pub fn remove(&mut self, word: &str) -> RemoveOutcome {
        match self.tree.remove(word) {
            Some(_) => RemoveOutcome::Removed,
            None => RemoveOutcome::NotFound,
        }
    }

    /// Looks up `word`, reporting its meaning and depth.
    pub fn find(&self, word: &str) -> Option<Entry<'_>> {
        self.tree.find(word).map(|found| Entry {
            word: found.key,
            meaning: found.value,
            depth: found.depth,
        })
    }

    /// All entries in ascending word order.
    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> + '_ {
        self.tree.iter().map(|(word, meaning, depth)| Entry { word, meaning, depth })
    }

    /// Removes every word, returning how many were released.
    pub fn clear(&mut self) -> usize {
        self.tree.clear()
    }

    /// Verifies the structural invariants of the underlying tree.
    ///
    /// # Errors
    ///
    /// The first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.tree.check_invariants()
    }
}

/// Checks that `word` can be stored as a key.
///
/// # Errors
///
/// [`DictionaryError::InvalidWord`] describing the first problem found.
pub fn validate_word(word: &str) -> Result<()> {
    let reason = if word.is_empty() {
        "empty"
    } else if word.chars().any(char::is_whitespace) {
        "contains whitespace"
    } else if word.chars().count() > MAX_WORD_LEN {
        "longer than 49 characters"
    } else {
        return Ok(());
    };
    Err(DictionaryError::InvalidWord {
        word: word.to_owned(),
        reason,
    })
}

/// Longest prefix of `s` holding at most `max` characters.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    s.char_indices().nth(max).map_or(s, |(end, _)| &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_find_remove() {
        let mut dict = Dictionary::new();
        assert_eq!(dict.insert("cat", "feline").unwrap(), InsertOutcome::Inserted);
        assert_eq!(dict.insert("ant", "insect").unwrap(), InsertOutcome::Inserted);
        assert_eq!(
            dict.insert("bee", "insect that stings").unwrap(),
            InsertOutcome::Inserted
        );

        let words: Vec<_> = dict.entries().map(|e| e.word).collect();
        assert_eq!(words, vec!["ant", "bee", "cat"]);
        assert_eq!(dict.find("bee").unwrap().meaning, "insect that stings");

        assert_eq!(dict.remove("bee"), RemoveOutcome::Removed);
        assert_eq!(dict.remove("bee"), RemoveOutcome::NotFound);
        assert!(dict.find("bee").is_none());
        assert_eq!(dict.len(), 2);
        dict.check_invariants().unwrap();
    }

    #[test]
    fn test_duplicate_keeps_first_meaning() {
        let mut dict = Dictionary::new();
        dict.insert("cat", "feline").unwrap();
        assert_eq!(dict.insert("cat", "other").unwrap(), InsertOutcome::AlreadyExists);
        assert_eq!(dict.find("cat").unwrap().meaning, "feline");
    }

    #[test]
    fn test_word_validation() {
        let mut dict = Dictionary::new();
        assert!(matches!(
            dict.insert("", "x"),
            Err(DictionaryError::InvalidWord { reason: "empty", .. })
        ));
        assert!(matches!(
            dict.insert("two words", "x"),
            Err(DictionaryError::InvalidWord { reason: "contains whitespace", .. })
        ));
        let long = "a".repeat(MAX_WORD_LEN + 1);
        assert!(dict.insert(&long, "x").is_err());
        assert!(dict.insert(&"a".repeat(MAX_WORD_LEN), "x").is_ok());
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_meaning_truncated_on_char_boundary() {
        let mut dict = Dictionary::new();
        let meaning = "é".repeat(MAX_MEANING_LEN + 10);
        dict.insert("accent", &meaning).unwrap();
        assert_eq!(dict.find("accent").unwrap().meaning.chars().count(), MAX_MEANING_LEN);
    }

    #[test]
    fn test_entry_serializes() {
        let mut dict = Dictionary::new();
        dict.insert("cat", "feline").unwrap();
        let json = serde_json::to_string(&dict.find("cat").unwrap()).unwrap();
        assert_eq!(json, r#"{"word":"cat","meaning":"feline","depth":0}"#);
    }

    #[test]
    fn test_clear() {
        let mut dict = Dictionary::new();
        for word in ["a", "b", "c"] {
            dict.insert(word, "letter").unwrap();
        }
        assert_eq!(dict.clear(), 3);
        assert!(dict.is_empty());
        assert_eq!(dict.height(), 0);
    }
}
