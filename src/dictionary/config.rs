//! Session settings.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the behaviour of the classic interactive dictionary.

use super::loader::PLACEHOLDER_MEANING;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the bulk-load timing log.
pub const DEFAULT_TIMING_LOG: &str = "insertion_time.csv";

/// How the print command renders the dictionary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum PrintFormat {
    /// One `word: meaning (Depth = d)` line per entry.
    #[default]
    Text,
    /// A single JSON array of entries.
    Json,
}

/// Settings for a [`Session`](super::session::Session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Where bulk loads record their timing CSV; `None` disables the log.
    pub timing_log: Option<PathBuf>,
    /// Meaning attached to every bulk-loaded word.
    pub placeholder_meaning: String,
    /// Rendering of the print command.
    pub print_format: PrintFormat,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timing_log: Some(PathBuf::from(DEFAULT_TIMING_LOG)),
            placeholder_meaning: PLACEHOLDER_MEANING.to_owned(),
            print_format: PrintFormat::Text,
        }
    }
}

impl SessionConfig {
    /// Parses settings from JSON text.
    ///
    /// # Errors
    ///
    /// [`DictionaryError::Config`](crate::DictionaryError::Config) on malformed
    /// JSON or unknown fields.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads settings from a JSON file.
    ///
    /// # Errors
    ///
    /// I/O failures reading the file, or the errors of [`Self::from_json`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
