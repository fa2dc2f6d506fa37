//! Error type for the dictionary layer.
//!
//! A duplicate word on insert or a missing word on remove/search is not an
//! error; those are reported through [`InsertOutcome`](crate::InsertOutcome)
//! and [`RemoveOutcome`](crate::dictionary::RemoveOutcome).

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised by [`Dictionary`](crate::Dictionary) and its collaborators.
#[derive(Debug)]
pub enum DictionaryError {
    /// The word is empty, contains whitespace, or exceeds the length limit.
    InvalidWord {
        /// The rejected word.
        word: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// A bulk-load source could not be opened or read. Nothing was inserted.
    SourceUnavailable {
        /// Path of the source.
        path: PathBuf,
        /// Underlying failure.
        source: io::Error,
    },
    /// The timing log could not be created. Nothing was inserted.
    LogUnavailable {
        /// Path of the timing log.
        path: PathBuf,
        /// Underlying failure.
        source: csv::Error,
    },
    /// Reading input or writing a reply failed.
    Io(io::Error),
    /// Writing to an already open timing log failed.
    Csv(csv::Error),
    /// A configuration file could not be parsed.
    Config(serde_json::Error),
}

impl fmt::Display for DictionaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWord { word, reason } => write!(f, "invalid word '{word}': {reason}"),
            Self::SourceUnavailable { path, .. } => write!(f, "Error opening file {}.", path.display()),
            Self::LogUnavailable { .. } => write!(f, "Error creating output log."),
            Self::Io(err) => write!(f, "i/o error: {err}"),
            Self::Csv(err) => write!(f, "timing log error: {err}"),
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
        }
    }
}

impl std::error::Error for DictionaryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidWord { .. } => None,
            Self::SourceUnavailable { source, .. } => Some(source),
            Self::LogUnavailable { source, .. } => Some(source),
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<io::Error> for DictionaryError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for DictionaryError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for DictionaryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err)
    }
}

/// Convenience alias used throughout the dictionary layer.
pub type Result<T, E = DictionaryError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_source_unavailable_message() {
        let err = DictionaryError::SourceUnavailable {
            path: PathBuf::from("words.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "Error opening file words.txt.");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_log_unavailable_message() {
        let err = DictionaryError::LogUnavailable {
            path: PathBuf::from("out/log.csv"),
            source: csv::Error::from(io::Error::new(io::ErrorKind::NotFound, "missing")),
        };
        assert_eq!(err.to_string(), "Error creating output log.");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_invalid_word_message() {
        let err = DictionaryError::InvalidWord {
            word: String::new(),
            reason: "empty",
        };
        assert_eq!(err.to_string(), "invalid word '': empty");
        assert!(err.source().is_none());
    }
}
