//! Bulk insertion of words from a text source.
//!
//! Words are the whitespace-delimited tokens of the source, inserted in
//! source order with a fixed placeholder meaning. A token longer than
//! [`MAX_WORD_LEN`] characters is split into consecutive chunks of at most
//! that many characters, each inserted as its own word.
//!
//! The whole source is read before the first insert, so a source that cannot
//! be read leaves the dictionary untouched. Bytes that are not valid UTF-8 are
//! replaced with `U+FFFD` rather than rejected.
//!
//! An optional CSV timing log records, for every token (duplicates
//! included), its index and the cumulative insertion time so far.

use super::{truncate_chars, Dictionary, MAX_WORD_LEN};
use crate::error::{DictionaryError, Result};
use crate::macros::info_event;
use serde::Serialize;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::time::{Duration, Instant};

/// Meaning given to bulk-loaded words.
pub const PLACEHOLDER_MEANING: &str = "Imported from file";
/// Header row of the timing log.
pub const TIMING_LOG_HEADER: [&str; 2] = ["WordCount", "ExecutionTime(ms)"];

/// Summary of one bulk load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Tokens read from the source.
    pub tokens: usize,
    /// Tokens that created a new entry.
    pub inserted: usize,
    /// Tokens that were already present.
    pub duplicates: usize,
    /// Total time spent inside `insert`.
    pub elapsed: Duration,
}

/// Inserts every word of a source into a [`Dictionary`].
#[derive(Debug, Clone)]
pub struct BulkLoader {
    placeholder: String,
}

impl Default for BulkLoader {
    fn default() -> Self {
        Self::new(PLACEHOLDER_MEANING)
    }
}

impl BulkLoader {
    /// Creates a loader attaching `placeholder` as the meaning of each word.
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }

    /// Loads the words of the file at `source`.
    ///
    /// The source is read in full, then the timing log is created, and only
    /// then are words inserted.
    ///
    /// # Errors
    ///
    /// [`DictionaryError::SourceUnavailable`] if `source` cannot be read,
    /// [`DictionaryError::LogUnavailable`] if the timing log cannot be
    /// created (both leave `dict` unchanged), and [`DictionaryError::Csv`]
    /// if writing the timing log fails part way.
    pub fn load_path(
        &self,
        dict: &mut Dictionary,
        source: impl AsRef<Path>,
        timing_log: Option<&Path>,
    ) -> Result<LoadReport> {
        let source = source.as_ref();
        let bytes = fs::read(source).map_err(|err| DictionaryError::SourceUnavailable {
            path: source.to_path_buf(),
            source: err,
        })?;
        let log = timing_log
            .map(|path| {
                csv::Writer::from_path(path).map_err(|err| DictionaryError::LogUnavailable {
                    path: path.to_path_buf(),
                    source: err,
                })
            })
            .transpose()?;
        self.load_bytes(dict, &bytes, log)
    }

    /// Loads the words read from `reader`, optionally logging timings to `log`.
    ///
    /// # Errors
    ///
    /// [`DictionaryError::Io`] if `reader` fails, in which case `dict` is
    /// unchanged, and timing-log write failures.
    pub fn load_reader<R, W>(
        &self,
        dict: &mut Dictionary,
        mut reader: R,
        log: Option<csv::Writer<W>>,
    ) -> Result<LoadReport>
    where
        R: Read,
        W: Write,
    {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.load_bytes(dict, &bytes, log)
    }

    /// Loads the words of an in-memory source.
    ///
    /// # Errors
    ///
    /// Timing-log write failures, as [`DictionaryError::Csv`].
    pub fn load_bytes<W: Write>(
        &self,
        dict: &mut Dictionary,
        source: &[u8],
        mut log: Option<csv::Writer<W>>,
    ) -> Result<LoadReport> {
        if let Some(log) = log.as_mut() {
            log.write_record(TIMING_LOG_HEADER)?;
        }

        let mut report = LoadReport {
            tokens: 0,
            inserted: 0,
            duplicates: 0,
            elapsed: Duration::ZERO,
        };

        let text = String::from_utf8_lossy(source);
        for word in text.split_whitespace().flat_map(word_chunks) {
            let start = Instant::now();
            let outcome = dict.insert(word, &self.placeholder)?;
            report.elapsed += start.elapsed();

            if outcome.is_inserted() {
                report.inserted += 1;
            } else {
                report.duplicates += 1;
            }
            if let Some(log) = log.as_mut() {
                let millis = report.elapsed.as_secs_f64() * 1000.0;
                log.write_record([report.tokens.to_string(), format!("{millis:.2}")])?;
            }
            report.tokens += 1;
        }

        if let Some(log) = log.as_mut() {
            log.flush().map_err(csv::Error::from)?;
        }
        info_event!(
            tokens = report.tokens,
            inserted = report.inserted,
            duplicates = report.duplicates,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "bulk load finished"
        );
        Ok(report)
    }
}

/// Splits `token` into pieces of at most [`MAX_WORD_LEN`] characters.
fn word_chunks(token: &str) -> impl Iterator<Item = &str> {
    let mut rest = token;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let (head, tail) = rest.split_at(truncate_chars(rest, MAX_WORD_LEN).len());
        rest = tail;
        Some(head)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    #[test]
    fn test_load_reader_counts_duplicates() {
        let mut dict = Dictionary::new();
        let source = Cursor::new("pear apple\n  fig apple\n\npear\n");
        let report = BulkLoader::default()
            .load_reader::<_, Vec<u8>>(&mut dict, source, None)
            .unwrap();

        assert_eq!(report.tokens, 5);
        assert_eq!(report.inserted, 3);
        assert_eq!(report.duplicates, 2);
        let words: Vec<_> = dict.entries().map(|e| e.word).collect();
        assert_eq!(words, vec!["apple", "fig", "pear"]);
        assert_eq!(dict.find("fig").unwrap().meaning, PLACEHOLDER_MEANING);
    }

    #[test]
    fn test_timing_log_rows() {
        let mut dict = Dictionary::new();
        let mut buf = Vec::new();
        BulkLoader::new("x")
            .load_reader(&mut dict, Cursor::new("a b a"), Some(csv::Writer::from_writer(&mut buf)))
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "WordCount,ExecutionTime(ms)");
        assert_eq!(lines.len(), 4);
        for (i, row) in lines[1..].iter().enumerate() {
            let (index, millis) = row.split_once(',').unwrap();
            assert_eq!(index, i.to_string());
            assert!(millis.parse::<f64>().unwrap() >= 0.0);
        }
    }

    #[test]
    fn test_long_tokens_are_chunked() {
        let chunks: Vec<_> = word_chunks(&"x".repeat(110)).map(str::len).collect();
        assert_eq!(chunks, vec![49, 49, 12]);
        assert_eq!(word_chunks("short").collect::<Vec<_>>(), vec!["short"]);
    }

    #[test]
    fn test_invalid_utf8_is_loaded_lossily() {
        let mut dict = Dictionary::new();
        let report = BulkLoader::default()
            .load_reader::<_, Vec<u8>>(&mut dict, Cursor::new(b"alpha beta\ncaf\xe9 delta\n"), None)
            .unwrap();

        assert_eq!(report.inserted, 4);
        let words: Vec<_> = dict.entries().map(|e| e.word).collect();
        assert_eq!(words, vec!["alpha", "beta", "caf\u{FFFD}", "delta"]);
        dict.check_invariants().unwrap();
    }

    /// Yields `head`, then fails every read.
    struct BrokenSource<'a> {
        head: &'a [u8],
    }

    impl Read for BrokenSource<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.head.is_empty() {
                return Err(io::Error::new(io::ErrorKind::InvalidData, "disk on fire"));
            }
            self.head.read(buf)
        }
    }

    #[test]
    fn test_failed_read_leaves_dictionary_untouched() {
        let mut dict = Dictionary::new();
        dict.insert("kept", "yes").unwrap();
        let source = BrokenSource {
            head: b"alpha beta\ngamma ",
        };
        let err = BulkLoader::default()
            .load_reader::<_, Vec<u8>>(&mut dict, source, None)
            .unwrap_err();

        assert!(matches!(err, DictionaryError::Io(_)));
        let words: Vec<_> = dict.entries().map(|e| e.word).collect();
        assert_eq!(words, vec!["kept"]);
    }

    /// Accepts nothing.
    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "no space left"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_log_write_failure_is_csv_error() {
        let mut dict = Dictionary::new();
        let err = BulkLoader::default()
            .load_bytes(&mut dict, b"one two", Some(csv::Writer::from_writer(FullDisk)))
            .unwrap_err();
        assert!(matches!(err, DictionaryError::Csv(_)));
    }

    #[test]
    fn test_uncreatable_log_leaves_dictionary_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("words.txt");
        std::fs::write(&source, "one two").unwrap();
        let log = dir.path().join("missing").join("log.csv");

        let mut dict = Dictionary::new();
        let err = BulkLoader::default()
            .load_path(&mut dict, &source, Some(log.as_path()))
            .unwrap_err();
        assert!(matches!(err, DictionaryError::LogUnavailable { .. }));
        assert!(dict.is_empty());
    }

    #[test]
    fn test_missing_source_leaves_dictionary_untouched() {
        let mut dict = Dictionary::new();
        dict.insert("kept", "yes").unwrap();
        let err = BulkLoader::default()
            .load_path(&mut dict, "/definitely/not/here.txt", None)
            .unwrap_err();
        assert!(matches!(err, DictionaryError::SourceUnavailable { .. }));
        assert_eq!(dict.len(), 1);
    }
}
