//! Interactive command session over a [`Dictionary`].
//!
//! Commands are read as numeric codes followed by their operands:
//!
//! | code | command | operands |
//! |------|---------|----------|
//! | `0`  | quit    | |
//! | `1`  | create  | |
//! | `2`  | remove  | word |
//! | `3`  | insert  | word, then the meaning as a line of free text |
//! | `4`  | search  | word |
//! | `5`  | print   | |
//! | `6`  | load    | file name |
//!
//! The meaning of an insert is the rest of the line after the word (one
//! separator character skipped), or the whole next line when the word ends
//! its line. End of input ends the session like `0`.

use super::config::{PrintFormat, SessionConfig};
use super::loader::BulkLoader;
use super::{Dictionary, Entry, RemoveOutcome};
use crate::collections::avl::InsertOutcome;
use crate::error::{DictionaryError, Result};
use crate::macros::debug_event;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Greeting written when a session starts.
pub const BANNER: &str = "AVL Dictionary Initialized. Waiting for commands...";

/// One parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `0`: end the session.
    Quit,
    /// `1`: report whether the dictionary already holds words.
    Create,
    /// `2`: remove a word.
    Remove(String),
    /// `3`: insert a word with its meaning.
    Insert {
        /// Word to insert.
        word: String,
        /// Meaning to attach.
        meaning: String,
    },
    /// `4`: look a word up.
    Search(String),
    /// `5`: print every entry in order.
    Print,
    /// `6`: bulk-load the words of a file.
    Load(PathBuf),
    /// Anything else.
    Invalid(String),
}

/// Whitespace tokenizer that can also hand out the remainder of a line.
struct Input<R> {
    reader: R,
    line: String,
    pos: usize,
}

impl<R: BufRead> Input<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            pos: 0,
        }
    }

    /// Replaces the buffered line with the next one; `false` at end of input.
    fn next_line(&mut self) -> io::Result<bool> {
        self.line.clear();
        self.pos = 0;
        Ok(self.reader.read_line(&mut self.line)? != 0)
    }

    fn next_token(&mut self) -> io::Result<Option<String>> {
        loop {
            let rest = &self.line[self.pos..];
            let skipped = rest.len() - rest.trim_start().len();
            self.pos += skipped;

            let rest = &self.line[self.pos..];
            if !rest.is_empty() {
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                let token = rest[..end].to_owned();
                self.pos += end;
                return Ok(Some(token));
            }
            if !self.next_line()? {
                return Ok(None);
            }
        }
    }

    /// Free text following a token, without the line terminator.
    fn rest_of_line(&mut self) -> io::Result<Option<String>> {
        let rest = &self.line[self.pos..];
        if rest.trim_end_matches(['\r', '\n']).is_empty() {
            if !self.next_line()? {
                return Ok(None);
            }
        } else if let Some(separator) = rest.chars().next() {
            self.pos += separator.len_utf8();
        }

        let text = self.line[self.pos..].trim_end_matches(['\r', '\n']).to_owned();
        self.pos = self.line.len();
        Ok(Some(text))
    }
}

/// Drives a [`Dictionary`] from a command stream, writing replies to `output`.
pub struct Session<R, W> {
    input: Input<R>,
    output: W,
    dict: Dictionary,
    loader: BulkLoader,
    config: SessionConfig,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Creates a session over an empty dictionary.
    pub fn new(input: R, output: W, config: SessionConfig) -> Self {
        Self::with_dictionary(input, output, config, Dictionary::new())
    }

    /// Creates a session over an existing dictionary.
    pub fn with_dictionary(input: R, output: W, config: SessionConfig, dict: Dictionary) -> Self {
        Self {
            input: Input::new(input),
            output,
            loader: BulkLoader::new(config.placeholder_meaning.clone()),
            dict,
            config,
        }
    }

    /// The dictionary being driven.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// Ends the session, returning the dictionary and the output sink.
    pub fn into_parts(self) -> (Dictionary, W) {
        (self.dict, self.output)
    }

    /// Reads the next command; `None` at end of input.
    ///
    /// # Errors
    ///
    /// Read failures on the input stream.
    pub fn next_command(&mut self) -> io::Result<Option<Command>> {
        let Some(code) = self.input.next_token()? else {
            return Ok(None);
        };

        let command = match code.parse::<i32>() {
            Ok(0) => Command::Quit,
            Ok(1) => Command::Create,
            Ok(2) => match self.input.next_token()? {
                Some(word) => Command::Remove(word),
                None => return Ok(None),
            },
            Ok(3) => {
                let Some(word) = self.input.next_token()? else {
                    return Ok(None);
                };
                let Some(meaning) = self.input.rest_of_line()? else {
                    return Ok(None);
                };
                Command::Insert { word, meaning }
            }
            Ok(4) => match self.input.next_token()? {
                Some(word) => Command::Search(word),
                None => return Ok(None),
            },
            Ok(5) => Command::Print,
            Ok(6) => match self.input.next_token()? {
                Some(file) => Command::Load(PathBuf::from(file)),
                None => return Ok(None),
            },
            _ => Command::Invalid(code),
        };
        Ok(Some(command))
    }

    /// Runs commands until `0` or end of input.
    ///
    /// # Errors
    ///
    /// Failures reading commands or writing replies. Per-command problems
    /// (unknown word, unreadable file, ...) are reported on the output and
    /// do not end the session.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "{BANNER}")?;
        while let Some(command) = self.next_command()? {
            debug_event!(?command, "command");
            if command == Command::Quit {
                break;
            }
            self.execute(command)?;
        }
        self.output.flush()?;
        Ok(())
    }

    /// Applies one command and writes its reply.
    ///
    /// # Errors
    ///
    /// Failures writing the reply.
    pub fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Quit => {}
            Command::Create => {
                if self.dict.is_empty() {
                    writeln!(self.output, "Tree created.")?;
                } else {
                    writeln!(self.output, "Tree already exists.")?;
                }
            }
            Command::Remove(word) => {
                if self.dict.remove(&word) == RemoveOutcome::NotFound {
                    writeln!(self.output, "Word '{word}' not found.")?;
                }
            }
            Command::Insert { word, meaning } => {
                match self.dict.insert(&word, &meaning) {
                    Ok(InsertOutcome::Inserted) => {}
                    Ok(InsertOutcome::AlreadyExists) => {
                        writeln!(self.output, "Word '{word}' already exists.")?;
                    }
                    Err(err) => writeln!(self.output, "{err}")?,
                }
            }
            Command::Search(word) => match self.dict.find(&word) {
                Some(entry) => {
                    writeln!(self.output, "Found: {} (Depth: {})", entry.word, entry.depth)?;
                    writeln!(self.output, "Meaning: {}", entry.meaning)?;
                }
                None => writeln!(self.output, "Word '{word}' not found.")?,
            },
            Command::Print => self.print()?,
            Command::Load(file) => self.load(&file)?,
            Command::Invalid(_) => writeln!(self.output, "Invalid operation.")?,
        }
        Ok(())
    }

    fn print(&mut self) -> Result<()> {
        match self.config.print_format {
            PrintFormat::Text => {
                for Entry { word, meaning, depth } in self.dict.entries() {
                    writeln!(self.output, "{word}: {meaning} (Depth = {depth})")?;
                }
            }
            PrintFormat::Json => {
                let entries: Vec<_> = self.dict.entries().collect();
                serde_json::to_writer(&mut self.output, &entries).map_err(io::Error::from)?;
                writeln!(self.output)?;
            }
        }
        Ok(())
    }

    fn load(&mut self, file: &Path) -> Result<()> {
        let log = self.config.timing_log.as_deref();
        match self.loader.load_path(&mut self.dict, file, log) {
            Ok(_) => {
                write!(self.output, "Words from {} inserted successfully.", file.display())?;
                if let Some(log) = log {
                    write!(self.output, " Log saved to {}", log.display())?;
                }
                writeln!(self.output)?;
            }
            Err(err @ (DictionaryError::SourceUnavailable { .. } | DictionaryError::LogUnavailable { .. })) => {
                writeln!(self.output, "{err}")?;
            }
            Err(DictionaryError::Csv(err)) => writeln!(self.output, "Error writing output log: {err}")?,
            Err(err) => writeln!(self.output, "Error loading {}: {err}", file.display())?,
        }
        Ok(())
    }
}
