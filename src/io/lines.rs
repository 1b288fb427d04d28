//! Buffered line cursors for text-format parsers.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Lines};
use std::iter::Peekable;
use std::path::Path;

use anyhow::{self, format_err};
use log;

#[cfg(test)]
#[path = "lines_tests.rs"]
mod lines_tests;

/// A forward-only cursor over the lines of a text source.
///
/// The cursor supports one line of lookahead and remembers the 1-based number of the most
/// recently consumed line so that failures can be reported with their origin.
pub struct LineCursor<R: BufRead> {
    /// The underlying line iterator.
    lines: Peekable<Lines<R>>,

    /// A human-readable name of the source, typically a file path.
    source: String,

    /// The number of lines consumed so far.
    line_number: usize,
}

impl<R: BufRead> LineCursor<R> {
    /// Wraps a buffered reader in a line cursor.
    ///
    /// # Arguments
    ///
    /// * `inner` - The buffered reader.
    /// * `source` - A name for the source used in error messages.
    pub fn new(inner: R, source: &str) -> Self {
        Self {
            lines: inner.lines().peekable(),
            source: source.to_string(),
            line_number: 0,
        }
    }

    /// The name of the source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The 1-based number of the most recently consumed line, or 0 if nothing has been consumed.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Consumes and returns the next line, or `None` at end of file.
    ///
    /// # Errors
    ///
    /// Errors if the underlying reader fails.
    pub fn next_line(&mut self) -> Result<Option<String>, anyhow::Error> {
        match self.lines.next() {
            Some(line) => {
                self.line_number += 1;
                line.map(Some)
                    .map_err(|err| self.error(&format!("Unable to read line: {err}")))
            }
            None => Ok(None),
        }
    }

    /// Returns the next line without consuming it, or `None` at end of file or if the next line
    /// cannot be read.
    pub fn peek_line(&mut self) -> Option<&str> {
        match self.lines.peek() {
            Some(Ok(line)) => Some(line.as_str()),
            _ => None,
        }
    }

    /// Consumes lines until one satisfies a predicate, and returns that line.
    ///
    /// # Returns
    ///
    /// The first matching line, or `None` if end of file was reached first.
    pub fn seek<F>(&mut self, mut predicate: F) -> Result<Option<String>, anyhow::Error>
    where
        F: FnMut(&str) -> bool,
    {
        while let Some(line) = self.next_line()? {
            if predicate(&line) {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    /// Consumes lines until one contains any of the given markers, and returns that line.
    pub fn seek_containing(&mut self, markers: &[&str]) -> Result<Option<String>, anyhow::Error> {
        self.seek(|line| markers.iter().any(|marker| line.contains(marker)))
    }

    /// Consumes lines until one that is neither blank nor a comment starting with `comment`.
    pub fn next_content_line(&mut self, comment: char) -> Result<Option<String>, anyhow::Error> {
        self.seek(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with(comment)
        })
    }

    /// Builds an error carrying the current position in the source.
    pub fn error(&self, msg: &str) -> anyhow::Error {
        format_err!("{msg} ({}:{})", self.source, self.line_number)
    }
}

impl<'a> LineCursor<Cursor<&'a [u8]>> {
    /// Constructs a line cursor over an in-memory string.
    pub fn from_text(contents: &'a str, source: &str) -> Self {
        Self::new(Cursor::new(contents.as_bytes()), source)
    }
}

impl LineCursor<BufReader<File>> {
    /// Opens a file for line-by-line reading.
    ///
    /// # Errors
    ///
    /// Errors if the file cannot be opened.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let f = File::open(path)
            .map_err(|err| format_err!("Unable to open `{}`: {err}", path.display()))?;
        Ok(Self::new(BufReader::new(f), &path.display().to_string()))
    }

    /// Opens a file for line-by-line reading, treating an unreadable file as absent input.
    ///
    /// # Returns
    ///
    /// The cursor, or `None` (with a warning logged) if the file cannot be opened.
    pub fn open_if_readable<P: AsRef<Path>>(path: P) -> Option<Self> {
        match Self::from_file(&path) {
            Ok(cursor) => Some(cursor),
            Err(err) => {
                log::warn!("{err}. The file will be treated as empty.");
                None
            }
        }
    }
}

/// Parses a floating-point token that may use a Fortran `D` exponent marker.
///
/// # Errors
///
/// Errors if the token is not a valid number.
pub fn parse_fortran_float(token: &str) -> Result<f64, anyhow::Error> {
    token
        .replace(['D', 'd'], "E")
        .parse::<f64>()
        .map_err(|err| format_err!("Unable to parse `{token}` as a floating-point number: {err}"))
}
