//! Line-oriented reader for raw delay samples.
//!
//! Each line of the input holds one non-negative integer. The reader is
//! a single-pass iterator: once it reaches end of input or reports an
//! error it yields nothing further.

use super::Delay;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while reading samples.
#[derive(Debug, Error)]
pub enum SampleError {
    /// A line did not parse as a non-negative integer.
    #[error("invalid sample on line {line}: {content:?} is not a non-negative integer")]
    InvalidSample {
        /// One-based line number.
        line: u64,
        /// The offending line, trimmed.
        content: String,
    },
    /// The underlying reader failed.
    #[error("failed to read samples: {0}")]
    Io(#[from] io::Error),
}

/// Parses a single textual sample, tolerating surrounding whitespace.
pub fn parse_delay(text: &str, line: u64) -> Result<Delay, SampleError> {
    let trimmed = text.trim();
    trimmed
        .parse::<Delay>()
        .map_err(|_| SampleError::InvalidSample {
            line,
            content: trimmed.to_string(),
        })
}

/// Lazy sequence of delays read one per line.
pub struct LineSamples<R> {
    reader: R,
    buf: String,
    line: u64,
    done: bool,
}

impl<R: BufRead> LineSamples<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line: 0,
            done: false,
        }
    }

    /// Number of lines consumed so far.
    #[inline]
    pub fn lines_read(&self) -> u64 {
        self.line
    }
}

impl LineSamples<BufReader<File>> {
    /// Opens a sample file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SampleError> {
        let file = File::open(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "Opened sample source");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for LineSamples<R> {
    type Item = Result<Delay, SampleError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_line(&mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line += 1;
                let result = parse_delay(&self.buf, self.line);
                if result.is_err() {
                    self.done = true;
                }
                Some(result)
            }
            Err(e) => {
                self.done = true;
                Some(Err(SampleError::Io(e)))
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for LineSamples<R> {}
