//! Streaming statement splitter.
//!
//! The splitter reads a script in chunks and cuts it into statements on
//! the active delimiter. The delimiter is passed in on every call rather
//! than stored, since directives may change it between two tokens.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::directive::{COMMENT_PREFIX, DEFAULT_DELIMITER};
use crate::error::{Result, ScriptError};

const CHUNK_SIZE: u64 = 64 * 1024;

/// Outcome of scanning the buffered input once.
#[derive(Debug, PartialEq, Eq)]
enum Scan<'a> {
    /// A token was found; `advance` bytes of input are consumed.
    Token { advance: usize, token: &'a [u8] },
    /// The buffer holds no complete token yet.
    NeedMore,
    /// Input is exhausted.
    Done,
    /// Input ended in the middle of a statement.
    Incomplete,
}

fn is_blank(data: &[u8]) -> bool {
    data.iter().all(u8::is_ascii_whitespace)
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|ix| from + ix)
}

/// Finds the next token in `data`.
///
/// No match starts before `resume`: earlier bytes were already searched
/// with the same delimiter.
fn scan<'a>(data: &'a [u8], at_eof: bool, delimiter: &[u8], resume: usize) -> Scan<'a> {
    let mut offset = 0;
    if delimiter == DEFAULT_DELIMITER.as_bytes() {
        offset = data
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(data.len());
        let rest = &data[offset..];
        let marker = COMMENT_PREFIX.as_bytes();
        if rest.starts_with(marker) {
            return match find(rest, b"\n", resume.saturating_sub(offset)) {
                Some(ix) => Scan::Token {
                    advance: offset + ix + 1,
                    token: &rest[..=ix],
                },
                None if at_eof => Scan::Token {
                    advance: data.len(),
                    token: rest,
                },
                None => Scan::NeedMore,
            };
        }
        if !at_eof && rest.len() < marker.len() && marker.starts_with(rest) {
            return Scan::NeedMore;
        }
    }

    let rest = &data[offset..];
    match find(rest, delimiter, resume.saturating_sub(offset)) {
        Some(ix) => {
            let end = ix + delimiter.len();
            Scan::Token {
                advance: offset + end,
                token: &rest[..end],
            }
        }
        None if !at_eof => Scan::NeedMore,
        None if is_blank(rest) => Scan::Done,
        None => Scan::Incomplete,
    }
}

/// Cuts a byte stream into trimmed statements and comment lines.
///
/// Under the default delimiter a line starting with `--` is returned on
/// its own so that it can be checked for a directive. Under a custom
/// delimiter everything up to the delimiter is one statement, and the
/// delimiter itself is removed from the returned text.
pub struct Splitter<R> {
    reader: R,
    buf: Vec<u8>,
    /// Start of the unconsumed input in `buf`.
    pos: usize,
    /// Offset into the unconsumed input where the next search resumes.
    resume: usize,
    eof: bool,
    path: PathBuf,
}

impl<R: Read> Splitter<R> {
    /// Creates a splitter over `reader`; `path` is used in error messages.
    #[must_use]
    pub fn new(reader: R, path: impl AsRef<Path>) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            pos: 0,
            resume: 0,
            eof: false,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the next token using `delimiter`, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::IncompleteStatement`] if the input ends with
    /// an unterminated statement, [`ScriptError::Encoding`] for invalid
    /// UTF-8 and [`ScriptError::Io`] if reading fails.
    pub fn next_token(&mut self, delimiter: &str) -> Result<Option<String>> {
        let delimiter = if delimiter.is_empty() {
            DEFAULT_DELIMITER
        } else {
            delimiter
        };
        loop {
            let data = &self.buf[self.pos..];
            match scan(data, self.eof, delimiter.as_bytes(), self.resume) {
                Scan::Token { advance, token } => {
                    let text = std::str::from_utf8(token).map_err(|_| ScriptError::Encoding {
                        path: self.path.clone(),
                    })?;
                    let text = strip_delimiter(text.trim(), delimiter).to_string();
                    self.pos += advance;
                    self.resume = 0;
                    return Ok(Some(text));
                }
                Scan::NeedMore => {
                    self.resume = data.len().saturating_sub(delimiter.len() - 1);
                    self.fill()?;
                }
                Scan::Done => {
                    self.buf.clear();
                    self.pos = 0;
                    self.resume = 0;
                    return Ok(None);
                }
                Scan::Incomplete => {
                    return Err(ScriptError::IncompleteStatement {
                        path: self.path.clone(),
                    })
                }
            }
        }
    }

    /// Appends up to one chunk to the buffer, dropping consumed bytes first.
    fn fill(&mut self) -> Result<()> {
        if self.pos > 0 {
            self.buf.drain(..self.pos);
            self.pos = 0;
        }
        let read = self
            .reader
            .by_ref()
            .take(CHUNK_SIZE)
            .read_to_end(&mut self.buf)
            .map_err(|e| ScriptError::io(&self.path, e))?;
        if read == 0 {
            self.eof = true;
        }
        Ok(())
    }
}

fn strip_delimiter<'a>(text: &'a str, delimiter: &str) -> &'a str {
    if delimiter == DEFAULT_DELIMITER {
        return text;
    }
    text.strip_suffix(delimiter).map_or(text, str::trim_end)
}
