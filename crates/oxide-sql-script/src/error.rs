//! Error types for script loading.

use std::path::PathBuf;

/// Errors raised while parsing a file-selection spec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    /// The spec string (or one of its comma-separated items) is empty.
    #[error("Empty file selection spec")]
    Empty,

    /// An item is neither `*`, a number, nor an `A..B` range.
    #[error("Invalid spec format '{0}': missing range")]
    InvalidItem(String),

    /// A bound is not a valid number.
    #[error("Invalid position '{0}' in spec")]
    InvalidNumber(String),

    /// Positions are 1-based.
    #[error("Position 0 is not valid, positions start at 1")]
    ZeroPosition,

    /// A fully specified range where start is not before end.
    #[error("Invalid range {start}..{end}: start must be lower than end")]
    InvalidRange {
        /// Lower bound as written.
        start: usize,
        /// Upper bound as written.
        end: usize,
    },

    /// A bound points past the end of the listing.
    #[error("Index out of range: position {position} but only {len} files")]
    OutOfRange {
        /// The offending position.
        position: usize,
        /// Number of entries in the listing.
        len: usize,
    },
}

/// Errors that can occur while reading and splitting SQL scripts.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The input ended in the middle of a statement.
    #[error("Incomplete statement at end of file '{}'", .path.display())]
    IncompleteStatement {
        /// Script being split.
        path: PathBuf,
    },

    /// File selection failed.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// IO error while listing or reading scripts.
    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A statement is not valid UTF-8.
    #[error("Invalid UTF-8 in statement from '{}'", .path.display())]
    Encoding {
        /// Script being split.
        path: PathBuf,
    },
}

impl ScriptError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for script operations.
pub type Result<T> = std::result::Result<T, ScriptError>;
