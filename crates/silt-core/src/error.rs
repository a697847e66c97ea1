//! Error types for silt operations.

use std::fmt;
use std::io;

/// All possible silt errors.
#[derive(Debug)]
pub enum SiltError {
    /// The current directory is not a silt repository.
    NotARepo,
    /// A silt repository already exists here. Benign: `init` is
    /// idempotent and never touches existing data.
    AlreadyInitialized,
    /// An I/O error occurred.
    Io(io::Error),
    /// JSON serialization/deserialization failed.
    Json(serde_json::Error),
    /// A working file referenced by `add` does not exist.
    SourceNotFound(String),
    /// An object with the given hash was not found in the store.
    ObjectNotFound(String),
    /// A short id prefix matched more than one stored object.
    AmbiguousId(String),
    /// The commit chain could not be followed past this point.
    CorruptHistory(String),
    /// The staging index is empty.
    NothingToCommit,
}

impl fmt::Display for SiltError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiltError::NotARepo => write!(f, "not a silt repository (missing .silt/)"),
            SiltError::AlreadyInitialized => write!(f, ".silt/ already exists"),
            SiltError::Io(e) => write!(f, "I/O error: {e}"),
            SiltError::Json(e) => write!(f, "JSON error: {e}"),
            SiltError::SourceNotFound(path) => write!(f, "file not found: {path}"),
            SiltError::ObjectNotFound(id) => write!(f, "object not found: {id}"),
            SiltError::AmbiguousId(prefix) => {
                write!(f, "ambiguous id '{prefix}' matches more than one object")
            }
            SiltError::CorruptHistory(detail) => write!(f, "corrupt history: {detail}"),
            SiltError::NothingToCommit => write!(f, "nothing to commit"),
        }
    }
}

impl std::error::Error for SiltError {}

impl From<io::Error> for SiltError {
    fn from(e: io::Error) -> Self {
        SiltError::Io(e)
    }
}

impl From<serde_json::Error> for SiltError {
    fn from(e: serde_json::Error) -> Self {
        SiltError::Json(e)
    }
}

/// Convenience alias for Results in silt.
pub type SiltResult<T> = Result<T, SiltError>;
