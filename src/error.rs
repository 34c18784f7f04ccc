use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of [`TopError`], used by the runner to decide whether a
/// failure ends the current file or the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Index,
    Value,
    Decode,
    Encode,
    Config,
}

/// Errors raised while loading tables, reading sources and writing tops.
#[derive(Debug, Error)]
pub enum TopError {
    #[error("i/o failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: column {column} requested but the row has {fields} field(s)")]
    Index { line: u64, column: usize, fields: usize },
    #[error("line {line}: column {column} holds {value:?}, expected {expected}")]
    Value {
        line: u64,
        column: usize,
        value: String,
        expected: &'static str,
    },
    #[error("{} is not valid {encoding} text", path.display())]
    Decode { path: PathBuf, encoding: &'static str },
    #[error("{}: output has characters {encoding} cannot represent", path.display())]
    Encode { path: PathBuf, encoding: &'static str },
    #[error("configuration error: {0}")]
    Config(String),
}

impl TopError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TopError::Io { path: path.into(), source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TopError::Io { .. } => ErrorKind::Io,
            TopError::Index { .. } => ErrorKind::Index,
            TopError::Value { .. } => ErrorKind::Value,
            TopError::Decode { .. } => ErrorKind::Decode,
            TopError::Encode { .. } => ErrorKind::Encode,
            TopError::Config(_) => ErrorKind::Config,
        }
    }

    /// True when the error only invalidates the file being processed.
    pub fn is_file_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::Index | ErrorKind::Value | ErrorKind::Decode | ErrorKind::Encode)
    }
}
