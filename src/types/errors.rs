//! Error types used across Groundwork.
use thiserror::Error;

/// High-level error categories for the setup pipeline.
///
/// Missing dependencies and dependency cycles are surfaced as plan warnings,
/// not errors; everything here is fatal to the operation that raised it and
/// triggers rollback during apply.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("path escapes workspace")]
    PathEscape,
    #[error("invalid path")]
    InvalidPath,
    #[error("unsupported operation kind")]
    UnsupportedKind,
    #[error("missing content")]
    MissingContent,
    #[error("invalid json")]
    InvalidJson,
    #[error("invalid json pointer")]
    InvalidPointer,
    #[error("script conflict")]
    ScriptConflict,
    #[error("io error")]
    Io,
}

/// Structured error with a kind and human message.
#[derive(Debug, Error)]
#[error("{kind}: {msg}")]
pub struct Error {
    pub kind: ErrorKind,
    pub msg: String,
}

impl Error {
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
        }
    }

    /// Wrap an I/O error, keeping the offending path in the message.
    pub fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self {
            kind: ErrorKind::Io,
            msg: format!("{}: {err}", path.display()),
        }
    }
}

/// Convenient alias for results returning a `types::Error`.
pub type Result<T> = std::result::Result<T, Error>;
