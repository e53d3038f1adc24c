//! Unified error types for Spotter-Oxide

use thiserror::Error;

/// Unified Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Spotter-Oxide
///
/// Absence of an element is never an error: single-element lookups return
/// `Ok(None)` and plural lookups an empty `Vec`, so existence checks compose
/// without error handling at every call site.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Caller misuse: operating on a session that has been quit
    #[error("Usage error: {0}")]
    Usage(String),

    /// Malformed query material (misplaced pattern, bad regex, reserved-key
    /// misuse inside a chain)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A predicate combination the resolver deliberately does not support
    #[error("Unsupported combination: {0}")]
    UnsupportedCombination(String),

    /// Backend failure passthrough (invalid window handle, lost connection)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Create a new usage error
    pub fn usage<S: Into<String>>(msg: S) -> Self {
        Error::Usage(msg.into())
    }

    /// Create a new invalid argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create a new unsupported combination error
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Error::UnsupportedCombination(msg.into())
    }

    /// Create a new backend error
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        Error::Backend(msg.into())
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }
}

/// Malformed pattern sources surface as invalid arguments
impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidArgument(format!("malformed pattern: {err}"))
    }
}
