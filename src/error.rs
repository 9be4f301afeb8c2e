//! Error type shared by the forecast and summary modules.

use std::error::Error;
use std::fmt;

/// Failure of a core computation.
///
/// The core is pure and synchronous, so every error is a contract
/// violation surfaced directly to the caller: no retries, no partial
/// results, no sentinel values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An argument was outside its documented domain.
    InvalidArgument(String),
    /// A summary function was called on a zero-length series.
    EmptyInput(&'static str),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            CoreError::EmptyInput(what) => {
                write!(f, "empty input: {what} requires at least one element")
            }
        }
    }
}

impl Error for CoreError {}
