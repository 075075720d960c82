//! Unified error types for Verdict.

use thiserror::Error;

/// The main error type for Verdict operations.
///
/// Unsatisfiability is a normal solver result and is never reported through
/// this type.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed DIMACS input.
    #[error("parse error on line {line}: {message}")]
    Parse {
        line: usize,
        message: String,
    },

    /// Unknown solver configuration name.
    #[error("unknown solver configuration: {0}")]
    UnknownSolver(String),
}

impl Error {
    /// Builds a parse error for the given source line.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
