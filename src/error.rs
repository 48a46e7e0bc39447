// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for conversion and parsing.
//!
//! A conversion either fully succeeds or fails with the first error
//! encountered; partial output is never returned.

use thiserror::Error;

/// Errors produced by the codecs, the importer, and the exporter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed token, clause, condition, or action text. The parse that
    /// produced it is abandoned with no partial result.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Well-formed input that refers to something that does not exist,
    /// such as an assignment pointing at a missing sound id.
    #[error("semantic error: {0}")]
    Semantic(String),
}

impl Error {
    /// Shorthand for a syntax error with a formatted message.
    pub fn syntax(msg: impl Into<String>) -> Self {
        Error::Syntax(msg.into())
    }

    /// Shorthand for a semantic error with a formatted message.
    pub fn semantic(msg: impl Into<String>) -> Self {
        Error::Semantic(msg.into())
    }

    /// Prefix the message with where the error happened, keeping the kind.
    pub fn context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            Error::Syntax(msg) => Error::Syntax(format!("{ctx}: {msg}")),
            Error::Semantic(msg) => Error::Semantic(format!("{ctx}: {msg}")),
        }
    }
}

/// Result alias used throughout the conversion engine.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::syntax("illegal midi setting: \"XX\"");
        assert_eq!(err.to_string(), "syntax error: illegal midi setting: \"XX\"");

        let err = Error::semantic("no sound for pt.legato");
        assert_eq!(err.to_string(), "semantic error: no sound for pt.legato");
    }
}
