use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum number of parse errors kept for reporting.
pub const MAX_ERRORS: usize = 20;

/// Numeric parse error code, rendered as `E<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    pub const UNEXPECTED_TOKEN: Self = Self(100);
    pub const UNCLOSED_BLOCK: Self = Self(101);
    pub const PREFIX_NOT_RECOGNIZED: Self = Self(102);
    pub const INVALID_ASSIGNMENT_TARGET: Self = Self(103);
    pub const INTEGER_OVERFLOW: Self = Self(104);
    pub const ILLEGAL_TOKEN: Self = Self(105);
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A single parse error with the source line it points into.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{span}: {code} {message}")]
pub struct ParseError {
    pub file: String,
    pub code: ErrorCode,
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
    pub source_line: String,
}

impl ParseError {
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            message: message.into(),
            span,
            source_line: source_line.into(),
        }
    }
}

/// Accumulated parse errors.
///
/// Only the first [`MAX_ERRORS`] are stored; `total_errors` counts all of them.
#[derive(Debug, Clone, Default, PartialEq, Error, Serialize, Deserialize)]
#[error("{total_errors} parse error(s)")]
pub struct ParseErrors {
    pub errors: Vec<ParseError>,
    pub total_errors: usize,
}

impl ParseErrors {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn push(&mut self, error: ParseError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.errors.iter()
    }

    /// The message of the first recorded error, if any.
    pub fn first_message(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }
}

impl<'a> IntoIterator for &'a ParseErrors {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
