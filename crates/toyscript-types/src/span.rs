use serde::{Deserialize, Serialize};
use std::fmt;

/// A range of source text, 1-based, used only for error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Span {
    pub fn new(line: u32, column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            line,
            column,
            end_line,
            end_column,
        }
    }

    /// A zero-width span at one position.
    pub fn point(line: u32, column: u32) -> Self {
        Self::new(line, column, line, column)
    }

    /// Span from the start of `self` to the end of `other`.
    ///
    /// Tokens arrive in source order, so `other` never starts before `self`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.line, self.column, other.end_line, other.end_column)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A named piece of source text.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub source: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            name: name.into(),
            source,
            line_starts,
        }
    }

    /// The text of a 1-based line, without its terminator.
    pub fn line(&self, number: u32) -> Option<&str> {
        let idx = (number as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map_or(self.source.len(), |&next| next - 1);
        Some(self.source[start..end].trim_end_matches('\r'))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
