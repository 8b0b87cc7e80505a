//! Formula error types

use std::fmt;
use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Location inside formula text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Byte offset
    pub offset: usize,
    /// 1-based line
    pub line: usize,
    /// 1-based column (in characters)
    pub column: usize,
}

impl Position {
    /// Compute line and column for a byte offset into `text`
    pub fn locate(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = &text[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors that can occur during formula parsing or expansion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Formula text does not match the grammar
    #[error("Parse error at {position}: {message}")]
    Parse { message: String, position: Position },

    /// Call site argument count differs from the callee's parameter count
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// Function is not part of the catalog
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Circular reference
    #[error("Circular reference detected: {}", path.join(" → "))]
    CircularReference { path: Vec<String> },

    /// Expansion left the body unchanged although it calls named functions
    #[error(
        "Formula expansion failed - calls to {} were not expanded",
        dependencies.join(", ")
    )]
    ExpansionConsistency { dependencies: Vec<String> },

    /// A callee could not be expanded
    #[error("Depends on {0}, which could not be expanded")]
    DependencyFailed(String),
}

impl FormulaError {
    /// Errors that invalidate the whole build rather than one formula
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FormulaError::CircularReference { .. } | FormulaError::ExpansionConsistency { .. }
        )
    }
}

/// A [`FormulaError`] attributed to the named function it occurred in
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{formula}: {source}")]
pub struct ExpandError {
    /// Name of the formula whose processing failed
    pub formula: String,
    #[source]
    pub source: FormulaError,
}

impl ExpandError {
    /// Attribute an error to a formula
    pub fn new(formula: impl Into<String>, source: FormulaError) -> Self {
        Self {
            formula: formula.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_locate() {
        let text = "LET(\n  x, 1,\n  y";
        let pos = Position::locate(text, text.len());
        assert_eq!(pos.line, 3);
        assert_eq!(pos.column, 4);

        let pos = Position::locate("abc", 0);
        assert_eq!((pos.line, pos.column), (1, 1));
    }

    #[test]
    fn test_error_messages() {
        let err = FormulaError::ArgumentCount {
            function: "WRAP".into(),
            expected: 1,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "Wrong number of arguments for WRAP: expected 1, got 2"
        );

        let err = FormulaError::CircularReference {
            path: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "Circular reference detected: A → B → A");
        assert!(err.is_fatal());
    }
}
