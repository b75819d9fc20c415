//! Error types for the analysis engine.

use thiserror::Error;

/// A source unit that could not be parsed into a syntax tree.
///
/// Line and column are 1-indexed and point at the first offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (line {line}, column {column})")]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// Errors raised while analyzing a single source unit.
///
/// These never cross the batch boundary: the engine turns them into an
/// error record for the failing unit.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("parser unavailable: {0}")]
    Parser(String),
}

impl AnalysisError {
    /// The syntax error details, if this is a syntax error.
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            AnalysisError::Syntax(e) => Some(e),
            AnalysisError::Parser(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = AnalysisError::from(SyntaxError {
            message: "invalid syntax".to_string(),
            line: 3,
            column: 7,
        });
        assert_eq!(
            err.to_string(),
            "syntax error: invalid syntax (line 3, column 7)"
        );
        assert_eq!(err.as_syntax().map(|e| e.line), Some(3));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_parser_error_has_no_location() {
        let err = AnalysisError::Parser("incompatible grammar".to_string());
        assert!(err.as_syntax().is_none());
        assert!(err.to_string().contains("incompatible grammar"));
    }
}
