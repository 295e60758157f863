//! Parse errors and the writer trait.

use crate::ast::Expr;

/// Error produced when an expression source string cannot be parsed.
///
/// Every variant except [`ParseError::Empty`] records the byte offset into
/// the source where the problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,

    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("unterminated template string starting at offset {offset}")]
    UnterminatedTemplate { offset: usize },

    #[error("unterminated arrow function body starting at offset {offset}")]
    UnterminatedBlock { offset: usize },

    #[error("expected {expected} {context} at offset {offset}")]
    Expected {
        expected: &'static str,
        context: &'static str,
        offset: usize,
    },

    #[error("arrow function parameters must be identifiers (offset {offset})")]
    InvalidArrowParam { offset: usize },

    #[error("invalid number literal at offset {offset}")]
    InvalidNumber { offset: usize },

    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("unexpected end of expression at offset {offset}")]
    UnexpectedEnd { offset: usize },

    #[error("unexpected trailing input at offset {offset}")]
    TrailingInput { offset: usize },

    #[error("expression nested too deeply at offset {offset}")]
    TooDeep { offset: usize },
}

impl ParseError {
    /// Byte offset where the error was detected, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::Empty => None,
            ParseError::UnterminatedString { offset }
            | ParseError::UnterminatedTemplate { offset }
            | ParseError::UnterminatedBlock { offset }
            | ParseError::Expected { offset, .. }
            | ParseError::InvalidArrowParam { offset }
            | ParseError::InvalidNumber { offset }
            | ParseError::UnexpectedChar { offset, .. }
            | ParseError::UnexpectedEnd { offset }
            | ParseError::TrailingInput { offset }
            | ParseError::TooDeep { offset } => Some(*offset),
        }
    }
}

/// A writer emits an expression tree as source code in one target language.
///
/// Writers are stateless and never fail: constructs a target cannot express
/// are emitted as an inline marker comment.
pub trait Writer: Send + Sync {
    /// Language identifier (e.g., "lua", "javascript").
    fn language(&self) -> &'static str;

    /// File extension for output (e.g., "lua").
    fn extension(&self) -> &'static str;

    /// Emit the expression as source code.
    fn write(&self, expr: &Expr) -> String;
}
