//! Parse errors for the interface dialect.

use thiserror::Error;

use crate::source::SourceLocation;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected token: expected {expected}, found '{found}'")]
    UnexpectedToken {
        expected: String,
        found: String,
        location: SourceLocation,
    },

    #[error("unexpected end of file: expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("expected an expression, found '{found}'")]
    ExpectedExpression {
        found: String,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            ParseError::UnexpectedToken { location, .. } => Some(*location),
            ParseError::UnexpectedEof { .. } => None,
            ParseError::ExpectedExpression { location, .. } => Some(*location),
        }
    }
}
