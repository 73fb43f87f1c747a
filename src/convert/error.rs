//! Errors raised by the translation engine.

use thiserror::Error;

use crate::ast::NodeKind;
use crate::source::SourceLocation;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// The expression renderer met a node kind it has no rule for. The
    /// renderer's coverage is exactly the constant-expression subset the
    /// dialect uses; there is no fallback rendering.
    #[error("node kind {kind} is not supported in constant expressions")]
    UnsupportedNode {
        kind: NodeKind,
        location: SourceLocation,
    },
}

impl ConvertError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ConvertError::UnsupportedNode { location, .. } => *location,
        }
    }
}
