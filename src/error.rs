//! Crate-level error aggregation.

use thiserror::Error;

use crate::convert::ConvertError;
use crate::parser::ParseError;
use crate::pp::PPError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Preprocessor(#[from] PPError),
    #[error("{0}")]
    Parser(#[from] ParseError),
    #[error("{0}")]
    Convert(#[from] ConvertError),
    #[error("cannot write '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}
