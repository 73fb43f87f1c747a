//! The conversion driver: CLI surface, pipeline orchestration and the
//! printed run summary.

pub mod cli;
pub mod converter;
pub mod output;

pub use cli::{Cli, ConvertConfig};
pub use converter::{convert_buffer, Converter, OUTPUT_FILE};
