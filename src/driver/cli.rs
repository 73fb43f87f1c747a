//! CLI parsing and configuration.
//!
//! Command-line argument parsing with clap, converted into the
//! configuration structure the converter driver runs from. The input
//! header is optional at the clap level so the driver itself can report
//! the missing-filename usage error and exit with code 1.

use clap::Parser as CliParser;
use std::path::{Path, PathBuf};

/// CLI interface using clap
#[derive(CliParser, Debug)]
#[clap(
    name = "interface-convert",
    about = "Translates C++ COM-style interface headers into C headers with explicit v-tables"
)]
pub struct Cli {
    /// Input C++ interface header
    #[clap(value_parser)]
    pub header: Option<PathBuf>,

    /// Project root housing the transitively included headers
    /// (defaults to two directory levels above the input header)
    #[clap(short = 'r', long = "project-root", value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Enable verbose progress output
    #[clap(short, long)]
    pub verbose: bool,
}

/// Configuration for one conversion run.
#[derive(Debug)]
pub struct ConvertConfig {
    pub header: PathBuf,
    pub project_root: PathBuf,
    pub verbose: bool,
}

impl Cli {
    /// Convert CLI arguments into a run configuration. None when the
    /// required header argument is missing.
    pub fn into_config(self) -> Option<ConvertConfig> {
        let header = self.header?;
        let project_root = self
            .project_root
            .unwrap_or_else(|| derive_project_root(&header));
        Some(ConvertConfig {
            header,
            project_root,
            verbose: self.verbose,
        })
    }
}

/// The implicit project root is two directory levels above the header,
/// matching the layout the interface headers ship in.
fn derive_project_root(header: &Path) -> PathBuf {
    header
        .ancestors()
        .nth(3)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_root_is_two_levels_up() {
        let root = derive_project_root(Path::new("sdk/pluginterfaces/vst/header.h"));
        assert_eq!(root, PathBuf::from("sdk"));
    }

    #[test]
    fn missing_header_yields_no_config() {
        let cli = Cli {
            header: None,
            project_root: None,
            verbose: false,
        };
        assert!(cli.into_config().is_none());
    }
}
