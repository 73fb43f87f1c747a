use clap::Parser as ClapParser;
use std::process::exit;

use interface_convert::driver::{Cli, Converter};

/// The main entry point for the application.
fn main() {
    if !run() {
        exit(1);
    }
}

/// Parses command-line arguments and runs the converter. Returns false on
/// any failure so `main` can exit nonzero.
fn run() -> bool {
    let cli = Cli::parse();
    let Some(config) = cli.into_config() else {
        eprintln!("No filename was specified!");
        return false;
    };
    let mut converter = Converter::new(config);
    match converter.run_and_write() {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Error: {}", e);
            false
        }
    }
}
