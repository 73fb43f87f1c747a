//! Shared helpers for conversion tests.

use std::path::Path;

use crate::driver::convert_buffer;
use crate::symbols::SymbolTables;

/// Runs the whole pipeline on an in-memory header. The buffer is labelled
/// as `pluginterfaces/test_header.h` under the `pluginterfaces` project
/// root so location comments come out deterministic.
pub fn convert_source(source: &str) -> (SymbolTables, String) {
    convert_buffer(
        Path::new("pluginterfaces/test_header.h"),
        source,
        Path::new("pluginterfaces"),
    )
    .expect("conversion should succeed")
}

/// Extracts one section's content from the emitted header: everything
/// between the section banner and the next section banner (trimmed).
pub fn section(header: &str, title: &str) -> String {
    let marker = format!("\n----- {} ", title);
    let start = header.find(&marker).unwrap_or_else(|| panic!("section '{}' missing", title));
    let after = header[start..]
        .find("*/\n")
        .map(|i| start + i + 3)
        .expect("section banner must close");
    let rest = &header[after..];
    match rest.find("\n----- ") {
        Some(next) => {
            let cut = &rest[..next];
            // Drop the opening rule line of the next banner.
            let cut = match cut.rfind("/*--") {
                Some(i) => &cut[..i],
                None => cut,
            };
            cut.trim().to_string()
        }
        None => rest.trim().to_string(),
    }
}

/// Removes per-entity source-location banners from a section body.
pub fn without_location_banners(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with("/*--") && !line.starts_with("Source: "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
