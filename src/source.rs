//! Source file registry and location tracking.

use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};

/// A unique identifier for a loaded header file.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct FileId(pub u32);

impl Display for FileId {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> std::fmt::Result {
        write!(fmt, "FileId({})", self.0)
    }
}

/// A single position inside a loaded file (byte offset).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct SourceLocation {
    pub file: FileId,
    pub offset: u32,
}

impl SourceLocation {
    pub fn new(file: FileId, offset: u32) -> Self {
        Self { file, offset }
    }
}

/// A byte range inside one file.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        debug_assert_eq!(start.file, end.file, "span across files not allowed");
        Self { start, end }
    }

    pub fn file(&self) -> FileId {
        self.start.file
    }

    pub fn start_offset(&self) -> u32 {
        self.start.offset
    }

    pub fn end_offset(&self) -> u32 {
        self.end.offset
    }
}

impl Debug for SourceSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SourceSpan(file={}, offset={}..{})",
            self.start.file.0, self.start.offset, self.end.offset
        )
    }
}

/// A loaded source file with precomputed line starts.
#[derive(Clone)]
pub struct SourceFile {
    pub id: FileId,
    pub path: PathBuf,
    pub content: String,
    line_starts: Vec<u32>,
}

impl SourceFile {
    pub fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in content.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self {
            id,
            path,
            content,
            line_starts,
        }
    }

    /// 1-based line number for a byte offset.
    pub fn lookup_line(&self, offset: u32) -> u32 {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(l) => l,
            Err(next) => next.saturating_sub(1),
        };
        line as u32 + 1
    }
}

/// Central registry for all files loaded during one run.
#[derive(Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: PathBuf, content: String) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push(SourceFile::new(id, path, content));
        id
    }

    pub fn get(&self, id: FileId) -> &SourceFile {
        &self.files[id.0 as usize]
    }

    pub fn path(&self, id: FileId) -> &Path {
        &self.files[id.0 as usize].path
    }

    pub fn lookup_line(&self, loc: SourceLocation) -> u32 {
        self.get(loc.file).lookup_line(loc.offset)
    }
}

/// Normalises path nomenclature so locations compare and print uniformly.
pub fn normalise_link(source: &str) -> String {
    source.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_lookup() {
        let file = SourceFile::new(FileId(0), PathBuf::from("a.h"), "one\ntwo\nthree".into());
        assert_eq!(file.lookup_line(0), 1);
        assert_eq!(file.lookup_line(3), 1);
        assert_eq!(file.lookup_line(4), 2);
        assert_eq!(file.lookup_line(8), 3);
    }

    #[test]
    fn normalise_backslashes() {
        assert_eq!(normalise_link("a\\b\\c.h"), "a/b/c.h");
    }
}
