//! Minimal preprocessing for header translation units.
//!
//! The translation engine only needs a faithful token stream of the
//! project's own headers: `#include "…"` directives are expanded for files
//! under the project root (system includes and out-of-root files are
//! skipped), every file is visited at most once, and conditional blocks are
//! resolved against the define set built up while scanning. Macro bodies
//! are never expanded; function-like macro names are recorded so the parser
//! can recognise declaration-scope macro invocations by name.

use std::path::{Path, PathBuf};

use hashbrown::HashSet;
use log::debug;
use thiserror::Error;

use crate::lexer::{self, Comment, LexError, Token};
use crate::source::{normalise_link, SourceMap};

#[derive(Debug, Error)]
pub enum PPError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("{0}")]
    Lex(#[from] LexError),
    #[error("unbalanced conditional directive in '{path}'")]
    UnbalancedConditional { path: String },
}

/// The fully preprocessed token stream of one translation unit, in include
/// order, together with every stripped comment and the recorded
/// function-like macro names.
pub struct PreprocessedUnit {
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
    pub function_macros: HashSet<String>,
}

/// Expands includes and resolves conditionals for one root header.
pub struct Preprocessor<'a> {
    sources: &'a mut SourceMap,
    project_root: String,
    visited: HashSet<String>,
    defines: HashSet<String>,
    function_macros: HashSet<String>,
    tokens: Vec<Token>,
    comments: Vec<Comment>,
}

struct Conditional {
    parent_active: bool,
    branch_taken: bool,
    active: bool,
}

impl<'a> Preprocessor<'a> {
    pub fn new(sources: &'a mut SourceMap, project_root: &Path) -> Self {
        Self {
            sources,
            project_root: normalise_link(&project_root.to_string_lossy()),
            visited: HashSet::new(),
            defines: HashSet::new(),
            function_macros: HashSet::new(),
            tokens: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Processes the root header from disk, expanding includes.
    pub fn process_root_file(mut self, path: &Path) -> Result<PreprocessedUnit, PPError> {
        self.process_file(path)?;
        Ok(self.finish())
    }

    /// Processes an in-memory buffer as if it were the root header.
    /// Includes inside the buffer resolve against the project root.
    pub fn process_root_buffer(
        mut self,
        path: &Path,
        content: &str,
    ) -> Result<PreprocessedUnit, PPError> {
        let link = normalise_link(&path.to_string_lossy());
        self.visited.insert(link);
        self.process_content(path.to_path_buf(), content)?;
        Ok(self.finish())
    }

    fn finish(self) -> PreprocessedUnit {
        PreprocessedUnit {
            tokens: self.tokens,
            comments: self.comments,
            function_macros: self.function_macros,
        }
    }

    fn process_file(&mut self, path: &Path) -> Result<(), PPError> {
        let link = normalise_link(&path.to_string_lossy());
        if !self.visited.insert(link.clone()) {
            return Ok(());
        }
        let content = std::fs::read_to_string(path).map_err(|source| PPError::Io {
            path: link.clone(),
            source,
        })?;
        debug!("preprocessing '{}'", link);
        self.process_content(path.to_path_buf(), content.as_str())
    }

    fn process_content(&mut self, path: PathBuf, content: &str) -> Result<(), PPError> {
        let file = self.sources.add_file(path.clone(), content.to_string());
        let (blanked, mut comments) = lexer::strip_comments(file, content)?;
        self.comments.append(&mut comments);

        let mut conditionals: Vec<Conditional> = Vec::new();
        let mut offset = 0usize;
        let mut lines = blanked.split_inclusive('\n');
        while let Some(first) = lines.next() {
            let line_start = offset;
            offset += first.len();
            let stripped = first.trim_end_matches(['\n', '\r']);
            let active = conditionals.iter().all(|c| c.active);
            if let Some(directive) = stripped.trim_start().strip_prefix('#') {
                // Splice backslash-continued directive lines.
                let mut logical = directive.trim_start().to_string();
                while logical.ends_with('\\') {
                    logical.pop();
                    match lines.next() {
                        Some(next) => {
                            offset += next.len();
                            logical.push_str(next.trim_end_matches(['\n', '\r']));
                        }
                        None => break,
                    }
                }
                self.handle_directive(&logical, active, &mut conditionals, &path)?;
            } else if active && !stripped.trim().is_empty() {
                let region = &blanked[line_start..line_start + stripped.len()];
                let mut line_tokens = lexer::tokenize(file, region, line_start as u32)?;
                self.tokens.append(&mut line_tokens);
            }
        }
        if !conditionals.is_empty() {
            return Err(PPError::UnbalancedConditional {
                path: normalise_link(&path.to_string_lossy()),
            });
        }
        Ok(())
    }

    fn handle_directive(
        &mut self,
        directive: &str,
        active: bool,
        conditionals: &mut Vec<Conditional>,
        current_path: &Path,
    ) -> Result<(), PPError> {
        let (name, rest) = split_word(directive);
        match name {
            "include" if active => self.handle_include(rest.trim(), current_path)?,
            "define" if active => {
                let (macro_name, tail) = split_macro_name(rest.trim_start());
                if !macro_name.is_empty() {
                    self.defines.insert(macro_name.to_string());
                    if tail.starts_with('(') {
                        self.function_macros.insert(macro_name.to_string());
                    }
                }
            }
            "undef" if active => {
                let (macro_name, _) = split_word(rest.trim_start());
                self.defines.remove(macro_name);
            }
            "ifdef" => {
                let (macro_name, _) = split_word(rest.trim_start());
                let cond = self.defines.contains(macro_name);
                push_conditional(conditionals, active, cond);
            }
            "ifndef" => {
                let (macro_name, _) = split_word(rest.trim_start());
                let cond = !self.defines.contains(macro_name);
                push_conditional(conditionals, active, cond);
            }
            "if" => {
                let cond = self.eval_condition(rest.trim());
                push_conditional(conditionals, active, cond);
            }
            "elif" => {
                let cond = self.eval_condition(rest.trim());
                match conditionals.last_mut() {
                    Some(c) => {
                        c.active = c.parent_active && !c.branch_taken && cond;
                        c.branch_taken |= c.active;
                    }
                    None => {
                        return Err(PPError::UnbalancedConditional {
                            path: normalise_link(&current_path.to_string_lossy()),
                        })
                    }
                }
            }
            "else" => match conditionals.last_mut() {
                Some(c) => {
                    c.active = c.parent_active && !c.branch_taken;
                    c.branch_taken = true;
                }
                None => {
                    return Err(PPError::UnbalancedConditional {
                        path: normalise_link(&current_path.to_string_lossy()),
                    })
                }
            },
            "endif" => {
                if conditionals.pop().is_none() {
                    return Err(PPError::UnbalancedConditional {
                        path: normalise_link(&current_path.to_string_lossy()),
                    });
                }
            }
            // pragma, error, warning, line and anything else carry no
            // declarations.
            _ => {}
        }
        Ok(())
    }

    fn handle_include(&mut self, spec: &str, current_path: &Path) -> Result<(), PPError> {
        // Only quoted project-local includes participate; <system> headers
        // never contain dialect declarations.
        let Some(name) = spec
            .strip_prefix('"')
            .and_then(|s| s.split('"').next())
        else {
            return Ok(());
        };
        let candidates = [
            current_path.parent().map(|dir| dir.join(name)),
            Some(Path::new(&self.project_root).join(name)),
        ];
        for candidate in candidates.into_iter().flatten() {
            let link = normalise_link(&candidate.to_string_lossy());
            if !link.starts_with(&self.project_root) {
                continue;
            }
            if candidate.is_file() {
                return self.process_file(&candidate);
            }
        }
        debug!("include '{}' not found under project root, skipped", name);
        Ok(())
    }

    /// `#if` conditions are evaluated against the scanned define set only:
    /// `defined(X)` forms consult it, bare names count as undefined (zero),
    /// and a literal `1` is true. That is exactly the environment the
    /// original headers are parsed under.
    fn eval_condition(&self, expr: &str) -> bool {
        let expr = expr.trim();
        if expr == "1" {
            return true;
        }
        if expr == "0" {
            return false;
        }
        if let Some(rest) = expr.strip_prefix("defined") {
            let name = rest.trim_start().trim_start_matches('(');
            let name = name.trim_end().trim_end_matches(')').trim();
            let (name, _) = split_word(name);
            return self.defines.contains(name);
        }
        let (word, _) = split_word(expr);
        self.defines.contains(word)
    }
}

fn push_conditional(conditionals: &mut Vec<Conditional>, parent_active: bool, cond: bool) {
    let active = parent_active && cond;
    conditionals.push(Conditional {
        parent_active,
        branch_taken: active,
        active,
    });
}

fn split_word(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(text.len());
    (&text[..end], &text[end..])
}

fn split_macro_name(text: &str) -> (&str, &str) {
    split_word(text)
}
