//! Recursive-descent parser for the interface dialect.
//!
//! Builds the typed AST consumed by the translation engine. The grammar is
//! the constrained subset the interface-description headers actually use:
//! namespaces, abstract classes with virtual methods, structs with plain
//! fields and nested unions/enums, enums, typedefs/type aliases, constant
//! variable definitions and the interface-identifier declaration macro.
//! Anything outside that subset (inline bodies, templates, operators) is
//! skipped with balanced-delimiter recovery, mirroring a front end that
//! parses everything while the walker only inspects the known kinds.

pub mod declarations;
pub mod error;
pub mod expressions;

use hashbrown::HashSet;
use indexmap::IndexMap;
use log::debug;

use crate::ast::{Ast, DeclKind, Node, NodeKind, NodeRef};
use crate::lexer::{Comment, Token, TokenKind};
use crate::pp::PreprocessedUnit;
use crate::source::{SourceLocation, SourceMap};

pub use error::ParseError;

/// The interface-identifier declaration macro of the dialect. Recognised by
/// name even when its defining header was not part of the translation unit
/// (the binder works on raw tokens either way).
pub const IID_DECLARATION_MACRO: &str = "DECLARE_CLASS_IID";

pub struct Parser<'a> {
    pub(crate) ast: Ast,
    pub(crate) pos: usize,
    pub(crate) scope: Vec<String>,
    pub(crate) registry: IndexMap<String, DeclKind>,
    pub(crate) function_macros: HashSet<String>,
    comments: Vec<Comment>,
    sources: &'a SourceMap,
}

impl<'a> Parser<'a> {
    pub fn new(unit: PreprocessedUnit, sources: &'a SourceMap) -> Self {
        let mut ast = Ast::new();
        ast.tokens = unit.tokens;
        Self {
            ast,
            pos: 0,
            scope: Vec::new(),
            registry: IndexMap::new(),
            function_macros: unit.function_macros,
            comments: unit.comments,
            sources,
        }
    }

    /// Parses the whole token stream into a translation unit.
    pub fn parse(mut self) -> Result<Ast, ParseError> {
        let start_loc = self
            .ast
            .tokens
            .first()
            .map(|t| t.span.start)
            .unwrap_or_default();
        let mut root = Node::new(NodeKind::TranslationUnit, start_loc);
        let mut children = Vec::new();
        while !self.at_end() {
            if let Some(decl) = declarations::parse_declaration(&mut self)? {
                children.push(decl);
            }
        }
        root.children = children;
        root.tokens = (0, self.ast.tokens.len() as u32);
        let root_ref = self.ast.push_node(root);
        self.ast.root = root_ref;
        Ok(self.ast)
    }

    // === token cursor ===

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.ast.tokens.len()
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.ast.tokens.get(self.pos)
    }

    pub(crate) fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    pub(crate) fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.ast.tokens.get(self.pos + n).map(|t| t.kind)
    }

    pub(crate) fn nth_text(&self, n: usize) -> Option<&str> {
        self.ast.tokens.get(self.pos + n).map(|t| t.text.as_str())
    }

    pub(crate) fn is(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Consumes the current token and returns its index.
    pub(crate) fn advance(&mut self) -> usize {
        let i = self.pos;
        self.pos += 1;
        i
    }

    pub(crate) fn accept(&mut self, kind: TokenKind) -> Option<usize> {
        if self.is(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<usize, ParseError> {
        if self.is(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("{:?}", kind)))
        }
    }

    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.text.clone(),
                location: token.span.start,
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_string(),
            },
        }
    }

    pub(crate) fn token(&self, i: usize) -> &Token {
        &self.ast.tokens[i]
    }

    pub(crate) fn token_loc(&self, i: usize) -> SourceLocation {
        self.ast.tokens[i].span.start
    }

    /// Finalizes a node whose extent started at token index `start`.
    pub(crate) fn finish_node(&mut self, mut node: Node, start: usize) -> NodeRef {
        let end = self.pos.max(start + 1).min(self.ast.tokens.len().max(start + 1));
        node.tokens = (start as u32, end as u32);
        if let (Some(first), Some(last)) = (
            self.ast.tokens.get(start),
            self.ast.tokens.get(end.saturating_sub(1)),
        ) {
            node.extent = crate::source::SourceSpan::new(first.span.start, last.span.end);
            node.location = first.span.start;
        }
        self.ast.push_node(node)
    }

    // === recovery ===

    /// Skips past the next semicolon, stepping over balanced braces,
    /// brackets and parentheses. Stops (without consuming) at a `}` that
    /// would close the enclosing body.
    pub(crate) fn skip_to_semicolon(&mut self) {
        let mut depth = 0usize;
        while let Some(kind) = self.peek_kind() {
            match kind {
                TokenKind::LeftBrace | TokenKind::LeftParen | TokenKind::LeftBracket => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RightBrace | TokenKind::RightParen | TokenKind::RightBracket => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.advance();
                    // A body-terminating brace may end the declaration.
                    if depth == 0 && kind == TokenKind::RightBrace {
                        self.accept(TokenKind::Semicolon);
                        return;
                    }
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skips a balanced `{ … }` block, assuming the cursor is on the `{`.
    pub(crate) fn skip_balanced_braces(&mut self) {
        let mut depth = 0usize;
        while let Some(kind) = self.peek_kind() {
            self.advance();
            match kind {
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    // === name resolution ===

    /// Registers a declaration under its qualified name. First write wins;
    /// duplicates are logged and ignored.
    pub(crate) fn register_decl(&mut self, name: &str, kind: DeclKind) {
        let qualified = self.qualify(name);
        if self.registry.contains_key(&qualified) {
            debug!("duplicate declaration of '{}' ignored", qualified);
            return;
        }
        self.registry.insert(qualified, kind);
    }

    pub(crate) fn qualify(&self, name: &str) -> String {
        if self.scope.is_empty() {
            name.to_string()
        } else {
            format!("{}::{}", self.scope.join("::"), name)
        }
    }

    /// Resolves a written type name against the enclosing scopes, innermost
    /// first. Returns the qualified name and declaring kind on a hit, or
    /// the name as written otherwise.
    pub(crate) fn resolve_type_name(&self, written: &str) -> (String, Option<DeclKind>) {
        if let Some(absolute) = written.strip_prefix("::") {
            let kind = self.registry.get(absolute).copied();
            return (absolute.to_string(), kind);
        }
        for depth in (0..=self.scope.len()).rev() {
            let candidate = if depth == 0 {
                written.to_string()
            } else {
                format!("{}::{}", self.scope[..depth].join("::"), written)
            };
            if let Some(kind) = self.registry.get(&candidate) {
                return (candidate, Some(*kind));
            }
        }
        (written.to_string(), None)
    }

    /// Resolves a written value name (variable or enumerator) to its
    /// defining node, innermost scope first.
    pub(crate) fn resolve_value_name(&self, written: &str) -> (String, Option<NodeRef>) {
        if let Some(absolute) = written.strip_prefix("::") {
            let def = self.ast.lookup_definition(absolute);
            return (absolute.to_string(), def);
        }
        for depth in (0..=self.scope.len()).rev() {
            let candidate = if depth == 0 {
                written.to_string()
            } else {
                format!("{}::{}", self.scope[..depth].join("::"), written)
            };
            if let Some(def) = self.ast.lookup_definition(&candidate) {
                return (candidate, Some(def));
            }
        }
        (written.to_string(), None)
    }

    /// Whether a written name resolves to a type declaration or spells a
    /// builtin type keyword. Used for cast detection.
    pub(crate) fn is_type_name(&self, written: &str) -> bool {
        self.resolve_type_name(written).1.is_some()
    }

    // === doc comments ===

    /// Finds the doc comment immediately preceding `location`: same file,
    /// doc style (`/**` or `///`), separated from the declaration only by
    /// whitespace.
    pub(crate) fn brief_comment_before(&self, location: SourceLocation) -> Option<String> {
        let candidate = self
            .comments
            .iter()
            .filter(|c| c.span.file() == location.file && c.span.end_offset() <= location.offset)
            .last()?;
        let text = candidate.text.trim();
        if !(text.starts_with("/**") || text.starts_with("///")) {
            return None;
        }
        let content = &self.sources.get(location.file).content;
        let gap = &content[candidate.span.end_offset() as usize..location.offset as usize];
        if !gap.chars().all(char::is_whitespace) || gap.matches('\n').count() > 1 {
            return None;
        }
        Some(clean_doc_comment(text))
    }
}

/// Strips comment markers and returns the first paragraph as one line.
fn clean_doc_comment(text: &str) -> String {
    let body = text
        .trim_start_matches("/**")
        .trim_start_matches("///")
        .trim_end_matches("*/");
    let mut lines = Vec::new();
    for raw in body.lines() {
        let line = raw.trim().trim_start_matches('*').trim_start_matches('/').trim();
        if line.is_empty() {
            if !lines.is_empty() {
                break;
            }
            continue;
        }
        lines.push(line.to_string());
    }
    lines.join(" ")
}
