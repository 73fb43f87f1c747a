//! Tokenizer for the C++ interface-description dialect.
//!
//! Tokens keep their spelling and byte extent: the expression renderer
//! re-derives binary operators by scanning raw tokens past the left
//! operand's extent, so extents must survive all the way to emission.

use thiserror::Error;

use crate::source::{FileId, SourceLocation, SourceSpan};

/// Token kinds for the interface dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // === LITERALS ===
    Number,
    StringLit,
    CharLit,

    // === IDENTIFIERS ===
    Identifier,

    // === KEYWORDS ===
    Namespace,
    Class,
    Struct,
    Union,
    Enum,
    Typedef,
    Using,
    Public,
    Protected,
    Private,
    Virtual,
    Static,
    Const,
    // Builtin type specifiers
    Unsigned,
    Signed,
    Long,
    Short,
    Int,
    Char,
    Void,
    Bool,
    Float,
    Double,

    // === OPERATORS ===
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Not,
    LeftShift,
    RightShift,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    EqualEqual,
    NotEqual,
    Assign,
    AmpAmp,
    PipePipe,
    ColonColon,
    Colon,

    // === PUNCTUATION ===
    Comma,
    Semicolon,
    Dot,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,

    Unknown,
}

impl TokenKind {
    /// Builtin type specifier keywords that may combine (`unsigned long`).
    pub fn is_builtin_type(&self) -> bool {
        matches!(
            self,
            TokenKind::Unsigned
                | TokenKind::Signed
                | TokenKind::Long
                | TokenKind::Short
                | TokenKind::Int
                | TokenKind::Char
                | TokenKind::Void
                | TokenKind::Bool
                | TokenKind::Float
                | TokenKind::Double
        )
    }

    /// Access specifier keywords inside class bodies.
    pub fn is_access_specifier(&self) -> bool {
        matches!(self, TokenKind::Public | TokenKind::Protected | TokenKind::Private)
    }
}

/// A single lexed token with spelling and extent.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: SourceSpan,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// A comment stripped out before tokenization, kept for doc-comment lookup.
#[derive(Debug, Clone)]
pub struct Comment {
    pub span: SourceSpan,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum LexError {
    #[error("unterminated string literal at offset {offset}")]
    UnterminatedString { offset: u32 },
    #[error("unterminated block comment at offset {offset}")]
    UnterminatedComment { offset: u32 },
}

fn keyword_kind(text: &str) -> Option<TokenKind> {
    Some(match text {
        "namespace" => TokenKind::Namespace,
        "class" => TokenKind::Class,
        "struct" => TokenKind::Struct,
        "union" => TokenKind::Union,
        "enum" => TokenKind::Enum,
        "typedef" => TokenKind::Typedef,
        "using" => TokenKind::Using,
        "public" => TokenKind::Public,
        "protected" => TokenKind::Protected,
        "private" => TokenKind::Private,
        "virtual" => TokenKind::Virtual,
        "static" => TokenKind::Static,
        "const" => TokenKind::Const,
        "unsigned" => TokenKind::Unsigned,
        "signed" => TokenKind::Signed,
        "long" => TokenKind::Long,
        "short" => TokenKind::Short,
        "int" => TokenKind::Int,
        "char" => TokenKind::Char,
        "void" => TokenKind::Void,
        "bool" => TokenKind::Bool,
        "float" => TokenKind::Float,
        "double" => TokenKind::Double,
        _ => return None,
    })
}

/// Blanks out comments in place (preserving byte offsets) and returns the
/// collected comments. Newlines inside block comments survive so that line
/// numbers and directive detection stay correct.
pub fn strip_comments(file: FileId, content: &str) -> Result<(String, Vec<Comment>), LexError> {
    let bytes = content.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut comments = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'/' {
            let start = i;
            while i < bytes.len() && bytes[i] != b'\n' {
                out.push(b' ');
                i += 1;
            }
            comments.push(Comment {
                span: span_of(file, start, i),
                text: content[start..i].to_string(),
            });
        } else if b == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'*' {
            let start = i;
            i += 2;
            out.push(b' ');
            out.push(b' ');
            loop {
                if i + 1 >= bytes.len() {
                    return Err(LexError::UnterminatedComment { offset: start as u32 });
                }
                if bytes[i] == b'*' && bytes[i + 1] == b'/' {
                    out.push(b' ');
                    out.push(b' ');
                    i += 2;
                    break;
                }
                out.push(if bytes[i] == b'\n' { b'\n' } else { b' ' });
                i += 1;
            }
            comments.push(Comment {
                span: span_of(file, start, i),
                text: content[start..i].to_string(),
            });
        } else if b == b'"' {
            // Copy string literals verbatim so slashes inside them stay put.
            out.push(b);
            i += 1;
            while i < bytes.len() && bytes[i] != b'"' && bytes[i] != b'\n' {
                if bytes[i] == b'\\' && i + 1 < bytes.len() {
                    out.push(bytes[i]);
                    i += 1;
                }
                out.push(bytes[i]);
                i += 1;
            }
            if i < bytes.len() {
                out.push(bytes[i]);
                i += 1;
            }
        } else {
            out.push(b);
            i += 1;
        }
    }
    let blanked = String::from_utf8(out).expect("comment blanking preserves utf-8");
    Ok((blanked, comments))
}

fn span_of(file: FileId, start: usize, end: usize) -> SourceSpan {
    SourceSpan::new(
        SourceLocation::new(file, start as u32),
        SourceLocation::new(file, end as u32),
    )
}

/// Tokenizes one comment-stripped region of a file. `base` is the byte
/// offset of `text` within the file.
pub fn tokenize(file: FileId, text: &str, base: u32) -> Result<Vec<Token>, LexError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        let kind = if b.is_ascii_alphabetic() || b == b'_' {
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            keyword_kind(&text[start..i]).unwrap_or(TokenKind::Identifier)
        } else if b.is_ascii_digit() {
            // Integer literals: decimal or 0x hex, with optional L/U suffixes.
            i += 1;
            if b == b'0' && i < bytes.len() && (bytes[i] == b'x' || bytes[i] == b'X') {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_hexdigit() {
                    i += 1;
                }
            } else {
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
            while i < bytes.len() && matches!(bytes[i], b'l' | b'L' | b'u' | b'U') {
                i += 1;
            }
            TokenKind::Number
        } else if b == b'"' {
            i += 1;
            loop {
                if i >= bytes.len() || bytes[i] == b'\n' {
                    return Err(LexError::UnterminatedString {
                        offset: base + start as u32,
                    });
                }
                if bytes[i] == b'\\' {
                    i += 2;
                    continue;
                }
                if bytes[i] == b'"' {
                    i += 1;
                    break;
                }
                i += 1;
            }
            TokenKind::StringLit
        } else if b == b'\'' {
            i += 1;
            while i < bytes.len() && bytes[i] != b'\'' {
                if bytes[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            i = (i + 1).min(bytes.len());
            TokenKind::CharLit
        } else {
            let pair = if i + 1 < bytes.len() {
                match (b, bytes[i + 1]) {
                    (b'<', b'<') => Some(TokenKind::LeftShift),
                    (b'>', b'>') => Some(TokenKind::RightShift),
                    (b'<', b'=') => Some(TokenKind::LessEqual),
                    (b'>', b'=') => Some(TokenKind::GreaterEqual),
                    (b'=', b'=') => Some(TokenKind::EqualEqual),
                    (b'!', b'=') => Some(TokenKind::NotEqual),
                    (b'&', b'&') => Some(TokenKind::AmpAmp),
                    (b'|', b'|') => Some(TokenKind::PipePipe),
                    (b':', b':') => Some(TokenKind::ColonColon),
                    _ => None,
                }
            } else {
                None
            };
            let (kind, len) = match pair {
                Some(kind) => (kind, 2),
                None => (
                    match b {
                        b'+' => TokenKind::Plus,
                        b'-' => TokenKind::Minus,
                        b'*' => TokenKind::Star,
                        b'/' => TokenKind::Slash,
                        b'%' => TokenKind::Percent,
                        b'&' => TokenKind::Amp,
                        b'|' => TokenKind::Pipe,
                        b'^' => TokenKind::Caret,
                        b'~' => TokenKind::Tilde,
                        b'!' => TokenKind::Not,
                        b'<' => TokenKind::Less,
                        b'>' => TokenKind::Greater,
                        b'=' => TokenKind::Assign,
                        b':' => TokenKind::Colon,
                        b',' => TokenKind::Comma,
                        b';' => TokenKind::Semicolon,
                        b'.' => TokenKind::Dot,
                        b'(' => TokenKind::LeftParen,
                        b')' => TokenKind::RightParen,
                        b'[' => TokenKind::LeftBracket,
                        b']' => TokenKind::RightBracket,
                        b'{' => TokenKind::LeftBrace,
                        b'}' => TokenKind::RightBrace,
                        _ => TokenKind::Unknown,
                    },
                    1,
                ),
            };
            i += len;
            kind
        };
        tokens.push(Token {
            kind,
            text: text[start..i].to_string(),
            span: span_of(file, base as usize + start, base as usize + i),
        });
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(FileId(0), source, 0).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn shift_and_pipe_operators() {
        assert_eq!(
            kinds("1 << 0 | kFlag"),
            vec![
                TokenKind::Number,
                TokenKind::LeftShift,
                TokenKind::Number,
                TokenKind::Pipe,
                TokenKind::Identifier
            ]
        );
    }

    #[test]
    fn hex_literal_with_suffix() {
        let tokens = tokenize(FileId(0), "0x80004002L", 0).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].text, "0x80004002L");
    }

    #[test]
    fn scope_resolution_token() {
        assert_eq!(
            kinds("Steinberg::Vst::Speaker"),
            vec![
                TokenKind::Identifier,
                TokenKind::ColonColon,
                TokenKind::Identifier,
                TokenKind::ColonColon,
                TokenKind::Identifier
            ]
        );
    }

    #[test]
    fn strip_comments_preserves_offsets() {
        let source = "int a; /* gone */ int b; // tail";
        let (blanked, comments) = strip_comments(FileId(0), source).unwrap();
        assert_eq!(blanked.len(), source.len());
        assert_eq!(comments.len(), 2);
        assert!(blanked.contains("int a;"));
        assert!(!blanked.contains("gone"));
        let offset = blanked.find("int b;").unwrap();
        assert_eq!(source.find("int b;").unwrap(), offset);
    }

    #[test]
    fn keywords_vs_identifiers() {
        assert_eq!(
            kinds("virtual tresult PLUGIN_API foo"),
            vec![
                TokenKind::Virtual,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier
            ]
        );
    }
}
