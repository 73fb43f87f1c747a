//! Constant-expression parsing (binding-power climbing).
//!
//! Covers exactly the expression grammar the dialect uses in enumerator
//! values, array bounds and constant initializers: binary and unary
//! operators, parentheses, declaration references, the three cast forms and
//! integer/string literals.

use crate::ast::{Node, NodeKind, NodeRef};
use crate::lexer::TokenKind;
use crate::source::SourceSpan;

use super::{ParseError, Parser};

/// Left binding powers, C precedence. Only operators the dialect uses in
/// constant expressions appear here.
fn binding_power(kind: TokenKind) -> Option<u8> {
    Some(match kind {
        TokenKind::PipePipe => 1,
        TokenKind::AmpAmp => 2,
        TokenKind::Pipe => 3,
        TokenKind::Caret => 4,
        TokenKind::Amp => 5,
        TokenKind::EqualEqual | TokenKind::NotEqual => 6,
        TokenKind::Less
        | TokenKind::Greater
        | TokenKind::LessEqual
        | TokenKind::GreaterEqual => 7,
        TokenKind::LeftShift | TokenKind::RightShift => 8,
        TokenKind::Plus | TokenKind::Minus => 9,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 10,
        _ => return None,
    })
}

/// Parses a constant expression with the given minimum binding power.
pub(crate) fn parse_expression(parser: &mut Parser, min_bp: u8) -> Result<NodeRef, ParseError> {
    let mut lhs = parse_unary(parser)?;
    loop {
        let Some(kind) = parser.peek_kind() else { break };
        let Some(bp) = binding_power(kind) else { break };
        if bp < min_bp {
            break;
        }
        // The operator token is not stored on the node: the renderer
        // re-derives it by scanning the raw tokens past the left operand.
        parser.advance();
        let rhs = parse_expression(parser, bp + 1)?;
        lhs = combine(parser, NodeKind::BinaryOperator, vec![lhs, rhs]);
    }
    Ok(lhs)
}

fn parse_unary(parser: &mut Parser) -> Result<NodeRef, ParseError> {
    match parser.peek_kind() {
        Some(TokenKind::Minus) | Some(TokenKind::Plus) | Some(TokenKind::Tilde)
        | Some(TokenKind::Not) => {
            let start = parser.advance();
            let operand = parse_unary(parser)?;
            let loc = parser.token_loc(start);
            let mut node = Node::new(NodeKind::UnaryOperator, loc);
            node.children = vec![operand];
            Ok(parser.finish_node(node, start))
        }
        Some(TokenKind::LeftParen) => {
            if let Some(type_end) = scan_cast_type(parser) {
                parse_cstyle_cast(parser, type_end)
            } else {
                let start = parser.advance();
                let inner = parse_expression(parser, 0)?;
                parser.expect(TokenKind::RightParen)?;
                let loc = parser.token_loc(start);
                let mut node = Node::new(NodeKind::ParenExpr, loc);
                node.children = vec![inner];
                Ok(parser.finish_node(node, start))
            }
        }
        Some(TokenKind::Number) | Some(TokenKind::CharLit) => {
            let start = parser.advance();
            let loc = parser.token_loc(start);
            let mut node = Node::new(NodeKind::IntegerLiteral, loc);
            node.spelling = parser.token(start).text.clone();
            Ok(parser.finish_node(node, start))
        }
        Some(TokenKind::StringLit) => {
            let start = parser.advance();
            let loc = parser.token_loc(start);
            let mut node = Node::new(NodeKind::StringLiteral, loc);
            node.spelling = parser.token(start).text.clone();
            Ok(parser.finish_node(node, start))
        }
        Some(TokenKind::Identifier) if parser.nth_text(0) == Some("static_cast") => {
            parse_static_cast(parser)
        }
        Some(TokenKind::Identifier) | Some(TokenKind::ColonColon) => parse_reference(parser),
        Some(kind) if kind.is_builtin_type() => parse_reference(parser),
        _ => Err(match parser.peek() {
            Some(token) => ParseError::ExpectedExpression {
                found: token.text.clone(),
                location: token.span.start,
            },
            None => ParseError::UnexpectedEof {
                expected: "expression".to_string(),
            },
        }),
    }
}

/// A qualified name, or a functional cast when the name spells a type and a
/// parenthesized operand follows.
fn parse_reference(parser: &mut Parser) -> Result<NodeRef, ParseError> {
    let start = parser.pos;
    let written = consume_qualified_name(parser)
        .ok_or_else(|| parser.unexpected("qualified name"))?;
    let name_end = parser.pos;

    if parser.is(TokenKind::LeftParen)
        && (parser.is_type_name(&written) || is_builtin_spelling(&written))
    {
        let type_ref = make_type_ref(parser, &written, start, name_end);
        parser.expect(TokenKind::LeftParen)?;
        let operand = parse_expression(parser, 0)?;
        parser.expect(TokenKind::RightParen)?;
        let loc = parser.token_loc(start);
        let mut node = Node::new(NodeKind::FunctionalCastExpr, loc);
        node.children = vec![type_ref, operand];
        return Ok(parser.finish_node(node, start));
    }

    let (qualified, definition) = parser.resolve_value_name(&written);
    let loc = parser.token_loc(start);
    let mut node = Node::new(NodeKind::DeclRefExpr, loc);
    node.spelling = written
        .rsplit("::")
        .next()
        .unwrap_or(written.as_str())
        .to_string();
    node.qualified = match definition {
        Some(def) => parser.ast.node(def).qualified_name(),
        None => qualified,
    };
    node.definition = definition;
    Ok(parser.finish_node(node, start))
}

fn parse_cstyle_cast(parser: &mut Parser, type_end: usize) -> Result<NodeRef, ParseError> {
    let start = parser.expect(TokenKind::LeftParen)?;
    let type_start = parser.pos;
    let written = collect_written_type(parser, type_end);
    parser.pos = type_end;
    let type_ref = make_type_ref(parser, &written, type_start, type_end);
    parser.expect(TokenKind::RightParen)?;
    let operand = parse_unary(parser)?;
    let loc = parser.token_loc(start);
    let mut node = Node::new(NodeKind::CStyleCastExpr, loc);
    node.children = vec![type_ref, operand];
    Ok(parser.finish_node(node, start))
}

/// Rebuilds the written type text from the tokens between the cursor and
/// `end`: builtin keyword runs join with spaces, qualified names concatenate.
fn collect_written_type(parser: &Parser, end: usize) -> String {
    let tokens = &parser.ast.tokens[parser.pos..end];
    if tokens
        .first()
        .map(|t| t.kind.is_builtin_type())
        .unwrap_or(false)
    {
        tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

fn parse_static_cast(parser: &mut Parser) -> Result<NodeRef, ParseError> {
    let start = parser.advance(); // static_cast
    parser.expect(TokenKind::Less)?;
    let type_start = parser.pos;
    let written = consume_qualified_name(parser)
        .ok_or_else(|| parser.unexpected("type name"))?;
    let type_end = parser.pos;
    let type_ref = make_type_ref(parser, &written, type_start, type_end);
    parser.expect(TokenKind::Greater)?;
    parser.expect(TokenKind::LeftParen)?;
    let operand = parse_expression(parser, 0)?;
    parser.expect(TokenKind::RightParen)?;
    let loc = parser.token_loc(start);
    let mut node = Node::new(NodeKind::StaticCastExpr, loc);
    node.children = vec![type_ref, operand];
    Ok(parser.finish_node(node, start))
}

fn make_type_ref(parser: &mut Parser, written: &str, start: usize, end: usize) -> NodeRef {
    let (qualified, _) = parser.resolve_type_name(written);
    let loc = parser.token_loc(start.min(parser.ast.tokens.len() - 1));
    let mut node = Node::new(NodeKind::TypeRef, loc);
    node.spelling = qualified.clone();
    node.qualified = qualified;
    node.tokens = (start as u32, end as u32);
    if let (Some(first), Some(last)) = (
        parser.ast.tokens.get(start),
        parser.ast.tokens.get(end.saturating_sub(1)),
    ) {
        node.extent = SourceSpan::new(first.span.start, last.span.end);
        node.location = first.span.start;
    }
    parser.ast.push_node(node)
}

fn combine(parser: &mut Parser, kind: NodeKind, children: Vec<NodeRef>) -> NodeRef {
    let first = children.first().copied().expect("combine needs children");
    let last = children.last().copied().expect("combine needs children");
    let (start_tok, _) = parser.ast.node(first).tokens;
    let (_, end_tok) = parser.ast.node(last).tokens;
    let extent = SourceSpan::new(
        parser.ast.node(first).extent.start,
        parser.ast.node(last).extent.end,
    );
    let mut node = Node::new(kind, extent.start);
    node.children = children;
    node.extent = extent;
    node.tokens = (start_tok, end_tok);
    parser.ast.push_node(node)
}

/// Consumes `Ident (:: Ident)*` (with optional leading `::`) and returns
/// the written form, or None if the cursor is not on a name. Builtin type
/// keyword runs (`unsigned long`) are consumed as one written name.
pub(crate) fn consume_qualified_name(parser: &mut Parser) -> Option<String> {
    if parser
        .peek_kind()
        .map(|k| k.is_builtin_type())
        .unwrap_or(false)
    {
        let mut parts = Vec::new();
        while parser
            .peek_kind()
            .map(|k| k.is_builtin_type())
            .unwrap_or(false)
        {
            let i = parser.advance();
            parts.push(parser.token(i).text.clone());
        }
        return Some(parts.join(" "));
    }

    let mut written = String::new();
    if parser.is(TokenKind::ColonColon) {
        parser.advance();
        written.push_str("::");
    }
    if !parser.is(TokenKind::Identifier) {
        return None;
    }
    let i = parser.advance();
    written.push_str(&parser.token(i).text);
    while parser.is(TokenKind::ColonColon) && parser.nth_kind(1) == Some(TokenKind::Identifier) {
        parser.advance();
        let seg = parser.advance();
        written.push_str("::");
        written.push_str(&parser.token(seg).text);
    }
    Some(written)
}

fn is_builtin_spelling(written: &str) -> bool {
    written
        .split_whitespace()
        .all(|word| matches!(
            word,
            "unsigned" | "signed" | "long" | "short" | "int" | "char" | "void" | "bool"
                | "float" | "double"
        ))
        && !written.is_empty()
}

/// Looks ahead from a `(` for a C-style cast: the parens must hold exactly
/// a type name (builtin keywords or a name resolving to a declared type)
/// and the token after `)` must start an operand. Returns the token index
/// just past the type name.
fn scan_cast_type(parser: &Parser) -> Option<usize> {
    debug_assert_eq!(parser.peek_kind(), Some(TokenKind::LeftParen));
    let mut i = parser.pos + 1;
    let tokens = &parser.ast.tokens;

    let start = i;
    let mut written = String::new();
    if tokens.get(i).map(|t| t.kind.is_builtin_type()).unwrap_or(false) {
        while tokens.get(i).map(|t| t.kind.is_builtin_type()).unwrap_or(false) {
            if !written.is_empty() {
                written.push(' ');
            }
            written.push_str(&tokens[i].text);
            i += 1;
        }
    } else {
        if tokens.get(i).map(|t| t.kind) == Some(TokenKind::ColonColon) {
            written.push_str("::");
            i += 1;
        }
        if tokens.get(i).map(|t| t.kind) != Some(TokenKind::Identifier) {
            return None;
        }
        written.push_str(&tokens[i].text);
        i += 1;
        while tokens.get(i).map(|t| t.kind) == Some(TokenKind::ColonColon)
            && tokens.get(i + 1).map(|t| t.kind) == Some(TokenKind::Identifier)
        {
            written.push_str("::");
            written.push_str(&tokens[i + 1].text);
            i += 2;
        }
        if !parser.is_type_name(&written) {
            return None;
        }
    }
    if i == start {
        return None;
    }
    if tokens.get(i).map(|t| t.kind) != Some(TokenKind::RightParen) {
        return None;
    }
    let after = tokens.get(i + 1).map(|t| t.kind)?;
    let starts_operand = matches!(
        after,
        TokenKind::Number
            | TokenKind::CharLit
            | TokenKind::StringLit
            | TokenKind::Identifier
            | TokenKind::LeftParen
            | TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::Tilde
            | TokenKind::Not
    );
    if starts_operand {
        Some(i)
    } else {
        None
    }
}
