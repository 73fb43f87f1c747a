//! Declaration parsing: namespaces, classes, structs, unions, enums,
//! typedefs, variables and the interface-identifier macro.

use log::debug;

use crate::ast::{DeclKind, Node, NodeKind, NodeRef, Type, TypeId, TypeKind};
use crate::lexer::TokenKind;

use super::expressions::{consume_qualified_name, parse_expression};
use super::{ParseError, Parser, IID_DECLARATION_MACRO};

/// Parses one declaration at translation-unit or namespace scope.
/// Returns None for constructs that are consumed but carry no declaration
/// the translation engine cares about.
pub(crate) fn parse_declaration(parser: &mut Parser) -> Result<Option<NodeRef>, ParseError> {
    match parser.peek_kind() {
        None => Ok(None),
        Some(TokenKind::Semicolon) => {
            parser.advance();
            Ok(None)
        }
        Some(TokenKind::Namespace) => parse_namespace(parser),
        Some(TokenKind::Class) => parse_class(parser).map(Some),
        Some(TokenKind::Struct) => parse_struct(parser).map(Some),
        Some(TokenKind::Union) => parse_union(parser).map(Some),
        Some(TokenKind::Enum) => parse_enum(parser).map(Some),
        Some(TokenKind::Typedef) => Ok(parse_typedef(parser)),
        Some(TokenKind::Using) => Ok(parse_using(parser)),
        Some(TokenKind::Identifier)
            if matches!(
                parser.nth_text(0),
                Some("template") | Some("inline") | Some("extern") | Some("constexpr")
                    | Some("friend")
            ) =>
        {
            parser.skip_to_semicolon();
            Ok(None)
        }
        Some(TokenKind::Identifier)
            if parser.nth_kind(1) == Some(TokenKind::LeftParen)
                && is_macro_invocation(parser) =>
        {
            Ok(parse_macro_invocation(parser))
        }
        Some(TokenKind::Static) | Some(TokenKind::Const) | Some(TokenKind::Identifier) => {
            Ok(parse_variable(parser))
        }
        Some(kind) if kind.is_builtin_type() => Ok(parse_variable(parser)),
        Some(TokenKind::RightBrace) => {
            // Only reachable at translation-unit scope (namespace bodies
            // check before dispatching); swallow the stray brace.
            parser.advance();
            Ok(None)
        }
        Some(_) => {
            // Consume the offending token first so recovery always makes
            // progress, then resynchronize on the next semicolon.
            parser.advance();
            parser.skip_to_semicolon();
            Ok(None)
        }
    }
}

fn is_macro_invocation(parser: &Parser) -> bool {
    match parser.nth_text(0) {
        Some(name) => {
            name == IID_DECLARATION_MACRO || parser.function_macros.contains(name)
        }
        None => false,
    }
}

fn parse_namespace(parser: &mut Parser) -> Result<Option<NodeRef>, ParseError> {
    let start = parser.advance();
    let name = match parser.accept(TokenKind::Identifier) {
        Some(i) => parser.token(i).text.clone(),
        None => String::new(),
    };
    if parser.accept(TokenKind::Assign).is_some() {
        // namespace alias
        parser.skip_to_semicolon();
        return Ok(None);
    }
    if parser.expect(TokenKind::LeftBrace).is_err() {
        parser.skip_to_semicolon();
        return Ok(None);
    }
    let outer_scope = parser.scope.clone();
    if !name.is_empty() {
        parser.scope.push(name.clone());
    }
    let mut children = Vec::new();
    while !parser.at_end() && !parser.is(TokenKind::RightBrace) {
        if let Some(decl) = parse_declaration(parser)? {
            children.push(decl);
        }
    }
    parser.accept(TokenKind::RightBrace);
    parser.scope.truncate(outer_scope.len());

    let loc = parser.token_loc(start);
    let mut node = Node::new(NodeKind::Namespace, loc);
    node.spelling = name;
    node.scope = outer_scope;
    node.children = children;
    Ok(Some(parser.finish_node(node, start)))
}

fn parse_class(parser: &mut Parser) -> Result<NodeRef, ParseError> {
    let start = parser.advance();
    let name = match parser.accept(TokenKind::Identifier) {
        Some(i) => parser.token(i).text.clone(),
        None => String::new(),
    };
    if !name.is_empty() {
        parser.register_decl(&name, DeclKind::Class);
    }
    let brief = parser.brief_comment_before(parser.token_loc(start));

    let mut children = Vec::new();
    if parser.accept(TokenKind::Colon).is_some() {
        children.append(&mut parse_base_specifiers(parser));
    }
    if parser.accept(TokenKind::Semicolon).is_some() {
        // Forward declaration: a node with no children.
        let loc = parser.token_loc(start);
        let mut node = Node::new(NodeKind::ClassDecl, loc);
        node.spelling = name;
        node.scope = parser.scope.clone();
        return Ok(parser.finish_node(node, start));
    }
    if parser.expect(TokenKind::LeftBrace).is_err() {
        parser.skip_to_semicolon();
        let loc = parser.token_loc(start);
        let mut node = Node::new(NodeKind::ClassDecl, loc);
        node.spelling = name;
        node.scope = parser.scope.clone();
        return Ok(parser.finish_node(node, start));
    }

    let outer_scope = parser.scope.clone();
    if !name.is_empty() {
        parser.scope.push(name.clone());
    }
    while !parser.at_end() && !parser.is(TokenKind::RightBrace) {
        if let Some(member) = parse_class_member(parser)? {
            children.push(member);
        }
    }
    parser.accept(TokenKind::RightBrace);
    parser.accept(TokenKind::Semicolon);
    parser.scope.truncate(outer_scope.len());

    let loc = parser.token_loc(start);
    let mut node = Node::new(NodeKind::ClassDecl, loc);
    node.spelling = name;
    node.scope = outer_scope;
    node.children = children;
    node.brief_comment = brief;
    Ok(parser.finish_node(node, start))
}

fn parse_base_specifiers(parser: &mut Parser) -> Vec<NodeRef> {
    let mut bases = Vec::new();
    loop {
        while matches!(
            parser.peek_kind(),
            Some(TokenKind::Public) | Some(TokenKind::Protected) | Some(TokenKind::Private)
                | Some(TokenKind::Virtual)
        ) {
            parser.advance();
        }
        let start = parser.pos;
        let Some(written) = consume_qualified_name(parser) else {
            break;
        };
        let (qualified, _) = parser.resolve_type_name(&written);
        let loc = parser.token_loc(start);
        let mut node = Node::new(NodeKind::BaseSpecifier, loc);
        node.spelling = written;
        node.qualified = qualified;
        node.scope = parser.scope.clone();
        bases.push(parser.finish_node(node, start));
        if parser.accept(TokenKind::Comma).is_none() {
            break;
        }
    }
    bases
}

fn parse_class_member(parser: &mut Parser) -> Result<Option<NodeRef>, ParseError> {
    match parser.peek_kind() {
        Some(kind) if kind.is_access_specifier() => {
            parser.advance();
            parser.accept(TokenKind::Colon);
            Ok(None)
        }
        Some(TokenKind::Semicolon) => {
            parser.advance();
            Ok(None)
        }
        Some(TokenKind::Typedef) => Ok(parse_typedef(parser)),
        Some(TokenKind::Using) => Ok(parse_using(parser)),
        Some(TokenKind::Enum) => parse_enum(parser).map(Some),
        Some(TokenKind::Class) => parse_class(parser).map(Some),
        Some(TokenKind::Struct) => parse_struct(parser).map(Some),
        Some(TokenKind::Union) => parse_union(parser).map(Some),
        Some(TokenKind::Virtual) => Ok(parse_method(parser)),
        Some(TokenKind::Static) | Some(TokenKind::Const) | Some(TokenKind::Identifier) => {
            Ok(parse_variable(parser))
        }
        Some(kind) if kind.is_builtin_type() => Ok(parse_variable(parser)),
        None => Ok(None),
        _ => {
            parser.advance();
            parser.skip_to_semicolon();
            Ok(None)
        }
    }
}

fn parse_method(parser: &mut Parser) -> Option<NodeRef> {
    let start = parser.pos;
    parser.accept(TokenKind::Virtual);
    let return_type = match parse_type(parser) {
        Ok(ty) => ty,
        Err(_) => {
            parser.skip_to_semicolon();
            return None;
        }
    };
    // The method name is the last identifier before the parameter list;
    // identifiers in between are calling-convention macros.
    let mut name = None;
    while parser.is(TokenKind::Identifier) {
        if parser.nth_kind(1) == Some(TokenKind::LeftParen) {
            let i = parser.advance();
            name = Some(parser.token(i).text.clone());
            break;
        }
        parser.advance();
    }
    let Some(name) = name else {
        parser.skip_to_semicolon();
        return None;
    };
    if parser.expect(TokenKind::LeftParen).is_err() {
        parser.skip_to_semicolon();
        return None;
    }
    let mut arguments = Vec::new();
    while !parser.at_end() && !parser.is(TokenKind::RightParen) {
        match parse_parameter(parser) {
            Some(param) => arguments.push(param),
            None => break,
        }
        if parser.accept(TokenKind::Comma).is_none() {
            break;
        }
    }
    parser.accept(TokenKind::RightParen);
    // Trailing const, pure-specifier, or an inline body.
    parser.skip_to_semicolon();

    let loc = parser.token_loc(start);
    let mut node = Node::new(NodeKind::Method, loc);
    node.spelling = name;
    node.scope = parser.scope.clone();
    node.ty = Some(return_type);
    node.arguments = arguments;
    Some(parser.finish_node(node, start))
}

fn parse_parameter(parser: &mut Parser) -> Option<NodeRef> {
    let start = parser.pos;
    let ty = parse_type(parser).ok()?;
    let name = match parser.accept(TokenKind::Identifier) {
        Some(i) => parser.token(i).text.clone(),
        None => String::new(),
    };
    if parser.accept(TokenKind::Assign).is_some() {
        // Default argument: skip to the next comma or closing paren.
        let mut depth = 0usize;
        while let Some(kind) = parser.peek_kind() {
            match kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen if depth == 0 => break,
                TokenKind::RightParen => depth -= 1,
                TokenKind::Comma if depth == 0 => break,
                _ => {}
            }
            parser.advance();
        }
    }
    let loc = parser.token_loc(start.min(parser.ast.tokens.len().saturating_sub(1)));
    let mut node = Node::new(NodeKind::ParmDecl, loc);
    node.spelling = name;
    node.scope = parser.scope.clone();
    node.ty = Some(ty);
    Some(parser.finish_node(node, start))
}

fn parse_struct(parser: &mut Parser) -> Result<NodeRef, ParseError> {
    let start = parser.advance();
    let name = match parser.accept(TokenKind::Identifier) {
        Some(i) => parser.token(i).text.clone(),
        None => String::new(),
    };
    if !name.is_empty() {
        parser.register_decl(&name, DeclKind::Struct);
    }
    if parser.accept(TokenKind::Semicolon).is_some() {
        let loc = parser.token_loc(start);
        let mut node = Node::new(NodeKind::StructDecl, loc);
        node.spelling = name;
        node.scope = parser.scope.clone();
        return Ok(parser.finish_node(node, start));
    }
    if parser.is(TokenKind::Colon) {
        // Struct inheritance is outside the dialect; skip to the body.
        while !parser.at_end() && !parser.is(TokenKind::LeftBrace) {
            parser.advance();
        }
    }
    if parser.expect(TokenKind::LeftBrace).is_err() {
        parser.skip_to_semicolon();
        let loc = parser.token_loc(start);
        let mut node = Node::new(NodeKind::StructDecl, loc);
        node.spelling = name;
        node.scope = parser.scope.clone();
        return Ok(parser.finish_node(node, start));
    }

    let outer_scope = parser.scope.clone();
    if !name.is_empty() {
        parser.scope.push(name.clone());
    }
    let mut children = Vec::new();
    while !parser.at_end() && !parser.is(TokenKind::RightBrace) {
        if let Some(member) = parse_record_member(parser)? {
            children.push(member);
        }
    }
    parser.accept(TokenKind::RightBrace);
    parser.accept(TokenKind::Semicolon);
    parser.scope.truncate(outer_scope.len());

    let loc = parser.token_loc(start);
    let mut node = Node::new(NodeKind::StructDecl, loc);
    node.spelling = name;
    node.scope = outer_scope;
    node.children = children;
    Ok(parser.finish_node(node, start))
}

fn parse_record_member(parser: &mut Parser) -> Result<Option<NodeRef>, ParseError> {
    match parser.peek_kind() {
        Some(kind) if kind.is_access_specifier() => {
            parser.advance();
            parser.accept(TokenKind::Colon);
            Ok(None)
        }
        Some(TokenKind::Semicolon) => {
            parser.advance();
            Ok(None)
        }
        Some(TokenKind::Enum) => parse_enum(parser).map(Some),
        Some(TokenKind::Union) => parse_union(parser).map(Some),
        Some(TokenKind::Struct) => parse_struct(parser).map(Some),
        Some(TokenKind::Class) => parse_class(parser).map(Some),
        Some(TokenKind::Typedef) => Ok(parse_typedef(parser)),
        Some(TokenKind::Static) => Ok(parse_variable(parser)),
        Some(TokenKind::Const) | Some(TokenKind::Identifier) => Ok(parse_field(parser)),
        Some(kind) if kind.is_builtin_type() => Ok(parse_field(parser)),
        None => Ok(None),
        _ => {
            parser.advance();
            parser.skip_to_semicolon();
            Ok(None)
        }
    }
}

fn parse_field(parser: &mut Parser) -> Option<NodeRef> {
    let start = parser.pos;
    let ty = match parse_type(parser) {
        Ok(ty) => ty,
        Err(_) => {
            parser.skip_to_semicolon();
            return None;
        }
    };
    let Some(name_tok) = parser.accept(TokenKind::Identifier) else {
        parser.skip_to_semicolon();
        return None;
    };
    let name = parser.token(name_tok).text.clone();

    let mut children = Vec::new();
    let mut field_ty = ty;
    if parser.accept(TokenKind::LeftBracket).is_some() {
        let bound_start = parser.pos;
        match parse_expression(parser, 0) {
            Ok(bound) => children.push(bound),
            Err(_) => {
                while !parser.at_end() && !parser.is(TokenKind::RightBracket) {
                    parser.advance();
                }
            }
        }
        let count_text = raw_text(parser, bound_start, parser.pos);
        parser.accept(TokenKind::RightBracket);
        field_ty = parser.ast.push_type(Type {
            kind: TypeKind::ConstantArray {
                element: ty,
                count_text,
            },
            is_const: false,
        });
    }
    if parser.expect(TokenKind::Semicolon).is_err() {
        parser.skip_to_semicolon();
    }

    let loc = parser.token_loc(start);
    let mut node = Node::new(NodeKind::FieldDecl, loc);
    node.spelling = name;
    node.scope = parser.scope.clone();
    node.ty = Some(field_ty);
    node.children = children;
    Some(parser.finish_node(node, start))
}

fn parse_union(parser: &mut Parser) -> Result<NodeRef, ParseError> {
    let start = parser.advance();
    let name = match parser.accept(TokenKind::Identifier) {
        Some(i) => parser.token(i).text.clone(),
        None => String::new(),
    };
    if parser.accept(TokenKind::Semicolon).is_some() {
        let loc = parser.token_loc(start);
        let mut node = Node::new(NodeKind::UnionDecl, loc);
        node.spelling = name;
        node.scope = parser.scope.clone();
        return Ok(parser.finish_node(node, start));
    }
    if parser.expect(TokenKind::LeftBrace).is_err() {
        parser.skip_to_semicolon();
        let loc = parser.token_loc(start);
        let mut node = Node::new(NodeKind::UnionDecl, loc);
        node.spelling = name;
        node.scope = parser.scope.clone();
        return Ok(parser.finish_node(node, start));
    }
    let outer_scope = parser.scope.clone();
    if !name.is_empty() {
        parser.scope.push(name.clone());
    }
    let mut children = Vec::new();
    while !parser.at_end() && !parser.is(TokenKind::RightBrace) {
        if let Some(member) = parse_record_member(parser)? {
            children.push(member);
        }
    }
    parser.accept(TokenKind::RightBrace);
    parser.accept(TokenKind::Semicolon);
    parser.scope.truncate(outer_scope.len());

    let loc = parser.token_loc(start);
    let mut node = Node::new(NodeKind::UnionDecl, loc);
    node.spelling = name;
    node.scope = outer_scope;
    node.children = children;
    Ok(parser.finish_node(node, start))
}

fn parse_enum(parser: &mut Parser) -> Result<NodeRef, ParseError> {
    let start = parser.advance();
    let scoped = parser.accept(TokenKind::Class).is_some()
        || parser.accept(TokenKind::Struct).is_some();
    let name = match parser.accept(TokenKind::Identifier) {
        Some(i) => parser.token(i).text.clone(),
        None => String::new(),
    };
    if !name.is_empty() {
        parser.register_decl(&name, DeclKind::Enum);
    }
    if parser.accept(TokenKind::Colon).is_some() {
        let _ = parse_type(parser); // underlying type, irrelevant here
    }
    if parser.accept(TokenKind::Semicolon).is_some() {
        let loc = parser.token_loc(start);
        let mut node = Node::new(NodeKind::EnumDecl, loc);
        node.spelling = name;
        node.scope = parser.scope.clone();
        return Ok(parser.finish_node(node, start));
    }
    parser.expect(TokenKind::LeftBrace)?;

    let outer_scope = parser.scope.clone();
    if !name.is_empty() {
        parser.scope.push(name.clone());
    }
    let mut enumerators = Vec::new();
    while !parser.at_end() && !parser.is(TokenKind::RightBrace) {
        let enum_start = parser.pos;
        let Some(name_tok) = parser.accept(TokenKind::Identifier) else {
            parser.advance();
            continue;
        };
        let enumerator_name = parser.token(name_tok).text.clone();
        let mut children = Vec::new();
        if parser.accept(TokenKind::Assign).is_some() {
            children.push(parse_expression(parser, 0)?);
        }
        let loc = parser.token_loc(enum_start);
        let mut node = Node::new(NodeKind::EnumConstantDecl, loc);
        node.spelling = enumerator_name.clone();
        node.scope = parser.scope.clone();
        node.children = children;
        let node_ref = parser.finish_node(node, enum_start);
        enumerators.push(node_ref);

        let qualified = parser.qualify(&enumerator_name);
        parser.ast.record_definition(&qualified, node_ref);
        if !scoped && !name.is_empty() {
            // Unscoped enumerators are also visible in the enclosing scope.
            let transparent = if outer_scope.is_empty() {
                enumerator_name.clone()
            } else {
                format!("{}::{}", outer_scope.join("::"), enumerator_name)
            };
            parser.ast.record_definition(&transparent, node_ref);
        }
        if parser.accept(TokenKind::Comma).is_none() {
            break;
        }
    }
    parser.accept(TokenKind::RightBrace);
    parser.accept(TokenKind::Semicolon);
    parser.scope.truncate(outer_scope.len());

    let loc = parser.token_loc(start);
    let mut node = Node::new(NodeKind::EnumDecl, loc);
    node.spelling = name;
    node.scope = outer_scope;
    node.children = enumerators;
    Ok(parser.finish_node(node, start))
}

fn parse_typedef(parser: &mut Parser) -> Option<NodeRef> {
    let start = parser.advance();
    let ty = match parse_type(parser) {
        Ok(ty) => ty,
        Err(_) => {
            debug!("skipping typedef outside the supported subset");
            parser.skip_to_semicolon();
            return None;
        }
    };
    let Some(name_tok) = parser.accept(TokenKind::Identifier) else {
        parser.skip_to_semicolon();
        return None;
    };
    let name = parser.token(name_tok).text.clone();

    let mut final_ty = ty;
    if parser.accept(TokenKind::LeftBracket).is_some() {
        let bound_start = parser.pos;
        while !parser.at_end() && !parser.is(TokenKind::RightBracket) {
            parser.advance();
        }
        let count_text = raw_text(parser, bound_start, parser.pos);
        parser.accept(TokenKind::RightBracket);
        final_ty = parser.ast.push_type(Type {
            kind: TypeKind::ConstantArray {
                element: ty,
                count_text,
            },
            is_const: false,
        });
    }
    if parser.expect(TokenKind::Semicolon).is_err() {
        parser.skip_to_semicolon();
    }
    parser.register_decl(&name, DeclKind::Typedef);

    let loc = parser.token_loc(start);
    let mut node = Node::new(NodeKind::TypedefDecl, loc);
    node.spelling = name;
    node.scope = parser.scope.clone();
    node.ty = Some(final_ty);
    Some(parser.finish_node(node, start))
}

fn parse_using(parser: &mut Parser) -> Option<NodeRef> {
    let start = parser.advance();
    if parser.is(TokenKind::Namespace) {
        parser.skip_to_semicolon();
        return None;
    }
    let Some(name_tok) = parser.accept(TokenKind::Identifier) else {
        parser.skip_to_semicolon();
        return None;
    };
    let name = parser.token(name_tok).text.clone();
    if parser.accept(TokenKind::Assign).is_none() {
        // using-declaration, not an alias
        parser.skip_to_semicolon();
        return None;
    }
    let ty = match parse_type(parser) {
        Ok(ty) => ty,
        Err(_) => {
            parser.skip_to_semicolon();
            return None;
        }
    };
    if parser.expect(TokenKind::Semicolon).is_err() {
        parser.skip_to_semicolon();
    }
    parser.register_decl(&name, DeclKind::Typedef);

    let loc = parser.token_loc(start);
    let mut node = Node::new(NodeKind::TypeAliasDecl, loc);
    node.spelling = name;
    node.scope = parser.scope.clone();
    node.ty = Some(ty);
    Some(parser.finish_node(node, start))
}

fn parse_variable(parser: &mut Parser) -> Option<NodeRef> {
    let start = parser.pos;
    parser.accept(TokenKind::Static);
    let ty = match parse_type(parser) {
        Ok(ty) => ty,
        Err(_) => {
            parser.skip_to_semicolon();
            return None;
        }
    };
    let Some(name_tok) = parser.accept(TokenKind::Identifier) else {
        parser.skip_to_semicolon();
        return None;
    };
    let name = parser.token(name_tok).text.clone();

    let mut children = Vec::new();
    match parser.peek_kind() {
        Some(TokenKind::Assign) => {
            parser.advance();
            match parse_expression(parser, 0) {
                Ok(init) => children.push(init),
                Err(_) => parser.skip_to_semicolon(),
            }
        }
        Some(TokenKind::LeftParen) => {
            // Constructor-style initializer: outside the rendered subset.
            parser.skip_to_semicolon();
        }
        _ => {}
    }
    if parser.is(TokenKind::Semicolon) {
        parser.advance();
    } else if !children.is_empty() || parser.peek_kind().is_some() {
        parser.skip_to_semicolon();
    }

    let loc = parser.token_loc(start.min(parser.ast.tokens.len().saturating_sub(1)));
    let mut node = Node::new(NodeKind::VarDecl, loc);
    node.spelling = name.clone();
    node.scope = parser.scope.clone();
    node.ty = Some(ty);
    node.children = children;
    let node_ref = parser.finish_node(node, start);
    let qualified = parser.qualify(&name);
    parser.ast.record_definition(&qualified, node_ref);
    Some(node_ref)
}

fn parse_macro_invocation(parser: &mut Parser) -> Option<NodeRef> {
    let start = parser.advance();
    let macro_name = parser.token(start).text.clone();
    if parser.is(TokenKind::LeftParen) {
        let mut depth = 0usize;
        while let Some(kind) = parser.peek_kind() {
            parser.advance();
            match kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
    }
    parser.accept(TokenKind::Semicolon);

    if macro_name != IID_DECLARATION_MACRO {
        return None;
    }
    // The identifier binder works on raw tokens at fixed offsets from the
    // macro name; the node just needs the `<Interface>_iid` spelling.
    let interface = parser
        .ast
        .tokens
        .get(start + 2)
        .map(|t| t.text.clone())
        .unwrap_or_default();
    if interface.is_empty() {
        return None;
    }
    let loc = parser.token_loc(start);
    let mut node = Node::new(NodeKind::VarDecl, loc);
    node.spelling = format!("{}_iid", interface);
    node.scope = parser.scope.clone();
    Some(parser.finish_node(node, start))
}

/// Parses a type: optional const, an optionally qualified (or builtin)
/// base name, then pointer and reference layers with per-layer const.
pub(crate) fn parse_type(parser: &mut Parser) -> Result<TypeId, ParseError> {
    let mut is_const = parser.accept(TokenKind::Const).is_some();
    // Elaborated `struct X` / `class X` / `enum X` type references.
    if matches!(
        parser.peek_kind(),
        Some(TokenKind::Struct) | Some(TokenKind::Class) | Some(TokenKind::Enum)
    ) && parser.nth_kind(1) == Some(TokenKind::Identifier)
    {
        parser.advance();
    }
    let written =
        consume_qualified_name(parser).ok_or_else(|| parser.unexpected("type name"))?;
    if parser.accept(TokenKind::Const).is_some() {
        is_const = true;
    }
    let (name, decl) = if is_builtin_type_spelling(&written) {
        (written, None)
    } else {
        parser.resolve_type_name(&written)
    };
    let mut ty = parser.ast.push_type(Type {
        kind: TypeKind::Named { name, decl },
        is_const,
    });
    loop {
        match parser.peek_kind() {
            Some(TokenKind::Star) => {
                parser.advance();
                let layer_const = parser.accept(TokenKind::Const).is_some();
                ty = parser.ast.push_type(Type {
                    kind: TypeKind::Pointer { pointee: ty },
                    is_const: layer_const,
                });
            }
            Some(TokenKind::Amp) => {
                parser.advance();
                ty = parser.ast.push_type(Type {
                    kind: TypeKind::LValueReference { pointee: ty },
                    is_const: false,
                });
            }
            Some(TokenKind::AmpAmp) => {
                parser.advance();
                ty = parser.ast.push_type(Type {
                    kind: TypeKind::RValueReference { pointee: ty },
                    is_const: false,
                });
            }
            _ => break,
        }
    }
    Ok(ty)
}

fn is_builtin_type_spelling(written: &str) -> bool {
    !written.is_empty()
        && written.split_whitespace().all(|word| {
            matches!(
                word,
                "unsigned" | "signed" | "long" | "short" | "int" | "char" | "void" | "bool"
                    | "float" | "double"
            )
        })
}

fn raw_text(parser: &Parser, start: usize, end: usize) -> String {
    parser.ast.tokens[start..end]
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
