//! Type and expression rendering.
//!
//! Deterministic, side-effect-free functions that turn a type reference or
//! an expression subtree into its textual C form.

use crate::ast::{Ast, DeclKind, Node, NodeKind, NodeRef, TypeId, TypeKind};

use super::error::ConvertError;

/// How declaration references render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Resolve the reference to its definition's rendered value
    /// (constant folding to text). Used for struct array bounds and
    /// variable initializers.
    Fold,
    /// Keep the namespace-prefixed spelling. Used for enumerator value
    /// expressions so forward-defined constants in the same enum stay
    /// textually self-consistent.
    Literal,
}

/// `A::B::C` → `A_B_C`.
pub fn flatten_namespace(source: &str) -> String {
    source.replace("::", "_")
}

/// Joins the non-empty scope names into a `_`-terminated prefix.
pub fn namespace_prefix(scope: &[String]) -> String {
    let named: Vec<&str> = scope
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.as_str())
        .collect();
    if named.is_empty() {
        String::new()
    } else {
        format!("{}_", named.join("_"))
    }
}

/// Namespace-flattened name of a declaration node.
pub fn flattened_name(node: &Node) -> String {
    format!("{}{}", namespace_prefix(&node.scope), node.spelling)
}

/// Renders a type: pointer and reference layers strip into trailing `*`
/// repetitions (rvalue references count twice), const-qualified pointer
/// layers become trailing ` const`, and the root type name is
/// namespace-flattened with its own const kept in front.
pub fn render_type(ast: &Ast, ty: TypeId) -> String {
    let mut num_pointers = 0usize;
    let mut num_consts = 0usize;
    let mut cur = ty;
    while let Some(pointee) = ast.pointee(cur) {
        if ast.ty(cur).is_const {
            num_consts += 1;
        }
        if matches!(ast.ty(cur).kind, TypeKind::RValueReference { .. }) {
            num_pointers += 1;
        }
        cur = pointee;
        num_pointers += 1;
    }
    let root = flatten_namespace(&ast.type_spelling(cur));
    if num_pointers > 0 {
        format!(
            "{}{}{}",
            root,
            "*".repeat(num_pointers),
            " const".repeat(num_consts)
        )
    } else {
        root
    }
}

/// C needs the `struct` keyword for tag types: after chasing pointee layers
/// to the root, a type declared as a struct or class gets a `struct ` prefix.
pub fn struct_prefix(ast: &Ast, ty: TypeId) -> &'static str {
    let mut cur = ty;
    while let Some(pointee) = ast.pointee(cur) {
        cur = pointee;
    }
    match ast.type_decl(cur) {
        Some(DeclKind::Struct) | Some(DeclKind::Class) => "struct ",
        _ => "",
    }
}

/// Recursively renders a constant-expression subtree. Any node kind outside
/// the supported subset is a hard error; wire compatibility depends on
/// faithful literal reconstruction, so there is no fallback.
pub fn render_expr(ast: &Ast, node: NodeRef, mode: RenderMode) -> Result<String, ConvertError> {
    let n = ast.node(node);
    match n.kind {
        NodeKind::BinaryOperator => {
            let left = n.children[0];
            let right = n.children[1];
            let operator = binary_operator_token(ast, node, left);
            Ok(format!(
                "{} {} {}",
                render_expr(ast, left, mode)?,
                operator,
                render_expr(ast, right, mode)?
            ))
        }
        NodeKind::ParenExpr => Ok(format!("({})", render_expr(ast, n.children[0], mode)?)),
        NodeKind::UnaryOperator => {
            let operator = ast
                .node_tokens(node)
                .first()
                .map(|t| t.text.clone())
                .unwrap_or_default();
            Ok(format!("{}{}", operator, render_expr(ast, n.children[0], mode)?))
        }
        NodeKind::DeclRefExpr => match (mode, n.definition) {
            (RenderMode::Fold, Some(definition)) => render_expr(ast, definition, mode),
            // References the translation unit cannot see a definition for
            // (macro constants from system headers) keep their spelling.
            _ => Ok(flatten_namespace(&n.qualified)),
        },
        NodeKind::UnexposedExpr | NodeKind::EnumConstantDecl => match n.children.first() {
            Some(&child) => render_expr(ast, child, mode),
            None => Ok(String::new()),
        },
        NodeKind::VarDecl => match n.children.last() {
            Some(&child) => render_expr(ast, child, mode),
            None => Ok(String::new()),
        },
        NodeKind::CStyleCastExpr | NodeKind::FunctionalCastExpr | NodeKind::StaticCastExpr => {
            let target = ast.node(n.children[0]);
            Ok(format!(
                "({}) {}",
                flatten_namespace(&target.spelling),
                render_expr(ast, n.children[1], mode)?
            ))
        }
        NodeKind::IntegerLiteral | NodeKind::StringLiteral => {
            if !n.spelling.is_empty() {
                Ok(n.spelling.clone())
            } else {
                Ok(ast
                    .node_tokens(node)
                    .first()
                    .map(|t| t.text.clone())
                    .unwrap_or_default())
            }
        }
        kind => Err(ConvertError::UnsupportedNode {
            kind,
            location: n.location,
        }),
    }
}

/// The binary operator's spelling is the first raw token of the parent
/// expression that starts at or past the left operand's extent.
fn binary_operator_token(ast: &Ast, parent: NodeRef, left: NodeRef) -> String {
    let left_end = ast.node(left).extent.end_offset();
    for token in ast.node_tokens(parent) {
        if token.span.start_offset() < left_end {
            continue;
        }
        return token.text.clone();
    }
    String::new()
}
