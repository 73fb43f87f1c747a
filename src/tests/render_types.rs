//! Unit tests for the type/expression renderer.

use crate::ast::{Ast, DeclKind, Node, NodeKind, Type, TypeKind};
use crate::convert::{
    flatten_namespace, namespace_prefix, render_expr, render_type, struct_prefix, ConvertError,
    RenderMode,
};
use crate::source::SourceLocation;

fn named(ast: &mut Ast, name: &str, decl: Option<DeclKind>, is_const: bool) -> crate::ast::TypeId {
    ast.push_type(Type {
        kind: TypeKind::Named {
            name: name.to_string(),
            decl,
        },
        is_const,
    })
}

#[test]
fn plain_type_renders_unchanged() {
    let mut ast = Ast::new();
    let foo = named(&mut ast, "Foo", None, false);
    assert_eq!(render_type(&ast, foo), "Foo");
}

#[test]
fn pointer_depth_and_layer_const_round_trip() {
    let mut ast = Ast::new();
    let foo = named(&mut ast, "Foo", None, false);
    let inner = ast.push_type(Type {
        kind: TypeKind::Pointer { pointee: foo },
        is_const: false,
    });
    let outer = ast.push_type(Type {
        kind: TypeKind::Pointer { pointee: inner },
        is_const: true,
    });
    assert_eq!(render_type(&ast, outer), "Foo** const");
}

#[test]
fn root_const_stays_in_front() {
    let mut ast = Ast::new();
    let char8 = named(&mut ast, "Steinberg::char8", Some(DeclKind::Typedef), true);
    let ptr = ast.push_type(Type {
        kind: TypeKind::Pointer { pointee: char8 },
        is_const: false,
    });
    assert_eq!(render_type(&ast, ptr), "const Steinberg_char8*");
}

#[test]
fn references_strip_to_pointers() {
    let mut ast = Ast::new();
    let foo = named(&mut ast, "Foo", None, false);
    let lref = ast.push_type(Type {
        kind: TypeKind::LValueReference { pointee: foo },
        is_const: false,
    });
    assert_eq!(render_type(&ast, lref), "Foo*");

    let bar = named(&mut ast, "Bar", None, false);
    let rref = ast.push_type(Type {
        kind: TypeKind::RValueReference { pointee: bar },
        is_const: false,
    });
    assert_eq!(render_type(&ast, rref), "Bar**");
}

#[test]
fn namespaces_flatten_to_underscores() {
    let mut ast = Ast::new();
    let ty = named(&mut ast, "Steinberg::Vst::Speaker", None, false);
    assert_eq!(render_type(&ast, ty), "Steinberg_Vst_Speaker");
    assert_eq!(flatten_namespace("A::B::C"), "A_B_C");
}

#[test]
fn struct_prefix_follows_declaration_of_origin() {
    let mut ast = Ast::new();
    let record = named(&mut ast, "Steinberg::Point", Some(DeclKind::Struct), false);
    let ptr = ast.push_type(Type {
        kind: TypeKind::Pointer { pointee: record },
        is_const: false,
    });
    let double_ptr = ast.push_type(Type {
        kind: TypeKind::Pointer { pointee: ptr },
        is_const: false,
    });
    assert_eq!(struct_prefix(&ast, double_ptr), "struct ");

    let alias = named(&mut ast, "Steinberg::TUID", Some(DeclKind::Typedef), false);
    assert_eq!(struct_prefix(&ast, alias), "");

    let scalar = named(&mut ast, "int", None, false);
    assert_eq!(struct_prefix(&ast, scalar), "");
}

#[test]
fn class_declarations_also_take_the_tag_keyword() {
    let mut ast = Ast::new();
    let iface = named(&mut ast, "Steinberg::FUnknown", Some(DeclKind::Class), false);
    let ptr = ast.push_type(Type {
        kind: TypeKind::Pointer { pointee: iface },
        is_const: false,
    });
    assert_eq!(struct_prefix(&ast, ptr), "struct ");
}

#[test]
fn namespace_prefix_skips_anonymous_scopes() {
    let scope = vec![
        "Steinberg".to_string(),
        String::new(),
        "Vst".to_string(),
    ];
    assert_eq!(namespace_prefix(&scope), "Steinberg_Vst_");
    assert_eq!(namespace_prefix(&[]), "");
}

#[test]
fn unsupported_node_kind_is_a_hard_error() {
    let mut ast = Ast::new();
    let node = ast.push_node(Node::new(NodeKind::Namespace, SourceLocation::default()));
    match render_expr(&ast, node, RenderMode::Fold) {
        Err(ConvertError::UnsupportedNode { kind, .. }) => {
            assert_eq!(kind, NodeKind::Namespace);
        }
        other => panic!("expected an unsupported-node error, got {:?}", other.map(|_| ())),
    }
}
