//! AST walker / declaration collector.
//!
//! A single top-to-bottom, file-order traversal of the translation unit
//! populates the symbol tables. Correctness of cross-references (base
//! interfaces, identifier bindings, enumerator reuse) depends entirely on
//! this fixed order: names are looked up in the tables populated so far,
//! and references to not-yet-seen symbols are dropped silently. That
//! single-pass behavior is a documented contract, not an accident.

use hashbrown::HashSet;
use log::debug;

use crate::ast::{Ast, DeclKind, NodeKind, NodeRef, TypeKind};
use crate::source::{normalise_link, SourceMap};
use crate::symbols::{Enum, Interface, Struct, SymbolTables, Typedef, Union, Variable};

use super::error::ConvertError;
use super::render::{
    flatten_namespace, flattened_name, render_expr, render_type, struct_prefix, RenderMode,
};

/// Hand-maintained types of the output dialect; never collected.
const BLOCKLIST: &[&str] = &["FUID", "FReleaser"];

/// Directory marker that anchors emitted source-location comments; the
/// machine-specific path prefix before it is stripped.
const LOCATION_MARKER: &str = "pluginterfaces/";

/// Walks the translation unit and populates the symbol tables.
pub fn collect(
    ast: &Ast,
    sources: &SourceMap,
    project_root: &str,
    tables: &mut SymbolTables,
) -> Result<(), ConvertError> {
    Collector {
        ast,
        sources,
        tables,
        project_root: normalise_link(project_root),
    }
    .parse_header(ast.root)
}

struct Collector<'a> {
    ast: &'a Ast,
    sources: &'a SourceMap,
    tables: &'a mut SymbolTables,
    project_root: String,
}

impl<'a> Collector<'a> {
    /// Filters top-level children by project root and visits each file
    /// once. Include expansion makes same-file children contiguous, so a
    /// contiguous run from the current file is processed and the file is
    /// never re-entered afterwards.
    fn parse_header(&mut self, root: NodeRef) -> Result<(), ConvertError> {
        let ast = self.ast;
        let mut visited: HashSet<String> = HashSet::new();
        let mut current_file: Option<String> = None;
        for &child in &ast.node(root).children {
            let link = normalise_link(&self.sources.path(ast.node(child).location.file).to_string_lossy());
            if !link.starts_with(&self.project_root) {
                continue;
            }
            if current_file.as_deref() != Some(link.as_str()) {
                if !visited.insert(link.clone()) {
                    continue;
                }
                current_file = Some(link);
            }
            if self.parse_namespace(child, "")? {
                continue;
            }
            self.parsing(child, "")?;
        }
        Ok(())
    }

    /// Recurses into namespaces, concatenating nested names with `::` for
    /// lookups. Returns false when the node is not a namespace.
    fn parse_namespace(&mut self, node: NodeRef, namespace: &str) -> Result<bool, ConvertError> {
        let ast = self.ast;
        let n = ast.node(node);
        if n.kind != NodeKind::Namespace {
            return Ok(false);
        }
        let mut inner = namespace.to_string();
        if !inner.is_empty() {
            inner.push_str("::");
        }
        inner.push_str(&n.spelling);
        for &child in &n.children {
            if self.parse_namespace(child, &inner)? {
                continue;
            }
            self.parsing(child, &inner)?;
        }
        Ok(true)
    }

    /// Dispatches one declaration to every handler in fixed order; each
    /// handler decides applicability by node kind and is a no-op otherwise.
    fn parsing(&mut self, node: NodeRef, namespace: &str) -> Result<(), ConvertError> {
        self.parse_interface(node)?;
        self.parse_enum(node)?;
        self.parse_struct(node)?;
        self.parse_iid(node, namespace);
        self.store_typedef(node, false);
        self.parse_variable(node)?;
        Ok(())
    }

    // === interfaces ===

    fn parse_interface(&mut self, node: NodeRef) -> Result<(), ConvertError> {
        let ast = self.ast;
        let n = ast.node(node);
        if n.kind != NodeKind::ClassDecl || BLOCKLIST.contains(&n.spelling.as_str()) {
            return Ok(());
        }
        if n.children.is_empty() {
            // Forward declaration only.
            return Ok(());
        }
        let mut interface = Interface::new(
            flattened_name(n),
            self.location_string(node),
            n.brief_comment.clone(),
        );
        for &child in &n.children {
            self.store_typedef(child, true);
            self.parse_enum(child)?;
            self.parse_inheritance(child, &mut interface);
            self.parse_variable(child)?;
            self.parse_method(child, &mut interface)?;
        }
        self.tables.interfaces.push(interface);
        Ok(())
    }

    /// Splices the base's already-resolved ancestors, then the base itself,
    /// into the interface's chain, keeping it duplicate-free and
    /// order-preserving. An unknown base name is dropped.
    fn parse_inheritance(&mut self, node: NodeRef, interface: &mut Interface) {
        let n = self.ast.node(node);
        if n.kind != NodeKind::BaseSpecifier {
            return;
        }
        let base_name = flatten_namespace(&n.qualified);
        let Some(base) = self.tables.interfaces.get(&base_name) else {
            debug!("base interface '{}' not collected yet, dropped", base_name);
            return;
        };
        for ancestor in &base.ancestors {
            if !interface.ancestors.contains(ancestor) {
                interface.ancestors.push(ancestor.clone());
            }
        }
        if !interface.ancestors.contains(&base_name) {
            interface.ancestors.push(base_name);
        }
    }

    fn parse_method(&mut self, node: NodeRef, interface: &mut Interface) -> Result<(), ConvertError> {
        let ast = self.ast;
        let n = ast.node(node);
        if n.kind != NodeKind::Method {
            return Ok(());
        }
        let Some(return_ty) = n.ty else {
            return Ok(());
        };
        let return_type = format!(
            "{}{}",
            struct_prefix(ast, return_ty),
            render_type(ast, return_ty)
        );
        let mut args = Vec::new();
        for &arg in &n.arguments {
            let a = ast.node(arg);
            let Some(arg_ty) = a.ty else { continue };
            let rendered = format!("{}{}", struct_prefix(ast, arg_ty), render_type(ast, arg_ty));
            args.push(format!("{} {}", rendered, convert_method_arg_name(&a.spelling)));
        }
        interface.add_method(n.spelling.clone(), return_type, args);
        Ok(())
    }

    // === identifier constants ===

    /// The identifier-construction macro call is not meaningfully
    /// structured by the parser, so the binder works on raw tokens at
    /// fixed offsets from the declaration's extent.
    fn parse_iid(&mut self, node: NodeRef, namespace: &str) {
        let ast = self.ast;
        let n = ast.node(node);
        if n.kind != NodeKind::VarDecl || !n.spelling.ends_with("_iid") {
            return;
        }
        let tokens = ast.node_tokens(node);
        if tokens.len() < 11 {
            debug!("identifier declaration '{}' has too few tokens", n.spelling);
            return;
        }
        let mut interface_name = flatten_namespace(namespace);
        if !interface_name.is_empty() {
            interface_name.push('_');
        }
        interface_name.push_str(&tokens[2].text);
        match self.tables.interfaces.get_mut(&interface_name) {
            Some(interface) => interface.set_iid(
                tokens[4].text.clone(),
                tokens[6].text.clone(),
                tokens[8].text.clone(),
                tokens[10].text.clone(),
            ),
            None => debug!("identifier for unknown interface '{}', dropped", interface_name),
        }
    }

    // === structs and unions ===

    fn parse_struct(&mut self, node: NodeRef) -> Result<(), ConvertError> {
        let ast = self.ast;
        let n = ast.node(node);
        if n.kind != NodeKind::StructDecl || BLOCKLIST.contains(&n.spelling.as_str()) {
            return Ok(());
        }
        if n.children.is_empty() {
            // Forward declaration only.
            return Ok(());
        }
        let owner = flattened_name(n);
        let mut fields = Vec::new();
        for &child in &n.children {
            self.parse_union(&owner, child)?;
            if self.parse_enum(child)? || ast.node(child).kind != NodeKind::FieldDecl {
                continue;
            }
            let field = ast.node(child);
            let Some(field_ty) = field.ty else { continue };
            let (element_ty, bound) = match &ast.ty(field_ty).kind {
                TypeKind::ConstantArray { element, .. } => {
                    let bound_expr = field
                        .children
                        .last()
                        .map(|&b| render_expr(ast, b, RenderMode::Fold))
                        .transpose()?
                        .unwrap_or_default();
                    (*element, Some(bound_expr))
                }
                _ => (field_ty, None),
            };
            let rendered = format!(
                "{}{}",
                struct_prefix(ast, element_ty),
                render_type(ast, element_ty)
            );
            let line = match bound {
                Some(bound) => format!("{} {}[{}];", rendered, field.spelling, bound),
                None => format!("{} {};", rendered, field.spelling),
            };
            fields.push(line);
        }
        if !fields.is_empty() {
            let source_location = self.location_string(node);
            self.tables.structs.push(Struct {
                name: owner,
                source_location,
                members: fields,
            });
        }
        Ok(())
    }

    fn parse_union(&mut self, parent: &str, node: NodeRef) -> Result<(), ConvertError> {
        let ast = self.ast;
        let n = ast.node(node);
        if n.kind != NodeKind::UnionDecl || BLOCKLIST.contains(&n.spelling.as_str()) {
            return Ok(());
        }
        if n.children.is_empty() {
            return Ok(());
        }
        let mut record = Union {
            parent: parent.to_string(),
            members: Vec::new(),
        };
        for &child in &n.children {
            let field = ast.node(child);
            if field.kind != NodeKind::FieldDecl {
                continue;
            }
            let Some(field_ty) = field.ty else { continue };
            let rendered = format!(
                "{}{}",
                struct_prefix(ast, field_ty),
                render_type(ast, field_ty)
            );
            record.members.push(format!("{} {}", rendered, flattened_name(field)));
        }
        self.tables.unions.push(record);
        Ok(())
    }

    // === enums ===

    /// Always contributes an Enum record; an anonymous enum keeps an empty
    /// name but its enumerators still reach the surrounding scope.
    /// Returns true when the node was an enum declaration.
    fn parse_enum(&mut self, node: NodeRef) -> Result<bool, ConvertError> {
        let ast = self.ast;
        let n = ast.node(node);
        if n.kind != NodeKind::EnumDecl {
            return Ok(false);
        }
        let name = if n.spelling.is_empty() {
            String::new()
        } else {
            flattened_name(n)
        };
        let mut record = Enum {
            name,
            source_location: self.location_string(node),
            enumerators: Vec::new(),
        };
        for &child in &n.children {
            let enumerator = ast.node(child);
            if enumerator.kind != NodeKind::EnumConstantDecl {
                continue;
            }
            let expression = render_expr(ast, child, RenderMode::Literal)?;
            record.add_enumerator(flattened_name(enumerator), expression);
        }
        self.tables.enums.push(record);
        Ok(true)
    }

    // === typedefs ===

    fn store_typedef(&mut self, node: NodeRef, interface_local: bool) {
        let Some(typedef) = self.parse_typedef(node) else {
            return;
        };
        if interface_local {
            self.tables.interface_typedefs.push(typedef);
        } else {
            self.tables.typedefs.push(typedef);
        }
    }

    fn parse_typedef(&self, node: NodeRef) -> Option<Typedef> {
        let ast = self.ast;
        let n = ast.node(node);
        if n.kind != NodeKind::TypedefDecl && n.kind != NodeKind::TypeAliasDecl {
            return None;
        }
        let ty = n.ty?;
        let (underlying_ty, name) = match &ast.ty(ty).kind {
            TypeKind::ConstantArray { element, count_text } => {
                (*element, format!("{}[{}]", flattened_name(n), count_text))
            }
            _ => (ty, flattened_name(n)),
        };
        let underlying = format!(
            "{}{}",
            struct_prefix(ast, underlying_ty),
            render_type(ast, underlying_ty)
        );
        Some(Typedef { name, underlying })
    }

    // === variables ===

    /// A variable whose declared type is a typedef name is a constant
    /// definition; its initializer is reconstructed in folding mode.
    fn parse_variable(&mut self, node: NodeRef) -> Result<(), ConvertError> {
        let ast = self.ast;
        let n = ast.node(node);
        if n.kind != NodeKind::VarDecl {
            return Ok(());
        }
        let Some(ty) = n.ty else {
            return Ok(());
        };
        if ast.type_decl(ty) != Some(DeclKind::Typedef) {
            return Ok(());
        }
        let Some(&init) = n.children.last() else {
            return Ok(());
        };
        let value = render_expr(ast, init, RenderMode::Fold)?;
        self.tables.variables.push(Variable {
            name: flattened_name(n),
            declared_type: render_type(ast, ty),
            value,
        });
        Ok(())
    }

    // === locations ===

    fn location_string(&self, node: NodeRef) -> String {
        let location = self.ast.node(node).location;
        let path = normalise_link(&self.sources.path(location.file).to_string_lossy());
        let trimmed = match path.rfind(LOCATION_MARKER) {
            Some(idx) => &path[idx..],
            None => path.as_str(),
        };
        format!(
            "Source: \"{}\", line {}",
            trimmed,
            self.sources.lookup_line(location)
        )
    }
}

/// `_iid` collides with the identifier-constant convention of the target
/// dialect, so the parameter is renamed.
fn convert_method_arg_name(source: &str) -> &str {
    if source == "_iid" {
        "iid"
    } else {
        source
    }
}
