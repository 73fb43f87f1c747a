//! Typed AST for the interface dialect.
//!
//! The tree mirrors what a compiler front end exposes for a translation
//! unit: a node arena with a closed kind discriminant, a type arena with
//! pointee chasing and declaration-of-origin, per-node raw-token extents
//! and a definition index for declaration references. The translation
//! engine consumes this as a read-only oracle and never mutates it.

use std::fmt::{self, Display, Formatter};

use hashbrown::HashMap;

use crate::lexer::Token;
use crate::source::{SourceLocation, SourceSpan};

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(pub u32);

impl NodeRef {
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

/// Index of a type in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

impl TypeId {
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

/// Closed set of node kinds produced for this dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    TranslationUnit,
    Namespace,
    ClassDecl,
    StructDecl,
    UnionDecl,
    EnumDecl,
    EnumConstantDecl,
    FieldDecl,
    Method,
    BaseSpecifier,
    TypedefDecl,
    TypeAliasDecl,
    VarDecl,
    ParmDecl,
    TypeRef,
    BinaryOperator,
    UnaryOperator,
    ParenExpr,
    DeclRefExpr,
    CStyleCastExpr,
    FunctionalCastExpr,
    StaticCastExpr,
    IntegerLiteral,
    StringLiteral,
    UnexposedExpr,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Which kind of declaration a named type resolves to. Drives the
/// struct-prefix rule: tag types need the `struct` keyword in C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Class,
    Struct,
    Enum,
    Typedef,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// A (possibly qualified) named type. `decl` is the kind of its
    /// declaration when the name resolved to one.
    Named {
        name: String,
        decl: Option<DeclKind>,
    },
    Pointer {
        pointee: TypeId,
    },
    LValueReference {
        pointee: TypeId,
    },
    RValueReference {
        pointee: TypeId,
    },
    ConstantArray {
        element: TypeId,
        count_text: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub kind: TypeKind,
    pub is_const: bool,
}

/// One node of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Identifier text as written (unqualified). Empty for anonymous
    /// declarations and for kinds without a name.
    pub spelling: String,
    /// Enclosing named scopes, outermost first (namespaces, records,
    /// enums). Anonymous scopes contribute nothing.
    pub scope: Vec<String>,
    /// For `DeclRefExpr` and `TypeRef`: the resolved qualified name
    /// (`A::B::name`), or the raw spelling when nothing resolved.
    pub qualified: String,
    pub ty: Option<TypeId>,
    pub location: SourceLocation,
    pub extent: SourceSpan,
    pub children: Vec<NodeRef>,
    /// Formal parameters, for `Method` nodes.
    pub arguments: Vec<NodeRef>,
    /// Raw-token index range of the node's lexical extent.
    pub tokens: (u32, u32),
    /// Resolved definition, for `DeclRefExpr` nodes.
    pub definition: Option<NodeRef>,
    /// Doc comment immediately preceding the declaration, for class nodes.
    pub brief_comment: Option<String>,
}

impl Node {
    pub fn new(kind: NodeKind, location: SourceLocation) -> Self {
        Self {
            kind,
            spelling: String::new(),
            scope: Vec::new(),
            qualified: String::new(),
            ty: None,
            location,
            extent: SourceSpan::new(location, location),
            children: Vec::new(),
            arguments: Vec::new(),
            tokens: (0, 0),
            definition: None,
            brief_comment: None,
        }
    }

    /// Namespace-style qualified name of a declaration: enclosing scopes
    /// joined with `::`, then the spelling.
    pub fn qualified_name(&self) -> String {
        if self.scope.is_empty() {
            return self.spelling.clone();
        }
        let mut name = self.scope.join("::");
        if !self.spelling.is_empty() {
            name.push_str("::");
            name.push_str(&self.spelling);
        }
        name
    }
}

/// The complete translation unit: node arena, type arena, raw tokens and
/// the definition index used to resolve declaration references.
pub struct Ast {
    pub nodes: Vec<Node>,
    pub types: Vec<Type>,
    pub tokens: Vec<Token>,
    pub root: NodeRef,
    definitions: HashMap<String, NodeRef>,
}

impl Ast {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            types: Vec::new(),
            tokens: Vec::new(),
            root: NodeRef(0),
            definitions: HashMap::new(),
        }
    }

    pub fn node(&self, r: NodeRef) -> &Node {
        &self.nodes[r.get()]
    }

    pub fn node_mut(&mut self, r: NodeRef) -> &mut Node {
        &mut self.nodes[r.get()]
    }

    pub fn push_node(&mut self, node: Node) -> NodeRef {
        let r = NodeRef(self.nodes.len() as u32);
        self.nodes.push(node);
        r
    }

    pub fn ty(&self, id: TypeId) -> &Type {
        &self.types[id.get()]
    }

    pub fn push_type(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    /// Raw tokens over a node's lexical extent.
    pub fn node_tokens(&self, r: NodeRef) -> &[Token] {
        let (start, end) = self.node(r).tokens;
        &self.tokens[start as usize..end as usize]
    }

    /// Records a definition under its qualified name. First write wins,
    /// matching the single-pass lookup contract.
    pub fn record_definition(&mut self, qualified: &str, node: NodeRef) {
        self.definitions
            .entry(qualified.to_string())
            .or_insert(node);
    }

    pub fn lookup_definition(&self, qualified: &str) -> Option<NodeRef> {
        self.definitions.get(qualified).copied()
    }

    /// Pointee of a pointer or reference type.
    pub fn pointee(&self, id: TypeId) -> Option<TypeId> {
        match self.ty(id).kind {
            TypeKind::Pointer { pointee }
            | TypeKind::LValueReference { pointee }
            | TypeKind::RValueReference { pointee } => Some(pointee),
            _ => None,
        }
    }

    /// Textual spelling of a type, const-qualification included.
    pub fn type_spelling(&self, id: TypeId) -> String {
        let ty = self.ty(id);
        let base = match &ty.kind {
            TypeKind::Named { name, .. } => name.clone(),
            TypeKind::Pointer { pointee } => format!("{}*", self.type_spelling(*pointee)),
            TypeKind::LValueReference { pointee } => {
                format!("{}&", self.type_spelling(*pointee))
            }
            TypeKind::RValueReference { pointee } => {
                format!("{}&&", self.type_spelling(*pointee))
            }
            TypeKind::ConstantArray { element, count_text } => {
                format!("{}[{}]", self.type_spelling(*element), count_text)
            }
        };
        if ty.is_const {
            format!("const {}", base)
        } else {
            base
        }
    }

    /// Declaration kind of a named type, if its name resolved.
    pub fn type_decl(&self, id: TypeId) -> Option<DeclKind> {
        match &self.ty(id).kind {
            TypeKind::Named { decl, .. } => *decl,
            _ => None,
        }
    }
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}
