//! The translation engine: walks the typed AST, populates the symbol
//! tables and renders types and constant expressions into their C form.

pub mod collect;
pub mod error;
pub mod render;

pub use collect::collect;
pub use error::ConvertError;
pub use render::{
    flatten_namespace, flattened_name, namespace_prefix, render_expr, render_type,
    struct_prefix, RenderMode,
};
