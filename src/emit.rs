//! Header emitter.
//!
//! Pure rendering over the fully populated symbol tables, one function per
//! section, concatenated in a fixed order. Re-emitting the same tables is
//! byte-identical. Structural invariants: forward declarations precede
//! every struct/interface use, and interface typedefs appear before the
//! enums and structs that may reference them.

use itertools::Itertools;

use crate::symbols::{Interface, SymbolTables};

const RULE: &str = "----------------------------------------------------------------------------------------------------------------------";

/// Fixed preamble: license banner, platform macros and the dual inline-UID
/// constructor (COM-compatible byte order vs. plain).
const PREAMBLE: &str = "\
/*-----------------------------------------------------------------------------
 This file is part of a Steinberg SDK. It is subject to the license terms
 in the LICENSE file found in the top-level directory of this distribution
 and at www.steinberg.net/sdklicenses. 
 No part of the SDK, including this file, may be copied, modified, propagated,
 or distributed except according to the terms contained in the LICENSE file.
-----------------------------------------------------------------------------*/

/* This file is the autogenerated C API of the VST3 SDK */

#pragma once

#include <stdint.h>

#if _WIN32
#define SMTG_STDMETHODCALLTYPE __stdcall
#define SMTG_COM_COMPATIBLE 1
#else
#define SMTG_STDMETHODCALLTYPE
#define SMTG_COM_COMPATIBLE 0
#endif

#ifndef __cplusplus
typedef int16_t char16_t;
#endif

#if SMTG_COM_COMPATIBLE
#define SMTG_INLINE_UID(l1, l2, l3, l4) \\
{ \\
\t(Steinberg_int8)(((Steinberg_uint32)(l1) & 0x000000FF)      ), (Steinberg_int8)(((Steinberg_uint32)(l1) & 0x0000FF00) >>  8), \\
\t(Steinberg_int8)(((Steinberg_uint32)(l1) & 0x00FF0000) >> 16), (Steinberg_int8)(((Steinberg_uint32)(l1) & 0xFF000000) >> 24), \\
\t(Steinberg_int8)(((Steinberg_uint32)(l2) & 0x00FF0000) >> 16), (Steinberg_int8)(((Steinberg_uint32)(l2) & 0xFF000000) >> 24), \\
\t(Steinberg_int8)(((Steinberg_uint32)(l2) & 0x000000FF)      ), (Steinberg_int8)(((Steinberg_uint32)(l2) & 0x0000FF00) >>  8), \\
\t(Steinberg_int8)(((Steinberg_uint32)(l3) & 0xFF000000) >> 24), (Steinberg_int8)(((Steinberg_uint32)(l3) & 0x00FF0000) >> 16), \\
\t(Steinberg_int8)(((Steinberg_uint32)(l3) & 0x0000FF00) >>  8), (Steinberg_int8)(((Steinberg_uint32)(l3) & 0x000000FF)      ), \\
\t(Steinberg_int8)(((Steinberg_uint32)(l4) & 0xFF000000) >> 24), (Steinberg_int8)(((Steinberg_uint32)(l4) & 0x00FF0000) >> 16), \\
\t(Steinberg_int8)(((Steinberg_uint32)(l4) & 0x0000FF00) >>  8), (Steinberg_int8)(((Steinberg_uint32)(l4) & 0x000000FF)      )  \\
}
#else
#define SMTG_INLINE_UID(l1, l2, l3, l4) \\
{ \\
\t(Steinberg_int8)(((Steinberg_uint32)(l1) & 0xFF000000) >> 24), (Steinberg_int8)(((Steinberg_uint32)(l1) & 0x00FF0000) >> 16), \\
\t(Steinberg_int8)(((Steinberg_uint32)(l1) & 0x0000FF00) >>  8), (Steinberg_int8)(((Steinberg_uint32)(l1) & 0x000000FF)      ), \\
\t(Steinberg_int8)(((Steinberg_uint32)(l2) & 0xFF000000) >> 24), (Steinberg_int8)(((Steinberg_uint32)(l2) & 0x00FF0000) >> 16), \\
\t(Steinberg_int8)(((Steinberg_uint32)(l2) & 0x0000FF00) >>  8), (Steinberg_int8)(((Steinberg_uint32)(l2) & 0x000000FF)      ), \\
\t(Steinberg_int8)(((Steinberg_uint32)(l3) & 0xFF000000) >> 24), (Steinberg_int8)(((Steinberg_uint32)(l3) & 0x00FF0000) >> 16), \\
\t(Steinberg_int8)(((Steinberg_uint32)(l3) & 0x0000FF00) >>  8), (Steinberg_int8)(((Steinberg_uint32)(l3) & 0x000000FF)      ), \\
\t(Steinberg_int8)(((Steinberg_uint32)(l4) & 0xFF000000) >> 24), (Steinberg_int8)(((Steinberg_uint32)(l4) & 0x00FF0000) >> 16), \\
\t(Steinberg_int8)(((Steinberg_uint32)(l4) & 0x0000FF00) >>  8), (Steinberg_int8)(((Steinberg_uint32)(l4) & 0x000000FF)      )  \\
}
#endif

";

/// Fixed result-code constant table, COM-compatible and plain forms.
const RESULT_CODES: &str = "\
#if SMTG_COM_COMPATIBLE
static const Steinberg_tresult Steinberg_kNoInterface = 0x80004002L;
static const Steinberg_tresult Steinberg_kResultOk = 0x00000000L;
static const Steinberg_tresult Steinberg_kResultTrue = 0x00000000L;
static const Steinberg_tresult Steinberg_kResultFalse = 0x00000001L;
static const Steinberg_tresult Steinberg_kInvalidArgument = 0x80070057L;
static const Steinberg_tresult Steinberg_kNotImplemented = 0x80004001L;
static const Steinberg_tresult Steinberg_kInternalError = 0x80004005L;
static const Steinberg_tresult Steinberg_kNotInitialized = 0x8000FFFFL;
static const Steinberg_tresult Steinberg_kOutOfMemory = 0x8007000EL;

#else
static const Steinberg_tresult Steinberg_kNoInterface = -1;
static const Steinberg_tresult Steinberg_kResultOk = 0;
static const Steinberg_tresult Steinberg_kResultTrue = 0;
static const Steinberg_tresult Steinberg_kResultFalse = 1;
static const Steinberg_tresult Steinberg_kInvalidArgument = 2;
static const Steinberg_tresult Steinberg_kNotImplemented = 3;
static const Steinberg_tresult Steinberg_kInternalError = 4;
static const Steinberg_tresult Steinberg_kNotInitialized = 5;
static const Steinberg_tresult Steinberg_kOutOfMemory = 6;
#endif

";

/// Three-line section banner, 120 columns wide.
fn section_banner(title: &str) -> String {
    format!(
        "/*{}\n----- {} {}\n{}*/\n",
        RULE,
        title,
        "-".repeat(113 - title.len()),
        RULE
    )
}

/// One-entity banner carrying the source-location comment.
fn location_banner(location: &str) -> String {
    format!("/*{}\n{} */\n", RULE, location)
}

/// Renders the complete translated header in the fixed section order.
pub fn emit_header(tables: &SymbolTables) -> String {
    let mut out = String::from(PREAMBLE);
    out.push_str(&emit_typedefs(tables, false, "Typedefs"));
    out.push_str(&emit_forward_declarations(tables));
    out.push_str(&emit_result_codes());
    out.push_str(&emit_typedefs(tables, true, "Interface typedefs"));
    out.push_str(&emit_enums(tables));
    out.push_str(&emit_variables(tables));
    out.push_str(&emit_structs(tables));
    out.push_str(&emit_interfaces(tables));
    out
}

fn emit_typedefs(tables: &SymbolTables, interface_local: bool, title: &str) -> String {
    let table = if interface_local {
        &tables.interface_typedefs
    } else {
        &tables.typedefs
    };
    let mut out = section_banner(title);
    out.push('\n');
    for typedef in table {
        out.push_str(&format!("typedef {} {};\n", typedef.underlying, typedef.name));
    }
    out.push_str("\n\n");
    out
}

fn emit_forward_declarations(tables: &SymbolTables) -> String {
    let mut out = section_banner("Interface forward declarations");
    out.push('\n');
    for interface in &tables.interfaces {
        out.push_str(&format!("struct {};\n", interface.name));
    }
    out.push_str("\n\n");
    out.push_str(&section_banner("Struct forward declarations"));
    out.push('\n');
    for record in &tables.structs {
        out.push_str(&format!("struct {};\n", record.name));
    }
    out.push_str("\n\n");
    out
}

fn emit_result_codes() -> String {
    let mut out = section_banner("Result value definitions");
    out.push('\n');
    out.push_str(RESULT_CODES);
    out.push('\n');
    out
}

fn emit_enums(tables: &SymbolTables) -> String {
    let mut out = section_banner("Enums");
    out.push('\n');
    for record in &tables.enums {
        out.push_str(&location_banner(&record.source_location));
        out.push('\n');
        let body = record
            .enumerators
            .iter()
            .map(|(name, expression)| {
                if expression.is_empty() {
                    format!("    {}", name)
                } else {
                    format!("    {} = {}", name, expression)
                }
            })
            .join(",\n");
        if record.name.is_empty() {
            out.push_str(&format!("enum\n{{\n{}\n}};\n", body));
        } else {
            out.push_str(&format!("typedef enum\n{{\n{}\n}} {};\n", body, record.name));
        }
        out.push('\n');
    }
    out.push('\n');
    out
}

fn emit_variables(tables: &SymbolTables) -> String {
    let mut out = section_banner("Variable declarations");
    out.push('\n');
    for variable in &tables.variables {
        out.push_str(&format!(
            "static {} {} = {};\n",
            variable.declared_type, variable.name, variable.value
        ));
    }
    out.push_str("\n\n");
    out
}

fn emit_structs(tables: &SymbolTables) -> String {
    let mut out = section_banner("Structs");
    out.push('\n');
    for record in &tables.structs {
        out.push_str(&location_banner(&record.source_location));
        out.push('\n');
        out.push_str(&format!("struct {}\n{{\n", record.name));
        for field in &record.members {
            out.push_str(&format!("    {}\n", field));
        }
        out.push_str(&emit_union(tables, &record.name));
        out.push_str("};\n\n");
    }
    out.push('\n');
    out
}

fn emit_union(tables: &SymbolTables, parent: &str) -> String {
    let Some(nested) = tables.unions.get(parent) else {
        return String::new();
    };
    let mut out = String::from("    union\n    {\n");
    for member in &nested.members {
        out.push_str(&format!("        {};\n", member));
    }
    out.push_str("    };\n");
    out
}

/// A method's v-table line: a function pointer with an explicit
/// `thisInterface` first parameter.
fn method_line(method: &crate::symbols::Method) -> String {
    let mut line = format!(
        "{} (SMTG_STDMETHODCALLTYPE* {}) (void* thisInterface",
        method.return_type, method.name
    );
    if !method.args.is_empty() {
        line.push_str(", ");
        line.push_str(&method.args.join(", "));
    }
    line.push_str(");");
    line
}

fn emit_interfaces(tables: &SymbolTables) -> String {
    let mut out = section_banner("Interfaces");
    out.push('\n');
    for interface in &tables.interfaces {
        out.push_str(&location_banner(&interface.source_location));
        out.push('\n');
        out.push_str(&format!("typedef struct {}Vtbl\n{{\n", interface.name));
        for ancestor_name in &interface.ancestors {
            let Some(ancestor) = tables.interfaces.get(ancestor_name) else {
                continue;
            };
            out.push_str(&format!("    /* methods derived from \"{}\": */\n", ancestor_name));
            out.push_str(&method_block(ancestor));
        }
        if !interface.methods.is_empty() {
            out.push_str(&format!("    /* methods defined in \"{}\": */\n", interface.name));
            out.push_str(&method_block(interface));
        }
        out.push_str(&format!("}} {}Vtbl;\n\n", interface.name));
        out.push_str(&format!("typedef struct {}\n{{\n", interface.name));
        out.push_str(&format!("    struct {}Vtbl* lpVtbl;\n", interface.name));
        out.push_str(&format!("}} {};\n", interface.name));
        if let Some(iid) = &interface.iid {
            out.push('\n');
            out.push_str(&format!(
                "static const Steinberg_TUID {}_iid = SMTG_INLINE_UID ({}, {}, {}, {});\n",
                interface.name, iid[0], iid[1], iid[2], iid[3]
            ));
        }
        out.push('\n');
    }
    out
}

fn method_block(interface: &Interface) -> String {
    let mut block = interface.methods.iter().map(|m| format!("    {}", method_line(m))).join("\n");
    block.push_str("\n\n");
    block
}
