//! Emission framing: section order, preamble, determinism.

use crate::emit::emit_header;
use crate::tests::test_utils::convert_source;

const SOURCE: &str = "namespace Steinberg {

typedef int int32;

enum First
{
    kOne = 1
};

enum Second
{
    kTwo = 2
};

struct Point
{
    int32 x;
};

class IThing
{
public:
    virtual int32 PLUGIN_API id () = 0;
};

static const int32 kAnswer = 42;

}
";

#[test]
fn sections_come_out_in_fixed_order() {
    let (_, header) = convert_source(SOURCE);
    let titles = [
        "----- Typedefs ",
        "----- Interface forward declarations ",
        "----- Struct forward declarations ",
        "----- Result value definitions ",
        "----- Interface typedefs ",
        "----- Enums ",
        "----- Variable declarations ",
        "----- Structs ",
        "----- Interfaces ",
    ];
    let mut last = 0;
    for title in titles {
        let position = header.find(title).unwrap_or_else(|| panic!("missing {}", title));
        assert!(position > last, "section '{}' out of order", title);
        last = position;
    }
}

#[test]
fn preamble_carries_the_fixed_boilerplate() {
    let (_, header) = convert_source(SOURCE);
    assert!(header.starts_with("/*---"));
    assert!(header.contains("#pragma once"));
    assert!(header.contains("#include <stdint.h>"));
    assert!(header.contains("#define SMTG_STDMETHODCALLTYPE __stdcall"));
    assert!(header.contains("#define SMTG_INLINE_UID(l1, l2, l3, l4)"));
    assert!(header.contains("typedef int16_t char16_t;"));
}

#[test]
fn result_codes_cover_both_layout_forms() {
    let (_, header) = convert_source(SOURCE);
    assert!(header.contains("static const Steinberg_tresult Steinberg_kNoInterface = 0x80004002L;"));
    assert!(header.contains("static const Steinberg_tresult Steinberg_kNoInterface = -1;"));
    assert!(header.contains("static const Steinberg_tresult Steinberg_kOutOfMemory = 6;"));
}

#[test]
fn forward_declarations_precede_definitions() {
    let (_, header) = convert_source(SOURCE);
    let forward_struct = header.find("struct Steinberg_Point;").expect("struct forward");
    let definition = header.find("struct Steinberg_Point\n{").expect("struct definition");
    assert!(forward_struct < definition);

    let forward_interface = header.find("struct Steinberg_IThing;").expect("interface forward");
    let vtable = header.find("typedef struct Steinberg_IThingVtbl").expect("vtable");
    assert!(forward_interface < vtable);
}

#[test]
fn declaration_order_drives_emission_order() {
    let (_, header) = convert_source(SOURCE);
    let first = header.find("} Steinberg_First;").unwrap();
    let second = header.find("} Steinberg_Second;").unwrap();
    assert!(first < second);
}

#[test]
fn re_emission_is_byte_identical() {
    let (tables, header) = convert_source(SOURCE);
    assert_eq!(emit_header(&tables), header);
    assert_eq!(emit_header(&tables), emit_header(&tables));
}

#[test]
fn banners_are_one_hundred_twenty_columns() {
    let (_, header) = convert_source(SOURCE);
    for line in header.lines() {
        // The 79-column license rule is framing of its own; section and
        // location banners are the 120-column kind.
        let is_rule = line.starts_with("/*----") && line.len() > 80;
        if is_rule || line.starts_with("----- ") {
            assert_eq!(line.len(), 120, "banner line has wrong width: {}", line);
        }
    }
}
