//! Struct and union collection scenarios.

use crate::tests::test_utils::{convert_source, section, without_location_banners};

#[test]
fn two_member_struct_emits_one_line_per_field() {
    let source = "namespace Steinberg {

typedef int int32;

struct Point
{
    int32 x;
    int32 y;
};

}
";
    let (tables, header) = convert_source(source);
    let record = tables.structs.get("Steinberg_Point").unwrap();
    assert_eq!(
        record.members,
        vec!["Steinberg_int32 x;".to_string(), "Steinberg_int32 y;".to_string()]
    );

    let body = section(&header, "Structs");
    assert!(body.contains("Source: \"pluginterfaces/test_header.h\", line 5 */"));
    assert_eq!(
        without_location_banners(&body),
        "struct Steinberg_Point\n{\n    Steinberg_int32 x;\n    Steinberg_int32 y;\n};"
    );
}

#[test]
fn constant_array_fields_resolve_their_bound_expressions() {
    let source = "namespace Steinberg {

typedef int int32;
typedef char char8;

static const int32 kVendorSize = 256 << 4;

struct PFactoryInfo
{
    char8 vendor[kVendorSize];
    char8 url[256];
    int32 flags;
};

}
";
    let (tables, _) = convert_source(source);
    let record = tables.structs.get("Steinberg_PFactoryInfo").unwrap();
    assert_eq!(
        record.members,
        vec![
            "Steinberg_char8 vendor[256 << 4];".to_string(),
            "Steinberg_char8 url[256];".to_string(),
            "Steinberg_int32 flags;".to_string(),
        ]
    );
}

#[test]
fn nested_unions_are_inlined_with_prefixed_member_names() {
    let source = "namespace Steinberg {

struct Event
{
    int busIndex;
    union
    {
        int noteOn;
        int noteOff;
    };
};

}
";
    let (tables, header) = convert_source(source);
    let nested = tables.unions.get("Steinberg_Event").unwrap();
    assert_eq!(
        nested.members,
        vec![
            "int Steinberg_Event_noteOn".to_string(),
            "int Steinberg_Event_noteOff".to_string()
        ]
    );
    let body = without_location_banners(&section(&header, "Structs"));
    assert_eq!(
        body,
        "struct Steinberg_Event
{
    int busIndex;
    union
    {
        int Steinberg_Event_noteOn;
        int Steinberg_Event_noteOff;
    };
};"
    );
}

#[test]
fn struct_typed_fields_take_the_struct_keyword() {
    let source = "namespace Steinberg {

struct Inner
{
    int value;
};

struct Outer
{
    Inner nested;
    Inner* link;
};

}
";
    let (tables, _) = convert_source(source);
    let record = tables.structs.get("Steinberg_Outer").unwrap();
    assert_eq!(
        record.members,
        vec![
            "struct Steinberg_Inner nested;".to_string(),
            "struct Steinberg_Inner* link;".to_string()
        ]
    );
}

#[test]
fn forward_declared_and_fieldless_structs_are_skipped() {
    let source = "namespace Steinberg {

struct Forward;

struct OnlyEnum
{
    enum Flags
    {
        kSet = 1
    };
};

}
";
    let (tables, _) = convert_source(source);
    assert!(tables.structs.get("Steinberg_Forward").is_none());
    assert!(tables.structs.get("Steinberg_OnlyEnum").is_none());
    // The nested enum still reaches the enum table.
    assert!(tables.enums.get("Steinberg_OnlyEnum_Flags").is_some());
}
