//! Interface collection, inheritance flattening and IID binding.

use crate::tests::test_utils::{convert_source, section};

#[test]
fn derived_vtable_lists_inherited_methods_first() {
    let source = "namespace App {

class IBase
{
public:
    virtual int PLUGIN_API foo () = 0;
};

class IDerived : public IBase
{
public:
    virtual int PLUGIN_API bar () = 0;
};

}
";
    let (tables, header) = convert_source(source);
    assert_eq!(
        tables.interfaces.get("App_IDerived").unwrap().ancestors,
        vec!["App_IBase".to_string()]
    );
    let expected = "typedef struct App_IDerivedVtbl
{
    /* methods derived from \"App_IBase\": */
    int (SMTG_STDMETHODCALLTYPE* foo) (void* thisInterface);

    /* methods defined in \"App_IDerived\": */
    int (SMTG_STDMETHODCALLTYPE* bar) (void* thisInterface);

} App_IDerivedVtbl;

typedef struct App_IDerived
{
    struct App_IDerivedVtbl* lpVtbl;
} App_IDerived;
";
    assert!(
        header.contains(expected),
        "derived vtable block malformed:\n{}",
        section(&header, "Interfaces")
    );
}

#[test]
fn ancestor_chains_flatten_transitively_without_duplicates() {
    let source = "namespace NS {

class A
{
public:
    virtual void a () = 0;
};

class B : public A
{
public:
    virtual void b () = 0;
};

class C : public B
{
public:
    virtual void c () = 0;
};

class D : public C, public A
{
public:
    virtual void d () = 0;
};

}
";
    let (tables, _) = convert_source(source);
    let c = tables.interfaces.get("NS_C").unwrap();
    assert_eq!(c.ancestors, vec!["NS_A".to_string(), "NS_B".to_string()]);
    let d = tables.interfaces.get("NS_D").unwrap();
    assert_eq!(
        d.ancestors,
        vec!["NS_A".to_string(), "NS_B".to_string(), "NS_C".to_string()]
    );
}

#[test]
fn forward_base_references_are_silently_dropped() {
    let source = "namespace NS {

class IEarly : public ILater
{
public:
    virtual void early () = 0;
};

class ILater
{
public:
    virtual void later () = 0;
};

}
";
    let (tables, _) = convert_source(source);
    assert!(tables.interfaces.get("NS_IEarly").unwrap().ancestors.is_empty());
}

#[test]
fn identifier_constants_bind_by_raw_tokens() {
    let source = "namespace Steinberg {

class IBase
{
public:
    virtual void foo () = 0;
};

DECLARE_CLASS_IID (IBase, 0x11111111, 0x22222222, 0x33333333, 0x44444444)

}
";
    let (tables, header) = convert_source(source);
    let interface = tables.interfaces.get("Steinberg_IBase").unwrap();
    assert_eq!(
        interface.iid,
        Some([
            "0x11111111".to_string(),
            "0x22222222".to_string(),
            "0x33333333".to_string(),
            "0x44444444".to_string(),
        ])
    );
    assert!(header.contains(
        "static const Steinberg_TUID Steinberg_IBase_iid = \
         SMTG_INLINE_UID (0x11111111, 0x22222222, 0x33333333, 0x44444444);"
    ));
}

#[test]
fn identifier_for_unknown_interface_is_ignored() {
    let source = "namespace Steinberg {

DECLARE_CLASS_IID (IMissing, 0x1, 0x2, 0x3, 0x4)

class IKnown
{
public:
    virtual void foo () = 0;
};

}
";
    let (tables, _) = convert_source(source);
    assert!(tables.interfaces.get("Steinberg_IKnown").unwrap().iid.is_none());
}

#[test]
fn iid_parameter_name_is_renamed() {
    let source = "namespace Steinberg {

typedef char TUID[16];

class FUnknown
{
public:
    virtual int PLUGIN_API queryInterface (const TUID _iid, void** obj) = 0;
};

}
";
    let (tables, _) = convert_source(source);
    let interface = tables.interfaces.get("Steinberg_FUnknown").unwrap();
    assert_eq!(
        interface.methods[0].args,
        vec![
            "const Steinberg_TUID iid".to_string(),
            "void** obj".to_string()
        ]
    );
}

#[test]
fn methods_returning_tag_types_take_the_struct_keyword() {
    let source = "namespace Geo {

struct Point
{
    int x;
    int y;
};

typedef int Coord;

class IShape
{
public:
    virtual Point* PLUGIN_API getOrigin () = 0;
    virtual Coord PLUGIN_API getArea () = 0;
};

}
";
    let (tables, _) = convert_source(source);
    let interface = tables.interfaces.get("Geo_IShape").unwrap();
    assert_eq!(interface.methods[0].return_type, "struct Geo_Point*");
    assert_eq!(interface.methods[1].return_type, "Geo_Coord");
}

#[test]
fn reference_parameters_render_as_pointers() {
    let source = "namespace Geo {

struct Point
{
    int x;
    int y;
};

class IShape
{
public:
    virtual int PLUGIN_API move (Point& target) = 0;
};

}
";
    let (tables, _) = convert_source(source);
    let interface = tables.interfaces.get("Geo_IShape").unwrap();
    assert_eq!(interface.methods[0].args, vec!["struct Geo_Point* target".to_string()]);
}

#[test]
fn forward_declarations_and_blocklisted_classes_are_skipped() {
    let source = "namespace Steinberg {

class IForward;

class FUID
{
public:
    virtual void blocked () = 0;
};

class IReal
{
public:
    virtual void real () = 0;
};

}
";
    let (tables, _) = convert_source(source);
    assert!(tables.interfaces.get("Steinberg_IForward").is_none());
    assert!(tables.interfaces.get("Steinberg_FUID").is_none());
    assert!(tables.interfaces.get("Steinberg_IReal").is_some());
}

#[test]
fn doc_comment_becomes_the_interface_description() {
    let source = "namespace App {

/** Handles unit selection callbacks. */
class IHandler
{
public:
    virtual void notify () = 0;
};

}
";
    let (tables, _) = convert_source(source);
    assert_eq!(
        tables.interfaces.get("App_IHandler").unwrap().description.as_deref(),
        Some("Handles unit selection callbacks.")
    );
}
