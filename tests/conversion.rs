//! End-to-end conversion of a representative interface header.

use std::path::Path;

use interface_convert::driver::convert_buffer;

const HEADER: &str = "#pragma once

namespace Steinberg {

typedef int int32;
typedef unsigned int uint32;
typedef int32 tresult;
typedef char int8;
typedef int8 TUID[16];
typedef const char* FIDString;
typedef int32 UnitID;
typedef int32 ProgramListID;

class FUnknown
{
public:
    virtual tresult PLUGIN_API queryInterface (const TUID _iid, void** obj) = 0;
    virtual uint32 PLUGIN_API addRef () = 0;
};

DECLARE_CLASS_IID (FUnknown, 0x00000000, 0x00000000, 0xC0000000, 0x00000046)

namespace Vst {

struct UnitInfo
{
    UnitID id;
    UnitID parentUnitId;
    ProgramListID programListId;
};

class IUnitHandler : public FUnknown
{
public:
    virtual tresult PLUGIN_API notifyUnitSelection (UnitID unitId) = 0;
    virtual tresult PLUGIN_API notifyProgramListChange (ProgramListID listId, int32 programIndex) = 0;
};

DECLARE_CLASS_IID (IUnitHandler, 0x4B5147F8, 0x4654486B, 0x8DAB30BA, 0x163A3C56)

class IUnitInfo : public IUnitHandler
{
public:
    virtual int32 PLUGIN_API getUnitCount () = 0;
    virtual tresult PLUGIN_API getUnitInfo (int32 unitIndex, UnitInfo& info) = 0;
};

DECLARE_CLASS_IID (IUnitInfo, 0x3D4BD6B5, 0x913A4FD2, 0xA886E768, 0xA5EB92C1)

}
}
";

fn convert() -> (interface_convert::symbols::SymbolTables, String) {
    convert_buffer(
        Path::new("pluginterfaces/vst/ivstunits.h"),
        HEADER,
        Path::new("pluginterfaces"),
    )
    .expect("conversion should succeed")
}

#[test]
fn base_interface_vtable_holds_only_its_own_methods() {
    let (_, header) = convert();
    let expected = "typedef struct Steinberg_FUnknownVtbl
{
    /* methods defined in \"Steinberg_FUnknown\": */
    Steinberg_tresult (SMTG_STDMETHODCALLTYPE* queryInterface) (void* thisInterface, const Steinberg_TUID iid, void** obj);
    Steinberg_uint32 (SMTG_STDMETHODCALLTYPE* addRef) (void* thisInterface);

} Steinberg_FUnknownVtbl;

typedef struct Steinberg_FUnknown
{
    struct Steinberg_FUnknownVtbl* lpVtbl;
} Steinberg_FUnknown;

static const Steinberg_TUID Steinberg_FUnknown_iid = SMTG_INLINE_UID (0x00000000, 0x00000000, 0xC0000000, 0x00000046);
";
    assert!(header.contains(expected), "FUnknown block malformed");
}

#[test]
fn transitive_vtable_splices_every_ancestor_in_order() {
    let (tables, header) = convert();
    assert_eq!(
        tables.interfaces.get("Steinberg_Vst_IUnitInfo").unwrap().ancestors,
        vec![
            "Steinberg_FUnknown".to_string(),
            "Steinberg_Vst_IUnitHandler".to_string()
        ]
    );
    let expected = "typedef struct Steinberg_Vst_IUnitInfoVtbl
{
    /* methods derived from \"Steinberg_FUnknown\": */
    Steinberg_tresult (SMTG_STDMETHODCALLTYPE* queryInterface) (void* thisInterface, const Steinberg_TUID iid, void** obj);
    Steinberg_uint32 (SMTG_STDMETHODCALLTYPE* addRef) (void* thisInterface);

    /* methods derived from \"Steinberg_Vst_IUnitHandler\": */
    Steinberg_tresult (SMTG_STDMETHODCALLTYPE* notifyUnitSelection) (void* thisInterface, Steinberg_UnitID unitId);
    Steinberg_tresult (SMTG_STDMETHODCALLTYPE* notifyProgramListChange) (void* thisInterface, Steinberg_ProgramListID listId, Steinberg_int32 programIndex);

    /* methods defined in \"Steinberg_Vst_IUnitInfo\": */
    Steinberg_int32 (SMTG_STDMETHODCALLTYPE* getUnitCount) (void* thisInterface);
    Steinberg_tresult (SMTG_STDMETHODCALLTYPE* getUnitInfo) (void* thisInterface, Steinberg_int32 unitIndex, struct Steinberg_Vst_UnitInfo* info);

} Steinberg_Vst_IUnitInfoVtbl;
";
    assert!(header.contains(expected), "IUnitInfo vtable malformed");
}

#[test]
fn every_interface_identifier_is_bound() {
    let (tables, header) = convert();
    for name in [
        "Steinberg_FUnknown",
        "Steinberg_Vst_IUnitHandler",
        "Steinberg_Vst_IUnitInfo",
    ] {
        assert!(
            tables.interfaces.get(name).unwrap().iid.is_some(),
            "{} lost its identifier",
            name
        );
    }
    assert!(header.contains(
        "static const Steinberg_TUID Steinberg_Vst_IUnitInfo_iid = SMTG_INLINE_UID (0x3D4BD6B5, 0x913A4FD2, 0xA886E768, 0xA5EB92C1);"
    ));
}

#[test]
fn structs_keep_declaration_order_and_typedef_fields() {
    let (tables, _) = convert();
    let record = tables.structs.get("Steinberg_Vst_UnitInfo").unwrap();
    assert_eq!(
        record.members,
        vec![
            "Steinberg_UnitID id;".to_string(),
            "Steinberg_UnitID parentUnitId;".to_string(),
            "Steinberg_ProgramListID programListId;".to_string(),
        ]
    );
}

#[test]
fn typedef_table_preserves_file_order() {
    let (tables, _) = convert();
    let names: Vec<&str> = tables.typedefs.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Steinberg_int32",
            "Steinberg_uint32",
            "Steinberg_tresult",
            "Steinberg_int8",
            "Steinberg_TUID[16]",
            "Steinberg_FIDString",
            "Steinberg_UnitID",
            "Steinberg_ProgramListID",
        ]
    );
}

#[test]
fn summary_counts_match_the_tables() {
    let (tables, _) = convert();
    assert_eq!(tables.interfaces.len(), 3);
    assert_eq!(tables.structs.len(), 1);
    assert_eq!(tables.enums.len(), 0);
}
