//! Variable collection and constant-folding scenarios.

use crate::tests::test_utils::{convert_source, section};

#[test]
fn initializers_fold_through_variable_and_cast_chains() {
    let source = "namespace Steinberg {

typedef long int32;
typedef unsigned long uint32;

namespace Vst {

typedef uint32 Speaker;

const Speaker kSpeakerL = 1 << 0;
const Speaker kSpeakerR = 1 << 1;
const Speaker kSpeakerPl = (Speaker)1 << 31;
const Speaker kStereo = kSpeakerL | kSpeakerR;

}

static const int32 kMinLong = (-0x42 - 1);
static const int32 kMinInt32 = kMinLong;
static const uint32 kMaxInt32u = uint32 (kMinInt32);

}
";
    let (_, header) = convert_source(source);
    assert_eq!(
        section(&header, "Variable declarations"),
        "static const Steinberg_Vst_Speaker Steinberg_Vst_kSpeakerL = 1 << 0;
static const Steinberg_Vst_Speaker Steinberg_Vst_kSpeakerR = 1 << 1;
static const Steinberg_Vst_Speaker Steinberg_Vst_kSpeakerPl = (Steinberg_Vst_Speaker) 1 << 31;
static const Steinberg_Vst_Speaker Steinberg_Vst_kStereo = 1 << 0 | 1 << 1;
static const Steinberg_int32 Steinberg_kMinLong = (-0x42 - 1);
static const Steinberg_int32 Steinberg_kMinInt32 = (-0x42 - 1);
static const Steinberg_uint32 Steinberg_kMaxInt32u = (Steinberg_uint32) (-0x42 - 1);"
    );
}

#[test]
fn string_constants_keep_their_quoted_spelling() {
    let source = "namespace Vst {

typedef const char* CString;

const CString kStyle = \"style\";
const CString kEmpty = \"\";

}
";
    let (tables, _) = convert_source(source);
    assert_eq!(tables.variables.get("Vst_kStyle").unwrap().value, "\"style\"");
    assert_eq!(tables.variables.get("Vst_kEmpty").unwrap().value, "\"\"");
}

#[test]
fn enumerator_references_fold_to_their_value_text() {
    let source = "namespace Steinberg {

typedef int int32;

struct PFactoryInfo
{
    enum FactoryFlags
    {
        kUnicode = 1 << 4
    };

    int32 flags;
};

const int32 kDefaultFactoryFlags = PFactoryInfo::kUnicode;

}
";
    let (tables, _) = convert_source(source);
    assert_eq!(
        tables.variables.get("Steinberg_kDefaultFactoryFlags").unwrap().value,
        "1 << 4"
    );
}

#[test]
fn unknown_references_keep_their_spelling() {
    let source = "namespace Steinberg {

typedef int int32;

static const int32 kMaxInt = INT_MAX;

}
";
    let (tables, _) = convert_source(source);
    assert_eq!(tables.variables.get("Steinberg_kMaxInt").unwrap().value, "INT_MAX");
}

#[test]
fn variables_without_typedef_types_are_not_constants() {
    let source = "namespace Steinberg {

static const int kPlain = 3;

}
";
    let (tables, _) = convert_source(source);
    assert!(tables.variables.is_empty());
}

#[test]
fn static_cast_initializers_reconstruct_as_c_casts() {
    let source = "namespace Steinberg {

typedef int int32;
typedef unsigned int uint32;

static const uint32 kAll = static_cast<uint32>(-1);

}
";
    let (tables, _) = convert_source(source);
    assert_eq!(
        tables.variables.get("Steinberg_kAll").unwrap().value,
        "(Steinberg_uint32) -1"
    );
}
