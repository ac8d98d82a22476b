use serde::{Deserialize, Serialize};

/// The fixed 13-member scale enumeration, serialized as the exact
/// upper-case snake_case labels below (no further casing transform).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Scale {
    #[serde(rename = "C_MAJOR_A_MINOR")]
    CMajorAMinor,
    #[serde(rename = "D_FLAT_MAJOR_B_FLAT_MINOR")]
    DFlatMajorBFlatMinor,
    #[serde(rename = "D_MAJOR_B_MINOR")]
    DMajorBMinor,
    #[serde(rename = "E_FLAT_MAJOR_C_MINOR")]
    EFlatMajorCMinor,
    #[serde(rename = "E_MAJOR_D_FLAT_MINOR")]
    EMajorDFlatMinor,
    #[serde(rename = "F_MAJOR_D_MINOR")]
    FMajorDMinor,
    #[serde(rename = "G_FLAT_MAJOR_E_FLAT_MINOR")]
    GFlatMajorEFlatMinor,
    #[serde(rename = "G_MAJOR_E_MINOR")]
    GMajorEMinor,
    #[serde(rename = "A_FLAT_MAJOR_F_MINOR")]
    AFlatMajorFMinor,
    #[serde(rename = "A_MAJOR_G_FLAT_MINOR")]
    AMajorGFlatMinor,
    #[serde(rename = "B_FLAT_MAJOR_G_MINOR")]
    BFlatMajorGMinor,
    #[serde(rename = "B_MAJOR_A_FLAT_MINOR")]
    BMajorAFlatMinor,
    #[serde(rename = "SCALE_UNSPECIFIED")]
    #[default]
    Unspecified,
}
