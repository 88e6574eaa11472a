// Tue Mar 10 2026 - Alex

use crate::dump::complex_type::ComplexTypeInfo;
use serde::{Deserialize, Serialize};

/// Payload shared by the three function-slot component kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VtableFuncInfo {
    pub is_thunk: bool,
    pub repr: String,
    pub function_name: String,
    #[serde(rename = "type")]
    pub ty: ComplexTypeInfo,
    // Adjustment fields are only emitted when is_thunk is set.
    #[serde(default)]
    pub return_adjustment: i64,
    #[serde(default)]
    pub return_adjustment_vbase_offset_offset: i64,
    #[serde(default)]
    pub this_adjustment: i64,
    #[serde(default)]
    pub this_adjustment_vcall_offset_offset: i64,
}

/// One entry of a record's flat vtable component list, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VtableComponentInfo {
    VcallOffset { offset: i64 },
    VbaseOffset { offset: i64 },
    OffsetToTop { offset: i64 },
    Rtti { class_name: String },
    Func(VtableFuncInfo),
    CompleteDtor(VtableFuncInfo),
    DeletingDtor(VtableFuncInfo),
}
