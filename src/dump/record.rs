// Tue Mar 10 2026 - Alex

use crate::dump::complex_type::ComplexTypeInfo;
use crate::dump::vtable::VtableComponentInfo;
use serde::{Deserialize, Serialize};

/// Record kinds, serialized as the dump's integer encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RecordKind {
    Class,
    Struct,
    Union,
}

impl TryFrom<u8> for RecordKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Class),
            1 => Ok(Self::Struct),
            2 => Ok(Self::Union),
            other => Err(format!("unexpected record kind {}", other)),
        }
    }
}

impl From<RecordKind> for u8 {
    fn from(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Class => 0,
            RecordKind::Struct => 1,
            RecordKind::Union => 2,
        }
    }
}

/// One field of a record, tagged by kind. Offsets are bytes from the start
/// of the record and arrive in non-decreasing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldInfo {
    Member {
        offset: u64,
        name: String,
        type_name: String,
        #[serde(rename = "type")]
        ty: ComplexTypeInfo,
        #[serde(default)]
        bitfield_width: Option<u32>,
    },
    Base {
        offset: u64,
        is_primary: bool,
        is_virtual: bool,
        type_name: String,
    },
    VtablePtr {
        offset: u64,
    },
}

impl FieldInfo {
    pub fn offset(&self) -> u64 {
        match self {
            Self::Member { offset, .. } | Self::Base { offset, .. } | Self::VtablePtr { offset } => {
                *offset
            }
        }
    }
}

/// A class/struct/union description. Compared by full structural equality
/// for the incremental up-to-date check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordInfo {
    pub is_anonymous: bool,
    pub kind: RecordKind,
    pub name: String,
    pub size: u64,
    pub data_size: u64,
    pub alignment: u64,
    pub fields: Vec<FieldInfo>,
    #[serde(default)]
    pub vtable: Option<Vec<VtableComponentInfo>>,
}
