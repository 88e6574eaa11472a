// Tue Mar 10 2026 - Alex

use serde::{Deserialize, Serialize};

/// One `(identifier, value)` pair of an enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumeratorInfo {
    pub identifier: String,
    pub value: i128,
}

/// A C++ enum as described by the dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumInfo {
    pub is_scoped: bool,
    pub is_anonymous: bool,
    pub name: String,
    pub underlying_type_name: String,
    pub underlying_type_size: u64,
    pub enumerators: Vec<EnumeratorInfo>,
}
