// Tue Mar 10 2026 - Alex

use serde::{Deserialize, Serialize};

/// A type expression as dumped by the frontend. Resolution into a registry
/// handle happens in the importer; this is pure description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComplexTypeInfo {
    TypeName {
        name: String,
    },
    Pointer {
        pointee_type: Box<ComplexTypeInfo>,
    },
    Array {
        element_type: Box<ComplexTypeInfo>,
        size: u64,
    },
    Function {
        param_types: Vec<ComplexTypeInfo>,
        return_type: Box<ComplexTypeInfo>,
    },
    MemberPointer {
        class_type: Box<ComplexTypeInfo>,
        pointee_type: Box<ComplexTypeInfo>,
        repr: String,
    },
}

impl ComplexTypeInfo {
    pub fn name(name: impl Into<String>) -> Self {
        Self::TypeName { name: name.into() }
    }

    pub fn pointer_to(pointee: ComplexTypeInfo) -> Self {
        Self::Pointer {
            pointee_type: Box::new(pointee),
        }
    }
}
