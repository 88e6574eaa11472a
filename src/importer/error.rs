// Wed Mar 11 2026 - Alex

use crate::registry::RegistryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("enum `{name}` has an unsupported underlying size of {size} bytes")]
    EnumUnderlyingSize { name: String, size: u64 },
    #[error("size mismatch for `{name}`: computed {computed} bytes, dump declares {declared}")]
    SizeMismatch {
        name: String,
        computed: u64,
        declared: u64,
    },
    #[error("record `{record}` references base `{base}` that is missing from the dump")]
    MissingBaseRecord { record: String, base: String },
    #[error("could not resolve type name `{name}`")]
    UnresolvedTypeName { name: String },
    #[error("member `{member}` of `{record}` has no computable size")]
    UnsizedMember { record: String, member: String },
    #[error("definition for `{name}` has no computable size")]
    UnsizedDefinition { name: String },
    #[error("vtable slot `{slot}` of `{record}` did not resolve to a function type")]
    VtableSlotNotFunction { record: String, slot: String },
    #[error("registry rejected `{name}`: {source}")]
    Registry {
        name: String,
        #[source]
        source: RegistryError,
    },
}
