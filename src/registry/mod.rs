// Tue Mar 10 2026 - Alex

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::RegistryError;
pub use memory::InMemoryRegistry;
pub use traits::TypeRegistry;
pub use types::{
    AggregateKind, AggregateMember, AggregateType, CallingConvention, EnumMember, EnumType,
    FunctionParam, FunctionType, MemberFlags, Primitive, TypeHandle, POINTER_SIZE,
};
