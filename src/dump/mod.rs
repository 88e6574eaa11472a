// Tue Mar 10 2026 - Alex

pub mod complex_type;
pub mod enums;
pub mod loader;
pub mod record;
pub mod vtable;

pub use complex_type::ComplexTypeInfo;
pub use enums::{EnumInfo, EnumeratorInfo};
pub use loader::{DumpError, TypeDump};
pub use record::{FieldInfo, RecordInfo, RecordKind};
pub use vtable::{VtableComponentInfo, VtableFuncInfo};
