// Tue Mar 10 2026 - Alex

use crate::registry::error::RegistryError;
use crate::registry::types::TypeHandle;

/// The mutable named-type namespace the import engine writes into.
///
/// Identity is name-based and mutation happens in place: `register` always
/// replaces an existing type with the same name. Pointer/array/function
/// construction are pure value operations on [`TypeHandle`] and need no
/// registry involvement.
pub trait TypeRegistry {
    /// Register or replace the type stored under `name`.
    fn register(&mut self, name: &str, ty: TypeHandle) -> Result<(), RegistryError>;

    /// Look up a named type. Returns the stored definition, not a copy of
    /// the name reference.
    fn lookup(&self, name: &str) -> Option<TypeHandle>;

    /// Ensure `name` exists at least as an opaque aggregate and return a
    /// reference handle to it. Existing definitions are left untouched.
    fn forward_declare(&mut self, name: &str) -> Result<TypeHandle, RegistryError>;

    /// Byte size of a type, resolving named references through the
    /// namespace. `None` for unsized types (functions, unknown names).
    fn size_of(&self, ty: &TypeHandle) -> Option<u64>;

    /// Alignment of a type in bytes, resolved the same way as `size_of`.
    fn alignment_of(&self, ty: &TypeHandle) -> Option<u64>;
}
