// Tue Mar 10 2026 - Alex

use crate::registry::error::RegistryError;
use crate::registry::traits::TypeRegistry;
use crate::registry::types::{AggregateType, TypeHandle, POINTER_SIZE};
use indexmap::IndexMap;

/// In-memory [`TypeRegistry`] backed by an insertion-ordered name map.
///
/// Serves both as the backing store for the CLI and as the verification
/// double for commit/skip decisions in tests (`write_count` observes every
/// mutation).
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    types: IndexMap<String, TypeHandle>,
    writes: usize,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of register/forward-declare mutations performed so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// All registered types in registration order.
    pub fn types(&self) -> &IndexMap<String, TypeHandle> {
        &self.types
    }

    fn aggregate_size(&self, agg: &AggregateType) -> u64 {
        let bytes = (agg.end_bits() + 7) / 8;
        let align = agg.alignment;
        (bytes + align - 1) & !(align - 1)
    }
}

impl TypeRegistry for InMemoryRegistry {
    fn register(&mut self, name: &str, ty: TypeHandle) -> Result<(), RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        if matches!(&ty, TypeHandle::Named(target) if target == name) {
            return Err(RegistryError::Unregisterable(name.to_string()));
        }
        self.types.insert(name.to_string(), ty);
        self.writes += 1;
        Ok(())
    }

    fn lookup(&self, name: &str) -> Option<TypeHandle> {
        self.types.get(name).cloned()
    }

    fn forward_declare(&mut self, name: &str) -> Result<TypeHandle, RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        if !self.types.contains_key(name) {
            self.types
                .insert(name.to_string(), TypeHandle::Aggregate(AggregateType::opaque()));
            self.writes += 1;
        }
        Ok(TypeHandle::Named(name.to_string()))
    }

    fn size_of(&self, ty: &TypeHandle) -> Option<u64> {
        match ty {
            TypeHandle::Primitive(p) => Some(p.size()),
            TypeHandle::Named(name) => {
                let stored = self.types.get(name)?;
                self.size_of(stored)
            }
            TypeHandle::Pointer(_) => Some(POINTER_SIZE),
            TypeHandle::Volatile(inner) => self.size_of(inner),
            TypeHandle::Array { element, count } => {
                self.size_of(element).map(|size| size * count)
            }
            TypeHandle::Function(_) => None,
            TypeHandle::Enum(e) => Some(e.byte_size),
            TypeHandle::Aggregate(agg) => Some(self.aggregate_size(agg)),
        }
    }

    fn alignment_of(&self, ty: &TypeHandle) -> Option<u64> {
        match ty {
            TypeHandle::Primitive(p) => Some(p.alignment()),
            TypeHandle::Named(name) => {
                let stored = self.types.get(name)?;
                self.alignment_of(stored)
            }
            TypeHandle::Pointer(_) => Some(POINTER_SIZE),
            TypeHandle::Volatile(inner) => self.alignment_of(inner),
            TypeHandle::Array { element, .. } => self.alignment_of(element),
            TypeHandle::Function(_) => None,
            TypeHandle::Enum(e) => Some(e.byte_size),
            TypeHandle::Aggregate(agg) => Some(agg.alignment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::types::{AggregateKind, AggregateMember, Primitive};

    fn int_member(name: &str, bit_offset: u64) -> AggregateMember {
        AggregateMember::new(name, TypeHandle::Primitive(Primitive::I32), bit_offset, 32)
    }

    #[test]
    fn test_register_replaces() {
        let mut reg = InMemoryRegistry::new();
        reg.register("T", TypeHandle::Primitive(Primitive::I32)).unwrap();
        reg.register("T", TypeHandle::Primitive(Primitive::I64)).unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.write_count(), 2);
        assert_eq!(reg.size_of(&TypeHandle::Named("T".into())), Some(8));
    }

    #[test]
    fn test_register_rejects_empty_name() {
        let mut reg = InMemoryRegistry::new();
        assert!(reg.register("", TypeHandle::Primitive(Primitive::I32)).is_err());
    }

    #[test]
    fn test_register_rejects_self_alias() {
        let mut reg = InMemoryRegistry::new();
        assert!(reg.register("T", TypeHandle::Named("T".into())).is_err());
    }

    #[test]
    fn test_forward_declare_is_idempotent() {
        let mut reg = InMemoryRegistry::new();
        reg.register("T", TypeHandle::Primitive(Primitive::I32)).unwrap();
        let handle = reg.forward_declare("T").unwrap();
        assert_eq!(handle, TypeHandle::Named("T".into()));
        // Existing definition untouched.
        assert_eq!(reg.size_of(&handle), Some(4));

        let fresh = reg.forward_declare("U").unwrap();
        assert_eq!(reg.size_of(&fresh), Some(0));
        assert!(reg.contains("U"));
    }

    #[test]
    fn test_size_of_composites() {
        let reg = InMemoryRegistry::new();
        let int = TypeHandle::Primitive(Primitive::I32);
        assert_eq!(reg.size_of(&int.clone().pointer()), Some(8));
        assert_eq!(reg.size_of(&int.clone().array(3)), Some(12));
        assert_eq!(reg.size_of(&int.volatile()), Some(4));
        assert_eq!(reg.size_of(&TypeHandle::Named("missing".into())), None);
    }

    #[test]
    fn test_aggregate_size_rounds_to_alignment() {
        let reg = InMemoryRegistry::new();
        let mut agg = AggregateType::new(AggregateKind::Struct, 8);
        agg.push(int_member("a", 0));
        agg.push(int_member("b", 32));
        agg.push(AggregateMember::new(
            "c",
            TypeHandle::Primitive(Primitive::Char),
            64,
            8,
        ));
        // 9 bytes of data, rounded up to 16.
        assert_eq!(reg.size_of(&TypeHandle::Aggregate(agg.clone())), Some(16));

        agg.alignment = 1;
        assert_eq!(reg.size_of(&TypeHandle::Aggregate(agg)), Some(9));
    }

    #[test]
    fn test_named_resolution_chain() {
        let mut reg = InMemoryRegistry::new();
        reg.register("inner", TypeHandle::Primitive(Primitive::I16)).unwrap();
        reg.register("outer", TypeHandle::Named("inner".into())).unwrap();
        assert_eq!(reg.size_of(&TypeHandle::Named("outer".into())), Some(2));
        assert_eq!(reg.alignment_of(&TypeHandle::Named("outer".into())), Some(2));
    }
}
