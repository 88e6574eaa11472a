// Wed Mar 11 2026 - Alex

use crate::dump::{FieldInfo, RecordInfo, RecordKind};
use crate::importer::driver::Importer;
use crate::importer::error::ImportError;
use crate::importer::names::{unaligned_struct_name, vtable_struct_name};
use crate::registry::{
    AggregateKind, AggregateMember, AggregateType, MemberFlags, Primitive, TypeHandle,
    TypeRegistry,
};

/// Which of the two per-record registrations is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// The general-use definition with the declared alignment.
    Aligned,
    /// The tail-padding-reusable variant: alignment 1, no trailing padding.
    Unaligned,
}

impl<'a> Importer<'a> {
    /// Translate an ordered field list into a gap-filled aggregate
    /// definition. Identical walk for both modes; automatic padding cannot
    /// be relied upon once unaligned packing is requested.
    pub(crate) fn build_record_definition(
        &mut self,
        record: &RecordInfo,
        mode: LayoutMode,
    ) -> Result<AggregateType, ImportError> {
        let kind = match record.kind {
            RecordKind::Union => AggregateKind::Union,
            RecordKind::Class | RecordKind::Struct => AggregateKind::Struct,
        };
        let alignment = match mode {
            LayoutMode::Aligned => record.alignment,
            LayoutMode::Unaligned => 1,
        };
        let mut def = AggregateType::new(kind, alignment);

        let reuse_tail_padding = self.reuses_base_tail_padding(record)?;

        for field in &record.fields {
            Self::fill_gap(&mut def, field.offset());
            if let Err(err) = self.append_field(&mut def, field, &record.name, reuse_tail_padding)
            {
                log::error!(
                    "failed to import field at offset {} of `{}`",
                    field.offset(),
                    record.name
                );
                return Err(err);
            }
        }

        Ok(def)
    }

    /// Whether this is a derived class that places members inside a base
    /// class's tail padding. The classification is record-global: it
    /// controls base-field resolution for every base of the record.
    fn reuses_base_tail_padding(&self, record: &RecordInfo) -> Result<bool, ImportError> {
        let mut previous_base: Option<(u64, &str)> = None;
        for field in &record.fields {
            if let Some((base_offset, base_name)) = previous_base {
                let base = self.records.get(base_name).ok_or_else(|| {
                    ImportError::MissingBaseRecord {
                        record: record.name.clone(),
                        base: base_name.to_string(),
                    }
                })?;
                if field.offset() < base_offset + base.size {
                    return Ok(true);
                }
            }
            if let FieldInfo::Base {
                offset, type_name, ..
            } = field
            {
                previous_base = Some((*offset, type_name));
            }
        }
        Ok(false)
    }

    /// Insert a synthetic padding member when the next field starts past
    /// the end of the previous one.
    fn fill_gap(def: &mut AggregateType, field_offset: u64) {
        let Some(last) = def.members.last() else {
            return;
        };
        let gap_offset = last.bit_offset + last.bit_size;
        let field_bits = field_offset * 8;
        if field_bits <= gap_offset {
            return;
        }
        let gap_bits = field_bits - gap_offset;
        def.push(AggregateMember::new(
            format!("gap{:X}", gap_offset / 8),
            TypeHandle::Primitive(Primitive::Char).array(gap_bits / 8),
            gap_offset,
            gap_bits,
        ));
    }

    fn append_field(
        &mut self,
        def: &mut AggregateType,
        field: &FieldInfo,
        record_name: &str,
        reuse_tail_padding: bool,
    ) -> Result<(), ImportError> {
        let bit_offset = field.offset() * 8;

        let (member_name, ty, flags, forced_bit_size) = match field {
            FieldInfo::Member {
                name,
                ty,
                bitfield_width,
                ..
            } => {
                let handle = self.resolve_complex(ty, None)?;
                (
                    name.clone(),
                    handle,
                    MemberFlags::empty(),
                    bitfield_width.map(u64::from),
                )
            }
            FieldInfo::Base {
                offset,
                type_name,
                is_virtual,
                ..
            } => {
                let mut handle = self.resolve_named(type_name)?;
                if reuse_tail_padding {
                    handle = self.resolve_named(&unaligned_struct_name(type_name))?;
                }
                let mut flags = MemberFlags::BASE_CLASS;
                if *is_virtual {
                    flags |= MemberFlags::VIRTUAL_BASE;
                }
                (format!("baseclass_{}", offset), handle, flags, None)
            }
            FieldInfo::VtablePtr { .. } => {
                let handle = self.pointer_to_named(&vtable_struct_name(record_name))?;
                ("__vftable".to_string(), handle, MemberFlags::VTABLE_PTR, None)
            }
        };

        let byte_size =
            self.registry
                .size_of(&ty)
                .ok_or_else(|| ImportError::UnsizedMember {
                    record: record_name.to_string(),
                    member: member_name.clone(),
                })?;
        let bit_size = forced_bit_size.unwrap_or(byte_size * 8);

        def.push(AggregateMember::new(member_name, ty, bit_offset, bit_size).with_flags(flags));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::{ComplexTypeInfo, TypeDump};
    use crate::registry::{InMemoryRegistry, TypeRegistry};

    fn record(name: &str, size: u64, alignment: u64, fields: Vec<FieldInfo>) -> RecordInfo {
        RecordInfo {
            is_anonymous: false,
            kind: RecordKind::Struct,
            name: name.into(),
            size,
            data_size: size,
            alignment,
            fields,
            vtable: None,
        }
    }

    fn member(offset: u64, name: &str, type_name: &str) -> FieldInfo {
        FieldInfo::Member {
            offset,
            name: name.into(),
            type_name: type_name.into(),
            ty: ComplexTypeInfo::name(type_name),
            bitfield_width: None,
        }
    }

    fn base(offset: u64, type_name: &str) -> FieldInfo {
        FieldInfo::Base {
            offset,
            is_primary: offset == 0,
            is_virtual: false,
            type_name: type_name.into(),
        }
    }

    fn lookup_aggregate(reg: &InMemoryRegistry, name: &str) -> AggregateType {
        match reg.lookup(name) {
            Some(TypeHandle::Aggregate(agg)) => agg,
            other => panic!("expected aggregate under `{}`, got {:?}", name, other),
        }
    }

    #[test]
    fn test_gap_filling_inserts_single_padding_member() {
        let dump = TypeDump {
            enums: vec![],
            records: vec![record(
                "G",
                12,
                4,
                vec![member(0, "head", "int"), member(8, "tail", "int")],
            )],
        };
        let mut reg = InMemoryRegistry::new();
        Importer::new(&dump, &mut reg).run(None).unwrap();

        let agg = lookup_aggregate(&reg, "G");
        assert_eq!(agg.members.len(), 3);
        let gap = &agg.members[1];
        assert_eq!(gap.name, "gap4");
        assert_eq!(gap.bit_offset, 32);
        assert_eq!(gap.bit_size, 32);
        match &gap.ty {
            TypeHandle::Array { count, .. } => assert_eq!(*count, 4),
            other => panic!("unexpected gap type {:?}", other),
        }
    }

    #[test]
    fn test_tail_padding_reuse_references_unaligned_base() {
        let base_record = record(
            "Base",
            16,
            8,
            vec![member(0, "a", "long"), member(8, "b", "int")],
        );
        let derived = record(
            "Derived",
            16,
            8,
            vec![base(0, "Base"), member(12, "c", "int")],
        );
        let dump = TypeDump {
            enums: vec![],
            records: vec![base_record, derived],
        };
        let mut reg = InMemoryRegistry::new();
        Importer::new(&dump, &mut reg).run(None).unwrap();

        let agg = lookup_aggregate(&reg, "Derived");
        let base_member = &agg.members[0];
        assert_eq!(base_member.name, "baseclass_0");
        assert!(base_member.flags.contains(MemberFlags::BASE_CLASS));
        assert_eq!(base_member.ty, TypeHandle::Named("$$Base".into()));
        // The unaligned base stops at its data size, freeing the tail.
        assert_eq!(base_member.bit_size, 96);
        assert_eq!(agg.members[1].bit_offset, 96);
        assert_eq!(reg.size_of(&TypeHandle::Named("Derived".into())), Some(16));
    }

    #[test]
    fn test_adjacent_bases_without_reuse_stay_aligned() {
        let base_record = record("B1", 8, 8, vec![member(0, "a", "long")]);
        let derived = record(
            "D",
            16,
            8,
            vec![base(0, "B1"), member(8, "c", "long")],
        );
        let dump = TypeDump {
            enums: vec![],
            records: vec![base_record, derived],
        };
        let mut reg = InMemoryRegistry::new();
        Importer::new(&dump, &mut reg).run(None).unwrap();

        let agg = lookup_aggregate(&reg, "D");
        assert_eq!(agg.members[0].ty, TypeHandle::Named("B1".into()));
    }

    #[test]
    fn test_bitfield_width_is_honored() {
        let fields = vec![
            FieldInfo::Member {
                offset: 0,
                name: "lo".into(),
                type_name: "int".into(),
                ty: ComplexTypeInfo::name("int"),
                bitfield_width: Some(16),
            },
            FieldInfo::Member {
                offset: 2,
                name: "hi".into(),
                type_name: "int".into(),
                ty: ComplexTypeInfo::name("int"),
                bitfield_width: Some(16),
            },
        ];
        let dump = TypeDump {
            enums: vec![],
            records: vec![record("Bits", 4, 4, fields)],
        };
        let mut reg = InMemoryRegistry::new();
        Importer::new(&dump, &mut reg).run(None).unwrap();

        let agg = lookup_aggregate(&reg, "Bits");
        assert_eq!(agg.members[0].bit_size, 16);
        assert_eq!(agg.members[1].bit_offset, 16);
        assert_eq!(reg.size_of(&TypeHandle::Named("Bits".into())), Some(4));
    }

    #[test]
    fn test_union_members_overlap() {
        let mut union_record = record(
            "U",
            8,
            8,
            vec![member(0, "i", "int"), member(0, "l", "long")],
        );
        union_record.kind = RecordKind::Union;
        let dump = TypeDump {
            enums: vec![],
            records: vec![union_record],
        };
        let mut reg = InMemoryRegistry::new();
        Importer::new(&dump, &mut reg).run(None).unwrap();

        let agg = lookup_aggregate(&reg, "U");
        assert_eq!(agg.kind, AggregateKind::Union);
        assert_eq!(agg.members.len(), 2);
        assert_eq!(reg.size_of(&TypeHandle::Named("U".into())), Some(8));
    }

    #[test]
    fn test_vtable_ptr_field_forward_declares_layout_struct() {
        let dump = TypeDump {
            enums: vec![],
            records: vec![record(
                "V",
                16,
                8,
                vec![FieldInfo::VtablePtr { offset: 0 }, member(8, "x", "int")],
            )],
        };
        let mut reg = InMemoryRegistry::new();
        Importer::new(&dump, &mut reg).run(None).unwrap();

        let agg = lookup_aggregate(&reg, "V");
        let vptr = &agg.members[0];
        assert_eq!(vptr.name, "__vftable");
        assert!(vptr.flags.contains(MemberFlags::VTABLE_PTR));
        assert_eq!(vptr.ty, TypeHandle::Named("V_vtbl".into()).pointer());
        assert!(reg.contains("V_vtbl"));
        assert_eq!(reg.size_of(&TypeHandle::Named("V".into())), Some(16));
    }

    #[test]
    fn test_missing_base_record_is_fatal() {
        let derived = record(
            "D",
            8,
            4,
            vec![base(0, "Phantom"), member(4, "x", "int")],
        );
        let dump = TypeDump {
            enums: vec![],
            records: vec![derived],
        };
        let mut reg = InMemoryRegistry::new();
        let err = Importer::new(&dump, &mut reg).run(None).unwrap_err();
        assert!(matches!(err, ImportError::MissingBaseRecord { .. }));
    }
}
