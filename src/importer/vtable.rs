// Wed Mar 11 2026 - Alex

use crate::dump::{RecordInfo, VtableComponentInfo, VtableFuncInfo};
use crate::importer::driver::Importer;
use crate::importer::error::ImportError;
use crate::importer::names::{format_this_adjustment, vtable_struct_name};
use crate::registry::{
    AggregateKind, AggregateMember, AggregateType, Primitive, TypeHandle, POINTER_SIZE,
};
use ahash::AHashMap;

impl<'a> Importer<'a> {
    /// Rebuild the vtable layout struct for a record and register it as
    /// `<record>_vtbl`.
    ///
    /// Components are walked left to right with a running slot offset.
    /// Metadata ahead of the first function slot belongs to the table
    /// header and is dropped; metadata after it occupies real slots. A
    /// non-zero offset-to-top after the first function marks the start of
    /// a secondary sub-table and ends this pass.
    pub(crate) fn import_record_vtable(&mut self, record: &RecordInfo) -> Result<(), ImportError> {
        let Some(components) = record.vtable.as_ref() else {
            return Ok(());
        };

        let name = record.name.clone();
        let this_type = self.resolve_named(&name)?.pointer();

        // Counts uses of each slot name; virtual overloads would otherwise
        // collide.
        let mut name_counts: AHashMap<String, usize> = AHashMap::new();

        let mut def = AggregateType::new(AggregateKind::Struct, POINTER_SIZE);
        let mut seen_function = false;
        let mut offset = 0u64;

        for component in components {
            match component {
                VtableComponentInfo::VcallOffset { .. } => {
                    if seen_function {
                        Self::push_metadata_slot(&mut def, offset, "vcall_offset", false);
                        offset += POINTER_SIZE;
                    }
                }
                VtableComponentInfo::VbaseOffset { .. } => {
                    if seen_function {
                        Self::push_metadata_slot(&mut def, offset, "vbase_offset", false);
                        offset += POINTER_SIZE;
                    }
                }
                VtableComponentInfo::OffsetToTop { offset: to_top } => {
                    if seen_function {
                        if *to_top != 0 {
                            break;
                        }
                        Self::push_metadata_slot(&mut def, offset, "offset_to_top", false);
                        offset += POINTER_SIZE;
                    }
                }
                VtableComponentInfo::Rtti { .. } => {
                    if seen_function {
                        Self::push_metadata_slot(&mut def, offset, "rtti", true);
                        offset += POINTER_SIZE;
                    }
                }
                VtableComponentInfo::Func(func) => {
                    seen_function = true;
                    let slot = func.function_name.clone();
                    self.push_function_slot(&mut def, &name, &this_type, func, slot, offset, &mut name_counts)?;
                    offset += POINTER_SIZE;
                }
                VtableComponentInfo::CompleteDtor(func) => {
                    seen_function = true;
                    self.push_function_slot(
                        &mut def,
                        &name,
                        &this_type,
                        func,
                        "dtor".to_string(),
                        offset,
                        &mut name_counts,
                    )?;
                    offset += POINTER_SIZE;
                }
                VtableComponentInfo::DeletingDtor(func) => {
                    seen_function = true;
                    self.push_function_slot(
                        &mut def,
                        &name,
                        &this_type,
                        func,
                        "dtorDelete".to_string(),
                        offset,
                        &mut name_counts,
                    )?;
                    offset += POINTER_SIZE;
                }
            }
        }

        self.register_named(&vtable_struct_name(&name), TypeHandle::Aggregate(def))
    }

    fn push_metadata_slot(def: &mut AggregateType, offset: u64, label: &str, pointer: bool) {
        let ty = if pointer {
            TypeHandle::Primitive(Primitive::Void).pointer()
        } else {
            TypeHandle::Primitive(Primitive::I64)
        };
        def.push(AggregateMember::new(
            format!("{}_{}", label, offset),
            ty,
            offset * 8,
            POINTER_SIZE * 8,
        ));
    }

    #[allow(clippy::too_many_arguments)]
    fn push_function_slot(
        &mut self,
        def: &mut AggregateType,
        record_name: &str,
        this_type: &TypeHandle,
        func: &VtableFuncInfo,
        base_name: String,
        offset: u64,
        name_counts: &mut AHashMap<String, usize>,
    ) -> Result<(), ImportError> {
        let mut slot_name = base_name;
        if func.is_thunk {
            slot_name.push_str("__thunk_");
            slot_name.push_str(&format_this_adjustment(func.this_adjustment));
        }

        let func_ty = self.resolve_complex(&func.ty, Some(this_type))?;
        if !func_ty.is_function() {
            return Err(ImportError::VtableSlotNotFunction {
                record: record_name.to_string(),
                slot: slot_name,
            });
        }

        let final_name = match name_counts.get(&slot_name) {
            None => slot_name.clone(),
            Some(count) => format!("{}__{}", slot_name, count),
        };
        *name_counts.entry(slot_name).or_insert(0) += 1;

        def.push(
            AggregateMember::new(final_name, func_ty.pointer(), offset * 8, POINTER_SIZE * 8)
                .with_comment(func.repr.clone()),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::{ComplexTypeInfo, FieldInfo, RecordKind, TypeDump};
    use crate::registry::{InMemoryRegistry, TypeRegistry};

    fn func_info(name: &str) -> VtableFuncInfo {
        VtableFuncInfo {
            is_thunk: false,
            repr: format!("virtual void {}()", name),
            function_name: name.into(),
            ty: ComplexTypeInfo::Function {
                param_types: vec![],
                return_type: Box::new(ComplexTypeInfo::name("void")),
            },
            return_adjustment: 0,
            return_adjustment_vbase_offset_offset: 0,
            this_adjustment: 0,
            this_adjustment_vcall_offset_offset: 0,
        }
    }

    fn func(name: &str) -> VtableComponentInfo {
        VtableComponentInfo::Func(func_info(name))
    }

    fn polymorphic_record(name: &str, vtable: Vec<VtableComponentInfo>) -> RecordInfo {
        RecordInfo {
            is_anonymous: false,
            kind: RecordKind::Class,
            name: name.into(),
            size: 8,
            data_size: 8,
            alignment: 8,
            fields: vec![FieldInfo::VtablePtr { offset: 0 }],
            vtable: Some(vtable),
        }
    }

    fn import(record: RecordInfo) -> InMemoryRegistry {
        let dump = TypeDump {
            enums: vec![],
            records: vec![record],
        };
        let mut reg = InMemoryRegistry::new();
        Importer::new(&dump, &mut reg).run(None).unwrap();
        reg
    }

    fn vtbl_members(reg: &InMemoryRegistry, name: &str) -> Vec<AggregateMember> {
        match reg.lookup(name) {
            Some(TypeHandle::Aggregate(agg)) => agg.members,
            other => panic!("expected vtable struct under `{}`, got {:?}", name, other),
        }
    }

    #[test]
    fn test_overloaded_slots_are_disambiguated() {
        let reg = import(polymorphic_record(
            "W",
            vec![
                VtableComponentInfo::OffsetToTop { offset: 0 },
                VtableComponentInfo::Rtti {
                    class_name: "W".into(),
                },
                func("f"),
                func("f"),
                func("f"),
            ],
        ));
        let members = vtbl_members(&reg, "W_vtbl");
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["f", "f__1", "f__2"]);
    }

    #[test]
    fn test_header_metadata_is_suppressed() {
        let reg = import(polymorphic_record(
            "W",
            vec![
                VtableComponentInfo::VcallOffset { offset: -8 },
                VtableComponentInfo::OffsetToTop { offset: 0 },
                VtableComponentInfo::Rtti {
                    class_name: "W".into(),
                },
                func("f"),
            ],
        ));
        let members = vtbl_members(&reg, "W_vtbl");
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "f");
        assert_eq!(members[0].bit_offset, 0);
    }

    #[test]
    fn test_post_function_metadata_occupies_a_slot() {
        let reg = import(polymorphic_record(
            "W",
            vec![
                VtableComponentInfo::OffsetToTop { offset: 0 },
                func("f"),
                VtableComponentInfo::VcallOffset { offset: -8 },
                func("g"),
            ],
        ));
        let members = vtbl_members(&reg, "W_vtbl");
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["f", "vcall_offset_8", "g"]);
        assert_eq!(members[1].bit_offset, 64);
        assert_eq!(members[1].ty, TypeHandle::Primitive(Primitive::I64));
        assert_eq!(members[2].bit_offset, 128);
    }

    #[test]
    fn test_rtti_slot_is_pointer_valued() {
        let reg = import(polymorphic_record(
            "W",
            vec![
                func("f"),
                VtableComponentInfo::Rtti {
                    class_name: "W".into(),
                },
            ],
        ));
        let members = vtbl_members(&reg, "W_vtbl");
        assert_eq!(members[1].name, "rtti_8");
        assert_eq!(
            members[1].ty,
            TypeHandle::Primitive(Primitive::Void).pointer()
        );
    }

    #[test]
    fn test_nonzero_offset_to_top_ends_reconstruction() {
        let reg = import(polymorphic_record(
            "W",
            vec![
                VtableComponentInfo::OffsetToTop { offset: 0 },
                func("f"),
                VtableComponentInfo::OffsetToTop { offset: -16 },
                func("g"),
            ],
        ));
        let members = vtbl_members(&reg, "W_vtbl");
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["f"]);
    }

    #[test]
    fn test_thunk_slot_encodes_adjustment() {
        let mut thunk = func_info("h");
        thunk.is_thunk = true;
        thunk.this_adjustment = -16;
        let reg = import(polymorphic_record(
            "W",
            vec![VtableComponentInfo::Func(thunk)],
        ));
        let members = vtbl_members(&reg, "W_vtbl");
        assert_eq!(members[0].name, "h__thunk_m0x10");
    }

    #[test]
    fn test_dtor_slots_use_fixed_names() {
        let reg = import(polymorphic_record(
            "W",
            vec![
                VtableComponentInfo::CompleteDtor(func_info("~W")),
                VtableComponentInfo::DeletingDtor(func_info("~W")),
            ],
        ));
        let members = vtbl_members(&reg, "W_vtbl");
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["dtor", "dtorDelete"]);
    }

    #[test]
    fn test_function_slots_carry_hidden_this_and_repr() {
        let reg = import(polymorphic_record("W", vec![func("f")]));
        let members = vtbl_members(&reg, "W_vtbl");
        let slot = &members[0];
        assert_eq!(slot.comment.as_deref(), Some("virtual void f()"));
        match &slot.ty {
            TypeHandle::Pointer(inner) => match inner.as_ref() {
                TypeHandle::Function(func) => {
                    assert_eq!(func.params.len(), 1);
                    let this = &func.params[0];
                    assert_eq!(this.name.as_deref(), Some("this"));
                    assert!(this.hidden);
                    assert_eq!(this.ty, TypeHandle::Named("W".into()).pointer());
                }
                other => panic!("unexpected pointee {:?}", other),
            },
            other => panic!("unexpected slot type {:?}", other),
        }
        // One pointer-width slot.
        assert_eq!(slot.bit_size, 64);
        assert_eq!(reg.size_of(&TypeHandle::Named("W_vtbl".into())), Some(8));
    }
}
