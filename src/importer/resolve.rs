// Wed Mar 11 2026 - Alex

use crate::dump::ComplexTypeInfo;
use crate::importer::driver::Importer;
use crate::importer::error::ImportError;
use crate::importer::names::escape_name;
use crate::registry::{
    AggregateKind, AggregateMember, AggregateType, CallingConvention, FunctionParam, FunctionType,
    Primitive, TypeHandle, TypeRegistry, POINTER_SIZE,
};
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::collections::HashMap;

static FUNDAMENTAL_TYPES: Lazy<HashMap<&'static str, Primitive>> = Lazy::new(|| {
    HashMap::from([
        ("bool", Primitive::Bool),
        ("void", Primitive::Void),
        // Unsigned types
        ("unsigned char", Primitive::U8),
        ("unsigned short", Primitive::U16),
        ("unsigned int", Primitive::U32),
        ("unsigned long", Primitive::U64),
        ("unsigned long long", Primitive::U64),
        ("unsigned __int128", Primitive::U128),
        // Signed types
        ("signed char", Primitive::I8),
        ("signed short", Primitive::I16),
        ("signed int", Primitive::I32),
        ("signed long", Primitive::I64),
        ("signed long long", Primitive::I64),
        ("signed __int128", Primitive::I128),
        // Char types
        ("char", Primitive::Char),
        ("char8_t", Primitive::I8),
        ("char16_t", Primitive::I16),
        ("char32_t", Primitive::I32),
        ("wchar_t", Primitive::I32),
        // Integer types
        ("short", Primitive::I16),
        ("int", Primitive::I32),
        ("long", Primitive::I64),
        ("long long", Primitive::I64),
        ("__int128", Primitive::I128),
        // Floating point types
        ("float", Primitive::F32),
        ("double", Primitive::F64),
        ("long double", Primitive::F128),
    ])
});

/// Clang spells the NEON vector type out as an attribute; substitute the
/// canonical alias.
const FLOAT_VECTOR_ATTRIBUTE: &str =
    "__attribute__((__vector_size__(4 * sizeof(float)))) float";

pub fn fundamental_type(name: &str) -> Option<Primitive> {
    FUNDAMENTAL_TYPES.get(name).copied()
}

impl<'a> Importer<'a> {
    /// Resolve a name against the fundamentals table, the dump, and the
    /// registry, importing dependencies on the way. Unknown names degrade
    /// to an empty opaque struct rather than failing the run.
    pub(crate) fn resolve_named(&mut self, name: &str) -> Result<TypeHandle, ImportError> {
        let original = name;

        let mut lookup_name = escape_name(name);

        let mut make_volatile = false;
        let atomic_inner = lookup_name
            .strip_prefix("_Atomic(")
            .and_then(|rest| rest.strip_suffix(')'))
            .map(str::to_owned);
        if let Some(inner) = atomic_inner {
            lookup_name = Cow::Owned(inner);
            make_volatile = true;
        }

        if let Some(primitive) = fundamental_type(&lookup_name) {
            return Ok(TypeHandle::Primitive(primitive));
        }

        if lookup_name == FLOAT_VECTOR_ATTRIBUTE {
            return self.resolve_named("float32x4_t");
        }

        // Dependencies are re-imported from the dump even when a stale
        // entry with the same name already exists in the registry.
        if self.enums.contains_key(original) {
            self.import_enum(original)?;
        }
        if self.records.contains_key(original) {
            self.import_record(original)?;
        }

        if self.registry.lookup(&lookup_name).is_none() {
            // Last resort: import by the original name, which synthesizes
            // an empty struct for names the dump has never heard of.
            self.import_record(original)?;
            if self.registry.lookup(&lookup_name).is_none() {
                return Err(ImportError::UnresolvedTypeName {
                    name: original.to_string(),
                });
            }
        }

        let handle = TypeHandle::Named(lookup_name.into_owned());
        Ok(if make_volatile {
            handle.volatile()
        } else {
            handle
        })
    }

    /// Resolve a type expression into a registry handle, recursively.
    /// `this_type` is injected as a hidden leading parameter when the
    /// expression is a member-function type.
    pub(crate) fn resolve_complex(
        &mut self,
        ty: &ComplexTypeInfo,
        this_type: Option<&TypeHandle>,
    ) -> Result<TypeHandle, ImportError> {
        match ty {
            ComplexTypeInfo::TypeName { name } => self.resolve_named(name),

            ComplexTypeInfo::Pointer { pointee_type } => {
                Ok(self.resolve_complex(pointee_type, None)?.pointer())
            }

            ComplexTypeInfo::Array { element_type, size } => {
                Ok(self.resolve_complex(element_type, None)?.array(*size))
            }

            ComplexTypeInfo::Function {
                param_types,
                return_type,
            } => {
                let return_type = self.resolve_complex(return_type, None)?;

                let mut params = Vec::with_capacity(param_types.len() + 1);
                if let Some(this) = this_type {
                    params.push(FunctionParam {
                        name: Some("this".to_string()),
                        ty: this.clone(),
                        hidden: true,
                    });
                }
                for param in param_types {
                    params.push(FunctionParam {
                        name: None,
                        ty: self.resolve_complex(param, None)?,
                        hidden: false,
                    });
                }

                Ok(TypeHandle::Function(Box::new(FunctionType {
                    convention: CallingConvention::Fastcall,
                    return_type,
                    params,
                })))
            }

            ComplexTypeInfo::MemberPointer {
                class_type,
                pointee_type,
                repr,
            } => {
                let class_handle = self.resolve_complex(class_type, None)?;
                let owner_this = class_handle.pointer();

                let pointee = self.resolve_complex(pointee_type, Some(&owner_this))?;
                if !pointee.is_function() {
                    // Data member pointers are plain pointer-difference
                    // integers.
                    return Ok(TypeHandle::Primitive(Primitive::I64));
                }

                // Member function pointers are a { fn_ptr, adj } struct,
                // registered once per textual representation.
                if let Some(existing) = self.registry.lookup(repr) {
                    if existing.is_aggregate() {
                        return Ok(TypeHandle::Named(escape_name(repr).into_owned()));
                    }
                }

                let mut ptmf = AggregateType::new(AggregateKind::Struct, POINTER_SIZE);
                ptmf.push(AggregateMember::new(
                    "ptr",
                    pointee.pointer(),
                    0,
                    POINTER_SIZE * 8,
                ));
                ptmf.push(AggregateMember::new(
                    "adj",
                    TypeHandle::Primitive(Primitive::I64),
                    POINTER_SIZE * 8,
                    POINTER_SIZE * 8,
                ));
                self.register_named(repr, TypeHandle::Aggregate(ptmf))?;
                self.resolve_named(repr)
            }
        }
    }

    /// Pointer to a named type, forward-declaring an opaque aggregate when
    /// the name is not registered yet. Needed for mutually-recursive
    /// class/vtable references.
    pub(crate) fn pointer_to_named(&mut self, name: &str) -> Result<TypeHandle, ImportError> {
        if self.registry.lookup(name).is_some() {
            return Ok(TypeHandle::Named(name.to_string()).pointer());
        }
        let forward = self
            .registry
            .forward_declare(name)
            .map_err(|source| ImportError::Registry {
                name: name.to_string(),
                source,
            })?;
        Ok(forward.pointer())
    }
}
