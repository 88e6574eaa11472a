// Wed Mar 11 2026 - Alex

use crate::dump::{EnumInfo, RecordInfo, TypeDump};
use crate::importer::error::ImportError;
use crate::importer::layout::LayoutMode;
use crate::importer::names::{escape_name, unaligned_struct_name};
use crate::registry::{
    AggregateKind, AggregateMember, AggregateType, EnumMember, EnumType, Primitive, TypeHandle,
    TypeRegistry,
};
use ahash::{AHashMap, AHashSet};
use std::collections::{HashMap, HashSet};

/// Aggregate counters for one import run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportStats {
    /// Records committed (full definition + unaligned variant + vtable).
    pub committed: usize,
    /// Records recognized as up to date and left untouched.
    pub up_to_date: usize,
    /// Records suppressed by the skip list.
    pub skipped: usize,
    /// Placeholder declarations registered ahead of full definitions.
    pub placeholders: usize,
    /// Enums registered.
    pub enums: usize,
}

/// One batch import run: owns the "imported" visited set, the name-keyed
/// views of the dump, the previous-run snapshots and the skip set, and
/// drives all dependency resolution through the registry borrow.
pub struct Importer<'a> {
    pub(crate) registry: &'a mut dyn TypeRegistry,
    pub(crate) enums: AHashMap<String, EnumInfo>,
    pub(crate) records: AHashMap<String, RecordInfo>,
    enum_order: Vec<String>,
    record_order: Vec<String>,
    previous: AHashMap<String, RecordInfo>,
    skip: AHashSet<String>,
    imported: AHashSet<String>,
    stats: ImportStats,
}

impl<'a> Importer<'a> {
    pub fn new(dump: &TypeDump, registry: &'a mut dyn TypeRegistry) -> Self {
        let mut enums = AHashMap::with_capacity(dump.enums.len());
        let mut records = AHashMap::with_capacity(dump.records.len());
        let mut enum_order = Vec::with_capacity(dump.enums.len());
        let mut record_order = Vec::with_capacity(dump.records.len());

        for info in &dump.enums {
            enum_order.push(info.name.clone());
            enums.insert(info.name.clone(), info.clone());
        }
        for info in &dump.records {
            record_order.push(info.name.clone());
            records.insert(info.name.clone(), info.clone());
        }

        Self {
            registry,
            enums,
            records,
            enum_order,
            record_order,
            previous: AHashMap::new(),
            skip: AHashSet::new(),
            imported: AHashSet::new(),
            stats: ImportStats::default(),
        }
    }

    /// Install the previous-run snapshots used by the up-to-date check.
    pub fn with_previous(mut self, previous: HashMap<String, RecordInfo>) -> Self {
        self.previous = previous.into_iter().collect();
        self
    }

    /// Install the set of record names to leave untouched.
    pub fn with_skip_list(mut self, skip: HashSet<String>) -> Self {
        self.skip = skip.into_iter().collect();
        self
    }

    /// Rewrite every record description through `hook` before any
    /// per-record processing. The transformed descriptions are
    /// authoritative for the rest of the run, including the up-to-date
    /// comparison and the snapshot refresh.
    pub fn with_transform<F>(mut self, mut hook: F) -> Self
    where
        F: FnMut(&str, RecordInfo) -> RecordInfo,
    {
        for name in &self.record_order {
            if let Some(record) = self.records.remove(name) {
                self.records.insert(name.clone(), hook(name, record));
            }
        }
        self
    }

    /// Import the selected names in dump order: enums first, then records.
    /// `None` selects everything. Fails fast at the first fatal error;
    /// commits already made are not rolled back.
    pub fn run(&mut self, selection: Option<&HashSet<String>>) -> Result<ImportStats, ImportError> {
        for name in self.enum_order.clone() {
            if let Some(selected) = selection {
                if !selected.contains(&name) {
                    continue;
                }
            }
            if let Err(err) = self.import_enum(&name) {
                log::error!("failed to import enum `{}`", name);
                return Err(err);
            }
        }

        for name in self.record_order.clone() {
            if let Some(selected) = selection {
                if !selected.contains(&name) {
                    continue;
                }
            }
            if let Err(err) = self.import_record(&name) {
                log::error!("failed to import record `{}`", name);
                return Err(err);
            }
        }

        Ok(self.stats)
    }

    /// Import one enum by name. Idempotent per run; unknown names no-op.
    pub fn import_enum(&mut self, name: &str) -> Result<(), ImportError> {
        if self.imported.contains(name) {
            return Ok(());
        }
        let Some(info) = self.enums.get(name).cloned() else {
            return Ok(());
        };
        self.imported.insert(name.to_string());

        if !(1..=8).contains(&info.underlying_type_size) {
            return Err(ImportError::EnumUnderlyingSize {
                name: info.name.clone(),
                size: info.underlying_type_size,
            });
        }

        let mut members = Vec::with_capacity(info.enumerators.len());
        for enumerator in &info.enumerators {
            let member_name = if info.is_scoped {
                format!("{}::{}", info.name, enumerator.identifier)
            } else {
                enumerator.identifier.clone()
            };
            members.push(EnumMember {
                name: member_name,
                value: enumerator.value,
            });
        }

        let ty = TypeHandle::Enum(EnumType {
            byte_size: info.underlying_type_size,
            members,
        });
        self.register_named(&info.name, ty)?;
        self.stats.enums += 1;
        Ok(())
    }

    /// Import one record by name. Idempotent per run. A name the dump has
    /// never heard of degrades to an empty struct with a warning.
    pub fn import_record(&mut self, name: &str) -> Result<(), ImportError> {
        if self.imported.contains(name) {
            return Ok(());
        }
        match self.records.get(name).cloned() {
            Some(record) => {
                self.imported.insert(name.to_string());
                self.import_record_info(&record)
            }
            None => {
                log::warn!("creating empty struct for `{}`", name);
                self.imported.insert(name.to_string());
                self.register_named(name, TypeHandle::Aggregate(AggregateType::opaque()))
            }
        }
    }

    fn import_record_info(&mut self, record: &RecordInfo) -> Result<(), ImportError> {
        let name = record.name.clone();

        if self.skip.contains(&name) {
            log::warn!("skipping `{}` as requested", name);
            self.stats.skipped += 1;
            return Ok(());
        }

        let up_to_date = self.previous.get(&name) == Some(record);

        // A placeholder declaration lets fields of this record (or of
        // other records in this batch) refer to it by pointer before the
        // full definition exists. Example: struct Node { Node* next; };
        if !up_to_date {
            self.add_placeholder(record)?;
        }

        // Built even on the up-to-date path: the size check below is the
        // consistency guard against drift between dump and registry.
        let aligned = self.build_record_definition(record, LayoutMode::Aligned)?;
        let handle = TypeHandle::Aggregate(aligned);

        let computed = self
            .registry
            .size_of(&handle)
            .ok_or_else(|| ImportError::UnsizedDefinition { name: name.clone() })?;
        if computed != record.size {
            return Err(ImportError::SizeMismatch {
                name: name.clone(),
                computed,
                declared: record.size,
            });
        }

        if up_to_date {
            log::info!("up-to-date: {}", name);
            self.stats.up_to_date += 1;
            return Ok(());
        }

        log::info!("importing: {}", name);
        self.register_named(&name, handle)?;
        self.import_record_vtable(record)?;

        // The registry's own layout engine does not understand derived
        // classes reusing base tail padding, so every record also gets an
        // unaligned variant for embedding as a base.
        let unaligned = self.build_record_definition(record, LayoutMode::Unaligned)?;
        self.register_named(&unaligned_struct_name(&name), TypeHandle::Aggregate(unaligned))?;

        self.stats.committed += 1;
        Ok(())
    }

    fn add_placeholder(&mut self, record: &RecordInfo) -> Result<(), ImportError> {
        let lookup = escape_name(&record.name);
        if let Some(existing) = self.registry.lookup(&lookup) {
            // An entry of the correct shape is already in place.
            if existing.is_aggregate()
                && self.registry.size_of(&existing) == Some(record.size)
                && self.registry.alignment_of(&existing) == Some(record.alignment)
            {
                return Ok(());
            }
        }

        let mut def = AggregateType::new(AggregateKind::Struct, record.alignment);
        def.push(AggregateMember::new(
            "__placeholder",
            TypeHandle::Primitive(Primitive::Char).array(record.size),
            0,
            record.size * 8,
        ));
        self.stats.placeholders += 1;
        self.register_named(&record.name, TypeHandle::Aggregate(def))
    }

    pub(crate) fn register_named(&mut self, name: &str, ty: TypeHandle) -> Result<(), ImportError> {
        let escaped = escape_name(name);
        self.registry
            .register(&escaped, ty)
            .map_err(|source| ImportError::Registry {
                name: name.to_string(),
                source,
            })
    }

    /// Whether `name` landed in this run's imported set.
    pub fn was_imported(&self, name: &str) -> bool {
        self.imported.contains(name)
    }

    /// Names imported so far, in no particular order.
    pub fn imported_names(&self) -> impl Iterator<Item = &str> {
        self.imported.iter().map(String::as_str)
    }

    /// The authoritative (post-transform) description of a record.
    pub fn record(&self, name: &str) -> Option<&RecordInfo> {
        self.records.get(name)
    }

    pub fn stats(&self) -> ImportStats {
        self.stats
    }
}
