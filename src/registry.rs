//! Type registry (C1): maps each on-disk structure name to its version,
//! class id, and field descriptor list.
//!
//! Grounded in the teacher's global `FRAME_REGISTRY` in `src/frame.rs`
//! (`once_cell::sync::Lazy<RwLock<...>>`, populated at first access,
//! read-mostly thereafter) — the same shared-resource shape spec.md §5
//! asks for: "shared and immutable after initialization".

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// One field of a structure's description: name, type grammar string,
/// and an optional human comment (spec.md §4.1).
///
/// Type strings use the small grammar named in spec.md: `"INT_4U"`,
/// `"*STRING"`, `"PTR_STRUCT(name)"`, and array suffixes `"[n]"` /
/// `"[expr]"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub type_string: &'static str,
    pub comment: Option<&'static str>,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, type_string: &'static str) -> Self {
        Self { name, type_string, comment: None }
    }

    pub const fn with_comment(name: &'static str, type_string: &'static str, comment: &'static str) -> Self {
        Self { name, type_string, comment: Some(comment) }
    }
}

/// A registered structure kind: its on-disk version, stable class id, and
/// field list.
#[derive(Debug, Clone)]
pub struct StructureEntry {
    pub name: &'static str,
    pub version: u8,
    pub class_id: u16,
    pub fields: Vec<FieldDescriptor>,
}

struct Registry {
    by_name: HashMap<&'static str, Arc<StructureEntry>>,
    by_class_id: HashMap<u16, Arc<StructureEntry>>,
}

impl Registry {
    fn new() -> Self {
        let mut registry = Self { by_name: HashMap::new(), by_class_id: HashMap::new() };
        for entry in crate::structures::builtin_entries() {
            registry
                .register(entry)
                .expect("built-in structure registrations must not collide");
        }
        registry
    }

    fn register(&mut self, entry: StructureEntry) -> Result<()> {
        if self.by_name.contains_key(entry.name) || self.by_class_id.contains_key(&entry.class_id) {
            return Err(Error::DuplicateRegistration(entry.name.to_string()));
        }
        let entry = Arc::new(entry);
        self.by_name.insert(entry.name, Arc::clone(&entry));
        self.by_class_id.insert(entry.class_id, entry);
        Ok(())
    }

    fn lookup_by_name(&self, name: &str) -> Result<Arc<StructureEntry>> {
        self.by_name.get(name).cloned().ok_or_else(|| Error::UnknownStructureName(name.to_string()))
    }

    fn lookup_by_id(&self, class_id: u16) -> Option<Arc<StructureEntry>> {
        self.by_class_id.get(&class_id).cloned()
    }
}

static REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::new()));

/// Register a new structure kind. Duplicate name or class id is an error
/// (spec.md §4.1: "Tie-break on duplicate registration is an error").
pub fn register(entry: StructureEntry) -> Result<()> {
    REGISTRY.write().register(entry)
}

/// Look up a structure's description by name.
pub fn lookup_by_name(name: &str) -> Result<Arc<StructureEntry>> {
    REGISTRY.read().lookup_by_name(name)
}

/// Look up a structure's description by class id. Unlike
/// [`lookup_by_name`], a miss here is not necessarily fatal to the
/// caller — spec.md §3 allows skipping an unknown class id's
/// *enclosing* structure, but an unknown class id *inside* a known
/// structure is always an error at the call site.
pub fn lookup_by_id(class_id: u16) -> Option<Arc<StructureEntry>> {
    REGISTRY.read().lookup_by_id(class_id)
}

/// Render a structure's field list, e.g. for `frame-cli dump-toc`-style
/// introspection or for skipping an unknown-version structure while
/// still knowing its shape (spec.md §4.1 `Describe`).
pub fn describe(entry: &StructureEntry) -> Vec<FieldDescriptor> {
    entry.fields.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_structures_are_registered() {
        assert!(lookup_by_name("FrHeader").is_ok() || lookup_by_name("FrameH").is_ok());
    }

    #[test]
    fn duplicate_registration_is_an_error() {
        let entry = StructureEntry {
            name: "FrTestDuplicate",
            version: 8,
            class_id: 60000,
            fields: vec![FieldDescriptor::new("name", "*STRING")],
        };
        register(entry.clone()).unwrap();
        let err = register(entry).unwrap_err();
        assert!(matches!(err, Error::DuplicateRegistration(_)));
    }

    #[test]
    fn unknown_name_is_reported() {
        let err = lookup_by_name("FrDoesNotExist").unwrap_err();
        assert!(matches!(err, Error::UnknownStructureName(_)));
    }
}
