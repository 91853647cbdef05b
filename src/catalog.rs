//! The set of record definitions a conversion can resolve named references
//! against, keyed by qualified identity (`package.Identity`).
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::ir::{NamedRef, RecordDef};
use crate::path_de;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: IndexMap<String, RecordDef>,
}

/// On-disk descriptor layout: `{"records": [...]}`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Descriptor {
    pub records: Vec<RecordDef>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generic instantiations are separate records (`PairIntBool`, ...).
    pub fn insert(&mut self, record: RecordDef) -> Result<(), CatalogError> {
        let key = record.qualified_identity();
        if self.records.contains_key(&key) {
            return Err(CatalogError::Duplicate(key));
        }
        self.records.insert(key, record);
        Ok(())
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = RecordDef>) -> Result<(), CatalogError> {
        for record in records {
            self.insert(record)?;
        }
        Ok(())
    }

    pub fn get(&self, named: &NamedRef) -> Option<&RecordDef> {
        self.records.get(&named.qualified_identity())
    }

    pub fn find(&self, qualified_identity: &str) -> Option<&RecordDef> {
        self.records.get(qualified_identity)
    }

    pub fn records(&self) -> impl Iterator<Item = &RecordDef> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn from_json_str(src: &str) -> Result<Self, CatalogError> {
        let descriptor = path_de::from_str_with_path::<Descriptor>(src)?;
        let mut catalog = Self::new();
        catalog.extend(descriptor.records)?;
        Ok(catalog)
    }

    /// Merges another descriptor file into this catalog.
    pub fn load_file(&mut self, path: &Path) -> Result<(), CatalogError> {
        let bytes = std::fs::read(path)?;
        let descriptor = path_de::from_slice_with_path::<Descriptor>(&bytes)?;
        self.extend(descriptor.records)
    }
}
