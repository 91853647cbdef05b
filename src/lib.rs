//! Compiles record type graphs, with their validation tags, into Zod schema
//! declarations.
pub mod catalog;
pub mod config;
pub mod converter;
pub mod custom;
pub mod error;
pub mod formats;
pub mod ir;
pub mod path_de;
pub mod presence;
pub mod tag;

pub use catalog::Catalog;
pub use converter::{schema_name, Converter, ConverterOptions, CustomFn, SchemaEntry};
pub use error::{CatalogError, ConvertError, Result};
pub use ir::{Field, NamedRef, RecordDef, ScalarKind, TypeRef};

/// One-shot conversion of `record` and everything it references.
pub fn struct_to_zod_schema(catalog: &Catalog, record: &RecordDef) -> Result<String> {
    Converter::new(catalog).convert(record)
}

pub fn struct_to_zod_schema_with_prefix(prefix: &str, catalog: &Catalog, record: &RecordDef) -> Result<String> {
    Converter::with_options(catalog, ConverterOptions::new().with_prefix(prefix)).convert(record)
}
