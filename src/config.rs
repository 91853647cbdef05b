//! Settings file for the command line tool.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::converter::ConverterOptions;
use crate::error::CatalogError;
use crate::path_de;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Prepended to every schema and type name.
    pub prefix: String,
    /// Directives to drop before compilation.
    pub ignore_tags: Vec<String>,
    /// Register the shopspring decimal handler.
    pub decimal: bool,
    /// Register the `4d63.com/optional` handler.
    pub optional: bool,
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let bytes = std::fs::read(path)?;
        path_de::from_slice_with_path(&bytes)
    }

    pub fn into_options(self) -> ConverterOptions {
        let mut options = ConverterOptions::new()
            .with_prefix(self.prefix)
            .with_ignores(self.ignore_tags);
        if self.decimal {
            options = options.with_decimal();
        }
        if self.optional {
            options = options.with_optional();
        }
        options
    }
}
