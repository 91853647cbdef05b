//! Error types for schema conversion and descriptor loading.
use thiserror::Error;

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

/// Everything that aborts a conversion. Conversions never produce partial
/// output; the first error wins and is returned to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("unknown validation: {0}")]
    UnknownValidation(String),

    #[error("invalid validation: {0}")]
    InvalidValidation(String),

    #[error("cannot handle map key type: {0}")]
    UnsupportedKeyType(String),

    #[error("unknown record type: {0}")]
    UnknownType(String),

    #[error("circular dependency detected: {}", .path.join(" → "))]
    Cycle { path: Vec<String> },

    #[error("custom handler for {name}: {message}")]
    Custom { name: String, message: String },
}

/// Failures while reading type descriptors or settings.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("at JSON path {path} → {message}")]
    Parse { path: String, message: String },

    #[error("duplicate record {0}")]
    Duplicate(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
