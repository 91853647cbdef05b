//! Ready-made handlers for third-party types that serialize differently
//! from their shape.
use crate::converter::{Converter, ConverterOptions};
use crate::error::{ConvertError, Result};
use crate::ir::TypeRef;

pub const DECIMAL_TYPE: &str = "github.com/shopspring/decimal.Decimal";
pub const OPTIONAL_TYPE: &str = "4d63.com/optional.Optional";

/// Decimals serialize as strings.
pub fn decimal(_: &mut Converter<'_>, _: &TypeRef, _: &str, _: usize) -> Result<String> {
    Ok("z.string()".to_string())
}

/// `Optional[T]` accepts `T`, `null` or a missing value.
pub fn optional(converter: &mut Converter<'_>, ty: &TypeRef, validate: &str, indent: usize) -> Result<String> {
    let inner = match ty {
        TypeRef::Named(named) => named.args.first(),
        _ => None,
    };
    let inner = inner.ok_or_else(|| ConvertError::Custom {
        name: OPTIONAL_TYPE.to_string(),
        message: format!("expected one type argument, got {}", ty.describe()),
    })?;
    let inner = converter.convert_type(inner, validate, indent)?;
    Ok(format!("{inner}.optional().nullish()"))
}

impl ConverterOptions {
    pub fn with_decimal(self) -> Self {
        self.with_custom_type(DECIMAL_TYPE, decimal)
    }

    pub fn with_optional(self) -> Self {
        self.with_custom_type(OPTIONAL_TYPE, optional)
    }
}
