use crate::error::{ConvertError, Result};
use crate::tag::{split_values, Directive, Piece, OMITEMPTY, REQUIRED};

pub fn compile(d: &Directive<'_>) -> Result<Option<Piece>> {
    let piece = match d.name {
        OMITEMPTY => return Ok(None),
        REQUIRED => Piece::refine(".refine((val) => val !== 0)"),
        "gt" => Piece::suffix(format!(".gt({})", d.require_value()?)),
        "gte" | "min" => Piece::suffix(format!(".gte({})", d.require_value()?)),
        "lt" => Piece::suffix(format!(".lt({})", d.require_value()?)),
        "lte" | "max" => Piece::suffix(format!(".lte({})", d.require_value()?)),
        "eq" | "len" => Piece::refine(format!(".refine((val) => val === {})", d.require_value()?)),
        "ne" => Piece::refine(format!(".refine((val) => val !== {})", d.require_value()?)),
        "oneof" => {
            let values = split_values(d.require_value()?);
            if values.is_empty() {
                return Err(ConvertError::InvalidValidation("oneof requires at least one value".into()));
            }
            Piece::refine(format!(".refine((val) => [{}].includes(val))", values.join(", ")))
        }
        _ => return Err(d.unknown()),
    };
    Ok(Some(piece))
}
