use crate::error::{ConvertError, Result};
use crate::formats::{self, enum_base};
use crate::tag::{split_values, Directive, Piece, OMITEMPTY, REQUIRED};

/// String-host directives. Lengths are in characters.
pub fn compile(d: &Directive<'_>) -> Result<Option<Piece>> {
    let piece = match d.name {
        OMITEMPTY => return Ok(None),
        REQUIRED => Piece::Presence(".min(1)".into()),
        "oneof" => {
            let values = split_values(d.require_value()?);
            if values.is_empty() {
                return Err(ConvertError::InvalidValidation("oneof requires at least one value".into()));
            }
            Piece::Base(enum_base(&values))
        }
        "len" => Piece::suffix(format!(".length({})", d.require_value()?)),
        "min" | "gte" => Piece::suffix(format!(".min({})", d.require_value()?)),
        "max" | "lte" => Piece::suffix(format!(".max({})", d.require_value()?)),
        "gt" => Piece::suffix(format!(".min({})", d.min_above()?)),
        "lt" => Piece::suffix(format!(".max({})", d.max_below()?)),
        "contains" => Piece::suffix(format!(".includes(\"{}\")", d.require_value()?)),
        "startswith" => Piece::suffix(format!(".startsWith(\"{}\")", d.require_value()?)),
        "endswith" => Piece::suffix(format!(".endsWith(\"{}\")", d.require_value()?)),
        "eq" => Piece::refine(format!(".refine((val) => val === \"{}\")", d.require_value()?)),
        "ne" => Piece::refine(format!(".refine((val) => val !== \"{}\")", d.require_value()?)),
        name => match formats::lookup(name) {
            Some(format) if d.value.is_none() => format.piece(),
            _ => return Err(d.unknown()),
        },
    };
    Ok(Some(piece))
}
