use crate::error::Result;
use crate::tag::{Directive, Piece, OMITEMPTY, REQUIRED};

/// Slice and fixed-array hosts. Presence is handled by nullability, so
/// `required` emits nothing here.
pub fn compile(d: &Directive<'_>) -> Result<Option<Piece>> {
    let piece = match d.name {
        OMITEMPTY | REQUIRED => return Ok(None),
        "min" | "gte" => Piece::suffix(format!(".min({})", d.require_value()?)),
        "max" | "lte" => Piece::suffix(format!(".max({})", d.require_value()?)),
        "len" | "eq" => Piece::suffix(format!(".length({})", d.require_value()?)),
        "gt" => Piece::suffix(format!(".min({})", d.min_above()?)),
        "lt" => Piece::suffix(format!(".max({})", d.max_below()?)),
        "ne" => Piece::refine(format!(".refine((val) => val.length !== {})", d.require_value()?)),
        _ => return Err(d.unknown()),
    };
    Ok(Some(piece))
}
