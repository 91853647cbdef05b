use crate::error::Result;
use crate::tag::{Directive, Piece, OMITEMPTY, REQUIRED};

const TOO_SMALL: &str = "Map too small";
const TOO_LARGE: &str = "Map too large";
const WRONG_SIZE: &str = "Map wrong size";

/// Map hosts: every comparison is a refinement over the key count.
pub fn compile(d: &Directive<'_>) -> Result<Option<Piece>> {
    let (op, message) = match d.name {
        OMITEMPTY | REQUIRED => return Ok(None),
        "min" | "gte" => (">=", TOO_SMALL),
        "gt" => (">", TOO_SMALL),
        "max" | "lte" => ("<=", TOO_LARGE),
        "lt" => ("<", TOO_LARGE),
        "len" | "eq" => ("===", WRONG_SIZE),
        "ne" => ("!==", WRONG_SIZE),
        _ => return Err(d.unknown()),
    };
    let bound = d.require_value()?;
    Ok(Some(Piece::refine(format!(
        ".refine((val) => Object.keys(val).length {op} {bound}, '{message}')"
    ))))
}
