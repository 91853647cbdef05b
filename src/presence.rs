//! Decides whether a field gets `.optional()` and/or `.nullable()`.
use crate::ir::TypeRef;
use crate::tag::{OMITEMPTY, REQUIRED};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Presence {
    pub optional: bool,
    pub nullable: bool,
}

/// `current` is the field's current-zone token list; `omit_empty` comes from
/// the serialization tag.
pub fn classify(ty: &TypeRef, current: &[String], omit_empty: bool) -> Presence {
    let is_any = matches!(ty.deref(), TypeRef::Any);
    let required = current.iter().any(|t| t == REQUIRED);
    let bounded = current.iter().any(|t| t.contains('=')) && !current.iter().any(|t| t == OMITEMPTY);
    if is_any || required || bounded {
        return Presence::default();
    }

    let is_record = matches!(ty, TypeRef::Named(_) | TypeRef::Inline { .. });
    let nullable = match ty {
        TypeRef::Pointer { elem } if omit_empty => matches!(
            **elem,
            TypeRef::Pointer { .. } | TypeRef::Slice { .. } | TypeRef::Map { .. }
        ),
        TypeRef::Pointer { .. } => true,
        TypeRef::Slice { .. } | TypeRef::Map { .. } => !omit_empty,
        _ => false,
    };
    Presence { optional: omit_empty && !is_record, nullable }
}
