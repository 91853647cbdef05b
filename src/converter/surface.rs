//! Hand-written TypeScript aliases for self-referential records, where
//! `z.infer` cannot see through `z.lazy`.
use super::{indentation, Converter};
use crate::ir::{Field, TypeRef};
use crate::presence;
use crate::tag;

impl Converter<'_> {
    pub(super) fn surface_struct(&self, fields: &[Field], indent: usize) -> String {
        let mut out = String::from("{\n");
        let mut bases = Vec::new();
        for field in fields {
            let Some(name) = field.output_name() else {
                continue;
            };
            if field.embedded {
                bases.push(self.surface_type(&field.ty, indent));
                continue;
            }
            let presence = presence::classify(&field.ty, &tag::current_zone(&field.validate), field.omit_empty());
            out.push_str(&indentation(indent + 1));
            out.push_str(name);
            if presence.optional {
                out.push('?');
            }
            out.push_str(": ");
            out.push_str(&self.surface_type(&field.ty, indent + 1));
            if presence.nullable && !self.is_custom(&field.ty) {
                out.push_str(" | null");
            }
            if presence.optional {
                out.push_str(" | undefined");
            }
            out.push_str(",\n");
        }
        out.push_str(&indentation(indent));
        out.push('}');
        for base in bases {
            out.push_str(" & ");
            out.push_str(&base);
        }
        out
    }

    fn surface_type(&self, ty: &TypeRef, indent: usize) -> String {
        match ty {
            TypeRef::Pointer { elem } => self.surface_type(elem, indent),
            TypeRef::Named(named) if self.custom_type(named).is_some() => "any".to_string(),
            TypeRef::Named(named) if named.is_time() => "Date".to_string(),
            TypeRef::Named(named) => format!("{}{}", self.options.prefix, named.identity()),
            TypeRef::Inline { fields } => self.surface_struct(fields, indent),
            TypeRef::Slice { elem } | TypeRef::Array { elem, .. } => {
                format!("{}[]", self.surface_type(elem, indent))
            }
            TypeRef::Map { key, value } => format!(
                "Record<{}, {}>",
                self.surface_type(key, indent),
                self.surface_type(value, indent)
            ),
            TypeRef::Scalar { scalar } => scalar.surface().to_string(),
            TypeRef::Any => "any".to_string(),
        }
    }
}
