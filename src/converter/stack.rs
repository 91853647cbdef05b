//! Expansion stack: self-reference detection and cycle rejection.
use std::ops::{Deref, DerefMut};

use tracing::debug;

use super::Converter;
use crate::error::{ConvertError, Result};
use crate::ir::{NamedRef, RecordDef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Frame {
    pub name: String,
    /// Set when the record refers to itself while being expanded.
    pub self_ref: bool,
}

/// Holds a frame on the stack for the duration of one record expansion and
/// pops it on every exit path.
struct Expansion<'a, 'c> {
    conv: &'a mut Converter<'c>,
}

impl<'a, 'c> Expansion<'a, 'c> {
    fn enter(conv: &'a mut Converter<'c>, name: &str) -> Self {
        conv.stack.push(Frame { name: name.to_string(), self_ref: false });
        Self { conv }
    }

    fn is_self_referenced(&self) -> bool {
        self.conv.stack.last().is_some_and(|frame| frame.self_ref)
    }
}

impl<'c> Deref for Expansion<'_, 'c> {
    type Target = Converter<'c>;
    fn deref(&self) -> &Self::Target {
        self.conv
    }
}

impl<'c> DerefMut for Expansion<'_, 'c> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.conv
    }
}

impl Drop for Expansion<'_, '_> {
    fn drop(&mut self) {
        self.conv.stack.pop();
    }
}

impl<'c> Converter<'c> {
    /// Schema expression for a named record reached from a field.
    pub(super) fn reference(&mut self, named: &NamedRef) -> Result<String> {
        let name = named.identity();
        let schema = self.schema_name(&name);

        // ---- already being expanded ----
        if let Some(at) = self.stack.iter().position(|frame| frame.name == name) {
            if at + 1 == self.stack.len() {
                self.stack[at].self_ref = true;
                return Ok(format!("z.lazy(() => {schema})"));
            }
            let mut path = self.stack[at..].iter().map(|frame| frame.name.clone()).collect::<Vec<_>>();
            path.push(name);
            return Err(ConvertError::Cycle { path });
        }

        // ---- emitted earlier ----
        if self.outputs.contains_key(&name) {
            return Ok(schema);
        }

        let catalog = self.catalog;
        let record = catalog
            .get(named)
            .ok_or_else(|| ConvertError::UnknownType(named.qualified_identity()))?;
        let (text, self_ref) = self.expand(record)?;
        self.register(name, text, self_ref);
        Ok(schema)
    }

    /// Full declaration block for `record`: the schema constant plus its
    /// inferred or hand-written type alias.
    pub(super) fn expand(&mut self, record: &RecordDef) -> Result<(String, bool)> {
        let name = record.identity();
        debug!(record = %name, depth = self.stack.len(), "expanding record");

        let mut scope = Expansion::enter(self, &name);
        let body = scope.convert_struct(&record.fields, 0)?;
        let self_ref = scope.is_self_referenced();

        let type_name = format!("{}{name}", scope.options.prefix);
        let schema = scope.schema_name(&name);
        let text = if self_ref {
            let alias = scope.surface_struct(&record.fields, 0);
            format!("export type {type_name} = {alias}\nexport const {schema}: z.ZodType<{type_name}> = {body}")
        } else {
            format!("export const {schema} = {body}\nexport type {type_name} = z.infer<typeof {schema}>")
        };
        Ok((text, self_ref))
    }
}
