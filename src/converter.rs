//! Record graph → Zod source.
//!
//! ```ignore
//! let mut catalog = Catalog::new();
//! catalog.insert(user_record)?;
//! let mut converter = Converter::new(&catalog);
//! let ts = converter.convert(catalog.find("app.User").unwrap())?;
//! ```
//!
//! Named records are emitted once, in the order their expansion completes,
//! so every schema is declared before the schemas that use it.
mod stack;
mod surface;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::catalog::Catalog;
use crate::error::{ConvertError, Result};
use crate::ir::{Field, NamedRef, RecordDef, ScalarKind, TypeRef};
use crate::presence;
use crate::tag::{self, Chain, Directive, Host, Piece, Zones};

use stack::Frame;

/// Override hook for a named type or a custom directive.
///
/// Arguments are the converter (so handlers can recurse through
/// [`Converter::convert_type`]), the type being converted, the constraint
/// text (the full string for types, the value after `=` for directives) and
/// the current indentation level.
pub type CustomFn = Arc<dyn Fn(&mut Converter<'_>, &TypeRef, &str, usize) -> Result<String> + Send + Sync>;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Clone, Default)]
pub struct ConverterOptions {
    /// Prepended to every emitted schema and type name.
    pub prefix: String,
    /// Directives dropped before compilation, by name or by full token.
    pub ignores: Vec<String>,
    /// Keyed by qualified name (`package.Name`, generic arguments stripped).
    pub custom_types: HashMap<String, CustomFn>,
    /// Keyed by directive name.
    pub custom_tags: HashMap<String, CustomFn>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub name: String,
    pub order: usize,
    pub text: String,
    pub self_ref: bool,
}

pub struct Converter<'c> {
    catalog: &'c Catalog,
    options: ConverterOptions,
    outputs: IndexMap<String, SchemaEntry>,
    stack: Vec<Frame>,
}

// ————————————————————————————————————————————————————————————————————————————
// OPTIONS
// ————————————————————————————————————————————————————————————————————————————

impl ConverterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_ignores<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignores.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_custom_type<F>(mut self, qualified_name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Converter<'_>, &TypeRef, &str, usize) -> Result<String> + Send + Sync + 'static,
    {
        self.custom_types.insert(qualified_name.into(), Arc::new(handler));
        self
    }

    pub fn with_custom_tag<F>(mut self, directive: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Converter<'_>, &TypeRef, &str, usize) -> Result<String> + Send + Sync + 'static,
    {
        self.custom_tags.insert(directive.into(), Arc::new(handler));
        self
    }
}

impl fmt::Debug for ConverterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types = self.custom_types.keys().collect::<Vec<_>>();
        let mut tags = self.custom_tags.keys().collect::<Vec<_>>();
        types.sort();
        tags.sort();
        f.debug_struct("ConverterOptions")
            .field("prefix", &self.prefix)
            .field("ignores", &self.ignores)
            .field("custom_types", &types)
            .field("custom_tags", &tags)
            .finish()
    }
}

pub fn schema_name(prefix: &str, name: &str) -> String {
    format!("{prefix}{name}Schema")
}

fn indentation(level: usize) -> String {
    "  ".repeat(level)
}

// ————————————————————————————————————————————————————————————————————————————
// PUBLIC API
// ————————————————————————————————————————————————————————————————————————————

impl<'c> Converter<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self::with_options(catalog, ConverterOptions::default())
    }

    pub fn with_options(catalog: &'c Catalog, options: ConverterOptions) -> Self {
        Self {
            catalog,
            options,
            outputs: IndexMap::new(),
            stack: Vec::new(),
        }
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Registers `record` and everything it reaches. Registering the same
    /// identity twice is a no-op. On error the registry is left exactly as it
    /// was before the call.
    pub fn add_type(&mut self, record: &RecordDef) -> Result<()> {
        let name = record.identity();
        if self.outputs.contains_key(&name) {
            return Ok(());
        }
        let checkpoint = self.outputs.len();
        match self.expand(record) {
            Ok((text, self_ref)) => {
                self.register(name, text, self_ref);
                Ok(())
            }
            Err(error) => {
                self.outputs.truncate(checkpoint);
                Err(error)
            }
        }
    }

    /// `add_type` followed by `export`.
    pub fn convert(&mut self, record: &RecordDef) -> Result<String> {
        self.add_type(record)?;
        Ok(self.export())
    }

    pub fn convert_slice(&mut self, records: &[&RecordDef]) -> Result<String> {
        for record in records {
            self.add_type(record)?;
        }
        Ok(self.export())
    }

    /// Every registered schema in registration order, each followed by a
    /// blank line.
    pub fn export(&self) -> String {
        let mut entries = self.outputs.values().collect::<Vec<_>>();
        entries.sort_by_key(|entry| entry.order);
        let mut out = String::new();
        for entry in entries {
            out.push_str(&entry.text);
            out.push_str("\n\n");
        }
        out
    }

    pub fn entries(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.outputs.values()
    }

    pub fn schema_name(&self, name: &str) -> String {
        schema_name(&self.options.prefix, name)
    }

    /// Zod expression for `ty` under `validate`. Public so custom handlers can
    /// recurse into type arguments.
    pub fn convert_type(&mut self, ty: &TypeRef, validate: &str, indent: usize) -> Result<String> {
        match ty {
            TypeRef::Pointer { elem } => self.convert_type(elem, tag::strip_leading_omitempty(validate), indent),
            TypeRef::Named(named) => {
                if let Some(handler) = self.custom_type(named) {
                    trace!(type_name = %named.qualified_name(), "dispatching custom type");
                    return handler(self, ty, validate, indent);
                }
                if named.is_time() {
                    return self.convert_leaf(Host::Time, ty, validate, indent, "z.coerce.date()");
                }
                let base = self.reference(named)?;
                self.convert_leaf(Host::Record, ty, validate, indent, base)
            }
            TypeRef::Inline { fields } => {
                let base = self.convert_struct(fields, indent)?;
                self.convert_leaf(Host::Record, ty, validate, indent, base)
            }
            TypeRef::Slice { elem } => self.convert_seq(ty, elem, None, validate, indent),
            TypeRef::Array { elem, len } => self.convert_seq(ty, elem, Some(*len), validate, indent),
            TypeRef::Map { key, value } => self.convert_map(ty, key, value, validate, indent),
            TypeRef::Scalar { scalar } => {
                let (host, base) = match scalar {
                    ScalarKind::Bool => (Host::Bool, "z.boolean()"),
                    ScalarKind::String => (Host::String, "z.string()"),
                    _ => (Host::Number, "z.number()"),
                };
                self.convert_leaf(host, ty, validate, indent, base)
            }
            TypeRef::Any => self.convert_leaf(Host::Any, ty, validate, indent, "z.any()"),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

impl<'c> Converter<'c> {
    fn register(&mut self, name: String, text: String, self_ref: bool) {
        if self.outputs.contains_key(&name) {
            return;
        }
        let order = self.outputs.len();
        debug!(schema = %name, order, self_ref, "registered schema");
        self.outputs.insert(name.clone(), SchemaEntry { name, order, text, self_ref });
    }

    fn custom_type(&self, named: &NamedRef) -> Option<CustomFn> {
        if self.options.custom_types.is_empty() {
            return None;
        }
        self.options.custom_types.get(&named.qualified_name()).cloned()
    }

    fn is_custom(&self, ty: &TypeRef) -> bool {
        matches!(ty, TypeRef::Named(named) if self.custom_type(named).is_some())
    }

    fn is_ignored(&self, token: &str, name: &str) -> bool {
        self.options.ignores.iter().any(|ignore| ignore == token || ignore == name)
    }

    /// `z.object({...})` plus one `.merge(...)` per embedded field.
    fn convert_struct(&mut self, fields: &[Field], indent: usize) -> Result<String> {
        let mut out = String::from("z.object({\n");
        let mut merges = Vec::new();
        for field in fields {
            let Some(name) = field.output_name() else {
                continue;
            };
            let expr = self.convert_type(&field.ty, &field.validate, indent + 1)?;
            if field.embedded {
                merges.push(format!(".merge({expr})"));
                continue;
            }
            let presence = presence::classify(&field.ty, &tag::current_zone(&field.validate), field.omit_empty());
            out.push_str(&indentation(indent + 1));
            out.push_str(name);
            out.push_str(": ");
            out.push_str(&expr);
            if presence.optional {
                out.push_str(".optional()");
            }
            if presence.nullable && !self.is_custom(&field.ty) {
                out.push_str(".nullable()");
            }
            out.push_str(",\n");
        }
        out.push_str(&indentation(indent));
        out.push_str("})");
        for merge in merges {
            out.push_str(&merge);
        }
        Ok(out)
    }

    fn convert_seq(
        &mut self,
        ty: &TypeRef,
        elem: &TypeRef,
        len: Option<usize>,
        validate: &str,
        indent: usize,
    ) -> Result<String> {
        let zones = Zones::split(validate)?;
        if zones.keys.is_some() {
            return Err(ConvertError::InvalidValidation(format!(
                "'keys' is only valid on maps: {validate}"
            )));
        }
        let inner = self.convert_type(elem, &zones.values, indent)?;
        let chain = self.compile_zone(Host::Seq, &zones.current, ty, indent)?;
        let mut base = format!("{inner}.array()");
        if let Some(len) = len {
            base.push_str(&format!(".length({len})"));
        }
        chain.finish(base)
    }

    fn convert_map(
        &mut self,
        ty: &TypeRef,
        key: &TypeRef,
        value: &TypeRef,
        validate: &str,
        indent: usize,
    ) -> Result<String> {
        let zones = Zones::split(validate)?;
        let key_expr = self.convert_key(key, zones.keys.as_deref().unwrap_or(""), indent)?;
        let value_expr = self.convert_type(value, &zones.values, indent)?;
        let chain = self.compile_zone(Host::Map, &zones.current, ty, indent)?;
        chain.finish(format!("z.record({key_expr}, {value_expr})"))
    }

    /// Map keys arrive as strings on the wire, so numbers and dates coerce.
    fn convert_key(&mut self, key: &TypeRef, validate: &str, indent: usize) -> Result<String> {
        let tokens = tag::tokenize(validate);
        match key {
            TypeRef::Scalar { scalar } if scalar.is_numeric() => {
                let chain = self.compile_zone(Host::Number, &tokens, key, indent)?;
                chain.finish("z.coerce.number()")
            }
            TypeRef::Scalar { scalar: ScalarKind::String } => {
                let chain = self.compile_zone(Host::String, &tokens, key, indent)?;
                chain.finish("z.string()")
            }
            TypeRef::Named(named) if named.is_time() => {
                let chain = self.compile_zone(Host::Time, &tokens, key, indent)?;
                chain.finish("z.coerce.date()")
            }
            other => Err(ConvertError::UnsupportedKeyType(other.describe())),
        }
    }

    /// Scalars, records and dates: no zones beyond the current one.
    fn convert_leaf(
        &mut self,
        host: Host,
        ty: &TypeRef,
        validate: &str,
        indent: usize,
        base: impl Into<String>,
    ) -> Result<String> {
        let zones = Zones::split(validate)?;
        if !host.accepts_dive() && (zones.keys.is_some() || Zones::has_dive(validate)) {
            return Err(ConvertError::InvalidValidation(format!(
                "cannot dive into {}: {validate}",
                ty.describe()
            )));
        }
        let chain = self.compile_zone(host, &zones.current, ty, indent)?;
        chain.finish(base)
    }

    /// Ignore list, then custom directives, then the host's built-in table.
    fn compile_zone(&mut self, host: Host, tokens: &[String], ty: &TypeRef, indent: usize) -> Result<Chain> {
        let mut chain = Chain::default();
        for token in tokens {
            let directive = Directive::parse(token)?;
            if self.is_ignored(token, directive.name) {
                trace!(directive = %token, "ignored directive");
                continue;
            }
            if let Some(handler) = self.options.custom_tags.get(directive.name).cloned() {
                trace!(directive = %directive.name, "dispatching custom directive");
                let text = handler(self, ty, directive.value.unwrap_or(""), indent)?;
                chain.push(Piece::classify(text));
                continue;
            }
            if let Some(piece) = host.compile(&directive)? {
                chain.push(piece);
            }
        }
        Ok(chain)
    }
}
