//! Strongly-typed model of the record graph fed to the converter.
//!
//! Records reference each other by [`NamedRef`] and are resolved against a
//! [`crate::catalog::Catalog`], so self-referential and mutually-referential
//! graphs need no shared ownership.
use serde::{Deserialize, Serialize};

/// Primitive kinds, named after the source ecosystem's builtin types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
}

impl ScalarKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Uintptr => "uintptr",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::String => "string",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Bool | Self::String)
    }

    /// TypeScript spelling of the kind.
    pub fn surface(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::String => "string",
            _ => "number",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    Scalar { scalar: ScalarKind },
    Any,
    Named(NamedRef),
    Inline { fields: Vec<Field> },
    Pointer { elem: Box<TypeRef> },
    Slice { elem: Box<TypeRef> },
    Array { elem: Box<TypeRef>, len: usize },
    Map { key: Box<TypeRef>, value: Box<TypeRef> },
}

/// Reference to a named type: a catalog record, `time.Time`, or a type
/// claimed by a custom handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedRef {
    pub package: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub ident: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Raw serialization tag, e.g. `"name,omitempty"` or `"-"`.
    #[serde(default)]
    pub json: String,
    /// Raw constraint string, e.g. `"required,dive,min=3"`.
    #[serde(default)]
    pub validate: String,
    #[serde(default)]
    pub embedded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDef {
    pub package: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeRef>,
    pub fields: Vec<Field>,
}

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTORS
// ————————————————————————————————————————————————————————————————————————————

impl TypeRef {
    pub fn scalar(kind: ScalarKind) -> Self {
        Self::Scalar { scalar: kind }
    }
    pub fn string() -> Self {
        Self::scalar(ScalarKind::String)
    }
    pub fn int() -> Self {
        Self::scalar(ScalarKind::Int)
    }
    pub fn float64() -> Self {
        Self::scalar(ScalarKind::Float64)
    }
    pub fn bool() -> Self {
        Self::scalar(ScalarKind::Bool)
    }
    pub fn named(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named(NamedRef::new(package, name))
    }
    pub fn generic(package: impl Into<String>, name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self::Named(NamedRef { package: package.into(), name: name.into(), args })
    }
    pub fn time() -> Self {
        Self::named(NamedRef::TIME_PACKAGE, NamedRef::TIME_NAME)
    }
    pub fn inline(fields: Vec<Field>) -> Self {
        Self::Inline { fields }
    }
    pub fn ptr(elem: TypeRef) -> Self {
        Self::Pointer { elem: Box::new(elem) }
    }
    pub fn slice(elem: TypeRef) -> Self {
        Self::Slice { elem: Box::new(elem) }
    }
    pub fn array(elem: TypeRef, len: usize) -> Self {
        Self::Array { elem: Box::new(elem), len }
    }
    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        Self::Map { key: Box::new(key), value: Box::new(value) }
    }
}

impl NamedRef {
    pub const TIME_PACKAGE: &'static str = "time";
    pub const TIME_NAME: &'static str = "Time";

    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self { package: package.into(), name: name.into(), args: Vec::new() }
    }
}

impl Field {
    pub fn new(ident: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            ident: ident.into(),
            ty,
            json: String::new(),
            validate: String::new(),
            embedded: false,
        }
    }
    pub fn json(mut self, tag: impl Into<String>) -> Self {
        self.json = tag.into();
        self
    }
    pub fn validate(mut self, tag: impl Into<String>) -> Self {
        self.validate = tag.into();
        self
    }
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }
}

impl RecordDef {
    pub fn new(package: impl Into<String>, name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self { package: package.into(), name: name.into(), args: Vec::new(), fields }
    }
    pub fn with_args(mut self, args: Vec<TypeRef>) -> Self {
        self.args = args;
        self
    }
}

// ————————————————————————————————————————————————————————————————————————————
// NAMING
// ————————————————————————————————————————————————————————————————————————————

impl NamedRef {
    /// Generic-aware identity: `GenericPair[int,bool]` → `GenericPairIntBool`.
    pub fn identity(&self) -> String {
        identity(&self.name, &self.args)
    }

    /// Override lookup key, generic arguments stripped.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.package, self.name)
    }

    /// Catalog key, one per generic instantiation.
    pub fn qualified_identity(&self) -> String {
        format!("{}.{}", self.package, self.identity())
    }

    pub fn is_time(&self) -> bool {
        self.package == Self::TIME_PACKAGE && self.name == Self::TIME_NAME && self.args.is_empty()
    }
}

impl RecordDef {
    pub fn named_ref(&self) -> NamedRef {
        NamedRef {
            package: self.package.clone(),
            name: self.name.clone(),
            args: self.args.clone(),
        }
    }
    pub fn identity(&self) -> String {
        identity(&self.name, &self.args)
    }
    pub fn qualified_identity(&self) -> String {
        format!("{}.{}", self.package, self.identity())
    }
}

impl Field {
    /// Emitted property name; `None` when the field is excluded (`json:"-"`).
    pub fn output_name(&self) -> Option<&str> {
        if self.json == "-" {
            return None;
        }
        match self.json.split(',').next() {
            Some(name) if !name.is_empty() => Some(name),
            _ => Some(&self.ident),
        }
    }

    pub fn omit_empty(&self) -> bool {
        self.json.split(',').skip(1).any(|opt| opt.trim() == "omitempty")
    }
}

impl TypeRef {
    /// Name used when this type appears as a generic argument.
    pub fn arg_name(&self) -> String {
        match self {
            Self::Scalar { scalar } => scalar.name().to_string(),
            Self::Any => "any".to_string(),
            Self::Named(named) => named.identity(),
            Self::Inline { .. } => "object".to_string(),
            Self::Pointer { elem } => elem.arg_name(),
            Self::Slice { elem } | Self::Array { elem, .. } => {
                format!("{}Array", capitalize(&elem.arg_name()))
            }
            Self::Map { key, value } => format!(
                "record{}{}",
                capitalize(&key.arg_name()),
                capitalize(&value.arg_name())
            ),
        }
    }

    /// Strips every pointer layer.
    pub fn deref(&self) -> &TypeRef {
        let mut ty = self;
        while let Self::Pointer { elem } = ty {
            ty = elem;
        }
        ty
    }

    /// Short human description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Scalar { scalar } => scalar.name().to_string(),
            Self::Any => "interface{}".to_string(),
            Self::Named(named) => named.qualified_identity(),
            Self::Inline { .. } => "struct{...}".to_string(),
            Self::Pointer { elem } => format!("*{}", elem.describe()),
            Self::Slice { elem } => format!("[]{}", elem.describe()),
            Self::Array { elem, len } => format!("[{len}]{}", elem.describe()),
            Self::Map { key, value } => format!("map[{}]{}", key.describe(), value.describe()),
        }
    }
}

fn identity(name: &str, args: &[TypeRef]) -> String {
    let mut out = name.to_string();
    for arg in args {
        out.push_str(&capitalize(&arg.arg_name()));
    }
    out
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
