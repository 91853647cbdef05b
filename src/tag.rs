//! Validation-tag compiler.
//!
//! A constraint string such as `required,dive,keys,min=3,endkeys,max=4` is
//! tokenized, split into zones (current / key / value) and each current-zone
//! directive is compiled for the host kind it annotates. The host-specific
//! tables live in the submodules.
pub mod map;
pub mod num;
pub mod seq;
pub mod str;

use crate::error::{ConvertError, Result};

pub const DIVE: &str = "dive";
pub const KEYS: &str = "keys";
pub const ENDKEYS: &str = "endkeys";
pub const REQUIRED: &str = "required";
pub const OMITEMPTY: &str = "omitempty";

// ————————————————————————————————————————————————————————————————————————————
// TOKENIZER
// ————————————————————————————————————————————————————————————————————————————

/// Splits on commas outside single quotes. Empty tokens are dropped.
pub fn tokenize(validate: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for ch in validate.chars() {
        match ch {
            '\'' => {
                quoted = !quoted;
                current.push(ch);
            }
            ',' if !quoted => {
                push_token(&mut out, &mut current);
            }
            _ => current.push(ch),
        }
    }
    push_token(&mut out, &mut current);
    out
}

fn push_token(out: &mut Vec<String>, current: &mut String) {
    let token = current.trim();
    if !token.is_empty() {
        out.push(token.to_string());
    }
    current.clear();
}

/// Whitespace-separated values; single-quoted groups keep their spaces and
/// lose their quotes.
pub fn split_values(value: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = value.trim_start();
    while !rest.is_empty() {
        let quoted_end = rest
            .strip_prefix('\'')
            .and_then(|tail| tail.find('\'').map(|end| end + 2));
        let end = quoted_end.unwrap_or_else(|| rest.find(char::is_whitespace).unwrap_or(rest.len()));
        let word = rest[..end].replace('\'', "");
        out.push(word);
        rest = rest[end..].trim_start();
    }
    out
}

// ————————————————————————————————————————————————————————————————————————————
// ZONES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Zones {
    /// Tokens that apply to the annotated type itself.
    pub current: Vec<String>,
    /// Constraint text for map keys (`dive,keys,...,endkeys`).
    pub keys: Option<String>,
    /// Constraint text passed down to elements or map values.
    pub values: String,
}

impl Zones {
    pub fn split(validate: &str) -> Result<Self> {
        let tokens = tokenize(validate);
        let dive = tokens.iter().position(|t| t == DIVE);
        let (current, after) = match dive {
            Some(at) => (&tokens[..at], &tokens[at + 1..]),
            None => (&tokens[..], &[][..]),
        };
        if let Some(stray) = current.iter().find(|t| *t == KEYS || *t == ENDKEYS) {
            return Err(ConvertError::InvalidValidation(format!(
                "'{stray}' must directly follow 'dive' in '{validate}'"
            )));
        }

        let mut zones = Zones { current: current.to_vec(), ..Zones::default() };
        match after.first().map(String::as_str) {
            Some(KEYS) => {
                let end = after.iter().position(|t| t == ENDKEYS).ok_or_else(|| {
                    ConvertError::InvalidValidation(format!("'keys' without 'endkeys' in '{validate}'"))
                })?;
                zones.keys = Some(after[1..end].join(","));
                zones.values = after[end + 1..].join(",");
            }
            Some(ENDKEYS) => {
                return Err(ConvertError::InvalidValidation(format!(
                    "'endkeys' without 'keys' in '{validate}'"
                )));
            }
            _ => zones.values = after.join(","),
        }
        Ok(zones)
    }

    pub fn has_dive(validate: &str) -> bool {
        tokenize(validate).iter().any(|t| t == DIVE)
    }
}

/// Tokens before the first `dive`.
pub fn current_zone(validate: &str) -> Vec<String> {
    let mut tokens = tokenize(validate);
    if let Some(at) = tokens.iter().position(|t| t == DIVE) {
        tokens.truncate(at);
    }
    tokens
}

/// Removes one leading `omitempty` token, as pointer unwrapping does.
pub fn strip_leading_omitempty(validate: &str) -> &str {
    match validate.strip_prefix(OMITEMPTY) {
        Some("") => "",
        Some(rest) if rest.starts_with(',') => &rest[1..],
        _ => validate,
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DIRECTIVES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    pub name: &'a str,
    pub value: Option<&'a str>,
}

impl<'a> Directive<'a> {
    pub fn parse(token: &'a str) -> Result<Self> {
        match token.find('=') {
            None => Ok(Self { name: token, value: None }),
            Some(0) => Err(ConvertError::InvalidValidation(token.to_string())),
            Some(at) if at + 1 == token.len() => Err(ConvertError::InvalidValidation(token.to_string())),
            Some(at) => Ok(Self { name: &token[..at], value: Some(&token[at + 1..]) }),
        }
    }

    /// Value of a directive that requires one.
    pub fn require_value(&self) -> Result<&'a str> {
        self.value
            .ok_or_else(|| ConvertError::InvalidValidation(format!("{} requires a value", self.name)))
    }

    fn token(&self) -> String {
        match self.value {
            Some(value) => format!("{}={value}", self.name),
            None => self.name.to_string(),
        }
    }

    pub(crate) fn unknown(&self) -> ConvertError {
        ConvertError::UnknownValidation(self.token())
    }

    /// Non-negative integer bound, for `gt` on length-like hosts.
    pub(crate) fn non_negative(&self) -> Result<u64> {
        let value = self.require_value()?;
        value
            .parse::<u64>()
            .map_err(|_| ConvertError::InvalidValidation(format!("{}: expected a non-negative integer", self.token())))
    }

    /// Positive integer bound, for `lt` on length-like hosts.
    pub(crate) fn positive(&self) -> Result<u64> {
        match self.non_negative()? {
            0 => Err(ConvertError::InvalidValidation(format!("{}: expected a positive integer", self.token()))),
            n => Ok(n),
        }
    }

    /// Inclusive lower bound for `gt=N`, i.e. `N + 1`.
    pub(crate) fn min_above(&self) -> Result<u64> {
        self.non_negative()?
            .checked_add(1)
            .ok_or_else(|| ConvertError::InvalidValidation(format!("{}: bound out of range", self.token())))
    }

    /// Inclusive upper bound for `lt=N`, i.e. `N - 1`.
    pub(crate) fn max_below(&self) -> Result<u64> {
        Ok(self.positive()? - 1)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// COMPILED OUTPUT
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// Built-in method chained in source order. Only valid on the host's own
    /// base expression.
    Suffix(String),
    /// Presence check chained in source order, dropped once an enumeration
    /// replaces the base since the enumeration already rejects `""`.
    Presence(String),
    /// Handler output chained in source order, whatever the base.
    Extension(String),
    /// Rendered after every suffix, in source order.
    Refine(String),
    /// Replaces the host's base expression (string enumerations).
    Base(String),
}

impl Piece {
    pub fn suffix(text: impl Into<String>) -> Self {
        Self::Suffix(text.into())
    }
    pub fn refine(text: impl Into<String>) -> Self {
        Self::Refine(text.into())
    }

    /// Classifies free-form handler output.
    pub fn classify(text: String) -> Self {
        if text.starts_with(".refine(") {
            Self::Refine(text)
        } else {
            Self::Extension(text)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    base: Option<String>,
    links: Vec<Piece>,
    refinements: Vec<String>,
}

impl Chain {
    pub fn push(&mut self, piece: Piece) {
        match piece {
            Piece::Refine(text) => self.refinements.push(text),
            Piece::Base(text) => self.base = Some(text),
            link => self.links.push(link),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.links.is_empty() && self.refinements.is_empty()
    }

    /// Renders onto `base` unless a directive replaced it. A replaced base
    /// (`z.enum(...)`) has none of the host's builder methods, so built-in
    /// suffixes next to it are an error.
    pub fn finish(self, base: impl Into<String>) -> Result<String> {
        let replaced = self.base.is_some();
        let mut out = self.base.unwrap_or_else(|| base.into());
        for link in self.links {
            match link {
                Piece::Suffix(text) if replaced => {
                    return Err(ConvertError::InvalidValidation(format!(
                        "{text} cannot be applied to {out}"
                    )));
                }
                Piece::Presence(_) if replaced => {}
                Piece::Suffix(text) | Piece::Presence(text) | Piece::Extension(text) => out.push_str(&text),
                Piece::Refine(_) | Piece::Base(_) => {}
            }
        }
        for refinement in self.refinements {
            out.push_str(&refinement);
        }
        Ok(out)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// HOSTS
// ————————————————————————————————————————————————————————————————————————————

const TIME_REQUIRED: &str = ".refine((val) => val.getTime() !== new Date('0001-01-01T00:00:00Z').getTime() && val.getTime() !== new Date(0).getTime(), 'Invalid date')";

/// The kind of value a zone annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    String,
    Number,
    Bool,
    Any,
    Time,
    Record,
    Seq,
    Map,
}

impl Host {
    /// Built-in compilation of one directive. `Ok(None)` means accepted with
    /// no output.
    pub fn compile(self, directive: &Directive<'_>) -> Result<Option<Piece>> {
        match self {
            Self::String => str::compile(directive),
            Self::Number => num::compile(directive),
            Self::Seq => seq::compile(directive),
            Self::Map => map::compile(directive),
            Self::Time => match directive.name {
                OMITEMPTY => Ok(None),
                REQUIRED => Ok(Some(Piece::refine(TIME_REQUIRED))),
                _ => Err(directive.unknown()),
            },
            Self::Bool | Self::Any | Self::Record => match directive.name {
                OMITEMPTY | REQUIRED => Ok(None),
                _ => Err(directive.unknown()),
            },
        }
    }

    pub fn accepts_dive(self) -> bool {
        matches!(self, Self::Seq | Self::Map)
    }
}
