//! Built-in string format directives (`email`, `uuid4`, `sha256`, ...).
//!
//! Patterns follow the go-playground validator regexes so generated schemas
//! accept the same inputs the server-side validator does.
use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::tag::Piece;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// A builder method, e.g. `.email()`.
    Call(&'static str),
    /// A pattern rendered as `.regex(/…/)`.
    Pattern(&'static str),
    /// A `.refine(...)` clause.
    Refine(&'static str),
    /// Replaces the base with an enumeration of literals.
    Enum(&'static [&'static str]),
}

impl Format {
    pub fn piece(self) -> Piece {
        match self {
            Self::Call(call) => Piece::suffix(call),
            Self::Pattern(pattern) => Piece::suffix(format!(".regex(/{pattern}/)")),
            Self::Refine(refine) => Piece::refine(refine),
            Self::Enum(values) => Piece::Base(enum_base(values)),
        }
    }
}

/// `z.enum(["a", "b"] as const)`
pub fn enum_base<S: AsRef<str>>(values: &[S]) -> String {
    let quoted = values
        .iter()
        .map(|v| format!("\"{}\"", v.as_ref()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("z.enum([{quoted}] as const)")
}

// ---- patterns ----

const ALPHA: &str = r"^[a-zA-Z]+$";
const ALPHANUM: &str = r"^[a-zA-Z0-9]+$";
const ALPHA_UNICODE: &str = r"^[\p{L}]+$";
const ALPHANUM_UNICODE: &str = r"^[\p{L}\p{N}]+$";
const NUMERIC: &str = r"^[-+]?[0-9]+(?:\.[0-9]+)?$";
const NUMBER: &str = r"^[0-9]+$";
const HEXADECIMAL: &str = r"^(0[xX])?[0-9a-fA-F]+$";
const BASE64: &str = r"^(?:[A-Za-z0-9+\/]{4})*(?:[A-Za-z0-9+\/]{2}==|[A-Za-z0-9+\/]{3}=|[A-Za-z0-9+\/]{4})$";
const UUID: &str = r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";
const UUID3: &str = r"^[0-9a-f]{8}-[0-9a-f]{4}-3[0-9a-f]{3}-[0-9a-f]{4}-[0-9a-f]{12}$";
const UUID4: &str = r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";
const UUID5: &str = r"^[0-9a-f]{8}-[0-9a-f]{4}-5[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";
const UUID_RFC4122: &str = r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";
const UUID3_RFC4122: &str = r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-3[0-9a-fA-F]{3}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";
const UUID4_RFC4122: &str = r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-4[0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$";
const UUID5_RFC4122: &str = r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-5[0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$";
const MD4: &str = r"^[0-9a-f]{32}$";
const MD5: &str = r"^[0-9a-f]{32}$";
const SHA256: &str = r"^[0-9a-f]{64}$";
const SHA384: &str = r"^[0-9a-f]{96}$";
const SHA512: &str = r"^[0-9a-f]{128}$";
const ASCII: &str = r"^[\x00-\x7F]*$";
const LATITUDE: &str = r"^[-+]?([1-8]?\d(\.\d+)?|90(\.0+)?)$";
const LONGITUDE: &str = r"^[-+]?(180(\.0+)?|((1[0-7]\d)|([1-9]?\d))(\.\d+)?)$";
const JWT: &str = r"^[A-Za-z0-9-_]+\.[A-Za-z0-9-_]+\.[A-Za-z0-9-_]*$";
const URL_ENCODED: &str = r"^(?:[^%]|%[0-9A-Fa-f]{2})*$";
const MONGODB: &str = r"^[a-f\d]{24}$";

const LOWERCASE: &str = ".refine((val) => val === val.toLowerCase())";
const UPPERCASE: &str = ".refine((val) => val === val.toUpperCase())";
const JSON: &str = ".refine((val) => { try { JSON.parse(val); return true } catch { return false } })";

static FORMATS: Lazy<HashMap<&'static str, Format>> = Lazy::new(|| {
    use Format::*;
    HashMap::from([
        ("email", Call(".email()")),
        ("url", Call(".url()")),
        ("http_url", Call(".url()")),
        ("ipv4", Call(r#".ip({ version: "v4" })"#)),
        ("ip4_addr", Call(r#".ip({ version: "v4" })"#)),
        ("ipv6", Call(r#".ip({ version: "v6" })"#)),
        ("ip6_addr", Call(r#".ip({ version: "v6" })"#)),
        ("ip", Call(".ip()")),
        ("ip_addr", Call(".ip()")),
        ("datetime", Call(".datetime()")),
        ("url_encoded", Pattern(URL_ENCODED)),
        ("alpha", Pattern(ALPHA)),
        ("alphanum", Pattern(ALPHANUM)),
        ("alphanumunicode", Pattern(ALPHANUM_UNICODE)),
        ("alphaunicode", Pattern(ALPHA_UNICODE)),
        ("ascii", Pattern(ASCII)),
        ("number", Pattern(NUMBER)),
        ("numeric", Pattern(NUMERIC)),
        ("base64", Pattern(BASE64)),
        ("mongodb", Pattern(MONGODB)),
        ("hexadecimal", Pattern(HEXADECIMAL)),
        ("jwt", Pattern(JWT)),
        ("latitude", Pattern(LATITUDE)),
        ("longitude", Pattern(LONGITUDE)),
        ("uuid", Pattern(UUID)),
        ("uuid3", Pattern(UUID3)),
        ("uuid4", Pattern(UUID4)),
        ("uuid5", Pattern(UUID5)),
        ("uuid_rfc4122", Pattern(UUID_RFC4122)),
        ("uuid3_rfc4122", Pattern(UUID3_RFC4122)),
        ("uuid4_rfc4122", Pattern(UUID4_RFC4122)),
        ("uuid5_rfc4122", Pattern(UUID5_RFC4122)),
        ("md4", Pattern(MD4)),
        ("md5", Pattern(MD5)),
        ("sha256", Pattern(SHA256)),
        ("sha384", Pattern(SHA384)),
        ("sha512", Pattern(SHA512)),
        ("boolean", Enum(&["true", "false"])),
        ("lowercase", Refine(LOWERCASE)),
        ("uppercase", Refine(UPPERCASE)),
        ("json", Refine(JSON)),
    ])
});

pub fn lookup(name: &str) -> Option<Format> {
    FORMATS.get(name).copied()
}
