//! The codec contract and the non-temporal XSD codecs.

use crate::error::{CodecError, CodecResult};
use ontic_core::Value;
use regex_lite::Regex;
use std::fmt;
use std::sync::OnceLock;

/// The kind of [`Value`] a codec produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Bool,
    Int,
    Float,
    Timestamp,
}

impl ValueKind {
    /// Returns true if `value` is of this kind.
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ValueKind::String, Value::String(_))
                | (ValueKind::Bool, Value::Bool(_))
                | (ValueKind::Int, Value::Int(_))
                | (ValueKind::Float, Value::Float(_))
                | (ValueKind::Timestamp, Value::Timestamp(_))
        )
    }
}

/// Converts between the lexical form of a datatype and a [`Value`].
///
/// `format(parse(text))` yields a canonical lexical form; for canonical input
/// it is `text` itself.
pub trait DatatypeCodec: Send + Sync + fmt::Debug {
    /// Local name of the datatype, e.g. `int`.
    fn name(&self) -> &str;

    /// Kind of value produced by [`DatatypeCodec::parse`].
    fn value_kind(&self) -> ValueKind;

    /// Parse literal text.
    fn parse(&self, text: &str) -> CodecResult<Value>;

    /// Format a value as literal text.
    fn format(&self, value: &Value) -> CodecResult<String>;
}

/// Match `text` against a lazily compiled pattern.
pub(crate) fn lexical_match(
    cell: &'static OnceLock<Option<Regex>>,
    pattern: &str,
    text: &str,
) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .map_or(false, |re| re.is_match(text))
}

/// Capture groups of `text` against a lazily compiled pattern.
pub(crate) fn lexical_captures<'t>(
    cell: &'static OnceLock<Option<Regex>>,
    pattern: &str,
    text: &'t str,
) -> Option<Vec<Option<&'t str>>> {
    let re = cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()?;
    let caps = re.captures(text)?;
    Some(
        (1..caps.len())
            .map(|i| caps.get(i).map(|m| m.as_str()))
            .collect(),
    )
}

// ==================== Strings ====================

/// `xsd:string` and `xsd:normalizedString`.
#[derive(Debug, Clone)]
pub struct StringCodec {
    name: &'static str,
    normalized: bool,
}

impl StringCodec {
    pub fn string() -> Self {
        Self {
            name: "string",
            normalized: false,
        }
    }

    /// Tabs, carriage returns and line feeds are replaced by spaces.
    pub fn normalized() -> Self {
        Self {
            name: "normalizedString",
            normalized: true,
        }
    }
}

impl DatatypeCodec for StringCodec {
    fn name(&self) -> &str {
        self.name
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::String
    }

    fn parse(&self, text: &str) -> CodecResult<Value> {
        if self.normalized {
            Ok(Value::String(text.replace(['\t', '\r', '\n'], " ")))
        } else {
            Ok(Value::String(text.to_string()))
        }
    }

    fn format(&self, value: &Value) -> CodecResult<String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(CodecError::unsupported_value(self.name, other.type_name())),
        }
    }
}

// ==================== Booleans ====================

/// `xsd:boolean`. Only `true` and `false` are accepted.
#[derive(Debug, Clone, Default)]
pub struct BooleanCodec;

impl DatatypeCodec for BooleanCodec {
    fn name(&self) -> &str {
        "boolean"
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Bool
    }

    fn parse(&self, text: &str) -> CodecResult<Value> {
        match text {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(CodecError::invalid_literal(
                "boolean",
                text,
                "expected 'true' or 'false'",
            )),
        }
    }

    fn format(&self, value: &Value) -> CodecResult<String> {
        match value {
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(CodecError::unsupported_value("boolean", other.type_name())),
        }
    }
}

// ==================== Integers ====================

/// A bounded XSD integer type.
#[derive(Debug, Clone)]
pub struct IntegerCodec {
    name: &'static str,
    min: i64,
    max: i64,
}

impl IntegerCodec {
    pub fn new(name: &'static str, min: i64, max: i64) -> Self {
        Self { name, min, max }
    }

    /// Every XSD integer type with its value bounds. Unbounded types are
    /// capped to the 64-bit range.
    pub fn xsd_family() -> Vec<Self> {
        vec![
            Self::new("byte", i8::MIN as i64, i8::MAX as i64),
            Self::new("unsignedByte", 0, u8::MAX as i64),
            Self::new("short", i16::MIN as i64, i16::MAX as i64),
            Self::new("unsignedShort", 0, u16::MAX as i64),
            Self::new("int", i32::MIN as i64, i32::MAX as i64),
            Self::new("unsignedInt", 0, u32::MAX as i64),
            Self::new("integer", i64::MIN, i64::MAX),
            Self::new("nonNegativeInteger", 0, i64::MAX),
            Self::new("positiveInteger", 1, i64::MAX),
            Self::new("nonPositiveInteger", i64::MIN, 0),
            Self::new("negativeInteger", i64::MIN, -1),
            Self::new("long", i64::MIN, i64::MAX),
            Self::new("unsignedLong", 0, i64::MAX),
        ]
    }

    fn check(&self, n: i64) -> bool {
        n >= self.min && n <= self.max
    }
}

impl DatatypeCodec for IntegerCodec {
    fn name(&self) -> &str {
        self.name
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Int
    }

    fn parse(&self, text: &str) -> CodecResult<Value> {
        let n: i64 = text
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| {
                CodecError::invalid_literal(self.name, text, e.to_string())
            })?;
        if !self.check(n) {
            return Err(CodecError::invalid_literal(
                self.name,
                text,
                format!("out of range [{}, {}]", self.min, self.max),
            ));
        }
        Ok(Value::Int(n))
    }

    fn format(&self, value: &Value) -> CodecResult<String> {
        match value {
            Value::Int(n) if self.check(*n) => Ok(n.to_string()),
            other => Err(CodecError::unsupported_value(self.name, other.type_name())),
        }
    }
}

// ==================== Floating point ====================

/// `xsd:float` and `xsd:double`, including `INF`, `-INF` and `NaN`.
#[derive(Debug, Clone)]
pub struct FloatCodec {
    name: &'static str,
    single: bool,
}

impl FloatCodec {
    pub fn float() -> Self {
        Self {
            name: "float",
            single: true,
        }
    }

    pub fn double() -> Self {
        Self {
            name: "double",
            single: false,
        }
    }
}

static FLOAT_LEXICAL: OnceLock<Option<Regex>> = OnceLock::new();

impl DatatypeCodec for FloatCodec {
    fn name(&self) -> &str {
        self.name
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Float
    }

    fn parse(&self, text: &str) -> CodecResult<Value> {
        let text = text.trim();
        let f = match text {
            "INF" | "+INF" => f64::INFINITY,
            "-INF" => f64::NEG_INFINITY,
            "NaN" => f64::NAN,
            _ => {
                if !lexical_match(
                    &FLOAT_LEXICAL,
                    r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?$",
                    text,
                ) {
                    return Err(CodecError::invalid_literal(self.name, text, "not a number"));
                }
                text.parse::<f64>()
                    .map_err(|e| CodecError::invalid_literal(self.name, text, e.to_string()))?
            }
        };
        if self.single && f.is_finite() && f.abs() > f32::MAX as f64 {
            return Err(CodecError::invalid_literal(self.name, text, "out of range"));
        }
        Ok(Value::Float(f))
    }

    fn format(&self, value: &Value) -> CodecResult<String> {
        let f = match value {
            Value::Float(f) => *f,
            Value::Int(n) => *n as f64,
            other => return Err(CodecError::unsupported_value(self.name, other.type_name())),
        };
        Ok(if f.is_nan() {
            "NaN".to_string()
        } else if f == f64::INFINITY {
            "INF".to_string()
        } else if f == f64::NEG_INFINITY {
            "-INF".to_string()
        } else {
            f.to_string()
        })
    }
}

/// `xsd:decimal`. Decoded as a double.
#[derive(Debug, Clone, Default)]
pub struct DecimalCodec;

static DECIMAL_LEXICAL: OnceLock<Option<Regex>> = OnceLock::new();

impl DatatypeCodec for DecimalCodec {
    fn name(&self) -> &str {
        "decimal"
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Float
    }

    fn parse(&self, text: &str) -> CodecResult<Value> {
        let text = text.trim();
        if !lexical_match(&DECIMAL_LEXICAL, r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)$", text) {
            return Err(CodecError::invalid_literal("decimal", text, "not a decimal"));
        }
        text.parse::<f64>()
            .map(Value::Float)
            .map_err(|e| CodecError::invalid_literal("decimal", text, e.to_string()))
    }

    fn format(&self, value: &Value) -> CodecResult<String> {
        match value {
            Value::Float(f) if f.is_finite() => Ok(f.to_string()),
            Value::Int(n) => Ok(n.to_string()),
            other => Err(CodecError::unsupported_value("decimal", other.type_name())),
        }
    }
}
