//! A small, self-contained JSON value, parser and printer.
//!
//! This is deliberately not built on `serde_json`: the JSON layer is one of
//! this crate's own responsibilities rather than an external format it
//! delegates to.

mod builder;
mod parser;
mod printer;

pub use builder::Builder;

use thiserror::Error;

/// An ordered JSON object. Preserves insertion order; last write wins on a
/// duplicate key, matching `std::map::insert`'s semantics in the original.
pub type Object = Vec<(String, Value)>;
pub type Array = Vec<Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    Str(String),
    Array(Array),
    Object(Object),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("JSON parse error at byte {position}: {reason}")]
    Parse { reason: String, position: usize },
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("builder used in an illegal state: {0}")]
    IncompleteValue(&'static str),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Real(_) => "real",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Result<bool, Error> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(Error::TypeMismatch {
                expected: "bool",
                found: other.kind(),
            }),
        }
    }

    pub fn as_int(&self) -> Result<i64, Error> {
        match self {
            Value::Int(n) => Ok(*n),
            other => Err(Error::TypeMismatch {
                expected: "int",
                found: other.kind(),
            }),
        }
    }

    /// Numeric value as `f64`, accepting either `Int` or `Real` (mirrors the
    /// original's `IsDouble()` which is true for both).
    pub fn as_real(&self) -> Result<f64, Error> {
        match self {
            Value::Real(n) => Ok(*n),
            Value::Int(n) => Ok(*n as f64),
            other => Err(Error::TypeMismatch {
                expected: "real",
                found: other.kind(),
            }),
        }
    }

    pub fn as_str(&self) -> Result<&str, Error> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(Error::TypeMismatch {
                expected: "string",
                found: other.kind(),
            }),
        }
    }

    pub fn as_array(&self) -> Result<&Array, Error> {
        match self {
            Value::Array(a) => Ok(a),
            other => Err(Error::TypeMismatch {
                expected: "array",
                found: other.kind(),
            }),
        }
    }

    pub fn as_object(&self) -> Result<&Object, Error> {
        match self {
            Value::Object(o) => Ok(o),
            other => Err(Error::TypeMismatch {
                expected: "object",
                found: other.kind(),
            }),
        }
    }

    /// Looks up a key in an object value. `Ok(None)` if the key is absent;
    /// `Err` if `self` is not an object at all.
    pub fn get(&self, key: &str) -> Result<Option<&Value>, Error> {
        Ok(self
            .as_object()?
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

pub fn parse(input: &str) -> Result<Value, Error> {
    parser::parse(input)
}

pub fn print_pretty(value: &Value) -> String {
    let mut out = String::new();
    printer::print(value, &mut out);
    out
}

/// Builds an ordered map directly, without going through the chained
/// builder; used by the handler to assemble fixed-shape reply objects.
pub fn object_from<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Object(entries.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
}
