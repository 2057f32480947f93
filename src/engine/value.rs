//! Parsed Values
//!
//! Chompers produce a dynamic [`Value`]. Compositions and sequences yield
//! [`Value::Array`]s, regexes yield [`Value::String`]s, and mappers turn
//! those into whatever shape the caller wants.
//!
//! # Example
//!
//! ```rust
//! use fro::engine::value::Value;
//!
//! let v = Value::array(vec![Value::int(1), Value::string("two")]);
//! assert_eq!(v.get_index(0).and_then(Value::as_int), Some(1));
//! assert_eq!(v.to_json().unwrap(), r#"[1,"two"]"#);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A value produced by a chomper
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Nothing matched, or a group that did not participate
    #[default]
    Nil,
    /// Produced by [`boolp`](super::parser_dsl::boolp)
    Bool(bool),
    /// Produced by the integer parsers
    Int(i64),
    /// Produced by [`floatp`](super::parser_dsl::floatp)
    Float(f64),
    /// Matched text
    String(String),
    /// Ordered values (composition tuples, sequence lists, capture groups)
    Array(Vec<Value>),
    /// Named values, for mappers that build records
    Hash(HashMap<String, Value>),
}

impl Value {
    /// [`Value::Nil`]
    pub fn nil() -> Self {
        Value::Nil
    }

    /// Wrap a boolean
    pub fn bool(flag: bool) -> Self {
        Value::Bool(flag)
    }

    /// Wrap an integer
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    /// Wrap a float
    pub fn float(x: f64) -> Self {
        Value::Float(x)
    }

    /// Wrap text
    pub fn string(text: impl Into<String>) -> Self {
        Value::String(text.into())
    }

    /// Wrap a list of values
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(items)
    }

    /// Build a record from key/value pairs
    pub fn hash(pairs: Vec<(impl Into<String>, Value)>) -> Self {
        Value::Hash(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// Whether this is [`Value::Nil`]
    pub fn is_nil(&self) -> bool {
        *self == Value::Nil
    }

    /// The boolean, if this is one
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(flag) = self {
            Some(*flag)
        } else {
            None
        }
    }

    /// The integer, if this is one
    pub fn as_int(&self) -> Option<i64> {
        if let Value::Int(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    /// The number as a float; integers are widened
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Value::Float(x) => Some(x),
            Value::Int(n) => Some(n as f64),
            _ => None,
        }
    }

    /// The matched text, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(text) = self {
            Some(text.as_str())
        } else {
            None
        }
    }

    /// The elements, if this is an array
    pub fn as_array(&self) -> Option<&[Value]> {
        if let Value::Array(items) = self {
            Some(items.as_slice())
        } else {
            None
        }
    }

    /// Take the elements out of an array value
    pub fn into_array(self) -> Option<Vec<Value>> {
        if let Value::Array(items) = self {
            Some(items)
        } else {
            None
        }
    }

    /// Take the text out of a string value
    pub fn into_string(self) -> Option<String> {
        if let Value::String(text) = self {
            Some(text)
        } else {
            None
        }
    }

    /// The record, if this is a hash
    pub fn as_hash(&self) -> Option<&HashMap<String, Value>> {
        if let Value::Hash(record) = self {
            Some(record)
        } else {
            None
        }
    }

    /// Field `key` of a hash value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_hash().and_then(|record| record.get(key))
    }

    /// Element `index` of an array value
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|items| items.get(index))
    }

    /// Short type name, used in application error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Hash(_) => "hash",
        }
    }

    /// Render as JSON
    ///
    /// `Nil` becomes `null` and arrays become JSON arrays.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::bool(flag)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::float(x)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::string(text)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::String(text)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Nil, Into::into)
    }
}

fn write_joined<'a, I>(f: &mut fmt::Formatter<'_>, open: &str, items: I, close: &str) -> fmt::Result
where
    I: Iterator<Item = (Option<&'a str>, &'a Value)>,
{
    f.write_str(open)?;
    for (i, (key, value)) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        if let Some(key) = key {
            write!(f, "{:?}: ", key)?;
        }
        write!(f, "{}", value)?;
    }
    f.write_str(close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(flag) => write!(f, "{}", flag),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(text) => write!(f, "{:?}", text),
            Value::Array(items) => write_joined(f, "[", items.iter().map(|v| (None, v)), "]"),
            Value::Hash(record) => write_joined(
                f,
                "{",
                record.iter().map(|(k, v)| (Some(k.as_str()), v)),
                "}",
            ),
        }
    }
}
