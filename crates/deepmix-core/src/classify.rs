//! Type classification.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed type tag computed for any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Undefined,
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Object,
    Function,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Undefined => "undefined",
            TypeTag::Null => "null",
            TypeTag::Boolean => "boolean",
            TypeTag::Integer => "integer",
            TypeTag::Float => "float",
            TypeTag::String => "string",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
            TypeTag::Function => "function",
        }
    }

    /// Object, array or function: the shapes mixin merges member by member.
    pub fn is_structured(&self) -> bool {
        matches!(self, TypeTag::Object | TypeTag::Array | TypeTag::Function)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a value.
///
/// Numbers are tagged by value, not by variant: a float with no fractional
/// part is an `integer`.
pub fn classify(value: &Value) -> TypeTag {
    match value {
        Value::Undefined => TypeTag::Undefined,
        Value::Null => TypeTag::Null,
        Value::Boolean(_) => TypeTag::Boolean,
        Value::Integer(_) => TypeTag::Integer,
        Value::Float(f) => {
            if f.ceil() > f.floor() {
                TypeTag::Float
            } else {
                TypeTag::Integer
            }
        }
        Value::String(_) => TypeTag::String,
        Value::Array(_) => TypeTag::Array,
        Value::Date(_) | Value::Map(_) => TypeTag::Object,
        Value::Callable(_) => TypeTag::Function,
    }
}

/// Whether the value is object-shaped: a map or a date, never an array or null.
pub fn is_object(value: &Value) -> bool {
    matches!(value, Value::Map(_) | Value::Date(_))
}
