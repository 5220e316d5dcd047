//! Dynamic value tree.
//!
//! A [`Value`] is a closed tagged union over the shapes clone and mixin
//! understand: scalars, date-like instants, sequences, string-keyed maps and
//! opaque callables.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Insertion-ordered map of own members.
pub type Map = IndexMap<String, Value>;

type NativeFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// Opaque function handle.
///
/// Callables are never copied: cloning the handle shares the same function,
/// and two handles are equal only when they point at the same function.
#[derive(Clone)]
pub struct Callable {
    name: String,
    func: Arc<NativeFn>,
}

impl Callable {
    /// Wrap a native function under a display name
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the function
    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }

    /// Whether both handles share the same function instance
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.name)
    }
}

/// A dynamically-typed value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Date-like instant.
    Date(DateTime<Utc>),
    /// Ordered sequence addressed by index.
    Array(Vec<Value>),
    /// String-keyed map of own members.
    Map(Map),
    /// Opaque function, passed through untouched.
    Callable(Callable),
}

impl Value {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Returns true for arrays and maps, the shapes clone recurses into.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Map(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value of either number variant
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(c) => Some(c),
            _ => None,
        }
    }

    /// Look up an own member by key.
    ///
    /// Arrays are addressed by canonical index strings (`"0"`, `"12"`).
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            Value::Array(items) => parse_array_index(key).and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Follow a dot-separated path of member keys
    pub fn pointer(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Iterate the value's own members.
    ///
    /// Arrays yield their indices as decimal strings, maps yield keys in
    /// insertion order, every other variant has no members.
    pub fn members(&self) -> Members<'_> {
        match self {
            Value::Array(items) => Members::Array(items.iter().enumerate()),
            Value::Map(map) => Members::Map(map.iter()),
            _ => Members::Empty,
        }
    }
}

/// Iterator over the own members of a [`Value`].
pub enum Members<'a> {
    Array(std::iter::Enumerate<std::slice::Iter<'a, Value>>),
    Map(indexmap::map::Iter<'a, String, Value>),
    Empty,
}

impl<'a> Iterator for Members<'a> {
    type Item = (Cow<'a, str>, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Members::Array(iter) => iter
                .next()
                .map(|(i, v)| (Cow::Owned(i.to_string()), v)),
            Members::Map(iter) => iter.next().map(|(k, v)| (Cow::Borrowed(k.as_str()), v)),
            Members::Empty => None,
        }
    }
}

/// Parse a member key as an array index.
///
/// Only the canonical decimal spelling of a non-negative integer is accepted:
/// no sign, no leading zeros, no fraction, no exponent, no trailing text.
/// Indices run from 0 to 2^32 - 2; larger numbers are plain keys.
pub fn parse_array_index(key: &str) -> Option<usize> {
    let bytes = key.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    let index: u32 = key.parse().ok()?;
    if index == u32::MAX {
        return None;
    }
    usize::try_from(index).ok()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(i), Value::Float(f)) | (Value::Float(f), Value::Integer(i)) => {
                *i as f64 == *f
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Value::Callable(c)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}
