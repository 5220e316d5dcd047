//! Conversion between [`Value`] and `serde_json::Value`.
//!
//! Output follows JSON stringify rules: undefined members and callables are
//! dropped from maps and become `null` inside arrays.

use crate::value::{Map, Value};
use chrono::SecondsFormat;
use serde::{Serialize, Serializer};
use serde_json::{Number, Value as Json};

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Boolean(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(object) => Value::Map(
                object
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Map>(),
            ),
        }
    }
}

impl Value {
    /// Render as JSON.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Undefined | Value::Null | Value::Callable(_) => Json::Null,
            Value::Boolean(b) => Json::Bool(*b),
            Value::Integer(i) => Json::Number((*i).into()),
            Value::Float(f) => Number::from_f64(*f).map(Json::Number).unwrap_or(Json::Null),
            Value::String(s) => Json::String(s.clone()),
            Value::Date(d) => Json::String(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => Json::Object(
                map.iter()
                    .filter(|(_, v)| !matches!(v, Value::Undefined | Value::Callable(_)))
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
