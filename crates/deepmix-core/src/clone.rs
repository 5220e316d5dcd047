//! Deep clone.

use crate::depth::Depth;
use crate::error::{Operation, Result};
use crate::value::{Map, Value};

/// Produce a structurally independent copy of `value`.
///
/// Arrays and maps are rebuilt level by level, dates are copied by value,
/// callables are shared rather than copied. Fails with
/// `RecursionLimitExceeded` once nesting reaches [`crate::MAX_DEPTH`].
pub fn deep_clone(value: &Value) -> Result<Value> {
    clone_at(value, Depth::root(Operation::Clone))
}

fn clone_at(value: &Value, depth: Depth) -> Result<Value> {
    let depth = depth.descend()?;

    let cloned = match value {
        Value::Array(items) => {
            let mut target = Vec::with_capacity(items.len());
            for item in items {
                target.push(clone_member(item, depth)?);
            }
            Value::Array(target)
        }
        Value::Map(map) => {
            let mut target = Map::with_capacity(map.len());
            for (key, item) in map {
                target.insert(key.clone(), clone_member(item, depth)?);
            }
            Value::Map(target)
        }
        // Dates, scalars and callables carry no nested structure.
        other => other.clone(),
    };

    Ok(cloned)
}

fn clone_member(item: &Value, depth: Depth) -> Result<Value> {
    if item.is_container() {
        clone_at(item, depth)
    } else {
        Ok(item.clone())
    }
}
