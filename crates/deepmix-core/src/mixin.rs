//! Deep mixin (structural merge).
//!
//! Merge semantics, selected by the classification of the running target:
//! - Object/array/function target, structured source: merge own members
//!   field by field
//! - Object/array/function target, primitive source: target kept
//! - Primitive target, array/object source: source clone replaces it
//! - Primitive target, primitive source: source wins
//!
//! Sources are applied left to right, so the last one has highest precedence.

use crate::classify::{classify, TypeTag};
use crate::clone::deep_clone;
use crate::depth::Depth;
use crate::error::{Operation, Result};
use crate::value::{parse_array_index, Value};

/// Longest array a merge may grow a target to.
///
/// Index keys that would extend an array past this length are skipped like
/// any other non-index key. Arrays already longer are still merged in place.
pub const MAX_ARRAY_LEN: usize = 1 << 20;

/// Merge `sources` onto a clone of `base`.
///
/// Neither `base` nor any source is modified. With no sources the result is
/// `deep_clone(base)`.
pub fn mixin(base: &Value, sources: &[Value]) -> Result<Value> {
    mixin_at(base, sources, Depth::root(Operation::Mixin))
}

fn mixin_at(base: &Value, sources: &[Value], depth: Depth) -> Result<Value> {
    let mut target = deep_clone(base)?;
    for source in sources {
        target = merge(target, source, depth)?;
    }
    Ok(target)
}

fn merge(target: Value, source: &Value, depth: Depth) -> Result<Value> {
    if classify(&target).is_structured() {
        if !classify(source).is_structured() {
            // Primitives never override structured values.
            return Ok(target);
        }
        return merge_members(target, source, depth.descend()?);
    }

    match classify(source) {
        TypeTag::Array | TypeTag::Object => deep_clone(source),
        _ => Ok(source.clone()),
    }
}

fn merge_members(mut target: Value, source: &Value, depth: Depth) -> Result<Value> {
    match &mut target {
        Value::Array(items) => {
            for (key, incoming) in source.members() {
                let Some(index) = parse_array_index(&key) else {
                    continue;
                };
                if index >= items.len() && index >= MAX_ARRAY_LEN {
                    log::debug!(
                        "skipping array index {} past length limit {}",
                        index,
                        MAX_ARRAY_LEN
                    );
                    continue;
                }
                if let Some(merged) = merge_field(items.get(index), incoming, depth)? {
                    if index >= items.len() {
                        items.resize(index + 1, Value::Undefined);
                    }
                    items[index] = merged;
                }
            }
        }
        Value::Map(map) => {
            for (key, incoming) in source.members() {
                if let Some(merged) = merge_field(map.get(&*key), incoming, depth)? {
                    map.insert(key.into_owned(), merged);
                }
            }
        }
        // Dates and callables hold no members to merge into.
        _ => {}
    }
    Ok(target)
}

/// Resolve one member. `None` leaves the target slot as it is.
///
/// An undefined incoming member never overrides anything.
fn merge_field(current: Option<&Value>, incoming: &Value, depth: Depth) -> Result<Option<Value>> {
    if incoming.is_undefined() {
        return Ok(None);
    }
    match current {
        None | Some(Value::Undefined) => match incoming {
            Value::Null => Ok(Some(Value::Null)),
            _ => deep_clone(incoming).map(Some),
        },
        Some(existing) => mixin_at(existing, std::slice::from_ref(incoming), depth).map(Some),
    }
}

/// Method-style access to clone and mixin.
pub trait MixinExt {
    /// See [`deep_clone`]
    fn deep_clone(&self) -> Result<Value>;

    /// See [`mixin`]
    fn mixin(&self, sources: &[Value]) -> Result<Value>;
}

impl MixinExt for Value {
    fn deep_clone(&self) -> Result<Value> {
        deep_clone(self)
    }

    fn mixin(&self, sources: &[Value]) -> Result<Value> {
        mixin(self, sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::value::{Callable, Map};
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_no_sources_is_clone() {
        let base = v(json!({"a": [1, {"b": 2}]}));
        assert_eq!(mixin(&base, &[]).unwrap(), deep_clone(&base).unwrap());
        assert_eq!(mixin(&Value::Integer(3), &[]).unwrap(), Value::Integer(3));
    }

    #[test]
    fn test_scalar_precedence() {
        assert_eq!(mixin(&v(json!(1)), &[v(json!("s"))]).unwrap(), v(json!("s")));
        assert_eq!(mixin(&v(json!(true)), &[v(json!(0))]).unwrap(), v(json!(0)));
        assert_eq!(mixin(&v(json!("x")), &[Value::Null]).unwrap(), Value::Null);
        assert_eq!(mixin(&Value::Null, &[v(json!(1.5))]).unwrap(), v(json!(1.5)));
    }

    #[test]
    fn test_container_replaces_scalar() {
        assert_eq!(mixin(&v(json!(1)), &[v(json!({"a": 1}))]).unwrap(), v(json!({"a": 1})));
        assert_eq!(mixin(&v(json!("x")), &[v(json!([1, 2]))]).unwrap(), v(json!([1, 2])));
        assert_eq!(mixin(&Value::Undefined, &[v(json!([1]))]).unwrap(), v(json!([1])));
    }

    #[test]
    fn test_scalar_never_overrides_container() {
        let base = v(json!({"a": 1}));
        for source in [v(json!("x")), v(json!(0)), Value::Null, Value::Undefined] {
            assert_eq!(mixin(&base, &[source]).unwrap(), base);
        }
    }

    #[test]
    fn test_field_level_default_fill() {
        let base = v(json!({"statusCode": 500, "data": {"subscription": {"id": null}}}));
        let source = v(json!({"statusCode": 200, "data": {"subscription": {"id": "abc"}}}));
        assert_eq!(mixin(&base, &[source.clone()]).unwrap(), source);
    }

    #[test]
    fn test_keeps_defaults_not_in_source() {
        let base = v(json!({"a": 1, "nested": {"keep": true, "over": 1}}));
        let source = v(json!({"nested": {"over": 2}, "b": 3}));
        assert_eq!(
            mixin(&base, &[source]).unwrap(),
            v(json!({"a": 1, "nested": {"keep": true, "over": 2}, "b": 3}))
        );
    }

    #[test]
    fn test_undefined_member_is_not_introduced() {
        let mut source = Map::new();
        source.insert("missing".to_string(), Value::Undefined);
        source.insert("none".to_string(), Value::Null);
        let result = mixin(&v(json!({})), &[Value::Map(source)]).unwrap();

        let map = result.as_map().unwrap();
        assert!(!map.contains_key("missing"));
        assert_eq!(map.get("none"), Some(&Value::Null));
    }

    #[test]
    fn test_undefined_member_keeps_existing_value() {
        let base = v(json!({"a": null, "b": 1, "c": {"x": 1}, "d": [1]}));
        let mut source = Map::new();
        for key in ["a", "b", "c", "d"] {
            source.insert(key.to_string(), Value::Undefined);
        }
        assert_eq!(mixin(&base, &[Value::Map(source)]).unwrap(), base);

        let list = v(json!([null, "x"]));
        let holes = Value::Array(vec![Value::Undefined, Value::Undefined]);
        assert_eq!(mixin(&list, &[holes]).unwrap(), list);
    }

    #[test]
    fn test_null_member_survives_undefined_source() {
        let mut source = Map::new();
        source.insert("a".to_string(), Value::Undefined);
        let result = mixin(&v(json!({"a": null})), &[Value::Map(source)]).unwrap();
        assert_eq!(result.get("a"), Some(&Value::Null));
        assert_eq!(result.to_json(), json!({"a": null}));
    }

    #[test]
    fn test_out_of_range_index_keys_are_skipped() {
        let target = v(json!(["a"]));
        for key in [
            "18446744073709551615",
            "1152921504606846976",
            "4294967295",
            "4294967294",
            "4000000000",
        ] {
            let mut source = Map::new();
            source.insert(key.to_string(), v(json!("x")));
            assert_eq!(mixin(&target, &[Value::Map(source)]).unwrap(), target, "key {}", key);
        }
    }

    #[test]
    fn test_array_growth_stops_at_length_limit() {
        let target = v(json!(["a"]));
        let mut source = Map::new();
        source.insert(MAX_ARRAY_LEN.to_string(), v(json!("past")));
        source.insert("1".to_string(), v(json!("b")));
        assert_eq!(mixin(&target, &[Value::Map(source)]).unwrap(), v(json!(["a", "b"])));
    }

    #[test]
    fn test_array_from_object_coercion() {
        let target = v(json!(["zero", "one"]));
        let source = v(json!({"0": "Z", "2": "two", "x": "skip"}));
        assert_eq!(mixin(&target, &[source]).unwrap(), v(json!(["Z", "one", "two"])));
    }

    #[test]
    fn test_array_extension_fills_gap_with_undefined() {
        let result = mixin(&v(json!(["a"])), &[v(json!({"3": "d"}))]).unwrap();
        assert_eq!(
            result,
            Value::Array(vec!["a".into(), Value::Undefined, Value::Undefined, "d".into()])
        );
    }

    #[test]
    fn test_array_merges_elementwise() {
        let target = v(json!([["a", "b"], {"k": 1}]));
        let source = v(json!([["A"], {"j": 2}]));
        assert_eq!(
            mixin(&target, &[source]).unwrap(),
            v(json!([["A", "b"], {"k": 1, "j": 2}]))
        );
    }

    #[test]
    fn test_array_onto_object_uses_index_keys() {
        let target = v(json!({"zero": 0, "0": 0}));
        let source = v(json!(["a", "b"]));
        assert_eq!(
            mixin(&target, &[source]).unwrap(),
            v(json!({"zero": 0, "0": "a", "1": "b"}))
        );
    }

    #[test]
    fn test_multi_source_precedence() {
        let base = v(json!({"a": 0, "b": 0, "c": 0, "n": {"x": 0}}));
        let first = v(json!({"a": 1, "b": 1, "n": {"x": 1, "y": 1}}));
        let second = v(json!({"b": 2, "n": {"y": 2}}));
        assert_eq!(
            mixin(&base, &[first, second]).unwrap(),
            v(json!({"a": 1, "b": 2, "c": 0, "n": {"x": 1, "y": 2}}))
        );
    }

    #[test]
    fn test_inputs_untouched() {
        let base = v(json!({"list": [1, 2], "n": {"a": null}}));
        let source = v(json!({"list": [3], "n": {"a": {"deep": true}}}));
        let base_before = base.clone();
        let source_before = source.clone();

        let _ = mixin(&base, &[source.clone()]).unwrap();

        assert_eq!(base, base_before);
        assert_eq!(source, source_before);
    }

    #[test]
    fn test_callable_member_passes_through() {
        let f = Callable::new("handler", |_| Value::Null);
        let mut source = Map::new();
        source.insert("func".to_string(), Value::Callable(f.clone()));
        let result = mixin(&v(json!({})), &[Value::Map(source)]).unwrap();
        assert!(result.get("func").unwrap().as_callable().unwrap().ptr_eq(&f));
    }

    #[test]
    fn test_callable_target_ignores_members() {
        let f = Callable::new("handler", |_| Value::Null);
        let result = mixin(&Value::Callable(f.clone()), &[v(json!({"a": 1}))]).unwrap();
        assert!(result.as_callable().unwrap().ptr_eq(&f));
    }

    #[test]
    fn test_depth_limit() {
        fn chain(levels: usize, leaf: &str) -> Value {
            let mut value = v(json!({ "final": leaf }));
            for _ in 1..levels {
                let mut map = Map::new();
                map.insert("nesting".to_string(), value);
                value = Value::Map(map);
            }
            value
        }

        assert!(mixin(&chain(99, "hi"), &[chain(99, "bye")]).is_ok());

        let err = mixin(&chain(100, "hi"), &[chain(100, "bye")]).unwrap_err();
        assert_eq!(err.operation(), Operation::Mixin);
        assert!(matches!(err, Error::RecursionLimitExceeded { limit: 100, .. }));
    }

    #[test]
    fn test_ext_trait() {
        let base = v(json!({"a": 1}));
        assert_eq!(base.mixin(&[v(json!({"b": 2}))]).unwrap(), v(json!({"a": 1, "b": 2})));
        assert_eq!(base.deep_clone().unwrap(), base);
    }
}
