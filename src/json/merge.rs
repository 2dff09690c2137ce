//! Merge semantics for config values.
//!
//! Equality throughout is `serde_json::Value` structural equality:
//! order-sensitive for arrays, order-insensitive for object keys.

use serde_json::{Map, Value};

use crate::types::op::MergeStrategy;

/// Merge `incoming` into `base` under the given strategy. When either side is
/// not an object the incoming value wins outright, matching `set`.
pub fn merge(base: &Value, incoming: &Value, strategy: MergeStrategy) -> Value {
    match (base.as_object(), incoming.as_object()) {
        (Some(b), Some(inc)) => match strategy {
            MergeStrategy::Replace => incoming.clone(),
            MergeStrategy::Shallow => {
                let mut out = b.clone();
                for (k, v) in inc {
                    out.insert(k.clone(), v.clone());
                }
                Value::Object(out)
            }
            MergeStrategy::Deep => Value::Object(deep_merge_maps(b, inc)),
        },
        _ => incoming.clone(),
    }
}

fn deep_merge_maps(base: &Map<String, Value>, incoming: &Map<String, Value>) -> Map<String, Value> {
    let mut out = base.clone();
    for (k, v) in incoming {
        match (out.get(k).and_then(Value::as_object), v.as_object()) {
            (Some(existing), Some(inc)) => {
                let merged = deep_merge_maps(existing, inc);
                out.insert(k.clone(), Value::Object(merged));
            }
            // Arrays and scalars are overwritten, not concatenated.
            _ => {
                out.insert(k.clone(), v.clone());
            }
        }
    }
    out
}

/// True when `value` is a recursive subset of `target`: every key of `value`
/// exists in `target` with an equal (or again-subset) value. Arrays and
/// scalars compare by equality. A deep merge of a subset is a no-op.
pub fn is_deep_subset(value: &Value, target: &Value) -> bool {
    match (value.as_object(), target.as_object()) {
        (Some(v), Some(t)) => v.iter().all(|(k, vv)| match t.get(k) {
            Some(tv) => is_deep_subset(vv, tv),
            None => false,
        }),
        _ => value == target,
    }
}
