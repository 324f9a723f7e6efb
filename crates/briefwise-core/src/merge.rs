//! Recursive JSON deep-merge for brief content.
//!
//! The brief aggregator never overwrites a brief's content wholesale:
//! proof-signal fields are merged in so that fields written by earlier
//! pipeline steps survive a failed or partial later step.

use serde_json::Value as JsonValue;

/// Deep-merge `patch` into `target`.
///
/// Objects are merged key by key, recursing into keys present on both
/// sides. Any non-object value in `patch` (including arrays and null)
/// replaces the corresponding value in `target`. If `target` is not an
/// object and `patch` is, `target` becomes a copy of `patch`.
pub fn deep_merge(target: &mut JsonValue, patch: &JsonValue) {
    match (target, patch) {
        (JsonValue::Object(target_map), JsonValue::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                match target_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, patch_value),
                    None => {
                        target_map.insert(key.clone(), patch_value.clone());
                    }
                }
            }
        }
        (target, patch) => {
            *target = patch.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_preserves_existing_fields() {
        let mut target = json!({"a": 1});
        deep_merge(&mut target, &json!({"b": 2}));
        assert_eq!(target, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_merge_recurses_into_nested_objects() {
        let mut target = json!({"signals": {"reddit": 3}, "score": 7});
        deep_merge(&mut target, &json!({"signals": {"hn": 5}}));
        assert_eq!(
            target,
            json!({"signals": {"reddit": 3, "hn": 5}, "score": 7})
        );
    }

    #[test]
    fn test_merge_replaces_scalars_and_arrays() {
        let mut target = json!({"tags": ["a"], "n": 1});
        deep_merge(&mut target, &json!({"tags": ["b", "c"], "n": 2}));
        assert_eq!(target, json!({"tags": ["b", "c"], "n": 2}));
    }

    #[test]
    fn test_merge_null_replaces_value() {
        let mut target = json!({"a": 1});
        deep_merge(&mut target, &json!({"a": null}));
        assert_eq!(target, json!({"a": null}));
    }

    #[test]
    fn test_merge_object_into_non_object() {
        let mut target = json!(42);
        deep_merge(&mut target, &json!({"a": 1}));
        assert_eq!(target, json!({"a": 1}));
    }

    #[test]
    fn test_merge_empty_patch_is_noop() {
        let mut target = json!({"a": {"b": 1}});
        deep_merge(&mut target, &json!({}));
        assert_eq!(target, json!({"a": {"b": 1}}));
    }
}
