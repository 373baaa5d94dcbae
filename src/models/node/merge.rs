//! Recursive property merge with change tracking.

use serde_json::{json, Map, Value};

use super::types::Properties;

/// A single leaf-level change produced by a merge.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    pub path: Vec<String>,
    pub old: Value,
    pub new: Value,
}

impl PropertyChange {
    /// Dotted form of the path, e.g. `hardware.disks.count`.
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

/// Merge `new` into `old`, returning the merged map and the changes made.
///
/// Maps on both sides merge recursively; any other differing value is
/// replaced. Keys whose merged value is null are dropped from the result.
pub fn merge_properties(old: &Properties, new: &Properties) -> (Properties, Vec<PropertyChange>) {
    let (merged, changes) = merge_at(old, new, &[]);
    (strip_nulls(merged), changes)
}

fn merge_at(old: &Properties, new: &Properties, prefix: &[String]) -> (Properties, Vec<PropertyChange>) {
    let mut merged = old.clone();
    let mut changes = Vec::new();

    for (key, new_value) in new {
        let mut path = prefix.to_vec();
        path.push(key.clone());

        match (old.get(key), new_value) {
            (Some(Value::Object(old_map)), Value::Object(new_map)) => {
                let (nested, nested_changes) = merge_at(old_map, new_map, &path);
                merged.insert(key.clone(), Value::Object(nested));
                changes.extend(nested_changes);
            }
            (old_value, _) => {
                let old_value = old_value.cloned().unwrap_or(Value::Null);
                if old_value != *new_value {
                    merged.insert(key.clone(), new_value.clone());
                    changes.push(PropertyChange {
                        path,
                        old: old_value,
                        new: new_value.clone(),
                    });
                }
            }
        }
    }

    (merged, changes)
}

fn strip_nulls(map: Properties) -> Properties {
    map.into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| match value {
            Value::Object(inner) => (key, Value::Object(strip_nulls(inner))),
            other => (key, other),
        })
        .collect()
}

/// Record `[old, new]` at `path` inside a nested delta map.
pub fn record_delta(delta: &mut Properties, path: &[String], old: Value, new: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = delta;
    for segment in parents {
        let entry = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(next) = entry else {
            return;
        };
        current = next;
    }
    current.insert(last.clone(), json!([old, new]));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(value: Value) -> Properties {
        match value {
            Value::Object(map) => map,
            _ => Properties::new(),
        }
    }

    #[test]
    fn test_identical_properties_produce_no_changes() {
        let old = props(json!({"a": 1, "b": {"c": "x"}}));
        let (merged, changes) = merge_properties(&old, &old.clone());
        assert_eq!(merged, old);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_nested_merge_keeps_untouched_keys() {
        let old = props(json!({"hw": {"cpus": 4, "ram": 16}, "region": "eu"}));
        let new = props(json!({"hw": {"cpus": 8}}));
        let (merged, changes) = merge_properties(&old, &new);

        assert_eq!(merged, props(json!({"hw": {"cpus": 8, "ram": 16}, "region": "eu"})));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].dotted_path(), "hw.cpus");
        assert_eq!(changes[0].old, json!(4));
        assert_eq!(changes[0].new, json!(8));
    }

    #[test]
    fn test_null_removes_key_and_records_change() {
        let old = props(json!({"a": 1, "b": {"c": 2, "d": 3}}));
        let new = props(json!({"a": null, "b": {"c": null}}));
        let (merged, changes) = merge_properties(&old, &new);

        assert_eq!(merged, props(json!({"b": {"d": 3}})));
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_null_for_missing_key_is_not_a_change() {
        let (merged, changes) = merge_properties(&Properties::new(), &props(json!({"a": null})));
        assert!(merged.is_empty());
        assert!(changes.is_empty());
    }

    #[test]
    fn test_scalar_replaces_map() {
        let old = props(json!({"a": {"b": 1}}));
        let new = props(json!({"a": "flat"}));
        let (merged, changes) = merge_properties(&old, &new);
        assert_eq!(merged["a"], json!("flat"));
        assert_eq!(changes[0].old, json!({"b": 1}));
    }

    #[test]
    fn test_record_delta_nests_by_path() {
        let mut delta = Properties::new();
        record_delta(&mut delta, &["hw".to_string(), "cpus".to_string()], json!(4), json!(8));
        record_delta(&mut delta, &["status".to_string()], json!("up"), json!("down"));

        assert_eq!(
            Value::Object(delta),
            json!({"hw": {"cpus": [4, 8]}, "status": ["up", "down"]})
        );
    }
}
