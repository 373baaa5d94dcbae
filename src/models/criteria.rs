//! Node criteria matching shared by subscriptions and tree queries.
//!
//! Criteria are a map of key -> expected value, evaluated per key:
//! - `status`, `type`, `identifier`: exact match
//! - `tag`: the node carries that single tag
//! - `tags`: the node carries every listed tag
//! - `delta`: always true
//! - anything else: structural containment against the node's properties

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::models::event::NodeSnapshot;
use crate::models::node::{Node, Properties, Status};

pub type Criteria = Map<String, Value>;

/// Read access to the node attributes criteria can reference.
pub trait CriteriaTarget {
    fn identifier(&self) -> &str;
    fn node_type(&self) -> &str;
    fn status(&self) -> Status;
    fn tags(&self) -> &BTreeSet<String>;
    fn properties(&self) -> &Properties;
}

impl CriteriaTarget for Node {
    fn identifier(&self) -> &str {
        &self.identifier
    }
    fn node_type(&self) -> &str {
        &self.node_type
    }
    fn status(&self) -> Status {
        self.status
    }
    fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }
    fn properties(&self) -> &Properties {
        &self.properties
    }
}

impl CriteriaTarget for NodeSnapshot {
    fn identifier(&self) -> &str {
        &self.identifier
    }
    fn node_type(&self) -> &str {
        &self.node_type
    }
    fn status(&self) -> Status {
        self.status
    }
    fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }
    fn properties(&self) -> &Properties {
        &self.properties
    }
}

/// True if every criterion holds for `target`. Empty criteria always match.
pub fn matches<T: CriteriaTarget + ?Sized>(target: &T, criteria: &Criteria) -> bool {
    criteria.iter().all(|(key, expected)| match key.as_str() {
        "status" => expected.as_str() == Some(target.status().as_str()),
        "type" => expected.as_str() == Some(target.node_type()),
        "identifier" => expected.as_str() == Some(target.identifier()),
        "tag" => expected
            .as_str()
            .is_some_and(|tag| target.tags().contains(tag)),
        "tags" => match expected {
            Value::Array(wanted) => wanted
                .iter()
                .all(|tag| tag.as_str().is_some_and(|t| target.tags().contains(t))),
            Value::String(tag) => target.tags().contains(tag),
            _ => false,
        },
        "delta" => true,
        _ => target
            .properties()
            .get(key)
            .is_some_and(|actual| contains(actual, expected)),
    })
}

/// Maps match when every expected key is present and matches recursively;
/// everything else compares by equality.
fn contains(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Object(actual), Value::Object(expected)) => expected
            .iter()
            .all(|(key, want)| actual.get(key).is_some_and(|have| contains(have, want))),
        _ => actual == expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn criteria(value: Value) -> Criteria {
        match value {
            Value::Object(map) => map,
            _ => panic!("criteria must be a map"),
        }
    }

    fn web_node() -> Node {
        let mut node = Node::new("web1")
            .unwrap()
            .with_type("host")
            .with_tags(["web", "prod"]);
        node.properties = criteria(json!({
            "region": "eu-west",
            "hardware": {"cpus": 8, "disks": {"count": 2}},
        }));
        node.status = Status::Up;
        node
    }

    #[test]
    fn test_empty_criteria_match() {
        assert!(matches(&web_node(), &Criteria::new()));
    }

    #[test]
    fn test_exact_attributes() {
        let node = web_node();
        assert!(matches(&node, &criteria(json!({"status": "up", "type": "host"}))));
        assert!(matches(&node, &criteria(json!({"identifier": "web1"}))));
        assert!(!matches(&node, &criteria(json!({"status": "down"}))));
        assert!(!matches(&node, &criteria(json!({"type": "service"}))));
    }

    #[test]
    fn test_tag_and_tags() {
        let node = web_node();
        assert!(matches(&node, &criteria(json!({"tag": "web"}))));
        assert!(!matches(&node, &criteria(json!({"tag": "db"}))));
        assert!(matches(&node, &criteria(json!({"tags": ["web", "prod"]}))));
        assert!(!matches(&node, &criteria(json!({"tags": ["web", "db"]}))));
        assert!(matches(&node, &criteria(json!({"tags": "prod"}))));
    }

    #[test]
    fn test_delta_key_always_matches() {
        assert!(matches(&web_node(), &criteria(json!({"delta": true}))));
    }

    #[test]
    fn test_nested_property_containment() {
        let node = web_node();
        assert!(matches(&node, &criteria(json!({"region": "eu-west"}))));
        assert!(matches(
            &node,
            &criteria(json!({"hardware": {"disks": {"count": 2}}}))
        ));
        assert!(!matches(&node, &criteria(json!({"hardware": {"cpus": 4}}))));
        assert!(!matches(&node, &criteria(json!({"hardware": {"gpus": 1}}))));
        assert!(!matches(&node, &criteria(json!({"rack": "r1"}))));
    }
}
