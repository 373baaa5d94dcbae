//! Standing registrations for events matching a type and criteria.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::criteria::{self, Criteria};
use crate::models::event::{Event, EventKind};

/// User callback invoked with each matching event.
pub type Callback = Arc<dyn Fn(&Event) + Send + Sync>;

/// Where a matching event is delivered.
#[derive(Clone)]
pub enum Sink {
    Callback(Callback),
    /// Run `handle_event` on the named node. Used for secondary dependencies.
    Dependent(String),
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sink::Callback(_) => f.write_str("Callback(..)"),
            Sink::Dependent(identifier) => f.debug_tuple("Dependent").field(identifier).finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Subscription {
    pub id: String,
    /// `None` matches every event type
    pub event_type: Option<EventKind>,
    pub criteria: Criteria,
    pub negative_criteria: Criteria,
    pub sink: Sink,
}

impl Subscription {
    pub fn new(
        event_type: Option<EventKind>,
        criteria: Criteria,
        negative_criteria: Criteria,
        sink: Sink,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_type,
            criteria,
            negative_criteria,
            sink,
        }
    }

    /// Whether `event` should be delivered through this subscription.
    ///
    /// Criteria are checked against the event's node snapshot; events without
    /// a node only have to pass the type filter.
    pub fn matches(&self, event: &Event) -> bool {
        if self.event_type.is_some_and(|kind| kind != event.kind) {
            return false;
        }

        let Some(node) = &event.node else {
            return true;
        };

        criteria::matches(node, &self.criteria)
            && (self.negative_criteria.is_empty()
                || !criteria::matches(node, &self.negative_criteria))
    }

    /// The node whose `handle_event` this subscription drives, if any.
    pub fn dependent(&self) -> Option<&str> {
        match &self.sink {
            Sink::Dependent(identifier) => Some(identifier),
            Sink::Callback(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::NodeSnapshot;
    use crate::models::node::Status;
    use serde_json::{json, Map, Value};
    use std::collections::BTreeSet;

    fn map(value: Value) -> Criteria {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn event(kind: EventKind, identifier: &str, tags: &[&str]) -> Event {
        let node = NodeSnapshot {
            identifier: identifier.to_string(),
            parent: None,
            node_type: "service".to_string(),
            status: Status::Down,
            tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
            properties: Map::new(),
        };
        Event::new(kind, Some(node), json!({}))
    }

    fn subscription(event_type: Option<EventKind>, criteria: Value, negative: Value) -> Subscription {
        Subscription::new(
            event_type,
            map(criteria),
            map(negative),
            Sink::Dependent("watcher".to_string()),
        )
    }

    #[test]
    fn test_untyped_subscription_matches_any_type() {
        let sub = subscription(None, json!({}), json!({}));
        assert!(sub.matches(&event(EventKind::Down, "db1", &[])));
        assert!(sub.matches(&event(EventKind::Update, "db1", &[])));
    }

    #[test]
    fn test_event_type_filter() {
        let sub = subscription(Some(EventKind::Down), json!({}), json!({}));
        assert!(sub.matches(&event(EventKind::Down, "db1", &[])));
        assert!(!sub.matches(&event(EventKind::Up, "db1", &[])));
    }

    #[test]
    fn test_positive_and_negative_criteria() {
        let sub = subscription(None, json!({"tag": "db"}), json!({"tag": "staging"}));
        assert!(sub.matches(&event(EventKind::Down, "db1", &["db"])));
        assert!(!sub.matches(&event(EventKind::Down, "db2", &["db", "staging"])));
        assert!(!sub.matches(&event(EventKind::Down, "web1", &["web"])));
    }

    #[test]
    fn test_event_without_node_passes_criteria() {
        let sub = subscription(None, json!({"tag": "db"}), json!({}));
        assert!(sub.matches(&Event::new(EventKind::Update, None, json!({}))));
    }

    #[test]
    fn test_ids_are_unique_and_dependent_exposed() {
        let a = subscription(None, json!({}), json!({}));
        let b = subscription(None, json!({}), json!({}));
        assert_ne!(a.id, b.id);
        assert_eq!(a.dependent(), Some("watcher"));
    }
}
