//! Events produced by node updates and status transitions.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::node::{Properties, Status};

/// Kinds of events a node can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "node.unknown")]
    Unknown,
    #[serde(rename = "node.up")]
    Up,
    #[serde(rename = "node.down")]
    Down,
    #[serde(rename = "node.acked")]
    Acked,
    #[serde(rename = "node.disabled")]
    Disabled,
    #[serde(rename = "node.quieted")]
    Quieted,
    /// Emitted once per update, whatever changed.
    #[serde(rename = "node.update")]
    Update,
    /// Emitted when an update changed status or properties.
    #[serde(rename = "node.delta")]
    Delta,
}

impl EventKind {
    /// Dotted event type name, e.g. `node.down`.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Unknown => "node.unknown",
            EventKind::Up => "node.up",
            EventKind::Down => "node.down",
            EventKind::Acked => "node.acked",
            EventKind::Disabled => "node.disabled",
            EventKind::Quieted => "node.quieted",
            EventKind::Update => "node.update",
            EventKind::Delta => "node.delta",
        }
    }

    /// The event announcing that a node entered `status`.
    pub fn entered(status: Status) -> Self {
        match status {
            Status::Unknown => EventKind::Unknown,
            Status::Up => EventKind::Up,
            Status::Down => EventKind::Down,
            Status::Acked => EventKind::Acked,
            Status::Disabled => EventKind::Disabled,
            Status::Quieted => EventKind::Quieted,
        }
    }

    /// Whether dependents should treat the source as unavailable.
    pub fn signals_outage(&self) -> bool {
        matches!(self, EventKind::Down | EventKind::Quieted)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node.unknown" => Ok(EventKind::Unknown),
            "node.up" => Ok(EventKind::Up),
            "node.down" => Ok(EventKind::Down),
            "node.acked" => Ok(EventKind::Acked),
            "node.disabled" => Ok(EventKind::Disabled),
            "node.quieted" => Ok(EventKind::Quieted),
            "node.update" => Ok(EventKind::Update),
            "node.delta" => Ok(EventKind::Delta),
            other => Err(format!("unknown event type '{other}'")),
        }
    }
}

/// The owning node as it was when the event was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub identifier: String,
    pub parent: Option<String>,
    #[serde(rename = "type")]
    pub node_type: String,
    pub status: Status,
    pub tags: BTreeSet<String>,
    pub properties: Properties,
}

/// An immutable notification derived from a node action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeSnapshot>,
    pub payload: Value,
}

impl Event {
    pub fn new(kind: EventKind, node: Option<NodeSnapshot>, payload: Value) -> Self {
        Self {
            kind,
            time: Utc::now(),
            node,
            payload,
        }
    }

    pub fn event_type(&self) -> &'static str {
        self.kind.name()
    }

    /// Identifier of the node that produced this event.
    pub fn source(&self) -> Option<&str> {
        self.node.as_ref().map(|n| n.identifier.as_str())
    }
}
