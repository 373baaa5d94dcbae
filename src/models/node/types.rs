use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::ack::Ack;
use crate::models::dependency::Dependency;
use crate::models::event::Event;
use crate::models::subscription::Subscription;

/// Nested property map carried by nodes and updates.
pub type Properties = Map<String, Value>;

/// Health status of a node.
///
/// State machine transitions (first matching rule wins):
///
/// On `update`:
/// - `Down` | `Unknown` | `Acked` -> `Up` (last contact successful)
/// - `Up` | `Unknown` -> `Down` (last contact failed)
/// - `Down` -> `Acked` (ack set)
/// - `Unknown` | `Up` -> `Disabled` (ack set)
/// - `Disabled` -> `Unknown` (ack cleared)
///
/// On `handle_event`:
/// - `Unknown` -> `Acked` (ack and error set)
/// - anything but `Disabled` | `Quieted` | `Acked` -> `Quieted` (quieted reason present)
/// - `Quieted` -> `Unknown` (no quieted reason left)
///
/// There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Unknown,
    Up,
    Down,
    Acked,
    Disabled,
    Quieted,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Unknown => "unknown",
            Status::Up => "up",
            Status::Down => "down",
            Status::Acked => "acked",
            Status::Disabled => "disabled",
            Status::Quieted => "quieted",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(Status::Unknown),
            "up" => Ok(Status::Up),
            "down" => Ok(Status::Down),
            "acked" => Ok(Status::Acked),
            "disabled" => Ok(Status::Disabled),
            "quieted" => Ok(Status::Quieted),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// Why a node is being quieted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuietedReason {
    /// The parent node is down or quieted.
    Primary,
    /// The node's secondary dependencies are unsatisfied.
    Secondary,
}

/// An entity in the monitoring tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) identifier: String,
    pub(crate) parent: Option<String>,
    pub node_type: String,
    pub tags: BTreeSet<String>,
    pub properties: Properties,
    pub status: Status,
    /// Present only while acked or disabled
    pub ack: Option<Ack>,
    /// Error of the last contact, `None` when it succeeded
    pub error: Option<String>,
    pub last_contacted: Option<DateTime<Utc>>,
    pub status_changed: DateTime<Utc>,
    pub dependencies: Dependency,
    pub quieted_reasons: BTreeMap<QuietedReason, String>,
    pub(crate) children: BTreeSet<String>,
    pub(crate) subscriptions: BTreeMap<String, Subscription>,
    // Scratch state of a single `update` / `handle_event` call
    pub(super) update_delta: Properties,
    pub(super) pending_update_events: Vec<Event>,
}

/// Persisted runtime state of a node.
///
/// Restoring replaces the dependency set wholesale, timestamps included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeState {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack: Option<Ack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub last_contacted: Option<DateTime<Utc>>,
    pub status_changed: DateTime<Utc>,
    #[serde(default)]
    pub quieted_reasons: BTreeMap<QuietedReason, String>,
    #[serde(default)]
    pub dependencies: Dependency,
    #[serde(default)]
    pub properties: Properties,
}
