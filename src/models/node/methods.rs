use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::models::ack::Ack;
use crate::models::constants::{self, DEFAULT_NODE_TYPE, ROOT_IDENTIFIER, ROOT_NODE_TYPE};
use crate::models::criteria::{self, Criteria};
use crate::models::dependency::Dependency;
use crate::models::event::NodeSnapshot;
use crate::models::subscription::Subscription;
use crate::validation::validate_identifier;

use super::types::{Node, NodeState, Properties, QuietedReason, Status};

impl Node {
    /// Create a node with a validated identifier, linked under the root
    /// unless a parent is set.
    pub fn new(identifier: impl Into<String>) -> Result<Self> {
        let identifier = identifier.into();
        validate_identifier(&identifier)?;
        Ok(Self::unchecked(identifier, DEFAULT_NODE_TYPE))
    }

    /// The root node. Created once by the manager.
    pub(crate) fn root() -> Self {
        Self::unchecked(ROOT_IDENTIFIER.to_string(), ROOT_NODE_TYPE)
    }

    fn unchecked(identifier: String, node_type: &str) -> Self {
        Self {
            identifier,
            parent: None,
            node_type: node_type.to_string(),
            tags: BTreeSet::new(),
            properties: Properties::new(),
            status: Status::Unknown,
            ack: None,
            error: None,
            last_contacted: None,
            status_changed: Utc::now(),
            dependencies: Dependency::default(),
            quieted_reasons: BTreeMap::new(),
            children: BTreeSet::new(),
            subscriptions: BTreeMap::new(),
            update_delta: Properties::new(),
            pending_update_events: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = node_type.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_dependencies(mut self, dependencies: Dependency) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Declared or linked parent; `None` only for the root before linking.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn children(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(String::as_str)
    }

    pub fn subscriptions(&self) -> impl Iterator<Item = &Subscription> {
        self.subscriptions.values()
    }

    pub fn is_operational(&self) -> bool {
        constants::is_operational(&self.identifier)
    }

    pub fn is_quieted(&self) -> bool {
        !self.quieted_reasons.is_empty()
    }

    /// Register a direct child. The child must declare this node as its parent.
    pub fn add_child(&mut self, child: &str, declared_parent: Option<&str>) -> Result<()> {
        if declared_parent != Some(self.identifier.as_str()) {
            return Err(Error::ParentMismatch {
                node: self.identifier.clone(),
                child: child.to_string(),
                declared: declared_parent.unwrap_or(ROOT_IDENTIFIER).to_string(),
            });
        }
        self.children.insert(child.to_string());
        Ok(())
    }

    pub fn remove_child(&mut self, child: &str) -> bool {
        self.children.remove(child)
    }

    pub(crate) fn attach_subscription(&mut self, subscription: Subscription) {
        self.subscriptions.insert(subscription.id.clone(), subscription);
    }

    pub(crate) fn detach_subscription(&mut self, id: &str) -> Option<Subscription> {
        self.subscriptions.remove(id)
    }

    /// Check the dependency set never names the root or this node itself.
    pub fn validate_dependencies(&self) -> Result<()> {
        let identifiers = self.dependencies.identifiers();
        if identifiers.contains(ROOT_IDENTIFIER) {
            return Err(Error::DependencyOnRoot {
                node: self.identifier.clone(),
            });
        }
        if identifiers.contains(&self.identifier) {
            return Err(Error::SelfDependency {
                node: self.identifier.clone(),
            });
        }
        Ok(())
    }

    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            identifier: self.identifier.clone(),
            parent: self.parent.clone(),
            node_type: self.node_type.clone(),
            status: self.status,
            tags: self.tags.clone(),
            properties: self.properties.clone(),
        }
    }

    pub fn matches(&self, criteria: &Criteria) -> bool {
        criteria::matches(self, criteria)
    }

    /// Flattened view of the node for the query layer.
    ///
    /// Properties sit at the top level next to the node's own attributes;
    /// attributes win on collision. With `keys`, only those entries are kept.
    pub fn fetch_values(&self, keys: Option<&[String]>) -> Properties {
        let mut values = self.properties.clone();
        values.insert("identifier".to_string(), json!(self.identifier));
        values.insert("parent".to_string(), json!(self.parent));
        values.insert("type".to_string(), json!(self.node_type));
        values.insert("status".to_string(), json!(self.status));
        values.insert("tags".to_string(), json!(self.tags));
        values.insert("error".to_string(), json!(self.error));
        values.insert(
            "ack".to_string(),
            self.ack.as_ref().map_or(Value::Null, Ack::to_value),
        );
        values.insert("last_contacted".to_string(), json!(self.last_contacted));
        values.insert("status_changed".to_string(), json!(self.status_changed));
        values.insert("quieted_reasons".to_string(), json!(self.quieted_reasons));
        values.insert("dependencies".to_string(), self.dependencies.to_value());

        match keys {
            None => values,
            Some(keys) => keys
                .iter()
                .filter_map(|key| values.get(key).map(|value| (key.clone(), value.clone())))
                .collect(),
        }
    }

    /// Runtime state worth persisting across restarts.
    pub fn state(&self) -> NodeState {
        NodeState {
            status: self.status,
            ack: self.ack.clone(),
            error: self.error.clone(),
            last_contacted: self.last_contacted,
            status_changed: self.status_changed,
            quieted_reasons: self.quieted_reasons.clone(),
            dependencies: self.dependencies.clone(),
            properties: self.properties.clone(),
        }
    }

    /// Restore persisted state. The dependency set is replaced as a whole.
    pub fn restore_state(&mut self, state: NodeState) {
        self.status = state.status;
        self.ack = state.ack;
        self.error = state.error;
        self.last_contacted = state.last_contacted;
        self.status_changed = state.status_changed;
        self.quieted_reasons = state.quieted_reasons;
        self.dependencies = state.dependencies;
        self.properties = state.properties;
    }

    pub fn quieted_reason(&self, reason: QuietedReason) -> Option<&str> {
        self.quieted_reasons.get(&reason).map(String::as_str)
    }
}
