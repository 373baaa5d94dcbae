//! The node registry and the tree-maintenance / propagation engine.
//!
//! This module handles:
//! - Linking nodes under their parents and guarding against cycles
//! - Registering cross-tree dependency subscriptions
//! - Driving downward broadcast and upward propagation of events
//!
//! The manager is synchronous and holds no locks. Callers serialize every
//! mutating call (updates, grafts, prunes, subscribe/unsubscribe).

mod propagation;
mod state;
mod subscriptions;
mod tree;


use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::models::constants::{is_operational, ROOT_IDENTIFIER};
use crate::models::criteria::Criteria;
use crate::models::node::Node;

/// Owns every node of the monitoring tree, keyed by identifier.
#[derive(Debug)]
pub struct Manager {
    nodes: BTreeMap<String, Node>,
    tree_built: bool,
    /// subscription id -> identifier of the node holding it
    subscription_owners: HashMap<String, String>,
    /// dependent node -> ids of its dependency subscriptions
    dependency_subscriptions: HashMap<String, Vec<String>>,
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

impl Manager {
    /// Create a manager holding only the root node.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(ROOT_IDENTIFIER.to_string(), Node::root());
        Self {
            nodes,
            tree_built: false,
            subscription_owners: HashMap::new(),
            dependency_subscriptions: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[ROOT_IDENTIFIER]
    }

    pub fn node(&self, identifier: &str) -> Option<&Node> {
        self.nodes.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.nodes.contains_key(identifier)
    }

    /// Every node, root included, in identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn is_built(&self) -> bool {
        self.tree_built
    }

    /// Register a node. Before the tree is built the node is only stored;
    /// afterwards this is a graft (see `add_node`).
    pub fn register_node(&mut self, node: Node) -> Result<()> {
        if self.tree_built {
            return self.add_node(node);
        }
        self.insert(node)
    }

    fn insert(&mut self, node: Node) -> Result<()> {
        if self.nodes.contains_key(node.identifier()) {
            return Err(Error::DuplicateNode {
                identifier: node.identifier().to_string(),
            });
        }
        self.nodes.insert(node.identifier().to_string(), node);
        Ok(())
    }

    /// Non-operational nodes matching `criteria` and not matching
    /// `negative_criteria` (when non-empty).
    pub fn find_nodes(&self, criteria: &Criteria, negative_criteria: &Criteria) -> Vec<&Node> {
        self.nodes
            .values()
            .filter(|node| !is_operational(node.identifier()))
            .filter(|node| node.matches(criteria))
            .filter(|node| negative_criteria.is_empty() || !node.matches(negative_criteria))
            .collect()
    }
}
