use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Relation, Result};
use crate::models::constants::{is_operational, ROOT_IDENTIFIER};
use crate::models::criteria::Criteria;
use crate::models::node::Node;
use crate::models::subscription::{Sink, Subscription};

use super::Manager;

impl Manager {
    /// Link every non-operational node under its parent, then register
    /// secondary dependencies.
    ///
    /// # Errors
    /// Configuration errors: a missing parent, a parent cycle, or a
    /// dependency on the root, the node itself, an ancestor or a descendant.
    pub fn build_tree(&mut self) -> Result<()> {
        let identifiers: Vec<String> = self
            .nodes
            .keys()
            .filter(|id| !is_operational(id))
            .cloned()
            .collect();

        for identifier in &identifiers {
            self.link(identifier)?;
        }
        self.tree_built = true;

        for identifier in &identifiers {
            self.register_dependencies(identifier)?;
        }

        info!(nodes = identifiers.len(), "tree built");
        Ok(())
    }

    /// Graft a node into a built tree: link it and register its dependencies.
    ///
    /// On failure the node is not added.
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if !self.tree_built {
            return Err(Error::TreeNotBuilt);
        }

        let identifier = node.identifier().to_string();
        self.insert(node)?;
        if is_operational(&identifier) {
            return Ok(());
        }

        let result = self
            .link(&identifier)
            .and_then(|()| self.check_dependents_of(&identifier))
            .and_then(|()| self.register_dependencies(&identifier));

        if let Err(e) = result {
            self.unregister_dependencies(&identifier);
            self.unlink(&identifier);
            self.nodes.remove(&identifier);
            return Err(e);
        }

        info!(node = %identifier, "node added");
        Ok(())
    }

    /// Prune a node and all its descendants.
    ///
    /// Returns `Ok(None)` when no such node exists.
    ///
    /// # Errors
    /// `Error::OperationalNode` for operational nodes such as the root.
    pub fn remove_node(&mut self, identifier: &str) -> Result<Option<Node>> {
        if is_operational(identifier) {
            return Err(Error::OperationalNode {
                identifier: identifier.to_string(),
            });
        }

        let Some(node) = self.nodes.get(identifier) else {
            warn!(node = %identifier, "remove requested for unknown node");
            return Ok(None);
        };

        let children: Vec<String> = node.children.iter().cloned().collect();
        for child in children {
            self.remove_node(&child)?;
        }

        self.unregister_dependencies(identifier);
        self.unlink(identifier);

        let Some(node) = self.nodes.remove(identifier) else {
            return Ok(None);
        };
        for id in node.subscriptions.keys() {
            self.subscription_owners.remove(id);
        }

        info!(node = %identifier, "node removed");
        Ok(Some(node))
    }

    /// Ancestors of a node, nearest first, ending at the root.
    pub fn ancestors_for(&self, identifier: &str) -> Vec<&Node> {
        self.ancestor_ids(identifier)
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    /// Descendants of a node in depth-first order.
    pub fn descendants_for(&self, identifier: &str) -> Vec<&Node> {
        let mut descendants = Vec::new();
        let Some(node) = self.nodes.get(identifier) else {
            return descendants;
        };
        let mut stack: Vec<&str> = node.children.iter().rev().map(String::as_str).collect();
        let mut seen = HashSet::new();

        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(node) = self.nodes.get(id) {
                descendants.push(node);
                stack.extend(node.children.iter().rev().map(String::as_str));
            }
        }

        descendants
    }

    fn ancestor_ids(&self, identifier: &str) -> Vec<String> {
        let mut ancestors = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.nodes.get(identifier).and_then(|n| n.parent.clone());

        while let Some(id) = current {
            if !seen.insert(id.clone()) {
                break;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent.clone());
            ancestors.push(id);
        }

        ancestors
    }

    fn link(&mut self, identifier: &str) -> Result<()> {
        let parent = self
            .nodes
            .get(identifier)
            .ok_or_else(|| Error::UnknownNode {
                identifier: identifier.to_string(),
            })?
            .parent
            .clone()
            .unwrap_or_else(|| ROOT_IDENTIFIER.to_string());

        if !self.nodes.contains_key(&parent) {
            return Err(Error::MissingParent {
                node: identifier.to_string(),
                parent,
            });
        }
        if parent == identifier || self.ancestor_ids(&parent).iter().any(|a| a == identifier) {
            return Err(Error::ParentCycle {
                node: identifier.to_string(),
                parent,
            });
        }

        if let Some(node) = self.nodes.get_mut(identifier) {
            node.parent = Some(parent.clone());
        }
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.add_child(identifier, Some(&parent))?;
        }

        debug!(node = %identifier, parent = %parent, "linked");
        Ok(())
    }

    fn unlink(&mut self, identifier: &str) {
        let parent = self.nodes.get(identifier).and_then(|n| n.parent.clone());
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.remove_child(identifier);
        }
    }

    /// Subscribe a node to the events of every identifier it depends on.
    ///
    /// The subscriptions live on the root and match on the dependency's
    /// identifier, so they work wherever the dependency sits in the tree.
    pub(super) fn register_dependencies(&mut self, identifier: &str) -> Result<()> {
        let node = self.nodes.get(identifier).ok_or_else(|| Error::UnknownNode {
            identifier: identifier.to_string(),
        })?;
        node.validate_dependencies()?;

        let dependencies = node.dependencies.identifiers();
        if dependencies.is_empty() {
            self.unregister_dependencies(identifier);
            return Ok(());
        }

        let ancestors: HashSet<String> = self.ancestor_ids(identifier).into_iter().collect();
        let descendants: HashSet<String> = self
            .descendants_for(identifier)
            .iter()
            .map(|n| n.identifier().to_string())
            .collect();

        for dependency in &dependencies {
            let relation = if ancestors.contains(dependency) {
                Some(Relation::Ancestor)
            } else if descendants.contains(dependency) {
                Some(Relation::Descendant)
            } else {
                None
            };
            if let Some(relation) = relation {
                return Err(Error::DependencyCycle {
                    node: identifier.to_string(),
                    dependency: dependency.clone(),
                    relation,
                });
            }
        }

        self.unregister_dependencies(identifier);

        let mut subscription_ids = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            let mut criteria = Criteria::new();
            criteria.insert("identifier".to_string(), Value::String(dependency));
            let subscription = Subscription::new(
                None,
                criteria,
                Criteria::new(),
                Sink::Dependent(identifier.to_string()),
            );
            subscription_ids.push(subscription.id.clone());
            self.attach_subscription(ROOT_IDENTIFIER, subscription);
        }

        debug!(
            node = %identifier,
            count = subscription_ids.len(),
            "dependency subscriptions registered"
        );
        self.dependency_subscriptions
            .insert(identifier.to_string(), subscription_ids);
        Ok(())
    }

    fn unregister_dependencies(&mut self, identifier: &str) {
        if let Some(ids) = self.dependency_subscriptions.remove(identifier) {
            for id in ids {
                self.detach_subscription(&id);
            }
        }
    }

    /// A freshly grafted node must not be a dependency of one of its ancestors.
    fn check_dependents_of(&self, identifier: &str) -> Result<()> {
        for ancestor in self.ancestors_for(identifier) {
            if ancestor.dependencies.identifiers().contains(identifier) {
                return Err(Error::DependencyCycle {
                    node: ancestor.identifier().to_string(),
                    dependency: identifier.to_string(),
                    relation: Relation::Descendant,
                });
            }
        }
        Ok(())
    }
}
