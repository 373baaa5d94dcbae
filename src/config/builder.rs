use tracing::debug;

use crate::error::Result;
use crate::manager::Manager;
use crate::models::node::Node;

use super::{NodeDefinition, TreeConfig};

/// Collects node definitions into a fresh `Manager`, then builds the tree.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    manager: Manager,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &TreeConfig) -> Result<Self> {
        let mut builder = Self::new();
        for definition in &config.nodes {
            builder.add(definition)?;
        }
        Ok(builder)
    }

    pub fn add(&mut self, definition: &NodeDefinition) -> Result<&mut Self> {
        self.add_node(definition.build()?)
    }

    pub fn add_node(&mut self, node: Node) -> Result<&mut Self> {
        debug!(node = %node.identifier(), "node defined");
        self.manager.register_node(node)?;
        Ok(self)
    }

    /// Link the tree and register dependencies.
    ///
    /// # Errors
    /// Any configuration error found while building.
    pub fn build(mut self) -> Result<Manager> {
        self.manager.build_tree()?;
        Ok(self.manager)
    }
}
