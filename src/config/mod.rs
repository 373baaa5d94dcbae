//! Tree definition files.
//!
//! A tree file lists the monitored nodes, their parents and their secondary
//! dependencies, plus an optional `[logging]` table:
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [[node]]
//! identifier = "host1"
//! type = "host"
//! tags = ["prod"]
//!
//! [[node]]
//! identifier = "host1-nginx"
//! parent = "host1"
//! dependencies = { behavior = "any", identifiers = ["db"], prefixes = ["dc1", "dc2"] }
//! ```

mod builder;
mod loader;

pub use builder::TreeBuilder;
pub use loader::{load_tree_file, load_updates_file, parse_tree, TreeFormat};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::logging::LogConfig;
use crate::models::constants::DEFAULT_NODE_TYPE;
use crate::models::dependency::{Behavior, Dependency};
use crate::models::node::{Node, Properties};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub logging: LogConfig,
    #[serde(rename = "node", alias = "nodes")]
    pub nodes: Vec<NodeDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(rename = "type", default = "default_node_type")]
    pub node_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<DependencyDefinition>,
}

fn default_node_type() -> String {
    DEFAULT_NODE_TYPE.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyDefinition {
    pub behavior: Behavior,
    pub identifiers: Vec<String>,
    pub prefixes: Vec<String>,
    pub subdeps: Vec<DependencyDefinition>,
}

impl DependencyDefinition {
    pub fn build(&self) -> Dependency {
        self.subdeps.iter().fold(
            Dependency::on(self.behavior, &self.identifiers, &self.prefixes),
            |dependency, subdep| dependency.with_subdep(subdep.build()),
        )
    }
}

impl NodeDefinition {
    /// Build the node this definition describes.
    ///
    /// # Errors
    /// `Error::InvalidIdentifier` for a malformed identifier.
    pub fn build(&self) -> Result<Node> {
        let mut node = Node::new(self.identifier.clone())?
            .with_type(self.node_type.clone())
            .with_tags(self.tags.iter().cloned())
            .with_properties(self.properties.clone());
        if let Some(parent) = &self.parent {
            node = node.with_parent(parent.clone());
        }
        if let Some(dependencies) = &self.dependencies {
            node = node.with_dependencies(dependencies.build());
        }
        Ok(node)
    }
}
