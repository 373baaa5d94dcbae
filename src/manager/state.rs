use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::constants::is_operational;
use crate::models::node::NodeState;

use super::Manager;

impl Manager {
    /// Runtime state of every non-operational node, for persistence.
    pub fn states(&self) -> BTreeMap<String, NodeState> {
        self.nodes
            .values()
            .filter(|node| !is_operational(node.identifier()))
            .map(|node| (node.identifier().to_string(), node.state()))
            .collect()
    }

    /// Restore a node's persisted runtime state.
    ///
    /// The stored Dependency replaces the configured one as a whole, and its
    /// subscriptions are re-registered. If the restored dependencies fail
    /// the cycle checks, the node keeps its previous state.
    pub fn restore_state(&mut self, identifier: &str, state: NodeState) -> Result<()> {
        let node = self.nodes.get_mut(identifier).ok_or_else(|| Error::UnknownNode {
            identifier: identifier.to_string(),
        })?;
        let previous = node.state();
        node.restore_state(state);

        if !self.tree_built {
            return Ok(());
        }
        if let Err(e) = self.register_dependencies(identifier) {
            warn!(node = %identifier, error = %e, "restored dependencies rejected");
            if let Some(node) = self.nodes.get_mut(identifier) {
                node.restore_state(previous);
            }
            return Err(e);
        }

        debug!(node = %identifier, "state restored");
        Ok(())
    }

    /// Restore every known node from a saved map. Unknown identifiers are
    /// skipped; the first rejected state stops the restore.
    pub fn restore_states(&mut self, states: BTreeMap<String, NodeState>) -> Result<()> {
        for (identifier, state) in states {
            if !self.nodes.contains_key(&identifier) {
                warn!(node = %identifier, "saved state for unknown node skipped");
                continue;
            }
            self.restore_state(&identifier, state)?;
        }
        Ok(())
    }
}
