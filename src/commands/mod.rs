//! Operator commands behind the `watchtree` binary.

pub mod apply;
pub mod check;
pub mod tree;

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{load_tree_file, TreeBuilder};
use crate::logging::init_tracing;
use crate::manager::Manager;

/// Load a tree file, start logging from its `[logging]` table (the CLI
/// level overrides it) and build the tree.
pub(crate) fn load_and_build(path: &Path, log_level: Option<&str>) -> Result<Manager> {
    let config = load_tree_file(path)?;

    let mut logging = config.logging.clone();
    if let Some(level) = log_level {
        logging.level = level.to_string();
    }
    init_tracing(&logging);

    TreeBuilder::from_config(&config)
        .and_then(TreeBuilder::build)
        .with_context(|| format!("Invalid tree in {}", path.display()))
}
