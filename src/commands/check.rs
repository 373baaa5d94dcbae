//! `watchtree check`: validate a tree file.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::models::constants::is_operational;

pub fn execute(path: &Path, log_level: Option<&str>) -> Result<()> {
    let manager = super::load_and_build(path, log_level)?;

    let nodes = manager
        .nodes()
        .filter(|node| !is_operational(node.identifier()))
        .count();
    let dependencies = manager.root().subscriptions().count();

    println!(
        "{} {}: {} nodes, {} dependency links",
        "✓".green().bold(),
        path.display(),
        nodes,
        dependencies
    );
    Ok(())
}
