//! `watchtree tree`: print the hierarchy with node statuses.
//!
//! ## Module Organization
//!
//! - `display`: Tree rendering
//! - `indicators`: Status indicators and ordering

mod display;
mod indicators;


use std::path::Path;

use anyhow::{bail, Result};

pub use display::{build_subtree_display, build_tree_display};
pub use indicators::{status_indicator, status_priority};

pub fn execute(path: &Path, node: Option<&str>, log_level: Option<&str>) -> Result<()> {
    let manager = super::load_and_build(path, log_level)?;
    let display = match node {
        Some(identifier) => match build_subtree_display(&manager, identifier) {
            Some(display) => display,
            None => bail!("Node not found: {identifier}"),
        },
        None => build_tree_display(&manager),
    };
    println!();
    println!("{display}");
    Ok(())
}
