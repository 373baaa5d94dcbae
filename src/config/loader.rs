use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::models::node::Properties;

use super::TreeConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    Toml,
    Yaml,
}

impl TreeFormat {
    /// YAML for `.yaml`/`.yml`, TOML otherwise.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => TreeFormat::Yaml,
            _ => TreeFormat::Toml,
        }
    }
}

/// Load a tree definition file.
pub fn load_tree_file(path: &Path) -> Result<TreeConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tree file: {}", path.display()))?;
    parse_tree(&content, TreeFormat::from_path(path))
        .with_context(|| format!("Failed to parse tree file: {}", path.display()))
}

pub fn parse_tree(content: &str, format: TreeFormat) -> Result<TreeConfig> {
    let config: TreeConfig = match format {
        TreeFormat::Toml => toml::from_str(content).context("Invalid TOML")?,
        TreeFormat::Yaml => serde_yaml::from_str(content).context("Invalid YAML")?,
    };
    Ok(config)
}

/// Load a JSON object mapping node identifiers to property updates.
pub fn load_updates_file(path: &Path) -> Result<BTreeMap<String, Properties>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read updates file: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse updates file: {}", path.display()))?;

    let serde_json::Value::Object(entries) = value else {
        bail!("Updates file must contain a JSON object of identifier -> properties");
    };

    let mut updates = BTreeMap::new();
    for (identifier, properties) in entries {
        let serde_json::Value::Object(properties) = properties else {
            bail!("Update for '{identifier}' must be a JSON object");
        };
        updates.insert(identifier, properties);
    }
    Ok(updates)
}
