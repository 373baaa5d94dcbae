//! Shared test helpers for tree integration tests

use std::fs;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tempfile::TempDir;

use watchtree::config::{load_tree_file, TreeBuilder};
use watchtree::models::constants::ROOT_IDENTIFIER;
use watchtree::{Criteria, Event, EventKind, Manager, Properties};

/// Datacenter layout used across the integration tests:
///
/// ```text
/// _root
/// ├── dc1
/// │   ├── dc1-db
/// │   └── dc1-web
/// │       └── dc1-nginx   (any: dc1-db, dc2-db)
/// └── dc2
///     └── dc2-db
/// ```
pub const DATACENTER_TREE: &str = r#"
[[node]]
identifier = "dc1"
type = "datacenter"

[[node]]
identifier = "dc2"
type = "datacenter"

[[node]]
identifier = "dc1-db"
parent = "dc1"
type = "service"
tags = ["db"]

[[node]]
identifier = "dc2-db"
parent = "dc2"
type = "service"
tags = ["db"]

[[node]]
identifier = "dc1-web"
parent = "dc1"
type = "host"

[[node]]
identifier = "dc1-nginx"
parent = "dc1-web"
type = "service"
dependencies = { behavior = "any", identifiers = ["db"], prefixes = ["dc1", "dc2"] }
"#;

/// Write `content` to `name` inside a fresh temp dir.
pub fn write_tree(content: &str, name: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write tree file");
    (dir, path)
}

/// Load and build a tree from TOML text.
pub fn build_manager(content: &str) -> Manager {
    let (_dir, path) = write_tree(content, "tree.toml");
    let config = load_tree_file(&path).expect("Tree file should load");
    TreeBuilder::from_config(&config)
        .and_then(TreeBuilder::build)
        .expect("Tree should build")
}

pub type Recorded = Arc<Mutex<Vec<Event>>>;

/// Subscribe on `identifier` and collect every delivered event.
pub fn record(manager: &mut Manager, identifier: &str, event_type: Option<EventKind>) -> Recorded {
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&recorded);
    manager
        .create_subscription(
            identifier,
            event_type,
            Criteria::new(),
            Criteria::new(),
            Arc::new(move |event: &Event| sink.lock().unwrap().push(event.clone())),
        )
        .expect("Subscription should be created");
    recorded
}

pub fn record_root(manager: &mut Manager) -> Recorded {
    record(manager, ROOT_IDENTIFIER, None)
}

pub fn props(value: Value) -> Properties {
    match value {
        Value::Object(map) => map,
        _ => panic!("properties must be a JSON object"),
    }
}

pub fn seen(recorded: &Recorded) -> Vec<(EventKind, String)> {
    recorded
        .lock()
        .unwrap()
        .iter()
        .map(|e| (e.kind, e.source().unwrap_or_default().to_string()))
        .collect()
}
