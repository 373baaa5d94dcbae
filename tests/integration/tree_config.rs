//! Loading and validating tree files

use watchtree::config::{load_tree_file, TreeBuilder};
use watchtree::error::{Error, Relation};

use super::helpers::{build_manager, write_tree, DATACENTER_TREE};

#[test]
fn test_datacenter_tree_builds() {
    let manager = build_manager(DATACENTER_TREE);

    let dc1_children: Vec<&str> = manager.node("dc1").unwrap().children().collect();
    assert_eq!(dc1_children, vec!["dc1-db", "dc1-web"]);
    assert_eq!(manager.node("dc1-nginx").unwrap().parent(), Some("dc1-web"));
    assert_eq!(manager.root().subscriptions().count(), 2);
}

#[test]
fn test_yaml_tree_file() {
    let (_dir, path) = write_tree(
        "node:\n  - identifier: web1\n    type: host\n  - identifier: app\n    parent: web1\n",
        "tree.yaml",
    );
    let config = load_tree_file(&path).unwrap();
    let manager = TreeBuilder::from_config(&config).unwrap().build().unwrap();
    assert_eq!(manager.node("app").unwrap().parent(), Some("web1"));
    assert_eq!(manager.node("web1").unwrap().node_type, "host");
}

#[test]
fn test_dependency_on_ancestor_is_configuration_error() {
    let (_dir, path) = write_tree(
        r#"
[[node]]
identifier = "web1"

[[node]]
identifier = "nginx"
parent = "web1"
dependencies = { identifiers = ["web1"] }
"#,
        "tree.toml",
    );
    let config = load_tree_file(&path).unwrap();
    let err = TreeBuilder::from_config(&config)
        .unwrap()
        .build()
        .unwrap_err();

    assert!(err.is_configuration());
    assert_eq!(
        err,
        Error::DependencyCycle {
            node: "nginx".to_string(),
            dependency: "web1".to_string(),
            relation: Relation::Ancestor,
        }
    );
}

#[test]
fn test_duplicate_definition_rejected() {
    let (_dir, path) = write_tree(
        "[[node]]\nidentifier = \"web1\"\n\n[[node]]\nidentifier = \"web1\"\n",
        "tree.toml",
    );
    let config = load_tree_file(&path).unwrap();
    let err = TreeBuilder::from_config(&config).unwrap_err();
    assert!(matches!(err, Error::DuplicateNode { .. }));
}
