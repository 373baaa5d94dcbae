//! Grafting and pruning nodes on a live tree

use serde_json::json;

use watchtree::{Dependency, EventKind, Node, Status};

use super::helpers::{build_manager, props, record_root, seen, DATACENTER_TREE};

#[test]
fn test_grafted_node_joins_propagation() {
    let mut manager = build_manager(DATACENTER_TREE);
    manager
        .add_node(
            Node::new("dc2-app")
                .unwrap()
                .with_parent("dc2")
                .with_dependencies(Dependency::all(["dc1-db"])),
        )
        .unwrap();

    manager
        .update_node("dc1-db", props(json!({"error": "refused"})))
        .unwrap();
    assert_eq!(manager.node("dc2-app").unwrap().status, Status::Quieted);
}

#[test]
fn test_pruned_subtree_stops_receiving() {
    let mut manager = build_manager(DATACENTER_TREE);
    let at_root = record_root(&mut manager);

    let removed = manager.remove_node("dc1-web").unwrap().unwrap();
    assert_eq!(removed.identifier(), "dc1-web");
    assert!(manager.node("dc1-nginx").is_none());
    assert_eq!(manager.root().subscriptions().count(), 1);

    manager
        .update_node("dc2-db", props(json!({"error": "refused"})))
        .unwrap();
    let sources: Vec<String> = seen(&at_root).into_iter().map(|(_, s)| s).collect();
    assert!(sources.iter().all(|s| s == "dc2-db"));
    assert!(seen(&at_root).contains(&(EventKind::Down, "dc2-db".to_string())));
}

#[test]
fn test_state_survives_rebuild() {
    let mut manager = build_manager(DATACENTER_TREE);
    manager
        .update_node("dc1-db", props(json!({"error": "refused", "version": "15.2"})))
        .unwrap();
    let saved = serde_json::to_string(&manager.states()).unwrap();

    let mut rebuilt = build_manager(DATACENTER_TREE);
    rebuilt
        .restore_states(serde_json::from_str(&saved).unwrap())
        .unwrap();

    let db = rebuilt.node("dc1-db").unwrap();
    assert_eq!(db.status, Status::Down);
    assert_eq!(db.properties.get("version"), Some(&json!("15.2")));
    assert_eq!(
        rebuilt.node("dc1-nginx").unwrap().state(),
        manager.node("dc1-nginx").unwrap().state()
    );
}
