//! Event propagation through a loaded tree

use serde_json::json;

use watchtree::{EventKind, QuietedReason, Status};

use super::helpers::{build_manager, props, record, record_root, seen, DATACENTER_TREE};

#[test]
fn test_going_down_scenario() {
    let mut manager = build_manager(DATACENTER_TREE);
    let at_root = record_root(&mut manager);

    let events = manager
        .update_node("dc1-web", props(json!({"error": "timeout"})))
        .unwrap();

    let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::Down, EventKind::Update, EventKind::Delta]);
    assert_eq!(
        events[2].payload,
        json!({"status": ["unknown", "down"], "error": [null, "timeout"]})
    );

    let nginx = manager.node("dc1-nginx").unwrap();
    assert_eq!(nginx.status, Status::Quieted);
    assert_eq!(
        nginx.quieted_reason(QuietedReason::Primary),
        Some("parent dc1-web is down")
    );

    let root_seen = seen(&at_root);
    assert!(root_seen.contains(&(EventKind::Quieted, "dc1-nginx".to_string())));
    assert!(root_seen.contains(&(EventKind::Down, "dc1-web".to_string())));
}

#[test]
fn test_sibling_subtree_sees_nothing() {
    let mut manager = build_manager(DATACENTER_TREE);
    let at_dc1 = record(&mut manager, "dc1", None);
    let at_dc2 = record(&mut manager, "dc2", None);

    manager
        .update_node("dc1-web", props(json!({"error": "timeout"})))
        .unwrap();

    assert!(!seen(&at_dc1).is_empty());
    assert!(seen(&at_dc2).is_empty());
    assert_eq!(manager.node("dc2-db").unwrap().status, Status::Unknown);
}

#[test]
fn test_any_dependency_across_datacenters() {
    let mut manager = build_manager(DATACENTER_TREE);
    let quieted = record_root(&mut manager);

    manager
        .update_node("dc1-db", props(json!({"error": "refused"})))
        .unwrap();
    assert_eq!(manager.node("dc1-nginx").unwrap().status, Status::Unknown);

    manager
        .update_node("dc2-db", props(json!({"error": "refused"})))
        .unwrap();
    let nginx = manager.node("dc1-nginx").unwrap();
    assert_eq!(nginx.status, Status::Quieted);
    let reason = nginx.quieted_reason(QuietedReason::Secondary).unwrap();
    assert!(reason.starts_with("dc1-db, dc2-db are all unavailable as of"));
    assert!(seen(&quieted).contains(&(EventKind::Quieted, "dc1-nginx".to_string())));

    manager.update_node("dc2-db", props(json!({}))).unwrap();
    let nginx = manager.node("dc1-nginx").unwrap();
    assert_eq!(nginx.status, Status::Unknown);
    assert!(nginx.quieted_reasons.is_empty());
}

#[test]
fn test_ack_and_recovery_cycle() {
    let mut manager = build_manager(DATACENTER_TREE);
    let acked = record_root(&mut manager);

    manager
        .update_node("dc1-db", props(json!({"error": "refused"})))
        .unwrap();
    manager
        .update_node(
            "dc1-db",
            props(json!({"ack": {"message": "restoring backup", "sender": "oncall"}})),
        )
        .unwrap();

    let db = manager.node("dc1-db").unwrap();
    assert_eq!(db.status, Status::Acked);
    assert_eq!(db.ack.as_ref().map(|a| a.sender.as_str()), Some("oncall"));
    assert!(seen(&acked).contains(&(EventKind::Acked, "dc1-db".to_string())));

    manager.update_node("dc1-db", props(json!({}))).unwrap();
    let db = manager.node("dc1-db").unwrap();
    assert_eq!(db.status, Status::Up);
    assert!(db.ack.is_none());
    assert!(db.error.is_none());
}

#[test]
fn test_typed_subscription_only_sees_its_type() {
    let mut manager = build_manager(DATACENTER_TREE);
    let downs = record(&mut manager, "dc1", Some(EventKind::Down));

    manager
        .update_node("dc1-web", props(json!({"error": "timeout", "load": 3})))
        .unwrap();
    manager.update_node("dc1-web", props(json!({}))).unwrap();

    assert_eq!(seen(&downs), vec![(EventKind::Down, "dc1-web".to_string())]);
}
