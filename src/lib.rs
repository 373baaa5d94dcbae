//! A monitoring tree engine.
//!
//! Nodes hold monitored entities (hosts, services, resources) under a single
//! root. Monitor updates run each node's state machine, outages are
//! broadcast down the tree and along declared dependencies, and every event
//! is propagated up to subscriptions on the node's ancestors.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod manager;
pub mod models;
pub mod validation;

pub use error::{Error, Result};
pub use manager::Manager;
pub use models::{
    Ack, Behavior, Criteria, Dependency, Event, EventKind, Node, NodeSnapshot, NodeState,
    Properties, QuietedReason, Status, Subscription,
};
