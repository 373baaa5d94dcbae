//! Integration tests for the monitoring tree engine
//!
//! These tests drive the public API end to end: tree files are loaded from
//! disk, built into a manager, and exercised with monitor updates.

pub mod helpers;
pub mod lifecycle;
pub mod propagation;
pub mod tree_config;
