//! `watchtree apply`: replay a batch of monitor updates against a tree.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::load_updates_file;
use crate::models::constants::ROOT_IDENTIFIER;
use crate::models::criteria::Criteria;
use crate::models::event::Event;

use super::tree::{build_tree_display, status_indicator};

pub fn execute(tree_path: &Path, updates_path: &Path, log_level: Option<&str>) -> Result<()> {
    let mut manager = super::load_and_build(tree_path, log_level)?;
    let updates = load_updates_file(updates_path)?;

    let seen: Arc<Mutex<Vec<Event>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    manager.create_subscription(
        ROOT_IDENTIFIER,
        None,
        Criteria::new(),
        Criteria::new(),
        Arc::new(move |event: &Event| {
            if let Ok(mut events) = sink.lock() {
                events.push(event.clone());
            }
        }),
    )?;

    manager
        .update_nodes(updates)
        .with_context(|| format!("Failed to apply {}", updates_path.display()))?;

    println!();
    println!("Events:");
    println!("=======");
    let events = seen.lock().map(|events| events.clone()).unwrap_or_default();
    if events.is_empty() {
        println!("(none)");
    }
    for event in &events {
        println!("{}", format_event(event));
    }

    println!();
    println!("{}", build_tree_display(&manager));
    Ok(())
}

/// One event per line: time, type, source and the status it entered, if any.
pub fn format_event(event: &Event) -> String {
    let source = event.source().unwrap_or("-");
    let mut line = format!(
        "{} {:<14} {}",
        event.time.format("%H:%M:%S"),
        event.event_type(),
        source.bold()
    );
    if let Some(node) = &event.node {
        line.push_str(&format!(" {}", status_indicator(node.status)));
    }
    if !event.payload.is_null() && event.payload != serde_json::json!({}) {
        line.push_str(&format!(" {}", event.payload.to_string().dimmed()));
    }
    line
}
