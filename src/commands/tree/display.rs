//! Vertical tree display of the monitored hierarchy

use colored::Colorize;

use crate::manager::Manager;
use crate::models::constants::ROOT_IDENTIFIER;
use crate::models::node::{Node, Status};

use super::indicators::{status_indicator, status_priority};

fn render_node(node: &Node) -> String {
    let mut line = format!(
        "{} {} ({})",
        status_indicator(node.status),
        node.identifier(),
        node.node_type.dimmed()
    );
    match node.status {
        Status::Down => {
            if let Some(error) = &node.error {
                line.push_str(&format!(" {}", error.red()));
            }
        }
        Status::Acked => {
            if let Some(ack) = &node.ack {
                line.push_str(&format!(" {}", ack.to_string().yellow()));
            }
        }
        Status::Quieted => {
            let reasons: Vec<&str> = node.quieted_reasons.values().map(String::as_str).collect();
            line.push_str(&format!(" {}", reasons.join("; ").dimmed()));
        }
        _ => {}
    }
    line
}

fn render_children(manager: &Manager, node: &Node, prefix: &str, out: &mut String) {
    let mut children: Vec<&Node> = node
        .children()
        .filter_map(|id| manager.node(id))
        .collect();
    children.sort_by_key(|child| status_priority(child.status));
    let total = children.len();

    for (index, child) in children.into_iter().enumerate() {
        let last = index + 1 == total;
        let connector = if last { "└── " } else { "├── " };
        out.push_str(&format!("{prefix}{connector}{}\n", render_node(child)));

        let extension = if last { "    " } else { "│   " };
        render_children(manager, child, &format!("{prefix}{extension}"), out);
    }
}

/// Display of one node and everything beneath it, or `None` if it is unknown
pub fn build_subtree_display(manager: &Manager, identifier: &str) -> Option<String> {
    let node = manager.node(identifier)?;
    let mut out = format!("{}\n", render_node(node));
    render_children(manager, node, "", &mut out);
    Some(out.trim_end().to_string())
}

/// Build a vertical tree display of every node under the root
pub fn build_tree_display(manager: &Manager) -> String {
    if manager.is_empty() {
        return "(no nodes defined)".to_string();
    }

    let mut out = format!("{}\n", ROOT_IDENTIFIER.bold());
    render_children(manager, manager.root(), "", &mut out);
    out.trim_end().to_string()
}
