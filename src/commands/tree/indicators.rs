//! Status indicators for tree display

use colored::{ColoredString, Colorize};

use crate::models::node::Status;

/// Status indicator with color for display
pub fn status_indicator(status: Status) -> ColoredString {
    match status {
        Status::Up => "●".green().bold(),
        Status::Down => "✗".red().bold(),
        Status::Acked => "✓".yellow().bold(),
        Status::Quieted => "◌".cyan(),
        Status::Disabled => "⊘".white().dimmed(),
        Status::Unknown => "?".white().dimmed(),
    }
}

/// Attention order for statuses: what an operator should look at first
pub fn status_priority(status: Status) -> u8 {
    match status {
        Status::Down => 0,
        Status::Acked => 1,
        Status::Quieted => 2,
        Status::Unknown => 3,
        Status::Up => 4,
        Status::Disabled => 5,
    }
}
