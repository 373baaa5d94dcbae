use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::models::ack::Ack;
use crate::models::event::{Event, EventKind};

use super::merge::{merge_properties, record_delta};
use super::transitions::Trigger;
use super::types::{Node, Properties, QuietedReason};

/// Update key carrying an acknowledgement (or `null` to clear it).
pub const ACK_KEY: &str = "ack";

/// Update key carrying the error of the last contact; absent means success.
pub const ERROR_KEY: &str = "error";

fn error_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

impl Node {
    /// Apply a monitor update and run the `update` state machine event.
    ///
    /// Returns, in order: any status transition events, one `node.update`
    /// event, and a `node.delta` event when status or properties changed.
    /// Delivering the events to subscriptions and children is the manager's
    /// job.
    ///
    /// # Errors
    /// Returns `Error::InvalidAck` for an ack missing `message` or `sender`;
    /// the node is left untouched.
    pub fn update(&mut self, mut properties: Properties) -> Result<Vec<Event>> {
        let ack = properties
            .remove(ACK_KEY)
            .map(|value| Ack::from_value(&value))
            .transpose()?;
        let previous_error = self.error.clone();
        self.last_contacted = Some(Utc::now());
        match ack {
            Some(ack) => self.ack = ack,
            None => self.error = properties.remove(ERROR_KEY).and_then(error_text),
        }

        let (merged, changes) = merge_properties(&self.properties, &properties);
        self.properties = merged;
        for change in changes {
            record_delta(&mut self.update_delta, &change.path, change.old, change.new);
        }

        self.fire(Trigger::Update, previous_error.as_deref());

        let mut events = std::mem::take(&mut self.pending_update_events);
        events.push(Event::new(
            EventKind::Update,
            Some(self.snapshot()),
            Value::Object(properties),
        ));
        let delta = std::mem::take(&mut self.update_delta);
        if !delta.is_empty() {
            events.push(Event::new(
                EventKind::Delta,
                Some(self.snapshot()),
                Value::Object(delta),
            ));
        }

        debug!(node = %self.identifier, events = events.len(), "node updated");
        Ok(events)
    }

    /// React to an event published by another node (parent or dependency).
    ///
    /// Outage events mark the source down in the dependency set and set the
    /// matching quieted reasons; `node.up` clears them. Then the
    /// `handle_event` state machine event runs. Returns the transition events.
    pub fn handle_event(&mut self, event: &Event) -> Vec<Event> {
        let Some(source) = event.source() else {
            return Vec::new();
        };
        let from_parent = self.parent.as_deref() == Some(source);

        if event.kind.signals_outage() {
            self.dependencies.mark_down(source, event.time);
            if let Some(reason) = self.dependencies.down_reason() {
                self.quieted_reasons.insert(QuietedReason::Secondary, reason);
            }
            if from_parent {
                self.quieted_reasons.insert(
                    QuietedReason::Primary,
                    format!("parent {source} is {}", event.kind.name().trim_start_matches("node.")),
                );
            }
        } else if event.kind == EventKind::Up {
            self.dependencies.mark_up(source);
            match self.dependencies.down_reason() {
                Some(reason) => {
                    self.quieted_reasons.insert(QuietedReason::Secondary, reason);
                }
                None => {
                    self.quieted_reasons.remove(&QuietedReason::Secondary);
                }
            }
            if from_parent {
                self.quieted_reasons.remove(&QuietedReason::Primary);
            }
        }

        self.fire(Trigger::HandleEvent, None);
        self.update_delta.clear();
        std::mem::take(&mut self.pending_update_events)
    }
}
