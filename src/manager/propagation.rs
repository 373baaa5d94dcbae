use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::event::Event;
use crate::models::node::Properties;
use crate::models::subscription::Sink;

use super::Manager;

impl Manager {
    /// Apply monitor-supplied properties to a node and propagate the result.
    ///
    /// Returns the events produced by the node itself. Unknown identifiers
    /// are logged and ignored.
    ///
    /// # Errors
    /// `Error::InvalidAck` when the `ack` value is malformed. Nothing is
    /// mutated in that case.
    pub fn update_node(&mut self, identifier: &str, properties: Properties) -> Result<Vec<Event>> {
        let Some(node) = self.nodes.get_mut(identifier) else {
            warn!(node = %identifier, "update for unknown node ignored");
            return Ok(Vec::new());
        };

        let events = node.update(properties)?;
        debug!(node = %identifier, events = events.len(), "node updated");
        self.dispatch(identifier, &events);
        Ok(events)
    }

    /// Apply a batch of updates in identifier order, stopping at the first
    /// validation error. Updates applied before the failure stay applied.
    pub fn update_nodes(&mut self, updates: BTreeMap<String, Properties>) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        for (identifier, properties) in updates {
            events.extend(self.update_node(&identifier, properties)?);
        }
        Ok(events)
    }

    /// Downward pass first, then the upward pass.
    fn dispatch(&mut self, identifier: &str, events: &[Event]) {
        if events.is_empty() {
            return;
        }
        self.broadcast_events(identifier, events);
        self.propagate_events(identifier, events);
    }

    /// Hand events to every direct child's `handle_event`. Whatever a child
    /// produces is dispatched from that child before the next child runs.
    pub fn broadcast_events(&mut self, identifier: &str, events: &[Event]) {
        let children: Vec<String> = match self.nodes.get(identifier) {
            Some(node) => node.children.iter().cloned().collect(),
            None => return,
        };

        for event in events {
            for child in &children {
                self.deliver_to_node(child, event);
            }
        }
    }

    /// Deliver events to the subscriptions of the node and each of its
    /// ancestors, up to the root.
    pub fn propagate_events(&mut self, identifier: &str, events: &[Event]) {
        let mut current = Some(identifier.to_string());
        while let Some(id) = current {
            self.publish_events(&id, events);
            current = self.nodes.get(&id).and_then(|n| n.parent.clone());
        }
    }

    /// Deliver events to the matching subscriptions held by one node.
    pub fn publish_events(&mut self, identifier: &str, events: &[Event]) {
        for event in events {
            let sinks: Vec<Sink> = match self.nodes.get(identifier) {
                Some(node) => node
                    .subscriptions
                    .values()
                    .filter(|subscription| subscription.matches(event))
                    .map(|subscription| subscription.sink.clone())
                    .collect(),
                None => return,
            };

            for sink in sinks {
                match sink {
                    Sink::Callback(callback) => callback(event),
                    Sink::Dependent(dependent) => self.deliver_to_node(&dependent, event),
                }
            }
        }
    }

    fn deliver_to_node(&mut self, identifier: &str, event: &Event) {
        let Some(node) = self.nodes.get_mut(identifier) else {
            return;
        };
        let generated = node.handle_event(event);
        if !generated.is_empty() {
            debug!(
                node = %identifier,
                source = event.source().unwrap_or_default(),
                event = event.event_type(),
                generated = generated.len(),
                "event handled"
            );
            self.dispatch(identifier, &generated);
        }
    }
}
