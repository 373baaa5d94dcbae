use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::criteria::Criteria;
use crate::models::event::EventKind;
use crate::models::subscription::{Callback, Sink, Subscription};

use super::Manager;

impl Manager {
    /// Attach a callback subscription to a node. It sees events published
    /// by that node and by every descendant.
    ///
    /// # Errors
    /// `Error::UnknownNode` when no node has the given identifier.
    pub fn create_subscription(
        &mut self,
        identifier: &str,
        event_type: Option<EventKind>,
        criteria: Criteria,
        negative_criteria: Criteria,
        callback: Callback,
    ) -> Result<Subscription> {
        if !self.nodes.contains_key(identifier) {
            return Err(Error::UnknownNode {
                identifier: identifier.to_string(),
            });
        }

        let subscription = Subscription::new(
            event_type,
            criteria,
            negative_criteria,
            Sink::Callback(callback),
        );
        self.attach_subscription(identifier, subscription.clone());
        debug!(node = %identifier, subscription = %subscription.id, "subscription created");
        Ok(subscription)
    }

    pub fn remove_subscription(&mut self, id: &str) -> Option<Subscription> {
        let removed = self.detach_subscription(id);
        if removed.is_none() {
            warn!(subscription = %id, "remove requested for unknown subscription");
            return None;
        }
        for ids in self.dependency_subscriptions.values_mut() {
            ids.retain(|existing| existing != id);
        }
        removed
    }

    /// Identifier of the node holding a subscription.
    pub fn subscription_owner(&self, id: &str) -> Option<&str> {
        self.subscription_owners.get(id).map(String::as_str)
    }

    pub(super) fn attach_subscription(&mut self, owner: &str, subscription: Subscription) {
        if let Some(node) = self.nodes.get_mut(owner) {
            self.subscription_owners
                .insert(subscription.id.clone(), owner.to_string());
            node.attach_subscription(subscription);
        }
    }

    pub(super) fn detach_subscription(&mut self, id: &str) -> Option<Subscription> {
        let owner = self.subscription_owners.remove(id)?;
        self.nodes.get_mut(&owner)?.detach_subscription(id)
    }
}
