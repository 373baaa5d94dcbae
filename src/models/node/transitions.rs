use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use crate::models::event::{Event, EventKind};

use super::merge::record_delta;
use super::types::{Node, Status};

/// State machine events a node reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Fired once per `Node::update`.
    Update,
    /// Fired whenever the node processes an event from another node.
    HandleEvent,
}

/// Condition a transition rule requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guard {
    LastContactSuccessful,
    LastContactFailed,
    AckSet,
    AckCleared,
    AckAndErrorSet,
    HasQuietedReason,
    NoQuietedReason,
}

impl Guard {
    fn holds(self, node: &Node) -> bool {
        match self {
            Guard::LastContactSuccessful => node.last_contact_successful(),
            Guard::LastContactFailed => !node.last_contact_successful(),
            Guard::AckSet => node.ack.is_some(),
            Guard::AckCleared => node.ack.is_none(),
            Guard::AckAndErrorSet => node.error.is_some() && node.ack.is_some(),
            Guard::HasQuietedReason => !node.quieted_reasons.is_empty(),
            Guard::NoQuietedReason => node.quieted_reasons.is_empty(),
        }
    }
}

/// Which statuses a rule applies from.
#[derive(Debug, Clone, Copy)]
enum FromStates {
    OneOf(&'static [Status]),
    AnyExcept(&'static [Status]),
}

impl FromStates {
    fn includes(self, status: Status) -> bool {
        match self {
            FromStates::OneOf(statuses) => statuses.contains(&status),
            FromStates::AnyExcept(statuses) => !statuses.contains(&status),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    from: FromStates,
    to: Status,
    guard: Guard,
}

const UPDATE_RULES: &[Rule] = &[
    Rule {
        from: FromStates::OneOf(&[Status::Down, Status::Unknown, Status::Acked]),
        to: Status::Up,
        guard: Guard::LastContactSuccessful,
    },
    Rule {
        from: FromStates::OneOf(&[Status::Up, Status::Unknown]),
        to: Status::Down,
        guard: Guard::LastContactFailed,
    },
    Rule {
        from: FromStates::OneOf(&[Status::Down]),
        to: Status::Acked,
        guard: Guard::AckSet,
    },
    Rule {
        from: FromStates::OneOf(&[Status::Unknown, Status::Up]),
        to: Status::Disabled,
        guard: Guard::AckSet,
    },
    Rule {
        from: FromStates::OneOf(&[Status::Disabled]),
        to: Status::Unknown,
        guard: Guard::AckCleared,
    },
];

const HANDLE_EVENT_RULES: &[Rule] = &[
    Rule {
        from: FromStates::OneOf(&[Status::Unknown]),
        to: Status::Acked,
        guard: Guard::AckAndErrorSet,
    },
    Rule {
        from: FromStates::AnyExcept(&[Status::Disabled, Status::Quieted, Status::Acked]),
        to: Status::Quieted,
        guard: Guard::HasQuietedReason,
    },
    Rule {
        from: FromStates::OneOf(&[Status::Quieted]),
        to: Status::Unknown,
        guard: Guard::NoQuietedReason,
    },
];

impl Trigger {
    fn rules(self) -> &'static [Rule] {
        match self {
            Trigger::Update => UPDATE_RULES,
            Trigger::HandleEvent => HANDLE_EVENT_RULES,
        }
    }
}

impl Node {
    pub fn last_contact_successful(&self) -> bool {
        self.error.is_none()
    }

    /// The status `trigger` would move this node to, if any rule applies.
    pub fn next_status(&self, trigger: Trigger) -> Option<Status> {
        trigger
            .rules()
            .iter()
            .find(|rule| rule.from.includes(self.status) && rule.guard.holds(self))
            .map(|rule| rule.to)
    }

    /// Run one state machine event. At most one transition applies.
    ///
    /// `previous_error` is the error before the current update, recorded in
    /// the delta when the node goes down.
    pub(super) fn fire(&mut self, trigger: Trigger, previous_error: Option<&str>) -> Option<Status> {
        let to = self.next_status(trigger)?;
        let from = self.status;

        self.status = to;
        self.status_changed = Utc::now();

        record_delta(
            &mut self.update_delta,
            &["status".to_string()],
            json!(from.as_str()),
            json!(to.as_str()),
        );

        match to {
            Status::Down => {
                let old = previous_error.map_or(Value::Null, |e| json!(e));
                let new = self.error.as_deref().map_or(Value::Null, |e| json!(e));
                record_delta(&mut self.update_delta, &["error".to_string()], old, new);
            }
            Status::Up => {
                self.error = None;
                self.ack = None;
            }
            Status::Acked => {
                if let Some(ack) = &self.ack {
                    info!(node = %self.identifier, ack = %ack, "node acknowledged");
                }
            }
            _ => {}
        }

        info!(node = %self.identifier, %from, %to, "status changed");

        let event = Event::new(
            EventKind::entered(to),
            Some(self.snapshot()),
            json!({"from": from.as_str(), "to": to.as_str()}),
        );
        self.pending_update_events.push(event);

        Some(to)
    }
}
