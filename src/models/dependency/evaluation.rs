use chrono::{DateTime, Utc};

use super::types::{Behavior, Dependency};

fn format_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

impl Dependency {
    /// Whether this dependency is currently unsatisfied.
    ///
    /// - `All`: down if any own identifier is down or any subdep is down.
    /// - `Any`: down if every own identifier is down and every subdep is down.
    ///   An `Any` with no members at all is never down.
    pub fn is_down(&self) -> bool {
        match self.behavior {
            Behavior::All => {
                self.identifier_states.values().any(Option::is_some)
                    || self.subdeps.iter().any(Dependency::is_down)
            }
            Behavior::Any => {
                if self.identifier_states.is_empty() && self.subdeps.is_empty() {
                    return false;
                }
                self.identifier_states.values().all(Option::is_some)
                    && self.subdeps.iter().all(Dependency::is_down)
            }
        }
    }

    /// Record `identifier` as down at `time`, here and in every subdep.
    ///
    /// Recursion into subdeps is unconditional so that a shared identifier
    /// carries one timestamp across the whole tree.
    pub fn mark_down(&mut self, identifier: &str, time: DateTime<Utc>) {
        if let Some(state) = self.identifier_states.get_mut(identifier) {
            *state = Some(time);
        }
        for subdep in &mut self.subdeps {
            subdep.mark_down(identifier, time);
        }
    }

    /// Clear the down state of `identifier` in every subdep, then here.
    pub fn mark_up(&mut self, identifier: &str) {
        for subdep in &mut self.subdeps {
            subdep.mark_up(identifier);
        }
        if let Some(state) = self.identifier_states.get_mut(identifier) {
            *state = None;
        }
    }

    /// Human-readable explanation of why this dependency is down, or `None`
    /// while it is satisfied.
    pub fn down_reason(&self) -> Option<String> {
        if !self.is_down() {
            return None;
        }

        let mut down: Vec<(&String, &DateTime<Utc>)> = self
            .identifier_states
            .iter()
            .filter_map(|(id, state)| state.as_ref().map(|time| (id, time)))
            .collect();

        match self.behavior {
            Behavior::All => {
                down.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
                match down.as_slice() {
                    [] => self.subdeps.iter().find_map(Dependency::down_reason),
                    [(id, time)] => Some(format!("{id} is unavailable as of {}", format_time(time))),
                    [(id, time), rest @ ..] => Some(format!(
                        "{id} (and {} others) are unavailable as of {}",
                        rest.len(),
                        format_time(time)
                    )),
                }
            }
            Behavior::Any => {
                let Some(latest) = down.iter().map(|(_, time)| *time).max() else {
                    let reasons: Vec<String> = self
                        .subdeps
                        .iter()
                        .filter_map(Dependency::down_reason)
                        .collect();
                    return Some(reasons.join("; "));
                };
                let ids: Vec<&str> = down.iter().map(|(id, _)| id.as_str()).collect();
                if ids.len() == 1 {
                    Some(format!("{} is unavailable as of {}", ids[0], format_time(latest)))
                } else {
                    Some(format!(
                        "{} are all unavailable as of {}",
                        ids.join(", "),
                        format_time(latest)
                    ))
                }
            }
        }
    }
}
