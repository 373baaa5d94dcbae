use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a dependency combines its members.
///
/// - `All`: satisfied only while every member is up; one failure breaks it.
/// - `Any`: satisfied while at least one member is up; only total failure breaks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    #[default]
    All,
    Any,
}

impl std::fmt::Display for Behavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Behavior::All => write!(f, "all"),
            Behavior::Any => write!(f, "any"),
        }
    }
}

/// A set of identifiers (and nested dependencies) a node relies on.
///
/// Membership is fixed at construction; only the per-identifier down
/// timestamps change at runtime (see `mark_down` / `mark_up`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dependency {
    pub(super) behavior: Behavior,
    /// identifier -> time it went down (`None` while up)
    #[serde(rename = "identifiers", default)]
    pub(super) identifier_states: BTreeMap<String, Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(super) subdeps: Vec<Dependency>,
}

impl Dependency {
    pub fn new<I, S>(behavior: Behavior, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            behavior,
            identifier_states: identifiers.into_iter().map(|id| (id.into(), None)).collect(),
            subdeps: Vec::new(),
        }
    }

    pub fn all<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Behavior::All, identifiers)
    }

    pub fn any<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Behavior::Any, identifiers)
    }

    /// Build a dependency over the product of `prefixes` and `identifiers`.
    ///
    /// `on(All, ["nginx"], ["host1", "host2"])` depends on `host1-nginx` and
    /// `host2-nginx`. With no prefixes the identifiers are used as given.
    pub fn on<I, S, P, T>(behavior: Behavior, identifiers: I, prefixes: P) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        P: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let identifiers: Vec<String> = identifiers.into_iter().map(Into::into).collect();
        let prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();

        if prefixes.is_empty() {
            return Self::new(behavior, identifiers);
        }

        let qualified = prefixes
            .iter()
            .flat_map(|prefix| identifiers.iter().map(move |id| format!("{prefix}-{id}")));
        Self::new(behavior, qualified)
    }

    pub fn with_subdep(mut self, subdep: Dependency) -> Self {
        self.subdeps.push(subdep);
        self
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn subdeps(&self) -> &[Dependency] {
        &self.subdeps
    }

    /// Down timestamp of an identifier held directly at this level.
    ///
    /// `None` if the identifier is not a member here, `Some(None)` while it is up.
    pub fn state_of(&self, identifier: &str) -> Option<Option<DateTime<Utc>>> {
        self.identifier_states.get(identifier).copied()
    }

    /// Every identifier referenced at any depth.
    pub fn identifiers(&self) -> BTreeSet<String> {
        let mut all: BTreeSet<String> = self.identifier_states.keys().cloned().collect();
        for subdep in &self.subdeps {
            all.extend(subdep.identifiers());
        }
        all
    }

    pub fn is_empty(&self) -> bool {
        self.identifier_states.is_empty() && self.subdeps.iter().all(Dependency::is_empty)
    }

    /// Strict equality: same shape and identical down timestamps everywhere.
    pub fn strict_eq(&self, other: &Self) -> bool {
        self.behavior == other.behavior
            && self.identifier_states == other.identifier_states
            && self.subdeps.len() == other.subdeps.len()
            && self
                .subdeps
                .iter()
                .zip(&other.subdeps)
                .all(|(a, b)| a.strict_eq(b))
    }

    /// Serialize to a nested map: `{behavior, identifiers: {id: time|null}, subdeps}`.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Rebuild a dependency from the nested map produced by `to_value`.
    pub fn from_value(value: &Value) -> serde_json::Result<Self> {
        serde_json::from_value(value.clone())
    }
}

/// Structural equality: behavior, membership and subdeps, ignoring timestamps.
impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.behavior == other.behavior
            && self.identifier_states.len() == other.identifier_states.len()
            && self
                .identifier_states
                .keys()
                .zip(other.identifier_states.keys())
                .all(|(a, b)| a == b)
            && self.subdeps == other.subdeps
    }
}

impl Eq for Dependency {}
