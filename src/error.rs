//! Error types for the node/dependency/event engine.

use thiserror::Error;

/// Relation between a node and a dependency that would form a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Ancestor,
    Descendant,
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::Ancestor => write!(f, "ancestor"),
            Relation::Descendant => write!(f, "descendant"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // === Configuration errors (fatal at tree build / graft) ===
    #[error("Node '{node}' declares parent '{parent}' which does not exist")]
    MissingParent { node: String, parent: String },

    #[error("Node '{node}' would become its own ancestor through parent '{parent}'")]
    ParentCycle { node: String, parent: String },

    #[error("Node '{identifier}' already exists")]
    DuplicateNode { identifier: String },

    #[error("Invalid identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    #[error("Node '{node}' cannot depend on the root node")]
    DependencyOnRoot { node: String },

    #[error("Node '{node}' cannot depend on itself")]
    SelfDependency { node: String },

    #[error("Node '{node}' cannot depend on its {relation} '{dependency}'")]
    DependencyCycle {
        node: String,
        dependency: String,
        relation: Relation,
    },

    // === Validation errors (per call, no state mutated) ===
    #[error("Invalid ack: {reason}")]
    InvalidAck { reason: String },

    // === Invariant violations ===
    #[error("Cannot add child '{child}' to '{node}': child declares parent '{declared}'")]
    ParentMismatch {
        node: String,
        child: String,
        declared: String,
    },

    #[error("Tree has not been built yet")]
    TreeNotBuilt,

    #[error("Operational node '{identifier}' cannot be removed")]
    OperationalNode { identifier: String },

    // === Lookup ===
    #[error("Node not found: {identifier}")]
    UnknownNode { identifier: String },
}

impl Error {
    /// Configuration errors abort startup or a graft and must reach the operator.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingParent { .. }
                | Error::ParentCycle { .. }
                | Error::DuplicateNode { .. }
                | Error::InvalidIdentifier { .. }
                | Error::DependencyOnRoot { .. }
                | Error::SelfDependency { .. }
                | Error::DependencyCycle { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
