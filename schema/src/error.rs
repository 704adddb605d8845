//! Schema errors.

use crate::validator::Conflict;
use ontic_core::{GraphError, NodeId};
use ontic_datatype::CodecError;
use thiserror::Error;

/// Errors that can occur during schema operations.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A namespace, class, property or relationship-type name is taken.
    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },

    /// An argument was rejected before anything was written.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A declaration or hierarchy edit would make constraints conflict.
    #[error("Constraint conflict: {0}")]
    ConstraintConflict(Conflict),

    /// The target of the operation does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The handle refers to a deleted node or to a node of another kind.
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// Error from the graph store.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Error from a datatype codec.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl SchemaError {
    pub fn duplicate_name(kind: &'static str, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind,
            name: name.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState(message.into())
    }

    pub(crate) fn depth_exceeded(start: NodeId, at: NodeId, limit: usize) -> Self {
        Self::IllegalState(format!(
            "walk from {} goes deeper than the depth limit of {} at {}",
            start, limit, at
        ))
    }

    pub(crate) fn wrong_kind(node: NodeId, expected: &str) -> Self {
        Self::IllegalState(format!("{} is not a live {}", node, expected))
    }

    /// Returns the conflict if this is a constraint conflict.
    pub fn conflict(&self) -> Option<&Conflict> {
        match self {
            SchemaError::ConstraintConflict(conflict) => Some(conflict),
            _ => None,
        }
    }
}

impl From<Conflict> for SchemaError {
    fn from(conflict: Conflict) -> Self {
        SchemaError::ConstraintConflict(conflict)
    }
}

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
