//! Common error types.

use crate::{EdgeId, EdgeTypeId, NodeId};
use thiserror::Error;

/// Errors that can occur during graph operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Node not found.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Edge not found.
    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    /// Edge type was never interned.
    #[error("Edge type not found: {0}")]
    EdgeTypeNotFound(EdgeTypeId),

    /// Type mismatch in a stored property.
    #[error("Type mismatch on {key}: expected {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    /// Invalid operation.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl GraphError {
    pub fn type_mismatch(
        key: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
