//! Per-model name cache.
//!
//! Maps (scope, kind, name) to the node carrying that name. Transactions
//! queue their changes and the queue is applied only on commit, so an aborted
//! transaction never leaves entries behind. Readers still verify every hit
//! against the store before trusting it.

use crate::id::NodeKind;
use ontic_core::NodeId;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct NameKey {
    /// The root for namespaces, the namespace for everything else.
    pub scope: NodeId,
    pub kind: NodeKind,
    pub name: String,
}

impl NameKey {
    pub fn new(scope: NodeId, kind: NodeKind, name: &str) -> Self {
        Self {
            scope,
            kind,
            name: name.to_string(),
        }
    }
}

/// A queued cache change.
#[derive(Debug, Clone)]
pub(crate) enum CacheOp {
    Insert(NameKey, NodeId),
    Evict(NodeId),
}

#[derive(Debug, Default)]
pub(crate) struct NameCache {
    entries: RwLock<HashMap<NameKey, NodeId>>,
}

impl NameCache {
    pub fn get(&self, key: &NameKey) -> Option<NodeId> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
    }

    pub fn insert(&self, key: NameKey, node: NodeId) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, node);
    }

    pub fn apply(&self, ops: Vec<CacheOp>) {
        if ops.is_empty() {
            return;
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        for op in ops {
            match op {
                CacheOp::Insert(key, node) => {
                    entries.insert(key, node);
                }
                CacheOp::Evict(node) => entries.retain(|_, cached| *cached != node),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
