//! Per-node exclusive locks.
//!
//! Locks are independent of transactions: a caller may hold a node lock
//! across a read snapshot and a later write transaction, which is how
//! read-modify-write sequences on a single node are serialised.

use ontic_core::NodeId;
use std::collections::HashSet;
use std::sync::{Condvar, Mutex, PoisonError};
use tracing::trace;

/// Grants exclusive locks on individual nodes.
#[derive(Debug, Default)]
pub struct LockManager {
    held: Mutex<HashSet<NodeId>>,
    released: Condvar,
}

impl LockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until `node` is free, then lock it.
    pub fn acquire(&self, node: NodeId) -> NodeLock<'_> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        while held.contains(&node) {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        held.insert(node);
        trace!(%node, "node lock acquired");
        NodeLock {
            manager: self,
            node,
        }
    }

    /// Lock `node` if it is free.
    pub fn try_acquire(&self, node: NodeId) -> Option<NodeLock<'_>> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        if !held.insert(node) {
            return None;
        }
        Some(NodeLock {
            manager: self,
            node,
        })
    }

    /// Check whether `node` is currently locked.
    pub fn is_locked(&self, node: NodeId) -> bool {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&node)
    }

    fn release(&self, node: NodeId) {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        held.remove(&node);
        drop(held);
        self.released.notify_all();
        trace!(%node, "node lock released");
    }
}

/// Guard for a node lock. The lock is released on drop.
#[derive(Debug)]
pub struct NodeLock<'a> {
    manager: &'a LockManager,
    node: NodeId,
}

impl NodeLock<'_> {
    /// The locked node.
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl Drop for NodeLock<'_> {
    fn drop(&mut self) {
        self.manager.release(self.node);
    }
}
