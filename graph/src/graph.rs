//! The shared graph handle.

use crate::intern::EdgeTypeTable;
use crate::lock::{LockManager, NodeLock};
use crate::store::Store;
use crate::transaction::{Snapshot, Transaction};
use ontic_core::{EdgeTypeId, NodeId};
use std::sync::{Arc, PoisonError, RwLock};

/// A thread-safe in-memory property graph.
///
/// One writer at a time; any number of readers when no writer is active.
#[derive(Debug, Default)]
pub struct Graph {
    store: RwLock<Store>,
    edge_types: EdgeTypeTable,
    locks: LockManager,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::new()),
            edge_types: EdgeTypeTable::new(),
            locks: LockManager::new(),
        }
    }

    /// Begin a write transaction. Blocks while another transaction or any
    /// snapshot is alive.
    pub fn begin(&self) -> Transaction<'_> {
        // A panicking writer rolls back in Drop, so a poisoned store is still
        // consistent.
        Transaction::new(self.store.write().unwrap_or_else(PoisonError::into_inner))
    }

    /// Take a read snapshot.
    pub fn read(&self) -> Snapshot<'_> {
        Snapshot::new(self.store.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Intern an edge type name.
    pub fn edge_type(&self, name: &str) -> EdgeTypeId {
        self.edge_types.intern(name)
    }

    /// Name of an interned edge type.
    pub fn edge_type_name(&self, id: EdgeTypeId) -> Option<Arc<str>> {
        self.edge_types.resolve(id)
    }

    /// The edge type table.
    pub fn edge_types(&self) -> &EdgeTypeTable {
        &self.edge_types
    }

    /// Lock a node exclusively until the guard is dropped.
    pub fn lock(&self, node: NodeId) -> NodeLock<'_> {
        self.locks.acquire(node)
    }

    /// The node lock manager.
    pub fn locks(&self) -> &LockManager {
        &self.locks
    }
}
