//! Write transactions and read snapshots.
//!
//! A [`Transaction`] holds the graph's write lock for its whole lifetime and
//! applies changes directly to the store, recording an undo entry for each
//! one. Commit discards the log; abort (or dropping an uncommitted
//! transaction) replays it backwards. A [`Snapshot`] holds the read lock.

use crate::store::{EdgePositions, NodeSlot, Store};
use ontic_core::{EdgeId, EdgeTypeId, GraphError, GraphResult, NodeId, Properties, Value};
use std::ops::Deref;
use std::sync::{RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace};

/// Transaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Changes are being applied.
    Active,
    /// Changes were kept.
    Committed,
    /// Changes were undone.
    RolledBack,
}

/// A single undoable change.
#[derive(Debug)]
enum UndoEntry {
    CreatedNode(NodeId),
    DeletedNode(NodeSlot),
    CreatedEdge(EdgeId),
    DeletedEdge(ontic_core::Edge, EdgePositions),
    Property {
        node: NodeId,
        key: String,
        previous: Option<Value>,
    },
}

/// A marker into the undo log; see [`Transaction::rollback_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Savepoint(usize);

/// An exclusive, atomic unit of graph changes.
#[derive(Debug)]
pub struct Transaction<'g> {
    store: RwLockWriteGuard<'g, Store>,
    undo: Vec<UndoEntry>,
    state: TransactionState,
}

impl<'g> Transaction<'g> {
    pub(crate) fn new(store: RwLockWriteGuard<'g, Store>) -> Self {
        Self {
            store,
            undo: Vec::new(),
            state: TransactionState::Active,
        }
    }

    /// Get the transaction state.
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Number of changes recorded so far.
    pub fn pending_changes(&self) -> usize {
        self.undo.len()
    }

    // ========== Node Operations ==========

    /// Create a node with the given properties.
    pub fn create_node(&mut self, properties: Properties) -> NodeId {
        let id = self.store.insert_node(properties);
        self.undo.push(UndoEntry::CreatedNode(id));
        trace!(%id, "node created");
        id
    }

    /// Delete a node and every edge incident to it.
    pub fn delete_node(&mut self, id: NodeId) -> GraphResult<()> {
        if !self.store.contains_node(id) {
            return Err(GraphError::NodeNotFound(id));
        }

        let incident: Vec<EdgeId> = self
            .store
            .edges(id, None, ontic_core::Direction::Both)
            .map(|e| e.id)
            .collect();
        for edge in incident {
            self.delete_edge(edge)?;
        }

        let slot = self.store.take_node(id)?;
        self.undo.push(UndoEntry::DeletedNode(slot));
        trace!(%id, "node deleted");
        Ok(())
    }

    /// Set a property, returning the previous value.
    pub fn set_property(
        &mut self,
        node: NodeId,
        key: &str,
        value: impl Into<Value>,
    ) -> GraphResult<Option<Value>> {
        let previous = self.store.write_property(node, key, Some(value.into()))?;
        self.undo.push(UndoEntry::Property {
            node,
            key: key.to_string(),
            previous: previous.clone(),
        });
        Ok(previous)
    }

    /// Remove a property, returning the removed value.
    pub fn remove_property(&mut self, node: NodeId, key: &str) -> GraphResult<Option<Value>> {
        let previous = self.store.write_property(node, key, None)?;
        if previous.is_some() {
            self.undo.push(UndoEntry::Property {
                node,
                key: key.to_string(),
                previous: previous.clone(),
            });
        }
        Ok(previous)
    }

    // ========== Edge Operations ==========

    /// Create an edge `from -[edge_type]-> to`.
    pub fn create_edge(
        &mut self,
        from: NodeId,
        edge_type: EdgeTypeId,
        to: NodeId,
    ) -> GraphResult<EdgeId> {
        let id = self.store.insert_edge(edge_type, from, to)?;
        self.undo.push(UndoEntry::CreatedEdge(id));
        trace!(%id, %from, %to, "edge created");
        Ok(id)
    }

    /// Delete an edge.
    pub fn delete_edge(&mut self, id: EdgeId) -> GraphResult<()> {
        let (edge, positions) = self.store.take_edge(id)?;
        self.undo.push(UndoEntry::DeletedEdge(edge, positions));
        trace!(%id, "edge deleted");
        Ok(())
    }

    // ========== Lifecycle ==========

    /// Mark the current point of the undo log.
    pub fn savepoint(&self) -> Savepoint {
        Savepoint(self.undo.len())
    }

    /// Undo every change made after `savepoint`, keeping the transaction open.
    pub fn rollback_to(&mut self, savepoint: Savepoint) {
        while self.undo.len() > savepoint.0 {
            if let Some(entry) = self.undo.pop() {
                self.apply_undo(entry);
            }
        }
    }

    /// Keep every change.
    pub fn commit(mut self) {
        debug!(changes = self.undo.len(), "transaction committed");
        self.undo.clear();
        self.state = TransactionState::Committed;
    }

    /// Undo every change.
    pub fn abort(mut self) {
        self.rollback();
    }

    fn rollback(&mut self) {
        debug!(changes = self.undo.len(), "transaction rolled back");
        self.rollback_to(Savepoint(0));
        self.state = TransactionState::RolledBack;
    }

    fn apply_undo(&mut self, entry: UndoEntry) {
        match entry {
            UndoEntry::CreatedNode(id) => self.store.discard_node(id),
            UndoEntry::DeletedNode(slot) => self.store.restore_node(slot),
            UndoEntry::CreatedEdge(id) => self.store.discard_edge(id),
            UndoEntry::DeletedEdge(edge, positions) => self.store.restore_edge(edge, positions),
            UndoEntry::Property {
                node,
                key,
                previous,
            } => {
                let _ = self.store.write_property(node, &key, previous);
            }
        }
    }
}

impl Deref for Transaction<'_> {
    type Target = Store;

    fn deref(&self) -> &Store {
        &self.store
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.state == TransactionState::Active {
            self.rollback();
        }
    }
}

/// A consistent read-only view of the graph.
#[derive(Debug)]
pub struct Snapshot<'g> {
    store: RwLockReadGuard<'g, Store>,
}

impl<'g> Snapshot<'g> {
    pub(crate) fn new(store: RwLockReadGuard<'g, Store>) -> Self {
        Self { store }
    }
}

impl Deref for Snapshot<'_> {
    type Target = Store;

    fn deref(&self) -> &Store {
        &self.store
    }
}
