//! Edge type name interning.
//!
//! Edge type names are interned once and referred to by [`EdgeTypeId`]
//! afterwards. The table is shared by every transaction on a graph and may be
//! extended concurrently; names are never removed.

use ontic_core::EdgeTypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Default)]
struct Interner {
    by_name: HashMap<Arc<str>, EdgeTypeId>,
    names: Vec<Arc<str>>,
}

/// Thread-safe name <-> id table for edge types.
#[derive(Debug, Default)]
pub struct EdgeTypeTable {
    inner: RwLock<Interner>,
}

impl EdgeTypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `name`, returning its existing id if already known.
    pub fn intern(&self, name: &str) -> EdgeTypeId {
        if let Some(id) = self.lookup(name) {
            return id;
        }

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        // Another writer may have won the race between the two locks.
        if let Some(id) = inner.by_name.get(name) {
            return *id;
        }
        let id = EdgeTypeId::new(inner.names.len() as u32);
        let name: Arc<str> = Arc::from(name);
        inner.names.push(name.clone());
        inner.by_name.insert(name, id);
        id
    }

    /// Find the id of an already interned name.
    pub fn lookup(&self, name: &str) -> Option<EdgeTypeId> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.by_name.get(name).copied()
    }

    /// Resolve an id back to its name.
    pub fn resolve(&self, id: EdgeTypeId) -> Option<Arc<str>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.names.get(id.raw() as usize).cloned()
    }

    /// Number of interned names.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .names
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
