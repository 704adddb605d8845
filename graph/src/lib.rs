//! Ontic Graph Storage
//!
//! This crate provides the property graph the schema engine is persisted in:
//! - Arena node storage with per-node adjacency kept in insertion order
//! - Interned edge type names
//! - Breadth-first walks with continue/collect predicates
//! - Write transactions with an undo log (rollback on abort or drop)
//! - Read snapshots
//! - Per-node exclusive locks held independently of transactions

mod graph;
mod index;
mod intern;
mod lock;
mod store;
mod transaction;
mod walk;

pub use graph::*;
pub use intern::EdgeTypeTable;
pub use lock::{LockManager, NodeLock};
pub use store::Store;
pub use transaction::{Savepoint, Snapshot, Transaction, TransactionState};
pub use walk::{WalkPosition, WalkStep};
