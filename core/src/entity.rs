//! Entity structures.
//!
//! Nodes carry a property bag; edges are directed, typed and binary.

use crate::{Direction, EdgeId, EdgeTypeId, NodeId, Properties, Value};

/// A node in the graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier for this node.
    pub id: NodeId,
    /// Version number, bumped on every property change.
    pub version: u64,
    /// Property values.
    pub properties: Properties,
}

impl Node {
    /// Create a new node with the given properties.
    pub fn new(id: NodeId, properties: Properties) -> Self {
        Self {
            id,
            version: 1,
            properties,
        }
    }

    /// Get a property value by key.
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Set a property value, returning the previous one.
    pub fn set_property(&mut self, key: String, value: Value) -> Option<Value> {
        self.version += 1;
        self.properties.insert(key, value)
    }

    /// Remove a property.
    pub fn remove_property(&mut self, key: &str) -> Option<Value> {
        let result = self.properties.remove(key);
        if result.is_some() {
            self.version += 1;
        }
        result
    }
}

/// A directed, typed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Unique identifier for this edge.
    pub id: EdgeId,
    /// Interned type of this edge.
    pub type_id: EdgeTypeId,
    /// Source node.
    pub from: NodeId,
    /// Target node.
    pub to: NodeId,
}

impl Edge {
    /// Create a new edge.
    pub fn new(id: EdgeId, type_id: EdgeTypeId, from: NodeId, to: NodeId) -> Self {
        Self {
            id,
            type_id,
            from,
            to,
        }
    }

    /// The end opposite to `node`, or None if `node` is not an endpoint.
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.from == node {
            Some(self.to)
        } else if self.to == node {
            Some(self.from)
        } else {
            None
        }
    }

    /// Direction of this edge as seen from `node`.
    pub fn direction_from(&self, node: NodeId) -> Option<Direction> {
        if self.from == node {
            Some(Direction::Outgoing)
        } else if self.to == node {
            Some(Direction::Incoming)
        } else {
            None
        }
    }

    /// Check if this edge has `node` as an endpoint.
    pub fn involves(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }
}
