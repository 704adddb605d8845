//! Arena storage for nodes and edges.
//!
//! Node and edge ids index directly into dense vectors. Deleted entries leave
//! a tombstone so ids are never reused, even when a transaction that created
//! them rolls back.

use crate::index::Adjacency;
use ontic_core::{
    Direction, Edge, EdgeId, EdgeTypeId, GraphError, GraphResult, Node, NodeId, Properties, Value,
};

/// A stored node plus its adjacency lists.
#[derive(Debug, Clone)]
pub(crate) struct NodeSlot {
    pub(crate) node: Node,
    pub(crate) adjacency: Adjacency,
}

/// Positions an edge occupied in its endpoints' adjacency lists.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EdgePositions {
    pub(crate) outgoing: usize,
    pub(crate) incoming: usize,
}

/// The graph contents. Reads go through `&Store`; writes only through a
/// [`Transaction`](crate::Transaction).
#[derive(Debug, Default)]
pub struct Store {
    nodes: Vec<Option<NodeSlot>>,
    edges: Vec<Option<Edge>>,
    live_nodes: usize,
    live_edges: usize,
}

impl Store {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    // ==================== Node Reads ====================

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slot(id).map(|slot| &slot.node)
    }

    /// Check whether a node exists.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// Get a property of a node. Errors if the node does not exist.
    pub fn get_property(&self, id: NodeId, key: &str) -> GraphResult<Option<&Value>> {
        self.node(id)
            .map(|node| node.get_property(key))
            .ok_or(GraphError::NodeNotFound(id))
    }

    /// Get a string property, failing on a non-string value.
    pub fn get_str(&self, id: NodeId, key: &str) -> GraphResult<Option<&str>> {
        match self.get_property(id, key)? {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(GraphError::type_mismatch(key, "String", other.type_name())),
        }
    }

    /// Get an integer property, failing on a non-integer value.
    pub fn get_int(&self, id: NodeId, key: &str) -> GraphResult<Option<i64>> {
        match self.get_property(id, key)? {
            None => Ok(None),
            Some(Value::Int(i)) => Ok(Some(*i)),
            Some(other) => Err(GraphError::type_mismatch(key, "Int", other.type_name())),
        }
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.live_nodes
    }

    /// Iterate over all live node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter_map(|slot| slot.as_ref().map(|s| s.node.id))
    }

    // ==================== Edge Reads ====================

    /// Get an edge by id.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index()).and_then(|e| e.as_ref())
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    /// Edges incident to `node` in `direction`, optionally filtered by type.
    ///
    /// Order is insertion order; `Both` yields outgoing edges first. A missing
    /// node yields nothing.
    pub fn edges(
        &self,
        node: NodeId,
        edge_type: Option<EdgeTypeId>,
        direction: Direction,
    ) -> impl Iterator<Item = &Edge> + '_ {
        self.slot(node)
            .into_iter()
            .flat_map(move |slot| slot.adjacency.edges(direction))
            .filter_map(move |id| self.edge(id))
            .filter(move |edge| edge_type.map_or(true, |t| edge.type_id == t))
    }

    /// Nodes at the other end of the edges selected as in [`Store::edges`].
    pub fn neighbors(
        &self,
        node: NodeId,
        edge_type: Option<EdgeTypeId>,
        direction: Direction,
    ) -> impl Iterator<Item = NodeId> + '_ {
        self.edges(node, edge_type, direction)
            .filter_map(move |edge| edge.other(node))
    }

    /// The first neighbour reached over `edge_type` in `direction`.
    pub fn single_neighbor(
        &self,
        node: NodeId,
        edge_type: EdgeTypeId,
        direction: Direction,
    ) -> Option<NodeId> {
        self.neighbors(node, Some(edge_type), direction).next()
    }

    /// Find an edge `from -[edge_type]-> to`.
    pub fn find_edge(&self, from: NodeId, edge_type: EdgeTypeId, to: NodeId) -> Option<&Edge> {
        self.edges(from, Some(edge_type), Direction::Outgoing)
            .find(|edge| edge.to == to)
    }

    /// Check whether an edge `from -[edge_type]-> to` exists.
    pub fn has_edge(&self, from: NodeId, edge_type: EdgeTypeId, to: NodeId) -> bool {
        self.find_edge(from, edge_type, to).is_some()
    }

    /// Number of edges incident to a node.
    pub fn degree(&self, node: NodeId) -> usize {
        self.slot(node).map_or(0, |slot| slot.adjacency.degree())
    }

    // ==================== Raw Mutations ====================
    //
    // These do not record undo information; `Transaction` wraps them.

    fn slot(&self, id: NodeId) -> Option<&NodeSlot> {
        self.nodes.get(id.index()).and_then(|s| s.as_ref())
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut NodeSlot> {
        self.nodes.get_mut(id.index()).and_then(|s| s.as_mut())
    }

    pub(crate) fn insert_node(&mut self, properties: Properties) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u64);
        self.nodes.push(Some(NodeSlot {
            node: Node::new(id, properties),
            adjacency: Adjacency::new(),
        }));
        self.live_nodes += 1;
        id
    }

    /// Remove a node slot. The caller must have removed incident edges first.
    pub(crate) fn take_node(&mut self, id: NodeId) -> GraphResult<NodeSlot> {
        let slot = self
            .nodes
            .get_mut(id.index())
            .and_then(|s| s.take())
            .ok_or(GraphError::NodeNotFound(id))?;
        self.live_nodes -= 1;
        Ok(slot)
    }

    pub(crate) fn restore_node(&mut self, slot: NodeSlot) {
        let index = slot.node.id.index();
        if let Some(entry) = self.nodes.get_mut(index) {
            if entry.is_none() {
                self.live_nodes += 1;
            }
            *entry = Some(slot);
        }
    }

    pub(crate) fn insert_edge(
        &mut self,
        edge_type: EdgeTypeId,
        from: NodeId,
        to: NodeId,
    ) -> GraphResult<EdgeId> {
        if !self.contains_node(from) {
            return Err(GraphError::NodeNotFound(from));
        }
        if !self.contains_node(to) {
            return Err(GraphError::NodeNotFound(to));
        }

        let id = EdgeId::new(self.edges.len() as u64);
        self.edges.push(Some(Edge::new(id, edge_type, from, to)));
        self.live_edges += 1;

        if let Some(slot) = self.slot_mut(from) {
            slot.adjacency.push(Direction::Outgoing, id);
        }
        if let Some(slot) = self.slot_mut(to) {
            slot.adjacency.push(Direction::Incoming, id);
        }
        Ok(id)
    }

    pub(crate) fn take_edge(&mut self, id: EdgeId) -> GraphResult<(Edge, EdgePositions)> {
        let edge = self
            .edges
            .get_mut(id.index())
            .and_then(|e| e.take())
            .ok_or(GraphError::EdgeNotFound(id))?;
        self.live_edges -= 1;

        let outgoing = self
            .slot_mut(edge.from)
            .and_then(|slot| slot.adjacency.remove(Direction::Outgoing, id))
            .unwrap_or(0);
        let incoming = self
            .slot_mut(edge.to)
            .and_then(|slot| slot.adjacency.remove(Direction::Incoming, id))
            .unwrap_or(0);

        Ok((edge, EdgePositions { outgoing, incoming }))
    }

    pub(crate) fn restore_edge(&mut self, edge: Edge, positions: EdgePositions) {
        let (id, from, to) = (edge.id, edge.from, edge.to);
        if let Some(entry) = self.edges.get_mut(id.index()) {
            if entry.is_none() {
                self.live_edges += 1;
            }
            *entry = Some(edge);
        }
        if let Some(slot) = self.slot_mut(from) {
            slot.adjacency
                .restore(Direction::Outgoing, id, positions.outgoing);
        }
        if let Some(slot) = self.slot_mut(to) {
            slot.adjacency
                .restore(Direction::Incoming, id, positions.incoming);
        }
    }

    /// Undo an edge creation. The slot stays as a tombstone.
    pub(crate) fn discard_edge(&mut self, id: EdgeId) {
        let _ = self.take_edge(id);
    }

    pub(crate) fn discard_node(&mut self, id: NodeId) {
        let _ = self.take_node(id);
    }

    pub(crate) fn write_property(
        &mut self,
        id: NodeId,
        key: &str,
        value: Option<Value>,
    ) -> GraphResult<Option<Value>> {
        let slot = self.slot_mut(id).ok_or(GraphError::NodeNotFound(id))?;
        Ok(match value {
            Some(value) => slot.node.set_property(key.to_string(), value),
            None => slot.node.remove_property(key),
        })
    }
}
