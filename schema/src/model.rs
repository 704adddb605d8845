//! The meta model and its read/write contexts.
//!
//! A [`MetaModel`] owns the graph holding the schema. Reads go through a
//! [`Schema`] context obtained from either a [`MetaView`] (committed state)
//! or a [`MetaTx`] (state including the transaction's own changes). All
//! mutations are methods on [`MetaTx`] and become visible to other readers on
//! commit.

use crate::cache::{CacheOp, NameCache};
use crate::config::ModelConfig;
use crate::edges::{MetaEdge, MetaEdges};
use crate::error::{SchemaError, SchemaResult};
use crate::id::{ConstrainableId, ContainerId, NamespaceId, NodeKind, RestrictableId, Thing};
use ontic_core::{props, Direction, EdgeId, EdgeTypeId, NodeId, Value};
use ontic_graph::{Graph, Snapshot, Store, Transaction, WalkPosition, WalkStep};
use tracing::debug;

/// Property keys written on schema nodes.
pub(crate) mod keys {
    pub const KIND: &str = "kind";
    pub const NAME: &str = "name";
    pub const MIN_CARDINALITY: &str = "min_cardinality";
    pub const MAX_CARDINALITY: &str = "max_cardinality";
    pub const COLLECTION_BEHAVIOUR: &str = "collection_behaviour";
    pub const INSTANCE_COUNT: &str = "instance_count";
    pub const ADDITIONAL_PREFIX: &str = "additional.";
    pub const RANGE_KIND: &str = "range.kind";
    pub const RANGE_DATATYPE: &str = "range.datatype";
    pub const RANGE_VALUES: &str = "range.values";
    pub const RANGE_PRIMITIVE: &str = "range.primitive";
    pub const RANGE_RESOURCE: &str = "range.resource";
}

/// A schema of classes, properties and relationship types over a graph.
#[derive(Debug)]
pub struct MetaModel {
    graph: Graph,
    edges: MetaEdges,
    root: NodeId,
    global: NamespaceId,
    pub(crate) cache: NameCache,
    config: ModelConfig,
}

impl Default for MetaModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MetaModel {
    /// Create an empty model with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    /// Create an empty model.
    pub fn with_config(config: ModelConfig) -> Self {
        let graph = Graph::new();
        let edges = MetaEdges::intern(&graph);

        let (root, global) = {
            let mut tx = graph.begin();
            let root = tx.create_node(props! { keys::KIND => NodeKind::Root.as_str() });
            let global = tx.create_node(props! { keys::KIND => NodeKind::Namespace.as_str() });
            tx.commit();
            (root, NamespaceId::from_node(global))
        };
        debug!(%root, "meta model created");

        Self {
            graph,
            edges,
            root,
            global,
            cache: NameCache::default(),
            config,
        }
    }

    /// Begin a schema transaction.
    pub fn begin(&self) -> MetaTx<'_> {
        MetaTx {
            tx: self.graph.begin(),
            model: self,
            cache_ops: Vec::new(),
        }
    }

    /// Take a read-only view of the committed schema.
    pub fn read(&self) -> MetaView<'_> {
        MetaView {
            snapshot: self.graph.read(),
            model: self,
        }
    }

    /// Run `f` in a transaction, committing on success and rolling back on
    /// error.
    pub fn write<T>(&self, f: impl FnOnce(&mut MetaTx<'_>) -> SchemaResult<T>) -> SchemaResult<T> {
        let mut tx = self.begin();
        match f(&mut tx) {
            Ok(value) => {
                tx.commit();
                Ok(value)
            }
            Err(e) => {
                tx.abort();
                Err(e)
            }
        }
    }

    /// The configuration the model was built with.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// The underlying graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The unnamed namespace every model has.
    pub fn global_namespace(&self) -> NamespaceId {
        self.global
    }

    /// Number of entries in the name cache.
    pub fn cached_names(&self) -> usize {
        self.cache.len()
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn edge(&self, edge: MetaEdge) -> EdgeTypeId {
        self.edges.id(edge)
    }

    pub(crate) fn edges(&self) -> &MetaEdges {
        &self.edges
    }
}

/// A read-only view of the committed schema.
#[derive(Debug)]
pub struct MetaView<'m> {
    snapshot: Snapshot<'m>,
    model: &'m MetaModel,
}

impl MetaView<'_> {
    /// Query context.
    pub fn schema(&self) -> Schema<'_> {
        Schema {
            store: &*self.snapshot,
            model: self.model,
            committed: true,
        }
    }
}

/// An exclusive schema transaction.
///
/// Dropping it without calling [`MetaTx::commit`] rolls every change back.
#[derive(Debug)]
pub struct MetaTx<'m> {
    pub(crate) tx: Transaction<'m>,
    pub(crate) model: &'m MetaModel,
    pub(crate) cache_ops: Vec<CacheOp>,
}

impl<'m> MetaTx<'m> {
    /// Query context seeing this transaction's changes.
    pub fn schema(&self) -> Schema<'_> {
        Schema {
            store: &*self.tx,
            model: self.model,
            committed: false,
        }
    }

    pub fn model(&self) -> &'m MetaModel {
        self.model
    }

    /// Keep every change and publish queued name cache updates.
    pub fn commit(self) {
        let MetaTx {
            tx,
            model,
            cache_ops,
        } = self;
        tx.commit();
        model.cache.apply(cache_ops);
    }

    /// Undo every change.
    pub fn abort(self) {
        self.tx.abort();
    }

    pub(crate) fn edge(&self, edge: MetaEdge) -> EdgeTypeId {
        self.model.edge(edge)
    }

    pub(crate) fn create(&mut self, kind: NodeKind, name: Option<&str>) -> NodeId {
        let mut properties = props! { keys::KIND => kind.as_str() };
        if let Some(name) = name {
            properties.insert(keys::NAME.to_string(), Value::from(name));
        }
        self.tx.create_node(properties)
    }

    pub(crate) fn link(&mut self, from: NodeId, edge: MetaEdge, to: NodeId) -> SchemaResult<EdgeId> {
        let edge_type = self.edge(edge);
        Ok(self.tx.create_edge(from, edge_type, to)?)
    }

    /// Remove every `from -[edge]-> to` edge, returning whether any existed.
    pub(crate) fn unlink(&mut self, from: NodeId, edge: MetaEdge, to: NodeId) -> SchemaResult<bool> {
        let edge_type = self.edge(edge);
        let doomed: Vec<EdgeId> = self
            .tx
            .edges(from, Some(edge_type), Direction::Outgoing)
            .filter(|e| e.to == to)
            .map(|e| e.id)
            .collect();
        for id in &doomed {
            self.tx.delete_edge(*id)?;
        }
        Ok(!doomed.is_empty())
    }

    /// Remove every edge of `edge` kind incident to `node` in `direction`.
    pub(crate) fn unlink_all(
        &mut self,
        node: NodeId,
        edge: MetaEdge,
        direction: Direction,
    ) -> SchemaResult<usize> {
        let edge_type = self.edge(edge);
        let doomed: Vec<EdgeId> = self
            .tx
            .edges(node, Some(edge_type), direction)
            .map(|e| e.id)
            .collect();
        for id in &doomed {
            self.tx.delete_edge(*id)?;
        }
        Ok(doomed.len())
    }

    /// Set or remove a property.
    pub(crate) fn put(&mut self, node: NodeId, key: &str, value: Option<Value>) -> SchemaResult<()> {
        match value {
            Some(value) => {
                self.tx.set_property(node, key, value)?;
            }
            None => {
                self.tx.remove_property(node, key)?;
            }
        }
        Ok(())
    }
}

/// Query context over a consistent graph state.
///
/// Cheap to copy. Every read-only schema operation is a method on this type.
#[derive(Debug, Clone, Copy)]
pub struct Schema<'a> {
    pub(crate) store: &'a Store,
    pub(crate) model: &'a MetaModel,
    committed: bool,
}

impl<'a> Schema<'a> {
    /// The graph state being read.
    pub fn store(self) -> &'a Store {
        self.store
    }

    pub fn model(self) -> &'a MetaModel {
        self.model
    }

    /// Returns true when reading committed state only.
    pub(crate) fn is_committed(self) -> bool {
        self.committed
    }

    pub(crate) fn edge(self, edge: MetaEdge) -> EdgeTypeId {
        self.model.edge(edge)
    }

    /// Kind tag of a node, or None if the node is gone or untagged.
    pub fn kind_of(self, node: NodeId) -> Option<NodeKind> {
        self.store
            .node(node)
            .and_then(|n| n.get_property(keys::KIND))
            .and_then(Value::as_str)
            .and_then(NodeKind::parse)
    }

    pub(crate) fn expect_kind(self, node: NodeId, kind: NodeKind) -> SchemaResult<()> {
        if self.kind_of(node) == Some(kind) {
            Ok(())
        } else {
            Err(SchemaError::wrong_kind(node, kind.as_str()))
        }
    }

    pub(crate) fn check<T: Thing>(self, thing: T) -> SchemaResult<()> {
        self.expect_kind(thing.node(), T::KIND.node_kind())
    }

    pub(crate) fn check_container(self, container: ContainerId) -> SchemaResult<()> {
        self.expect_kind(container.node(), container.kind().node_kind())
    }

    pub(crate) fn check_constrainable(self, constrainable: ConstrainableId) -> SchemaResult<()> {
        self.expect_kind(constrainable.node(), constrainable.kind().node_kind())
    }

    pub(crate) fn check_restrictable(self, restrictable: RestrictableId) -> SchemaResult<()> {
        let expected = match restrictable {
            RestrictableId::Restriction(_) => NodeKind::Restriction,
            RestrictableId::Property(_) => NodeKind::Property,
            RestrictableId::RelType(_) => NodeKind::RelationshipType,
        };
        self.expect_kind(restrictable.node(), expected)
    }

    /// Name of a node, if it has one.
    pub fn name_of(self, node: NodeId) -> Option<&'a str> {
        self.store
            .node(node)
            .and_then(|n| n.get_property(keys::NAME))
            .and_then(Value::as_str)
    }

    /// Name for diagnostics: the node's name, or its id.
    pub(crate) fn display(self, node: NodeId) -> String {
        self.name_of(node)
            .map(str::to_string)
            .unwrap_or_else(|| node.to_string())
    }

    pub(crate) fn neighbors(self, node: NodeId, edge: MetaEdge, direction: Direction) -> Vec<NodeId> {
        self.store
            .neighbors(node, Some(self.edge(edge)), direction)
            .collect()
    }

    pub(crate) fn single(self, node: NodeId, edge: MetaEdge, direction: Direction) -> Option<NodeId> {
        self.store
            .single_neighbor(node, self.edge(edge), direction)
    }

    pub(crate) fn has_link(self, from: NodeId, edge: MetaEdge, to: NodeId) -> bool {
        self.store.has_edge(from, self.edge(edge), to)
    }

    /// Bounded breadth-first walk over schema edges.
    ///
    /// Fails instead of returning a partial result when a position the walk
    /// would expand sits at the depth limit and still has edges to follow.
    pub(crate) fn walk<E, C>(
        self,
        start: NodeId,
        steps: &[(MetaEdge, Direction)],
        mut expand: E,
        collect: C,
    ) -> SchemaResult<Vec<NodeId>>
    where
        E: FnMut(&WalkPosition) -> bool,
        C: FnMut(&WalkPosition) -> bool,
    {
        let limit = self.model.config().walk_depth_limit;
        let steps: Vec<WalkStep> = steps
            .iter()
            .map(|(edge, direction)| WalkStep::new(self.edge(*edge), *direction))
            .collect();
        let mut cut_off = None;
        let reached = self.store.walk(
            start,
            &steps,
            |pos| {
                if !expand(pos) {
                    return false;
                }
                if pos.depth < limit {
                    return true;
                }
                let blocked = steps.iter().any(|step| {
                    self.store
                        .neighbors(pos.node, Some(step.edge_type), step.direction)
                        .next()
                        .is_some()
                });
                if blocked && cut_off.is_none() {
                    cut_off = Some(pos.node);
                }
                false
            },
            collect,
        );
        match cut_off {
            Some(node) => Err(SchemaError::depth_exceeded(start, node, limit)),
            None => Ok(reached),
        }
    }

    /// Returns true if `pos` was reached over `edge` in `direction`.
    pub(crate) fn arrived(self, pos: &WalkPosition, edge: MetaEdge, direction: Direction) -> bool {
        pos.arrived_via(self.edge(edge), direction)
    }
}
