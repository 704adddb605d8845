//! Namespaces and name lookup.
//!
//! Names are unique per (namespace, kind); namespace names are unique per
//! model. The unnamed global namespace always exists.

use crate::cache::{CacheOp, NameKey};
use crate::edges::MetaEdge;
use crate::error::{SchemaError, SchemaResult};
use crate::id::{ClassId, NamespaceId, NodeKind, PropertyId, RelTypeId, Thing};
use crate::model::{MetaTx, Schema};
use ontic_core::{Direction, NodeId};
use tracing::debug;

fn validate_name(kind: &str, name: &str) -> SchemaResult<()> {
    if name.trim().is_empty() {
        return Err(SchemaError::invalid_argument(format!(
            "{} name must not be empty",
            kind
        )));
    }
    Ok(())
}

impl<'a> Schema<'a> {
    /// The unnamed namespace.
    pub fn global_namespace(self) -> NamespaceId {
        self.model.global_namespace()
    }

    /// Find a named namespace.
    pub fn namespace(self, name: &str) -> Option<NamespaceId> {
        self.find_named(self.model.root(), MetaEdge::ModelNamespace, NodeKind::Namespace, name)
            .map(NamespaceId::from_node)
    }

    /// Every namespace, the global one first.
    pub fn namespaces(self) -> Vec<NamespaceId> {
        std::iter::once(self.global_namespace())
            .chain(
                self.neighbors(self.model.root(), MetaEdge::ModelNamespace, Direction::Outgoing)
                    .into_iter()
                    .map(NamespaceId::from_node),
            )
            .collect()
    }

    /// Name of a namespace; None for the global namespace.
    pub fn namespace_name(self, namespace: NamespaceId) -> SchemaResult<Option<&'a str>> {
        self.expect_kind(namespace.node(), NodeKind::Namespace)?;
        Ok(self.name_of(namespace.node()))
    }

    /// Find a class by name.
    pub fn find_class(self, namespace: NamespaceId, name: &str) -> SchemaResult<Option<ClassId>> {
        self.find_thing(namespace, name)
    }

    /// Find a property by name.
    pub fn find_property(
        self,
        namespace: NamespaceId,
        name: &str,
    ) -> SchemaResult<Option<PropertyId>> {
        self.find_thing(namespace, name)
    }

    /// Find a relationship type by name.
    pub fn find_relationship_type(
        self,
        namespace: NamespaceId,
        name: &str,
    ) -> SchemaResult<Option<RelTypeId>> {
        self.find_thing(namespace, name)
    }

    /// Find a thing of kind `T` by name.
    pub fn find_thing<T: Thing>(self, namespace: NamespaceId, name: &str) -> SchemaResult<Option<T>> {
        self.expect_kind(namespace.node(), NodeKind::Namespace)?;
        Ok(self
            .find_named(
                namespace.node(),
                T::KIND.namespace_edge(),
                T::KIND.node_kind(),
                name,
            )
            .map(T::from_node))
    }

    /// Classes of a namespace in creation order.
    pub fn classes(self, namespace: NamespaceId) -> SchemaResult<Vec<ClassId>> {
        self.things(namespace)
    }

    /// Properties of a namespace in creation order.
    pub fn properties(self, namespace: NamespaceId) -> SchemaResult<Vec<PropertyId>> {
        self.things(namespace)
    }

    /// Relationship types of a namespace in creation order.
    pub fn relationship_types(self, namespace: NamespaceId) -> SchemaResult<Vec<RelTypeId>> {
        self.things(namespace)
    }

    fn things<T: Thing>(self, namespace: NamespaceId) -> SchemaResult<Vec<T>> {
        self.expect_kind(namespace.node(), NodeKind::Namespace)?;
        Ok(self
            .neighbors(namespace.node(), T::KIND.namespace_edge(), Direction::Outgoing)
            .into_iter()
            .map(T::from_node)
            .collect())
    }

    /// The namespace a thing was created in.
    pub fn namespace_of<T: Thing>(self, thing: T) -> SchemaResult<NamespaceId> {
        self.check(thing)?;
        self.single(thing.node(), T::KIND.namespace_edge(), Direction::Incoming)
            .map(NamespaceId::from_node)
            .ok_or_else(|| {
                SchemaError::illegal_state(format!("{} is not in any namespace", thing.node()))
            })
    }

    /// Cached lookup, falling back to scanning the scope's edges.
    fn find_named(self, scope: NodeId, edge: MetaEdge, kind: NodeKind, name: &str) -> Option<NodeId> {
        let key = NameKey::new(scope, kind, name);
        if let Some(node) = self.model.cache.get(&key) {
            if self.kind_of(node) == Some(kind)
                && self.name_of(node) == Some(name)
                && self.has_link(scope, edge, node)
            {
                return Some(node);
            }
        }

        let found = self
            .neighbors(scope, edge, Direction::Outgoing)
            .into_iter()
            .find(|node| self.name_of(*node) == Some(name));
        if let Some(node) = found {
            if self.is_committed() {
                self.model.cache.insert(key, node);
            }
        }
        found
    }
}

impl MetaTx<'_> {
    /// Find a named namespace, creating it if `allow_create`.
    pub fn namespace(&mut self, name: &str, allow_create: bool) -> SchemaResult<Option<NamespaceId>> {
        if let Some(existing) = self.schema().namespace(name) {
            return Ok(Some(existing));
        }
        if !allow_create {
            return Ok(None);
        }
        self.create_namespace(name).map(Some)
    }

    /// Create a named namespace.
    pub fn create_namespace(&mut self, name: &str) -> SchemaResult<NamespaceId> {
        validate_name("namespace", name)?;
        if self.schema().namespace(name).is_some() {
            return Err(SchemaError::duplicate_name("namespace", name));
        }

        let root = self.model.root();
        let node = self.create(NodeKind::Namespace, Some(name));
        self.link(root, MetaEdge::ModelNamespace, node)?;
        self.cache_ops
            .push(CacheOp::Insert(NameKey::new(root, NodeKind::Namespace, name), node));
        debug!(namespace = name, "namespace created");
        Ok(NamespaceId::from_node(node))
    }

    /// Create a class; fails if the name is taken in `namespace`.
    pub fn create_class(&mut self, namespace: NamespaceId, name: &str) -> SchemaResult<ClassId> {
        self.create_thing(namespace, name)
    }

    /// Find or create a class.
    pub fn class(&mut self, namespace: NamespaceId, name: &str) -> SchemaResult<ClassId> {
        self.thing(namespace, name)
    }

    /// Create a property; fails if the name is taken in `namespace`.
    pub fn create_property(&mut self, namespace: NamespaceId, name: &str) -> SchemaResult<PropertyId> {
        self.create_thing(namespace, name)
    }

    /// Find or create a property.
    pub fn property(&mut self, namespace: NamespaceId, name: &str) -> SchemaResult<PropertyId> {
        self.thing(namespace, name)
    }

    /// Create a relationship type; fails if the name is taken in `namespace`.
    pub fn create_relationship_type(
        &mut self,
        namespace: NamespaceId,
        name: &str,
    ) -> SchemaResult<RelTypeId> {
        self.create_thing(namespace, name)
    }

    /// Find or create a relationship type.
    pub fn relationship_type(&mut self, namespace: NamespaceId, name: &str) -> SchemaResult<RelTypeId> {
        self.thing(namespace, name)
    }

    /// Find or create a thing of kind `T`.
    pub fn thing<T: Thing>(&mut self, namespace: NamespaceId, name: &str) -> SchemaResult<T> {
        match self.schema().find_thing(namespace, name)? {
            Some(existing) => Ok(existing),
            None => self.create_thing(namespace, name),
        }
    }

    /// Create a thing of kind `T`.
    pub fn create_thing<T: Thing>(&mut self, namespace: NamespaceId, name: &str) -> SchemaResult<T> {
        let kind = T::KIND;
        validate_name(kind.as_str(), name)?;
        if self.schema().find_thing::<T>(namespace, name)?.is_some() {
            return Err(SchemaError::duplicate_name(kind.as_str(), name));
        }

        let node = self.create(kind.node_kind(), Some(name));
        self.link(namespace.node(), kind.namespace_edge(), node)?;
        self.cache_ops.push(CacheOp::Insert(
            NameKey::new(namespace.node(), kind.node_kind(), name),
            node,
        ));
        debug!(kind = kind.as_str(), name, %node, "thing created");
        Ok(T::from_node(node))
    }
}
