//! Constrainables declared on containers.
//!
//! Containers declare the properties their instances require. Classes also
//! declare the relationship types they may take part in, per direction.
//! Declarations are inherited down the container hierarchy.

use crate::edges::MetaEdge;
use crate::error::{SchemaError, SchemaResult};
use crate::id::{ClassId, ConstrainableId, ContainerId, NamespaceId, NodeKind, PropertyId, RelTypeId};
use crate::model::{MetaTx, Schema};
use crate::validator::ConstrainableKey;
use ontic_core::{Direction, NodeId};
use tracing::debug;

/// Declaring edges selected by a direction filter.
fn declare_edges(direction: Direction) -> &'static [MetaEdge] {
    match direction {
        Direction::Outgoing => &[MetaEdge::DeclaresOutgoing],
        Direction::Incoming => &[MetaEdge::DeclaresIncoming],
        Direction::Both => &[MetaEdge::DeclaresOutgoing, MetaEdge::DeclaresIncoming],
    }
}

fn single_direction(direction: Direction) -> SchemaResult<MetaEdge> {
    MetaEdge::declares(direction).ok_or_else(|| {
        SchemaError::invalid_argument("relationship declarations need a single direction")
    })
}

impl<'a> Schema<'a> {
    /// Properties declared directly on a container.
    pub fn direct_properties(self, container: impl Into<ContainerId>) -> SchemaResult<Vec<PropertyId>> {
        let container = container.into();
        self.check_container(container)?;
        Ok(self
            .neighbors(container.node(), MetaEdge::HasProperty, Direction::Outgoing)
            .into_iter()
            .map(PropertyId::from_node)
            .collect())
    }

    /// Properties declared on a container or any of its supers.
    pub fn all_properties(self, container: impl Into<ContainerId>) -> SchemaResult<Vec<PropertyId>> {
        let container = container.into();
        self.check_container(container)?;
        Ok(self
            .inherited(container, &[MetaEdge::HasProperty])?
            .into_iter()
            .map(PropertyId::from_node)
            .collect())
    }

    /// Relationship types declared directly on a class.
    pub fn direct_relationships(
        self,
        class: ClassId,
        direction: Direction,
    ) -> SchemaResult<Vec<RelTypeId>> {
        self.check(class)?;
        let mut result: Vec<RelTypeId> = Vec::new();
        for edge in declare_edges(direction) {
            for node in self.neighbors(class.node(), *edge, Direction::Outgoing) {
                let rel_type = RelTypeId::from_node(node);
                if !result.contains(&rel_type) {
                    result.push(rel_type);
                }
            }
        }
        Ok(result)
    }

    /// Relationship types declared on a class or any of its supers.
    pub fn all_relationships(
        self,
        class: ClassId,
        direction: Direction,
    ) -> SchemaResult<Vec<RelTypeId>> {
        self.check(class)?;
        Ok(self
            .inherited(ContainerId::Class(class), declare_edges(direction))?
            .into_iter()
            .map(RelTypeId::from_node)
            .collect())
    }

    /// Classes declaring a relationship type.
    pub fn associated_classes(
        self,
        rel_type: RelTypeId,
        direction: Direction,
    ) -> SchemaResult<Vec<ClassId>> {
        self.check(rel_type)?;
        let mut result: Vec<ClassId> = Vec::new();
        for edge in declare_edges(direction) {
            for node in self.neighbors(rel_type.node(), *edge, Direction::Incoming) {
                let class = ClassId::from_node(node);
                if !result.contains(&class) {
                    result.push(class);
                }
            }
        }
        Ok(result)
    }

    /// Containers declaring a property.
    pub fn associated_containers(self, property: PropertyId) -> SchemaResult<Vec<ContainerId>> {
        self.check(property)?;
        Ok(self
            .neighbors(property.node(), MetaEdge::HasProperty, Direction::Incoming)
            .into_iter()
            .filter_map(|node| self.container_at(node))
            .collect())
    }

    /// Keys declared directly on a container.
    pub fn declared_keys(self, container: impl Into<ContainerId>) -> SchemaResult<Vec<ConstrainableKey>> {
        let container = container.into();
        self.check_container(container)?;

        let mut keys: Vec<ConstrainableKey> = self
            .neighbors(container.node(), MetaEdge::HasProperty, Direction::Outgoing)
            .into_iter()
            .filter_map(|node| self.name_of(node))
            .map(ConstrainableKey::property)
            .collect();
        if container.as_class().is_some() {
            for direction in [Direction::Outgoing, Direction::Incoming] {
                for edge in declare_edges(direction) {
                    keys.extend(
                        self.neighbors(container.node(), *edge, Direction::Outgoing)
                            .into_iter()
                            .filter_map(|node| self.name_of(node))
                            .map(|name| ConstrainableKey::relationship(name, direction)),
                    );
                }
            }
        }
        Ok(keys)
    }

    /// The property named `name` that a container requires, found on the
    /// container itself or the nearest super declaring it.
    pub fn required_property(
        self,
        container: impl Into<ContainerId>,
        name: &str,
    ) -> SchemaResult<Option<PropertyId>> {
        let container = container.into();
        self.check_container(container)?;
        Ok(self
            .container_chain(container)?
            .into_iter()
            .find_map(|declarer| self.named_neighbor(declarer.node(), MetaEdge::HasProperty, name))
            .map(PropertyId::from_node))
    }

    /// The relationship type named `name` a class may take part in, in
    /// `direction`.
    pub fn required_relationship(
        self,
        class: ClassId,
        name: &str,
        direction: Direction,
    ) -> SchemaResult<Option<RelTypeId>> {
        self.check(class)?;
        Ok(self
            .container_chain(ContainerId::Class(class))?
            .into_iter()
            .find_map(|declarer| {
                declare_edges(direction)
                    .iter()
                    .find_map(|edge| self.named_neighbor(declarer.node(), *edge, name))
            })
            .map(RelTypeId::from_node))
    }

    /// Returns true if `constrainable` is declared on `container` or one of
    /// its supers, directly or as a sub of such a declaration.
    pub fn in_domain(
        self,
        container: impl Into<ContainerId>,
        constrainable: impl Into<ConstrainableId>,
    ) -> SchemaResult<bool> {
        let container = container.into();
        let constrainable = constrainable.into();
        self.check_container(container)?;
        self.check_constrainable(constrainable)?;

        let declared: Vec<NodeId> = match constrainable {
            ConstrainableId::Property(_) => self.inherited(container, &[MetaEdge::HasProperty])?,
            ConstrainableId::RelType(_) => match container.as_class() {
                Some(_) => self.inherited(container, declare_edges(Direction::Both))?,
                None => return Ok(false),
            },
        };
        if declared.contains(&constrainable.node()) {
            return Ok(true);
        }
        Ok(self
            .closure(
                constrainable.node(),
                constrainable.kind().sub_edge(),
                Direction::Outgoing,
            )?
            .iter()
            .any(|sup| declared.contains(sup)))
    }

    /// The namespace a container lives in.
    pub(crate) fn container_namespace(self, container: ContainerId) -> SchemaResult<NamespaceId> {
        match container {
            ContainerId::Class(class) => self.namespace_of(class),
            ContainerId::RelType(rel_type) => self.namespace_of(rel_type),
        }
    }

    pub(crate) fn container_at(self, node: NodeId) -> Option<ContainerId> {
        match self.kind_of(node)? {
            NodeKind::Class => Some(ContainerId::Class(ClassId::from_node(node))),
            NodeKind::RelationshipType => Some(ContainerId::RelType(RelTypeId::from_node(node))),
            _ => None,
        }
    }

    /// Returns true if `container` itself declares `key`.
    pub(crate) fn declares_key(self, container: ContainerId, key: &ConstrainableKey) -> bool {
        match key {
            ConstrainableKey::Property(name) => self
                .named_neighbor(container.node(), MetaEdge::HasProperty, name)
                .is_some(),
            ConstrainableKey::Relationship(name, direction) => declare_edges(*direction)
                .iter()
                .any(|edge| self.named_neighbor(container.node(), *edge, name).is_some()),
        }
    }

    fn named_neighbor(self, node: NodeId, edge: MetaEdge, name: &str) -> Option<NodeId> {
        self.neighbors(node, edge, Direction::Outgoing)
            .into_iter()
            .find(|n| self.name_of(*n) == Some(name))
    }

    /// Targets of `edges` from the container and all its supers, nearest
    /// container first.
    fn inherited(self, container: ContainerId, edges: &[MetaEdge]) -> SchemaResult<Vec<NodeId>> {
        let sub_edge = container.kind().sub_edge();
        let mut steps: Vec<(MetaEdge, Direction)> =
            edges.iter().map(|edge| (*edge, Direction::Outgoing)).collect();
        steps.push((sub_edge, Direction::Outgoing));

        self.walk(
            container.node(),
            &steps,
            |pos| pos.is_start() || self.arrived(pos, sub_edge, Direction::Outgoing),
            |pos| edges.iter().any(|edge| self.arrived(pos, *edge, Direction::Outgoing)),
        )
    }
}

impl MetaTx<'_> {
    /// Find or create a property named `name` in the container's namespace
    /// and declare it on the container.
    pub fn add_required_property(
        &mut self,
        container: impl Into<ContainerId>,
        name: &str,
    ) -> SchemaResult<PropertyId> {
        let container = container.into();
        let schema = self.schema();
        schema.can_add_constrainable(container, &ConstrainableKey::property(name))?;
        let namespace = schema.container_namespace(container)?;

        let property = self.property(namespace, name)?;
        self.link(container.node(), MetaEdge::HasProperty, property.node())?;
        debug!(container = %container.node(), property = name, "property declared");
        Ok(property)
    }

    /// Declare an existing property on a container. Declaring it twice does
    /// nothing.
    pub fn declare_property(
        &mut self,
        container: impl Into<ContainerId>,
        property: PropertyId,
    ) -> SchemaResult<()> {
        let container = container.into();
        let schema = self.schema();
        schema.check_container(container)?;
        if schema.has_link(container.node(), MetaEdge::HasProperty, property.node()) {
            return Ok(());
        }
        let name = schema.name(property)?;
        schema.can_add_constrainable(container, &ConstrainableKey::property(name))?;

        self.link(container.node(), MetaEdge::HasProperty, property.node())?;
        debug!(container = %container.node(), %property, "property declared");
        Ok(())
    }

    /// Find or create a relationship type named `name` in the class's
    /// namespace and allow it on the class in `direction`.
    pub fn add_allowed_relationship(
        &mut self,
        class: ClassId,
        name: &str,
        direction: Direction,
    ) -> SchemaResult<RelTypeId> {
        let edge = single_direction(direction)?;
        let schema = self.schema();
        schema.can_add_constrainable(class, &ConstrainableKey::relationship(name, direction))?;
        let namespace = schema.namespace_of(class)?;

        let rel_type = self.relationship_type(namespace, name)?;
        self.link(class.node(), edge, rel_type.node())?;
        debug!(%class, relationship = name, %direction, "relationship declared");
        Ok(rel_type)
    }

    /// Allow an existing relationship type on a class. Declaring it twice
    /// does nothing.
    pub fn declare_relationship(
        &mut self,
        class: ClassId,
        rel_type: RelTypeId,
        direction: Direction,
    ) -> SchemaResult<()> {
        let edge = single_direction(direction)?;
        let schema = self.schema();
        schema.check(class)?;
        if schema.has_link(class.node(), edge, rel_type.node()) {
            return Ok(());
        }
        let name = schema.name(rel_type)?;
        schema.can_add_constrainable(class, &ConstrainableKey::relationship(name, direction))?;

        self.link(class.node(), edge, rel_type.node())?;
        debug!(%class, %rel_type, %direction, "relationship declared");
        Ok(())
    }

    /// Remove a property declaration, returning whether it existed. The
    /// property itself stays.
    pub fn undeclare_property(
        &mut self,
        container: impl Into<ContainerId>,
        property: PropertyId,
    ) -> SchemaResult<bool> {
        let container = container.into();
        self.schema().check_container(container)?;
        let removed = self.unlink(container.node(), MetaEdge::HasProperty, property.node())?;
        if removed {
            debug!(container = %container.node(), %property, "property undeclared");
        }
        Ok(removed)
    }

    /// Remove relationship declarations in `direction`, returning whether
    /// any existed.
    pub fn undeclare_relationship(
        &mut self,
        class: ClassId,
        rel_type: RelTypeId,
        direction: Direction,
    ) -> SchemaResult<bool> {
        self.schema().check(class)?;
        let mut removed = false;
        for edge in declare_edges(direction) {
            removed |= self.unlink(class.node(), *edge, rel_type.node())?;
        }
        if removed {
            debug!(%class, %rel_type, %direction, "relationship undeclared");
        }
        Ok(removed)
    }
}
