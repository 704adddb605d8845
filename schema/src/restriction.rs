//! Restrictions: per-container refinements of a constrainable.
//!
//! A restriction node points at its container and at its constrainable. At
//! most one exists per pair, and it is removed together with either end.

use crate::edges::MetaEdge;
use crate::error::{SchemaError, SchemaResult};
use crate::id::{
    ClassId, ConstrainableId, ContainerId, NodeKind, PropertyId, RelTypeId, RestrictionId,
};
use crate::model::{MetaTx, Schema};
use ontic_core::{Direction, NodeId};
use tracing::{debug, trace};

impl<'a> Schema<'a> {
    /// The restriction of `constrainable` within `container`, if any.
    pub fn restriction(
        self,
        container: impl Into<ContainerId>,
        constrainable: impl Into<ConstrainableId>,
    ) -> SchemaResult<Option<RestrictionId>> {
        let container = container.into();
        let constrainable = constrainable.into();
        self.check_container(container)?;
        self.check_constrainable(constrainable)?;

        Ok(self
            .neighbors(container.node(), MetaEdge::RestrictionContainer, Direction::Incoming)
            .into_iter()
            .find(|r| self.has_link(*r, MetaEdge::RestrictionConstrainable, constrainable.node()))
            .map(RestrictionId::from_node))
    }

    /// Restrictions owned directly by a container.
    pub fn direct_restrictions(
        self,
        container: impl Into<ContainerId>,
    ) -> SchemaResult<Vec<RestrictionId>> {
        let container = container.into();
        self.check_container(container)?;
        Ok(self
            .neighbors(container.node(), MetaEdge::RestrictionContainer, Direction::Incoming)
            .into_iter()
            .map(RestrictionId::from_node)
            .collect())
    }

    /// Restrictions of a container and all its supers, nearest first.
    pub fn all_restrictions(
        self,
        container: impl Into<ContainerId>,
    ) -> SchemaResult<Vec<RestrictionId>> {
        let container = container.into();
        self.check_container(container)?;

        let sub_edge = container.kind().sub_edge();
        let found = self.walk(
            container.node(),
            &[
                (MetaEdge::RestrictionContainer, Direction::Incoming),
                (sub_edge, Direction::Outgoing),
            ],
            |pos| pos.is_start() || self.arrived(pos, sub_edge, Direction::Outgoing),
            |pos| self.arrived(pos, MetaEdge::RestrictionContainer, Direction::Incoming),
        )?;
        trace!(container = %container.node(), found = found.len(), "restrictions collected");
        Ok(found.into_iter().map(RestrictionId::from_node).collect())
    }

    /// Restrictions referring to a constrainable, across all containers.
    pub fn restrictions_of(
        self,
        constrainable: impl Into<ConstrainableId>,
    ) -> SchemaResult<Vec<RestrictionId>> {
        let constrainable = constrainable.into();
        self.check_constrainable(constrainable)?;
        Ok(self
            .neighbors(
                constrainable.node(),
                MetaEdge::RestrictionConstrainable,
                Direction::Incoming,
            )
            .into_iter()
            .map(RestrictionId::from_node)
            .collect())
    }

    /// The container a restriction belongs to.
    pub fn restriction_container(self, restriction: RestrictionId) -> SchemaResult<ContainerId> {
        let node = self.restriction_end(restriction, MetaEdge::RestrictionContainer)?;
        self.container_at(node).ok_or_else(|| {
            SchemaError::illegal_state(format!("{} has no live container", restriction))
        })
    }

    /// The constrainable a restriction refines.
    pub fn restriction_constrainable(
        self,
        restriction: RestrictionId,
    ) -> SchemaResult<ConstrainableId> {
        let node = self.restriction_end(restriction, MetaEdge::RestrictionConstrainable)?;
        match self.kind_of(node) {
            Some(NodeKind::Property) => Ok(ConstrainableId::Property(PropertyId::from_node(node))),
            Some(NodeKind::RelationshipType) => {
                Ok(ConstrainableId::RelType(RelTypeId::from_node(node)))
            }
            _ => Err(SchemaError::illegal_state(format!(
                "{} has no live constrainable",
                restriction
            ))),
        }
    }

    fn restriction_end(self, restriction: RestrictionId, edge: MetaEdge) -> SchemaResult<NodeId> {
        self.expect_kind(restriction.node(), NodeKind::Restriction)?;
        self.single(restriction.node(), edge, Direction::Outgoing)
            .ok_or_else(|| SchemaError::illegal_state(format!("{} is orphaned", restriction)))
    }
}

impl MetaTx<'_> {
    /// The restriction of `constrainable` within `container`, created empty
    /// when missing and `allow_create` is set.
    ///
    /// With strict domains, creating one requires the constrainable to be
    /// in the container's domain.
    pub fn restriction(
        &mut self,
        container: impl Into<ContainerId>,
        constrainable: impl Into<ConstrainableId>,
        allow_create: bool,
    ) -> SchemaResult<Option<RestrictionId>> {
        let container = container.into();
        let constrainable = constrainable.into();
        let schema = self.schema();
        if let Some(existing) = schema.restriction(container, constrainable)? {
            return Ok(Some(existing));
        }
        if !allow_create {
            return Ok(None);
        }
        if self.model.config().strict_domain && !schema.in_domain(container, constrainable)? {
            return Err(SchemaError::invalid_argument(format!(
                "{} is not in the domain of {}",
                schema.display(constrainable.node()),
                schema.display(container.node())
            )));
        }

        let node = self.create(NodeKind::Restriction, None);
        self.link(node, MetaEdge::RestrictionContainer, container.node())?;
        self.link(node, MetaEdge::RestrictionConstrainable, constrainable.node())?;
        debug!(
            container = %container.node(),
            constrainable = %constrainable.node(),
            restriction = %node,
            "restriction created"
        );
        Ok(Some(RestrictionId::from_node(node)))
    }

    /// Shorthand for a class-level property restriction, created on demand.
    pub fn class_restriction(
        &mut self,
        class: ClassId,
        property: PropertyId,
    ) -> SchemaResult<RestrictionId> {
        self.restriction(class, property, true)?.ok_or_else(|| {
            SchemaError::illegal_state(format!("no restriction for {} on {}", property, class))
        })
    }
}
