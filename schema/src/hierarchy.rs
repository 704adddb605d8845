//! Super/sub hierarchies of classes, properties and relationship types.
//!
//! Each kind forms its own DAG over its sub edge (sub -> super). Edits go
//! through the validator before anything is written.

use crate::edges::MetaEdge;
use crate::error::SchemaResult;
use crate::id::{ContainerId, Thing};
use crate::model::{MetaTx, Schema};
use ontic_core::{Direction, NodeId};
use std::cell::Cell;
use tracing::{debug, trace, warn};

impl<'a> Schema<'a> {
    /// Direct super-things in declaration order.
    pub fn direct_supers<T: Thing>(self, thing: T) -> SchemaResult<Vec<T>> {
        self.check(thing)?;
        Ok(self
            .neighbors(thing.node(), T::KIND.sub_edge(), Direction::Outgoing)
            .into_iter()
            .map(T::from_node)
            .collect())
    }

    /// Direct sub-things in declaration order.
    pub fn direct_subs<T: Thing>(self, thing: T) -> SchemaResult<Vec<T>> {
        self.check(thing)?;
        Ok(self
            .neighbors(thing.node(), T::KIND.sub_edge(), Direction::Incoming)
            .into_iter()
            .map(T::from_node)
            .collect())
    }

    /// Transitive super-things, nearest first.
    pub fn all_supers<T: Thing>(self, thing: T) -> SchemaResult<Vec<T>> {
        self.check(thing)?;
        Ok(self
            .closure(thing.node(), T::KIND.sub_edge(), Direction::Outgoing)?
            .into_iter()
            .map(T::from_node)
            .collect())
    }

    /// Transitive sub-things, nearest first.
    pub fn all_subs<T: Thing>(self, thing: T) -> SchemaResult<Vec<T>> {
        self.check(thing)?;
        Ok(self
            .closure(thing.node(), T::KIND.sub_edge(), Direction::Incoming)?
            .into_iter()
            .map(T::from_node)
            .collect())
    }

    /// Returns true if `sup` is a transitive super of `sub`. A thing is not
    /// a subtype of itself.
    pub fn is_subtype_of<T: Thing>(self, sub: T, sup: T) -> SchemaResult<bool> {
        self.check(sub)?;
        self.check(sup)?;
        if sub == sup {
            return Ok(false);
        }

        let target = sup.node();
        let found = Cell::new(false);
        self.walk(
            sub.node(),
            &[(T::KIND.sub_edge(), Direction::Outgoing)],
            |_| !found.get(),
            |pos| {
                if pos.node == target {
                    found.set(true);
                }
                false
            },
        )?;
        Ok(found.get())
    }

    /// The container followed by all its supers.
    pub(crate) fn container_chain(self, container: ContainerId) -> SchemaResult<Vec<ContainerId>> {
        let supers =
            self.closure(container.node(), container.kind().sub_edge(), Direction::Outgoing)?;
        Ok(std::iter::once(container)
            .chain(supers.into_iter().map(|node| container.with_node(node)))
            .collect())
    }

    /// All transitive subs of a container.
    pub(crate) fn container_subs(self, container: ContainerId) -> SchemaResult<Vec<ContainerId>> {
        Ok(self
            .closure(container.node(), container.kind().sub_edge(), Direction::Incoming)?
            .into_iter()
            .map(|node| container.with_node(node))
            .collect())
    }

    pub(crate) fn closure(
        self,
        start: NodeId,
        edge: MetaEdge,
        direction: Direction,
    ) -> SchemaResult<Vec<NodeId>> {
        let reached = self.walk(start, &[(edge, direction)], |_| true, |pos| !pos.is_start())?;
        trace!(%start, edge = edge.name(), ?direction, reached = reached.len(), "hierarchy walk");
        Ok(reached)
    }
}

impl MetaTx<'_> {
    /// Make `sup` a direct super of `sub`.
    ///
    /// Fails with a constraint conflict if the edge would close a cycle or
    /// make inherited declarations clash. Adding an existing edge does
    /// nothing.
    pub fn add_super<T: Thing>(&mut self, sub: T, sup: T) -> SchemaResult<()> {
        let schema = self.schema();
        schema.check(sub)?;
        schema.check(sup)?;
        let edge = T::KIND.sub_edge();
        if schema.has_link(sub.node(), edge, sup.node()) {
            return Ok(());
        }

        if let Err(e) = schema.can_add_super_edge(sub, sup) {
            if let Some(conflict) = e.conflict() {
                warn!(
                    sub = %schema.display(sub.node()),
                    sup = %schema.display(sup.node()),
                    %conflict,
                    "super edge rejected"
                );
            }
            return Err(e);
        }

        self.link(sub.node(), edge, sup.node())?;
        debug!(kind = T::KIND.as_str(), sub = %sub.node(), sup = %sup.node(), "super added");
        Ok(())
    }

    /// Make `sub` a direct sub of `sup`.
    pub fn add_sub<T: Thing>(&mut self, sup: T, sub: T) -> SchemaResult<()> {
        self.add_super(sub, sup)
    }

    /// Remove the direct edge `sub -> sup`, returning whether it existed.
    pub fn remove_super<T: Thing>(&mut self, sub: T, sup: T) -> SchemaResult<bool> {
        let schema = self.schema();
        schema.check(sub)?;
        schema.check(sup)?;

        let removed = self.unlink(sub.node(), T::KIND.sub_edge(), sup.node())?;
        if removed {
            debug!(kind = T::KIND.as_str(), sub = %sub.node(), sup = %sup.node(), "super removed");
        }
        Ok(removed)
    }
}
