//! Effective constraint resolution through inheritance.
//!
//! A lookup asks a [`Finder`] for a value on the most specific restrictable
//! that has one: the restriction in each context container, then those of
//! its supers depth-first, then the bare constrainable and its supers.
//! Among several direct supers the one declared first wins.

use crate::error::{SchemaError, SchemaResult};
use crate::id::{ConstrainableId, ContainerId, RestrictableId};
use crate::model::Schema;
use crate::range::Range;
use crate::restrictable::CollectionBehaviour;
use ontic_core::{Direction, NodeId};
use std::collections::HashSet;
use tracing::trace;

/// Reads one attribute off a restrictable.
pub trait Finder<T> {
    /// The attribute as set directly on `restrictable`, if set.
    fn find(&self, schema: Schema<'_>, restrictable: RestrictableId) -> SchemaResult<Option<T>>;
}

impl<T, F> Finder<T> for F
where
    F: Fn(Schema<'_>, RestrictableId) -> SchemaResult<Option<T>>,
{
    fn find(&self, schema: Schema<'_>, restrictable: RestrictableId) -> SchemaResult<Option<T>> {
        self(schema, restrictable)
    }
}

/// Pin a closure to the finder signature.
pub fn finder<T, F>(f: F) -> F
where
    F: Fn(Schema<'_>, RestrictableId) -> SchemaResult<Option<T>>,
{
    f
}

/// Finds the minimum cardinality.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinCardinality;

impl Finder<u32> for MinCardinality {
    fn find(&self, schema: Schema<'_>, restrictable: RestrictableId) -> SchemaResult<Option<u32>> {
        schema.min_cardinality(restrictable)
    }
}

/// Finds the maximum cardinality.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxCardinality;

impl Finder<u32> for MaxCardinality {
    fn find(&self, schema: Schema<'_>, restrictable: RestrictableId) -> SchemaResult<Option<u32>> {
        schema.max_cardinality(restrictable)
    }
}

/// Finds the range.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeFinder;

impl Finder<Range> for RangeFinder {
    fn find(&self, schema: Schema<'_>, restrictable: RestrictableId) -> SchemaResult<Option<Range>> {
        schema.range(restrictable)
    }
}

/// Finds the collection behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionBehaviourFinder;

impl Finder<CollectionBehaviour> for CollectionBehaviourFinder {
    fn find(
        &self,
        schema: Schema<'_>,
        restrictable: RestrictableId,
    ) -> SchemaResult<Option<CollectionBehaviour>> {
        schema.collection_behaviour(restrictable)
    }
}

impl<'a> Schema<'a> {
    /// Resolve an attribute of `constrainable` as seen from `contexts`.
    ///
    /// Contexts are tried in the given order; the bare declaration is the
    /// fallback.
    pub fn lookup<T, F, C>(
        self,
        constrainable: impl Into<ConstrainableId>,
        finder: &F,
        contexts: &[C],
    ) -> SchemaResult<Option<T>>
    where
        F: Finder<T> + ?Sized,
        C: Copy + Into<ContainerId>,
    {
        let constrainable = constrainable.into();
        self.check_constrainable(constrainable)?;

        for context in contexts {
            let container: ContainerId = (*context).into();
            self.check_container(container)?;
            let mut visited = HashSet::new();
            if let Some(found) =
                self.probe_container(container, constrainable, finder, &mut visited, 0, container.node())?
            {
                trace!(context = %container.node(), constrainable = %constrainable.node(), "lookup hit");
                return Ok(Some(found));
            }
        }

        let mut visited = HashSet::new();
        let found =
            self.probe_constrainable(constrainable, finder, &mut visited, 0, constrainable.node())?;
        trace!(
            constrainable = %constrainable.node(),
            hit = found.is_some(),
            "lookup fell back to declaration"
        );
        Ok(found)
    }

    fn probe_container<T, F>(
        self,
        container: ContainerId,
        constrainable: ConstrainableId,
        finder: &F,
        visited: &mut HashSet<NodeId>,
        depth: usize,
        start: NodeId,
    ) -> SchemaResult<Option<T>>
    where
        F: Finder<T> + ?Sized,
    {
        if !visited.insert(container.node()) {
            return Ok(None);
        }
        let limit = self.model.config().walk_depth_limit;
        if depth > limit {
            return Err(SchemaError::depth_exceeded(start, container.node(), limit));
        }
        if let Some(restriction) = self.restriction(container, constrainable)? {
            if let Some(found) = finder.find(self, restriction.into())? {
                return Ok(Some(found));
            }
        }
        for sup in self.neighbors(container.node(), container.kind().sub_edge(), Direction::Outgoing) {
            let sup = container.with_node(sup);
            if let Some(found) = self.probe_container(sup, constrainable, finder, visited, depth + 1, start)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    fn probe_constrainable<T, F>(
        self,
        constrainable: ConstrainableId,
        finder: &F,
        visited: &mut HashSet<NodeId>,
        depth: usize,
        start: NodeId,
    ) -> SchemaResult<Option<T>>
    where
        F: Finder<T> + ?Sized,
    {
        if !visited.insert(constrainable.node()) {
            return Ok(None);
        }
        let limit = self.model.config().walk_depth_limit;
        if depth > limit {
            return Err(SchemaError::depth_exceeded(start, constrainable.node(), limit));
        }
        if let Some(found) = finder.find(self, constrainable.into())? {
            return Ok(Some(found));
        }
        for sup in self.neighbors(
            constrainable.node(),
            constrainable.kind().sub_edge(),
            Direction::Outgoing,
        ) {
            let sup = constrainable.with_node(sup);
            if let Some(found) = self.probe_constrainable(sup, finder, visited, depth + 1, start)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}
