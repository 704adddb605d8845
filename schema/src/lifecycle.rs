//! Deleting schema objects.
//!
//! What goes with a deleted node is decided per edge kind by
//! [`MetaEdge::association`]: owned children are deleted, shared children
//! are deleted once nothing else shares them, references are only unlinked.

use crate::cache::CacheOp;
use crate::edges::{Association, MetaEdge};
use crate::error::{SchemaError, SchemaResult};
use crate::id::{ClassId, NamespaceId, NodeKind, PropertyId, RelTypeId, RestrictionId, Thing};
use crate::model::MetaTx;
use ontic_core::{Direction, NodeId};
use std::collections::HashSet;
use tracing::{debug, trace};

impl MetaTx<'_> {
    /// Delete a class with its restrictions and exclusively declared
    /// properties and relationship types.
    pub fn delete_class(&mut self, class: ClassId) -> SchemaResult<usize> {
        self.delete_thing(class)
    }

    /// Delete a property with the restrictions referring to it.
    pub fn delete_property(&mut self, property: PropertyId) -> SchemaResult<usize> {
        self.delete_thing(property)
    }

    /// Delete a relationship type with its restrictions, the restrictions
    /// referring to it and its exclusively declared properties.
    pub fn delete_relationship_type(&mut self, rel_type: RelTypeId) -> SchemaResult<usize> {
        self.delete_thing(rel_type)
    }

    /// Delete a restriction.
    pub fn delete_restriction(&mut self, restriction: RestrictionId) -> SchemaResult<usize> {
        self.schema()
            .expect_kind(restriction.node(), NodeKind::Restriction)?;
        self.cascade_delete(restriction.node())
    }

    /// Delete a named namespace and everything in it.
    pub fn delete_namespace(&mut self, namespace: NamespaceId) -> SchemaResult<usize> {
        if namespace == self.model.global_namespace() {
            return Err(SchemaError::invalid_argument(
                "the global namespace cannot be deleted",
            ));
        }
        self.schema()
            .expect_kind(namespace.node(), NodeKind::Namespace)?;
        self.cascade_delete(namespace.node())
    }

    fn delete_thing<T: Thing>(&mut self, thing: T) -> SchemaResult<usize> {
        self.schema().check(thing)?;
        self.cascade_delete(thing.node())
    }

    /// Delete `root` and whatever it owns, returning the number of nodes
    /// deleted.
    pub(crate) fn cascade_delete(&mut self, root: NodeId) -> SchemaResult<usize> {
        let doomed = self.collect_doomed(root);
        for node in &doomed {
            self.tx.delete_node(*node)?;
            self.cache_ops.push(CacheOp::Evict(*node));
        }
        debug!(%root, deleted = doomed.len(), "cascade delete");
        Ok(doomed.len())
    }

    /// Nodes going away with `root`, root first.
    fn collect_doomed(&self, root: NodeId) -> Vec<NodeId> {
        let mut doomed = Vec::new();
        let mut seen = HashSet::new();
        let mut pending = vec![root];

        while let Some(node) = pending.pop() {
            if !seen.insert(node) {
                continue;
            }
            doomed.push(node);

            for edge in self.tx.edges(node, None, Direction::Both) {
                let Some(kind) = self.model.edges().kind(edge.type_id) else {
                    continue;
                };
                if edge.direction_from(node) != Some(kind.owner_side()) {
                    continue;
                }
                let Some(child) = edge.other(node) else {
                    continue;
                };
                match kind.association() {
                    Association::Owns => pending.push(child),
                    Association::Shares => {
                        if !self.shared_elsewhere(child, &seen) {
                            pending.push(child);
                        }
                    }
                    Association::References => {}
                }
            }
        }
        trace!(%root, doomed = doomed.len(), "cascade collected");
        doomed
    }

    /// Returns true if a node outside `leaving` still shares `child`.
    fn shared_elsewhere(&self, child: NodeId, leaving: &HashSet<NodeId>) -> bool {
        MetaEdge::ALL
            .into_iter()
            .filter(|edge| edge.association() == Association::Shares)
            .any(|edge| {
                self.tx
                    .neighbors(child, Some(self.edge(edge)), edge.owner_side().reverse())
                    .any(|owner| !leaving.contains(&owner))
            })
    }
}
