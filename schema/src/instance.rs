//! Class membership of entities.
//!
//! Membership changes run in their own transaction while holding the
//! class's node lock, so the stored instance count always matches the
//! number of instance edges.

use crate::edges::MetaEdge;
use crate::error::{SchemaError, SchemaResult};
use crate::id::{ClassId, NodeKind};
use crate::model::{keys, MetaModel, Schema};
use ontic_core::{Direction, NodeId, Value};
use tracing::debug;

impl MetaModel {
    /// Make `entity` a direct instance of `class`. Returns false if it
    /// already was one.
    ///
    /// Must not be called while the calling thread holds a [`MetaTx`](crate::MetaTx).
    pub fn add_instance(&self, class: ClassId, entity: NodeId) -> SchemaResult<bool> {
        let _lock = self.graph().lock(class.node());
        let mut tx = self.begin();
        let schema = tx.schema();
        let count = schema.instance_count(class)?;
        schema.expect_kind(entity, NodeKind::Entity)?;
        if schema.has_link(entity, MetaEdge::InstanceOf, class.node()) {
            return Ok(false);
        }

        tx.link(entity, MetaEdge::InstanceOf, class.node())?;
        tx.put(class.node(), keys::INSTANCE_COUNT, Some(Value::Int(count as i64 + 1)))?;
        tx.commit();
        debug!(%class, %entity, count = count + 1, "instance added");
        Ok(true)
    }

    /// Remove `entity` from the direct instances of `class`.
    pub fn remove_instance(&self, class: ClassId, entity: NodeId) -> SchemaResult<()> {
        let _lock = self.graph().lock(class.node());
        let mut tx = self.begin();
        let schema = tx.schema();
        let count = schema.instance_count(class)?;
        if !schema.has_link(entity, MetaEdge::InstanceOf, class.node()) {
            return Err(SchemaError::not_found(format!(
                "{} is not an instance of {}",
                entity, class
            )));
        }

        tx.unlink(entity, MetaEdge::InstanceOf, class.node())?;
        let remaining = count.saturating_sub(1);
        tx.put(class.node(), keys::INSTANCE_COUNT, Some(Value::Int(remaining as i64)))?;
        tx.commit();
        debug!(%class, %entity, count = remaining, "instance removed");
        Ok(())
    }
}

impl<'a> Schema<'a> {
    /// Number of direct instances of a class.
    pub fn instance_count(self, class: ClassId) -> SchemaResult<u64> {
        self.check(class)?;
        let count = self
            .store
            .get_int(class.node(), keys::INSTANCE_COUNT)?
            .unwrap_or(0);
        u64::try_from(count)
            .map_err(|_| SchemaError::illegal_state(format!("{} has negative instance count", class)))
    }

    /// Returns true if `entity` is an instance of `class` or of one of its
    /// subclasses.
    pub fn is_instance_of(self, entity: NodeId, class: ClassId) -> SchemaResult<bool> {
        self.check(class)?;
        for direct in self.neighbors(entity, MetaEdge::InstanceOf, Direction::Outgoing) {
            let direct = ClassId::from_node(direct);
            if direct == class || self.is_subtype_of(direct, class)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Direct instances of a class in insertion order.
    pub fn direct_instances(self, class: ClassId) -> SchemaResult<Vec<NodeId>> {
        self.check(class)?;
        Ok(self.neighbors(class.node(), MetaEdge::InstanceOf, Direction::Incoming))
    }

    /// Instances of a class and of all its subclasses.
    pub fn all_instances(self, class: ClassId) -> SchemaResult<Vec<NodeId>> {
        self.check(class)?;
        self.walk(
            class.node(),
            &[
                (MetaEdge::InstanceOf, Direction::Incoming),
                (MetaEdge::SubclassOf, Direction::Incoming),
            ],
            |pos| pos.is_start() || self.arrived(pos, MetaEdge::SubclassOf, Direction::Incoming),
            |pos| self.arrived(pos, MetaEdge::InstanceOf, Direction::Incoming),
        )
    }

    /// Classes an entity is a direct instance of.
    pub fn classes_of(self, entity: NodeId) -> Vec<ClassId> {
        self.neighbors(entity, MetaEdge::InstanceOf, Direction::Outgoing)
            .into_iter()
            .map(ClassId::from_node)
            .collect()
    }
}
