//! Names, free-form annotations, inverses and entities.

use crate::edges::MetaEdge;
use crate::error::{SchemaError, SchemaResult};
use crate::id::{NodeKind, PropertyId, Thing, ThingId};
use crate::model::{keys, MetaTx, Schema};
use ontic_core::{Direction, NodeId, Value};
use tracing::debug;

const LABEL: &str = "label";
const COMMENT: &str = "comment";

fn additional_key(key: &str) -> SchemaResult<String> {
    if key.is_empty() {
        return Err(SchemaError::invalid_argument(
            "additional property key must not be empty",
        ));
    }
    Ok(format!("{}{}", keys::ADDITIONAL_PREFIX, key))
}

impl<'a> Schema<'a> {
    /// Name of a class, property or relationship type.
    pub fn name<T: Thing>(self, thing: T) -> SchemaResult<&'a str> {
        self.check(thing)?;
        self.name_of(thing.node())
            .ok_or_else(|| SchemaError::illegal_state(format!("{:?} has no name", thing)))
    }

    /// An additional property of a thing.
    pub fn additional_property(
        self,
        thing: impl Into<ThingId>,
        key: &str,
    ) -> SchemaResult<Option<&'a Value>> {
        let thing = self.check_thing(thing.into())?;
        Ok(self.store.get_property(thing.node(), &additional_key(key)?)?)
    }

    /// Every additional property of a thing, sorted by key.
    pub fn additional_properties(
        self,
        thing: impl Into<ThingId>,
    ) -> SchemaResult<Vec<(&'a str, &'a Value)>> {
        let thing = self.check_thing(thing.into())?;
        let Some(node) = self.store.node(thing.node()) else {
            return Ok(Vec::new());
        };
        let mut found: Vec<(&'a str, &'a Value)> = node
            .properties
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(keys::ADDITIONAL_PREFIX)
                    .map(|key| (key, value))
            })
            .collect();
        found.sort_by(|a, b| a.0.cmp(b.0));
        Ok(found)
    }

    /// The `label` annotation.
    pub fn label(self, thing: impl Into<ThingId>) -> SchemaResult<Option<&'a str>> {
        Ok(self
            .additional_property(thing, LABEL)?
            .and_then(Value::as_str))
    }

    /// The `comment` annotation.
    pub fn comment(self, thing: impl Into<ThingId>) -> SchemaResult<Option<&'a str>> {
        Ok(self
            .additional_property(thing, COMMENT)?
            .and_then(Value::as_str))
    }

    /// The inverse of a property, if one is set.
    pub fn inverse_of(self, property: PropertyId) -> SchemaResult<Option<PropertyId>> {
        self.check(property)?;
        Ok(self
            .single(property.node(), MetaEdge::InverseOf, Direction::Both)
            .map(PropertyId::from_node))
    }

    fn check_thing(self, thing: ThingId) -> SchemaResult<ThingId> {
        self.expect_kind(thing.node(), thing.kind().node_kind())?;
        Ok(thing)
    }
}

impl MetaTx<'_> {
    /// Set an additional property on a thing.
    pub fn set_additional_property(
        &mut self,
        thing: impl Into<ThingId>,
        key: &str,
        value: impl Into<Value>,
    ) -> SchemaResult<()> {
        let thing = self.schema().check_thing(thing.into())?;
        let key = additional_key(key)?;
        self.put(thing.node(), &key, Some(value.into()))?;
        debug!(node = %thing.node(), %key, "additional property set");
        Ok(())
    }

    /// Remove an additional property, returning whether it was set.
    pub fn remove_additional_property(
        &mut self,
        thing: impl Into<ThingId>,
        key: &str,
    ) -> SchemaResult<bool> {
        let thing = self.schema().check_thing(thing.into())?;
        let key = additional_key(key)?;
        Ok(self.tx.remove_property(thing.node(), &key)?.is_some())
    }

    pub fn set_label(&mut self, thing: impl Into<ThingId>, label: &str) -> SchemaResult<()> {
        self.set_additional_property(thing, LABEL, label)
    }

    pub fn set_comment(&mut self, thing: impl Into<ThingId>, comment: &str) -> SchemaResult<()> {
        self.set_additional_property(thing, COMMENT, comment)
    }

    /// Set or clear the inverse of a property.
    ///
    /// The link is symmetric. Previous partners of either side are unlinked.
    pub fn set_inverse_of(
        &mut self,
        property: PropertyId,
        inverse: Option<PropertyId>,
    ) -> SchemaResult<()> {
        let schema = self.schema();
        schema.check(property)?;
        if let Some(inverse) = inverse {
            schema.check(inverse)?;
        }

        self.unlink_all(property.node(), MetaEdge::InverseOf, Direction::Both)?;
        if let Some(inverse) = inverse {
            self.unlink_all(inverse.node(), MetaEdge::InverseOf, Direction::Both)?;
            self.link(property.node(), MetaEdge::InverseOf, inverse.node())?;
        }
        debug!(%property, ?inverse, "inverse set");
        Ok(())
    }

    /// Create an opaque entity node that can be made an instance of classes.
    pub fn create_entity(&mut self) -> NodeId {
        self.create(NodeKind::Entity, None)
    }
}
