//! Cardinality and collection behaviour of restrictables.

use crate::error::{SchemaError, SchemaResult};
use crate::id::RestrictableId;
use crate::model::{keys, MetaTx, Schema};
use ontic_core::Value;
use std::fmt;
use tracing::debug;

/// How multiple values of a constrainable are held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionBehaviour {
    /// Unordered, no duplicates.
    Set,
    /// Ordered, duplicates allowed.
    List,
}

impl CollectionBehaviour {
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionBehaviour::Set => "set",
            CollectionBehaviour::List => "list",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "set" => Some(CollectionBehaviour::Set),
            "list" => Some(CollectionBehaviour::List),
            _ => None,
        }
    }
}

impl fmt::Display for CollectionBehaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'a> Schema<'a> {
    /// Minimum cardinality set directly on a restrictable.
    pub fn min_cardinality(self, restrictable: impl Into<RestrictableId>) -> SchemaResult<Option<u32>> {
        self.cardinality(restrictable.into(), keys::MIN_CARDINALITY)
    }

    /// Maximum cardinality set directly on a restrictable.
    pub fn max_cardinality(self, restrictable: impl Into<RestrictableId>) -> SchemaResult<Option<u32>> {
        self.cardinality(restrictable.into(), keys::MAX_CARDINALITY)
    }

    /// Collection behaviour set directly on a restrictable.
    pub fn collection_behaviour(
        self,
        restrictable: impl Into<RestrictableId>,
    ) -> SchemaResult<Option<CollectionBehaviour>> {
        let restrictable = restrictable.into();
        self.check_restrictable(restrictable)?;
        let Some(tag) = self
            .store
            .get_str(restrictable.node(), keys::COLLECTION_BEHAVIOUR)?
        else {
            return Ok(None);
        };
        CollectionBehaviour::parse(tag).map(Some).ok_or_else(|| {
            SchemaError::illegal_state(format!("unknown collection behaviour '{}'", tag))
        })
    }

    fn cardinality(self, restrictable: RestrictableId, key: &str) -> SchemaResult<Option<u32>> {
        self.check_restrictable(restrictable)?;
        match self.store.get_int(restrictable.node(), key)? {
            None => Ok(None),
            Some(raw) => u32::try_from(raw).map(Some).map_err(|_| {
                SchemaError::illegal_state(format!("{} holds invalid {} {}", restrictable.node(), key, raw))
            }),
        }
    }
}

impl MetaTx<'_> {
    /// Set or clear the minimum cardinality.
    pub fn set_min_cardinality(
        &mut self,
        restrictable: impl Into<RestrictableId>,
        min: Option<u32>,
    ) -> SchemaResult<()> {
        let restrictable = restrictable.into();
        let max = self.schema().max_cardinality(restrictable)?;
        self.write_cardinality(restrictable, min, max)
    }

    /// Set or clear the maximum cardinality.
    pub fn set_max_cardinality(
        &mut self,
        restrictable: impl Into<RestrictableId>,
        max: Option<u32>,
    ) -> SchemaResult<()> {
        let restrictable = restrictable.into();
        let min = self.schema().min_cardinality(restrictable)?;
        self.write_cardinality(restrictable, min, max)
    }

    /// Set or clear both cardinality bounds.
    pub fn set_cardinality(
        &mut self,
        restrictable: impl Into<RestrictableId>,
        min: Option<u32>,
        max: Option<u32>,
    ) -> SchemaResult<()> {
        let restrictable = restrictable.into();
        self.schema().check_restrictable(restrictable)?;
        self.write_cardinality(restrictable, min, max)
    }

    /// Set or clear the collection behaviour.
    pub fn set_collection_behaviour(
        &mut self,
        restrictable: impl Into<RestrictableId>,
        behaviour: Option<CollectionBehaviour>,
    ) -> SchemaResult<()> {
        let restrictable = restrictable.into();
        self.schema().check_restrictable(restrictable)?;
        self.put(
            restrictable.node(),
            keys::COLLECTION_BEHAVIOUR,
            behaviour.map(|b| Value::from(b.as_str())),
        )?;
        debug!(node = %restrictable.node(), ?behaviour, "collection behaviour set");
        Ok(())
    }

    fn write_cardinality(
        &mut self,
        restrictable: RestrictableId,
        min: Option<u32>,
        max: Option<u32>,
    ) -> SchemaResult<()> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(SchemaError::invalid_argument(format!(
                    "min cardinality {} exceeds max cardinality {}",
                    min, max
                )));
            }
        }
        let node = restrictable.node();
        self.put(node, keys::MIN_CARDINALITY, min.map(|v| Value::Int(i64::from(v))))?;
        self.put(node, keys::MAX_CARDINALITY, max.map(|v| Value::Int(i64::from(v))))?;
        debug!(%node, ?min, ?max, "cardinality set");
        Ok(())
    }
}
