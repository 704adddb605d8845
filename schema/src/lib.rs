//! Ontic Schema
//!
//! A typed object model over the ontic graph: classes, properties and
//! relationship types arranged in super/sub hierarchies, with cardinality,
//! collection behaviour and value ranges attached to declarations and
//! refined per container through restrictions.
//!
//! ```text
//! let model = MetaModel::new();
//! let ns = model.global_namespace();
//! model.write(|tx| {
//!     let organism = tx.class(ns, "Organism")?;
//!     let person = tx.class(ns, "Person")?;
//!     tx.add_super(person, organism)?;
//!     let size = tx.add_required_property(organism, "size")?;
//!     let restriction = tx.class_restriction(organism, size)?;
//!     tx.set_max_cardinality(restriction, Some(1))
//! })?;
//! let view = model.read();
//! view.schema().lookup(size, &MaxCardinality, &[person])?; // Some(1)
//! ```

mod cache;
mod config;
mod declare;
mod edges;
mod error;
mod hierarchy;
mod id;
mod instance;
mod lifecycle;
mod lookup;
mod model;
mod namespace;
mod range;
mod restrictable;
mod restriction;
mod thing;
mod validator;

pub use config::ModelConfig;
pub use edges::{Association, MetaEdge, MetaEdges};
pub use error::{SchemaError, SchemaResult};
pub use id::{
    ClassId, ConstrainableId, ContainerId, NamespaceId, NodeKind, PropertyId, RelTypeId,
    RestrictableId, RestrictionId, Thing, ThingId, ThingKind,
};
pub use lookup::{
    finder, CollectionBehaviourFinder, Finder, MaxCardinality, MinCardinality, RangeFinder,
};
pub use model::{MetaModel, MetaTx, MetaView, Schema};
pub use range::{PrimitiveType, Range, RangeKind};
pub use restrictable::CollectionBehaviour;
pub use validator::{Conflict, ConstrainableKey};
