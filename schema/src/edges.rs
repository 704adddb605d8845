//! Edge kinds of the schema graph and their ownership semantics.
//!
//! Whether deleting a node also deletes what sits at the other end of an
//! edge is a property of the edge kind, looked up in [`MetaEdge::association`].

use ontic_core::{Direction, EdgeTypeId};
use ontic_graph::Graph;

/// How the owning end of an edge relates to the other end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association {
    /// Deleting the owner deletes the other end.
    Owns,
    /// The other end is deleted once no shared edge reaches it any more.
    Shares,
    /// Deleting either end only removes the edge.
    References,
}

/// Every edge kind written by the schema layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaEdge {
    /// root -> namespace
    ModelNamespace,
    /// namespace -> class
    NamespaceClass,
    /// namespace -> property
    NamespaceProperty,
    /// namespace -> relationship type
    NamespaceRelType,
    /// sub class -> super class
    SubclassOf,
    /// sub property -> super property
    SubpropertyOf,
    /// sub relationship type -> super relationship type
    SubrelationshipOf,
    /// container -> declared property
    HasProperty,
    /// class -> relationship type it may have as outgoing
    DeclaresOutgoing,
    /// class -> relationship type it may have as incoming
    DeclaresIncoming,
    /// restriction -> its container
    RestrictionContainer,
    /// restriction -> its constrainable
    RestrictionConstrainable,
    /// range owner -> allowed class
    RangeClass,
    /// range owner -> enumerated instance
    RangeInstance,
    /// range owner -> allowed namespace
    RangeNamespace,
    /// entity -> class
    InstanceOf,
    /// property -> its inverse
    InverseOf,
}

impl MetaEdge {
    pub const ALL: [MetaEdge; 17] = [
        MetaEdge::ModelNamespace,
        MetaEdge::NamespaceClass,
        MetaEdge::NamespaceProperty,
        MetaEdge::NamespaceRelType,
        MetaEdge::SubclassOf,
        MetaEdge::SubpropertyOf,
        MetaEdge::SubrelationshipOf,
        MetaEdge::HasProperty,
        MetaEdge::DeclaresOutgoing,
        MetaEdge::DeclaresIncoming,
        MetaEdge::RestrictionContainer,
        MetaEdge::RestrictionConstrainable,
        MetaEdge::RangeClass,
        MetaEdge::RangeInstance,
        MetaEdge::RangeNamespace,
        MetaEdge::InstanceOf,
        MetaEdge::InverseOf,
    ];

    /// Interned name of the edge type.
    pub fn name(self) -> &'static str {
        match self {
            MetaEdge::ModelNamespace => "meta:namespace",
            MetaEdge::NamespaceClass => "meta:class",
            MetaEdge::NamespaceProperty => "meta:property",
            MetaEdge::NamespaceRelType => "meta:relationship_type",
            MetaEdge::SubclassOf => "meta:subclass_of",
            MetaEdge::SubpropertyOf => "meta:subproperty_of",
            MetaEdge::SubrelationshipOf => "meta:subrelationship_of",
            MetaEdge::HasProperty => "meta:has_property",
            MetaEdge::DeclaresOutgoing => "meta:declares_outgoing",
            MetaEdge::DeclaresIncoming => "meta:declares_incoming",
            MetaEdge::RestrictionContainer => "meta:restriction_container",
            MetaEdge::RestrictionConstrainable => "meta:restriction_constrainable",
            MetaEdge::RangeClass => "meta:range_class",
            MetaEdge::RangeInstance => "meta:range_instance",
            MetaEdge::RangeNamespace => "meta:range_namespace",
            MetaEdge::InstanceOf => "meta:instance_of",
            MetaEdge::InverseOf => "meta:inverse_of",
        }
    }

    /// Ownership semantics of the edge kind.
    pub fn association(self) -> Association {
        match self {
            MetaEdge::ModelNamespace
            | MetaEdge::NamespaceClass
            | MetaEdge::NamespaceProperty
            | MetaEdge::NamespaceRelType
            | MetaEdge::RestrictionContainer
            | MetaEdge::RestrictionConstrainable => Association::Owns,
            MetaEdge::HasProperty | MetaEdge::DeclaresOutgoing | MetaEdge::DeclaresIncoming => {
                Association::Shares
            }
            MetaEdge::SubclassOf
            | MetaEdge::SubpropertyOf
            | MetaEdge::SubrelationshipOf
            | MetaEdge::RangeClass
            | MetaEdge::RangeInstance
            | MetaEdge::RangeNamespace
            | MetaEdge::InstanceOf
            | MetaEdge::InverseOf => Association::References,
        }
    }

    /// Direction of the edge as seen from its owning end.
    ///
    /// Restrictions point at what owns them; every other owning edge points
    /// away from its owner.
    pub fn owner_side(self) -> Direction {
        match self {
            MetaEdge::RestrictionContainer | MetaEdge::RestrictionConstrainable => {
                Direction::Incoming
            }
            _ => Direction::Outgoing,
        }
    }

    /// The declaring edge for a relationship direction.
    pub fn declares(direction: Direction) -> Option<MetaEdge> {
        match direction {
            Direction::Outgoing => Some(MetaEdge::DeclaresOutgoing),
            Direction::Incoming => Some(MetaEdge::DeclaresIncoming),
            Direction::Both => None,
        }
    }
}

/// Interned edge type ids for every [`MetaEdge`] of one graph.
#[derive(Debug, Clone)]
pub struct MetaEdges {
    ids: [EdgeTypeId; MetaEdge::ALL.len()],
}

impl MetaEdges {
    pub fn intern(graph: &Graph) -> Self {
        Self {
            ids: MetaEdge::ALL.map(|edge| graph.edge_type(edge.name())),
        }
    }

    /// Edge type id of `edge`.
    pub fn id(&self, edge: MetaEdge) -> EdgeTypeId {
        self.ids[edge as usize]
    }

    /// The schema edge kind of an edge type, if it is one.
    pub fn kind(&self, id: EdgeTypeId) -> Option<MetaEdge> {
        self.ids
            .iter()
            .position(|candidate| *candidate == id)
            .map(|index| MetaEdge::ALL[index])
    }
}
