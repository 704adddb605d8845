//! Typed handles for schema nodes.
//!
//! Every schema object is a graph node tagged with a [`NodeKind`]. Handles
//! wrap the node id and carry the expected kind in their type; operations
//! re-check the kind against the store and report
//! [`SchemaError::IllegalState`](crate::SchemaError::IllegalState) for
//! deleted or mistyped nodes.

use crate::edges::MetaEdge;
use ontic_core::NodeId;
use std::fmt;

/// Kind tag stored on every schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Namespace,
    Class,
    Property,
    RelationshipType,
    Restriction,
    Entity,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Namespace => "namespace",
            NodeKind::Class => "class",
            NodeKind::Property => "property",
            NodeKind::RelationshipType => "relationship_type",
            NodeKind::Restriction => "restriction",
            NodeKind::Entity => "entity",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Some(match tag {
            "root" => NodeKind::Root,
            "namespace" => NodeKind::Namespace,
            "class" => NodeKind::Class,
            "property" => NodeKind::Property,
            "relationship_type" => NodeKind::RelationshipType,
            "restriction" => NodeKind::Restriction,
            "entity" => NodeKind::Entity,
            _ => return None,
        })
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three kinds that form super/sub hierarchies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThingKind {
    Class,
    Property,
    RelationshipType,
}

impl ThingKind {
    pub fn node_kind(self) -> NodeKind {
        match self {
            ThingKind::Class => NodeKind::Class,
            ThingKind::Property => NodeKind::Property,
            ThingKind::RelationshipType => NodeKind::RelationshipType,
        }
    }

    /// Edge from a sub-thing to its super-thing.
    pub fn sub_edge(self) -> MetaEdge {
        match self {
            ThingKind::Class => MetaEdge::SubclassOf,
            ThingKind::Property => MetaEdge::SubpropertyOf,
            ThingKind::RelationshipType => MetaEdge::SubrelationshipOf,
        }
    }

    /// Edge from a namespace to things of this kind.
    pub fn namespace_edge(self) -> MetaEdge {
        match self {
            ThingKind::Class => MetaEdge::NamespaceClass,
            ThingKind::Property => MetaEdge::NamespaceProperty,
            ThingKind::RelationshipType => MetaEdge::NamespaceRelType,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.node_kind().as_str()
    }
}

macro_rules! handle {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NodeId);

        impl $name {
            /// The underlying graph node.
            pub fn node(self) -> NodeId {
                self.0
            }

            pub(crate) fn from_node(node: NodeId) -> Self {
                Self(node)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}:{}", $prefix, self.0)
            }
        }
    };
}

handle!(
    /// A class.
    ClassId,
    "class"
);
handle!(
    /// A property.
    PropertyId,
    "property"
);
handle!(
    /// A relationship type.
    RelTypeId,
    "reltype"
);
handle!(
    /// A namespace (named or global).
    NamespaceId,
    "namespace"
);
handle!(
    /// A restriction of one constrainable within one container.
    RestrictionId,
    "restriction"
);

/// A member of a super/sub hierarchy.
pub trait Thing: Copy + Eq + std::hash::Hash + fmt::Debug {
    const KIND: ThingKind;

    fn node(self) -> NodeId;

    fn from_node(node: NodeId) -> Self;

    /// The container view of this thing, if it can declare constrainables.
    fn as_container(self) -> Option<ContainerId> {
        None
    }
}

impl Thing for ClassId {
    const KIND: ThingKind = ThingKind::Class;

    fn node(self) -> NodeId {
        self.0
    }

    fn from_node(node: NodeId) -> Self {
        Self(node)
    }

    fn as_container(self) -> Option<ContainerId> {
        Some(ContainerId::Class(self))
    }
}

impl Thing for PropertyId {
    const KIND: ThingKind = ThingKind::Property;

    fn node(self) -> NodeId {
        self.0
    }

    fn from_node(node: NodeId) -> Self {
        Self(node)
    }
}

impl Thing for RelTypeId {
    const KIND: ThingKind = ThingKind::RelationshipType;

    fn node(self) -> NodeId {
        self.0
    }

    fn from_node(node: NodeId) -> Self {
        Self(node)
    }

    fn as_container(self) -> Option<ContainerId> {
        Some(ContainerId::RelType(self))
    }
}

/// Any of the three hierarchy kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThingId {
    Class(ClassId),
    Property(PropertyId),
    RelType(RelTypeId),
}

impl ThingId {
    pub fn node(self) -> NodeId {
        match self {
            ThingId::Class(c) => c.node(),
            ThingId::Property(p) => p.node(),
            ThingId::RelType(r) => r.node(),
        }
    }

    pub fn kind(self) -> ThingKind {
        match self {
            ThingId::Class(_) => ThingKind::Class,
            ThingId::Property(_) => ThingKind::Property,
            ThingId::RelType(_) => ThingKind::RelationshipType,
        }
    }
}

/// Something that declares constrainables and owns restrictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerId {
    Class(ClassId),
    RelType(RelTypeId),
}

impl ContainerId {
    pub fn node(self) -> NodeId {
        match self {
            ContainerId::Class(c) => c.node(),
            ContainerId::RelType(r) => r.node(),
        }
    }

    pub fn kind(self) -> ThingKind {
        match self {
            ContainerId::Class(_) => ThingKind::Class,
            ContainerId::RelType(_) => ThingKind::RelationshipType,
        }
    }

    pub fn as_class(self) -> Option<ClassId> {
        match self {
            ContainerId::Class(c) => Some(c),
            ContainerId::RelType(_) => None,
        }
    }

    /// Same-kind container for another node.
    pub(crate) fn with_node(self, node: NodeId) -> Self {
        match self {
            ContainerId::Class(_) => ContainerId::Class(ClassId(node)),
            ContainerId::RelType(_) => ContainerId::RelType(RelTypeId(node)),
        }
    }
}

/// Something that can be restricted within a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstrainableId {
    Property(PropertyId),
    RelType(RelTypeId),
}

impl ConstrainableId {
    pub fn node(self) -> NodeId {
        match self {
            ConstrainableId::Property(p) => p.node(),
            ConstrainableId::RelType(r) => r.node(),
        }
    }

    pub fn kind(self) -> ThingKind {
        match self {
            ConstrainableId::Property(_) => ThingKind::Property,
            ConstrainableId::RelType(_) => ThingKind::RelationshipType,
        }
    }

    pub fn as_rel_type(self) -> Option<RelTypeId> {
        match self {
            ConstrainableId::RelType(r) => Some(r),
            ConstrainableId::Property(_) => None,
        }
    }

    pub(crate) fn with_node(self, node: NodeId) -> Self {
        match self {
            ConstrainableId::Property(_) => ConstrainableId::Property(PropertyId(node)),
            ConstrainableId::RelType(_) => ConstrainableId::RelType(RelTypeId(node)),
        }
    }
}

/// Anything carrying cardinality, collection behaviour and a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestrictableId {
    Restriction(RestrictionId),
    Property(PropertyId),
    RelType(RelTypeId),
}

impl RestrictableId {
    pub fn node(self) -> NodeId {
        match self {
            RestrictableId::Restriction(r) => r.node(),
            RestrictableId::Property(p) => p.node(),
            RestrictableId::RelType(r) => r.node(),
        }
    }
}

macro_rules! into_enum {
    ($from:ident => $to:ident :: $variant:ident) => {
        impl From<$from> for $to {
            fn from(id: $from) -> Self {
                $to::$variant(id)
            }
        }
    };
}

into_enum!(ClassId => ThingId::Class);
into_enum!(PropertyId => ThingId::Property);
into_enum!(RelTypeId => ThingId::RelType);
into_enum!(ClassId => ContainerId::Class);
into_enum!(RelTypeId => ContainerId::RelType);
into_enum!(PropertyId => ConstrainableId::Property);
into_enum!(RelTypeId => ConstrainableId::RelType);
into_enum!(RestrictionId => RestrictableId::Restriction);
into_enum!(PropertyId => RestrictableId::Property);
into_enum!(RelTypeId => RestrictableId::RelType);

impl From<ConstrainableId> for RestrictableId {
    fn from(id: ConstrainableId) -> Self {
        match id {
            ConstrainableId::Property(p) => RestrictableId::Property(p),
            ConstrainableId::RelType(r) => RestrictableId::RelType(r),
        }
    }
}

impl From<ContainerId> for ThingId {
    fn from(id: ContainerId) -> Self {
        match id {
            ContainerId::Class(c) => ThingId::Class(c),
            ContainerId::RelType(r) => ThingId::RelType(r),
        }
    }
}

impl From<ConstrainableId> for ThingId {
    fn from(id: ConstrainableId) -> Self {
        match id {
            ConstrainableId::Property(p) => ThingId::Property(p),
            ConstrainableId::RelType(r) => ThingId::RelType(r),
        }
    }
}
