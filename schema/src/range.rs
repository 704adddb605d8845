//! Value ranges of restrictables.
//!
//! A range is stored on its owner node as a kind tag plus variant state:
//! reference ranges as edges from the owner, datatype ranges as properties.
//! Loading dispatches on the tag.

use crate::edges::MetaEdge;
use crate::error::{SchemaError, SchemaResult};
use crate::id::{ClassId, ConstrainableId, NamespaceId, NodeKind, RestrictableId, ThingKind};
use crate::model::{keys, MetaTx, Schema};
use ontic_core::{Direction, EdgeTypeId, NodeId, Value};
use ontic_datatype::DatatypeRegistry;
use std::fmt;
use tracing::debug;

/// Primitive value classes a datatype-class range may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    String,
    Boolean,
    Integer,
    Long,
    Float,
    Double,
    Date,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 7] = [
        PrimitiveType::String,
        PrimitiveType::Boolean,
        PrimitiveType::Integer,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
        PrimitiveType::Date,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Date => "date",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == tag)
    }

    /// The datatype used to convert literals of this type.
    pub fn datatype(self) -> &'static str {
        match self {
            PrimitiveType::String => "xsd:string",
            PrimitiveType::Boolean => "xsd:boolean",
            PrimitiveType::Integer => "xsd:int",
            PrimitiveType::Long => "xsd:long",
            PrimitiveType::Float => "xsd:float",
            PrimitiveType::Double => "xsd:double",
            PrimitiveType::Date => "xsd:dateTime",
        }
    }

    /// Convert a literal to a value of this type.
    pub fn convert(self, registry: &DatatypeRegistry, literal: &str) -> SchemaResult<Value> {
        registry
            .parse(self.datatype(), literal)
            .map_err(|e| SchemaError::invalid_argument(e.to_string()))
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminator stored with every range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeKind {
    Class,
    InstanceEnumeration,
    Data,
    DatatypeClass,
    RdfDatatype,
    Namespace,
    Resource,
}

impl RangeKind {
    pub const ALL: [RangeKind; 7] = [
        RangeKind::Class,
        RangeKind::InstanceEnumeration,
        RangeKind::Data,
        RangeKind::DatatypeClass,
        RangeKind::RdfDatatype,
        RangeKind::Namespace,
        RangeKind::Resource,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RangeKind::Class => "class",
            RangeKind::InstanceEnumeration => "instance_enumeration",
            RangeKind::Data => "data",
            RangeKind::DatatypeClass => "datatype_class",
            RangeKind::RdfDatatype => "rdf_datatype",
            RangeKind::Namespace => "namespace",
            RangeKind::Resource => "resource",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }
}

/// The values a restrictable admits.
#[derive(Debug, Clone, PartialEq)]
pub enum Range {
    /// Instances of any of these classes.
    Class(Vec<ClassId>),
    /// Exactly these entities.
    InstanceEnumeration(Vec<NodeId>),
    /// One of these literal values of a datatype.
    Data { datatype: String, values: Vec<Value> },
    /// Any value of a primitive type.
    DatatypeClass(PrimitiveType),
    /// Any literal of a datatype.
    RdfDatatype(String),
    /// Instances of classes in these namespaces.
    Namespace(Vec<NamespaceId>),
    /// An externally identified resource.
    Resource(String),
}

impl Range {
    /// A data range from literal text, converted through `registry`.
    pub fn data(registry: &DatatypeRegistry, datatype: &str, literals: &[&str]) -> SchemaResult<Self> {
        let datatype = DatatypeRegistry::canonical_tag(datatype);
        let values = literals
            .iter()
            .map(|literal| {
                registry
                    .parse(&datatype, literal)
                    .map_err(|e| SchemaError::invalid_argument(e.to_string()))
            })
            .collect::<SchemaResult<Vec<_>>>()?;
        Ok(Range::Data { datatype, values })
    }

    pub fn kind(&self) -> RangeKind {
        match self {
            Range::Class(_) => RangeKind::Class,
            Range::InstanceEnumeration(_) => RangeKind::InstanceEnumeration,
            Range::Data { .. } => RangeKind::Data,
            Range::DatatypeClass(_) => RangeKind::DatatypeClass,
            Range::RdfDatatype(_) => RangeKind::RdfDatatype,
            Range::Namespace(_) => RangeKind::Namespace,
            Range::Resource(_) => RangeKind::Resource,
        }
    }

    /// Returns true for ranges of literal values.
    pub fn is_datatype(&self) -> bool {
        matches!(
            self,
            Range::Data { .. } | Range::DatatypeClass(_) | Range::RdfDatatype(_)
        )
    }
}

impl<'a> Schema<'a> {
    /// The range set directly on a restrictable.
    pub fn range(self, owner: impl Into<RestrictableId>) -> SchemaResult<Option<Range>> {
        let owner = owner.into();
        self.check_restrictable(owner)?;
        let node = owner.node();
        let Some(tag) = self.store.get_str(node, keys::RANGE_KIND)? else {
            return Ok(None);
        };
        let kind = RangeKind::parse(tag)
            .ok_or_else(|| SchemaError::illegal_state(format!("unknown range kind '{}'", tag)))?;

        let range = match kind {
            RangeKind::Class => Range::Class(
                self.neighbors(node, MetaEdge::RangeClass, Direction::Outgoing)
                    .into_iter()
                    .map(ClassId::from_node)
                    .collect(),
            ),
            RangeKind::InstanceEnumeration => Range::InstanceEnumeration(self.neighbors(
                node,
                MetaEdge::RangeInstance,
                Direction::Outgoing,
            )),
            RangeKind::Namespace => Range::Namespace(
                self.neighbors(node, MetaEdge::RangeNamespace, Direction::Outgoing)
                    .into_iter()
                    .map(NamespaceId::from_node)
                    .collect(),
            ),
            RangeKind::Data => {
                let datatype = self.required_str(node, keys::RANGE_DATATYPE)?;
                let registry = &self.model.config().datatypes;
                let literals = self
                    .store
                    .get_property(node, keys::RANGE_VALUES)?
                    .and_then(Value::as_list)
                    .unwrap_or_default();
                let mut values = Vec::with_capacity(literals.len());
                for literal in literals {
                    let text = literal.as_str().ok_or_else(|| {
                        SchemaError::illegal_state(format!("non-text literal in range of {}", node))
                    })?;
                    values.push(registry.parse(datatype, text)?);
                }
                Range::Data {
                    datatype: datatype.to_string(),
                    values,
                }
            }
            RangeKind::DatatypeClass => {
                let tag = self.required_str(node, keys::RANGE_PRIMITIVE)?;
                Range::DatatypeClass(PrimitiveType::parse(tag).ok_or_else(|| {
                    SchemaError::illegal_state(format!("unknown primitive type '{}'", tag))
                })?)
            }
            RangeKind::RdfDatatype => {
                Range::RdfDatatype(self.required_str(node, keys::RANGE_DATATYPE)?.to_string())
            }
            RangeKind::Resource => {
                Range::Resource(self.required_str(node, keys::RANGE_RESOURCE)?.to_string())
            }
        };
        Ok(Some(range))
    }

    /// The constrainable a restrictable describes: itself, or the
    /// restriction's constrainable.
    pub fn constrainable_of(self, owner: impl Into<RestrictableId>) -> SchemaResult<ConstrainableId> {
        match owner.into() {
            RestrictableId::Property(p) => {
                self.check(p)?;
                Ok(ConstrainableId::Property(p))
            }
            RestrictableId::RelType(r) => {
                self.check(r)?;
                Ok(ConstrainableId::RelType(r))
            }
            RestrictableId::Restriction(r) => self.restriction_constrainable(r),
        }
    }

    /// Edge type instances use for values of the owner's constrainable,
    /// interned from the constrainable's name. The owner must carry a class
    /// range.
    pub fn relationship_type_to_use(self, owner: impl Into<RestrictableId>) -> SchemaResult<EdgeTypeId> {
        let owner = owner.into();
        match self.range(owner)? {
            Some(Range::Class(_)) => {}
            _ => {
                return Err(SchemaError::invalid_argument(format!(
                    "{} has no class range",
                    owner.node()
                )))
            }
        }
        let constrainable = self.constrainable_of(owner)?;
        let name = self.name_of(constrainable.node()).ok_or_else(|| {
            SchemaError::illegal_state(format!("{} has no name", constrainable.node()))
        })?;
        Ok(self.model.graph().edge_type(name))
    }

    fn required_str(self, node: NodeId, key: &str) -> SchemaResult<&'a str> {
        self.store
            .get_str(node, key)?
            .ok_or_else(|| SchemaError::illegal_state(format!("{} is missing '{}'", node, key)))
    }
}

impl MetaTx<'_> {
    /// Replace the range of a restrictable; `None` removes it.
    ///
    /// Relationship types, bare or restricted, only take reference ranges.
    pub fn set_range(
        &mut self,
        owner: impl Into<RestrictableId>,
        range: Option<Range>,
    ) -> SchemaResult<()> {
        let owner = owner.into();
        let schema = self.schema();
        schema.check_restrictable(owner)?;
        let literals = match &range {
            Some(range) => self.validate_range(owner, range)?,
            None => Vec::new(),
        };

        self.clear_range(owner)?;
        let Some(range) = range else {
            debug!(owner = %owner.node(), "range removed");
            return Ok(());
        };

        let node = owner.node();
        let kind = range.kind();
        self.put(node, keys::RANGE_KIND, Some(Value::from(kind.as_str())))?;
        match range {
            Range::Class(classes) => {
                for class in classes {
                    self.link(node, MetaEdge::RangeClass, class.node())?;
                }
            }
            Range::InstanceEnumeration(instances) => {
                for instance in instances {
                    self.link(node, MetaEdge::RangeInstance, instance)?;
                }
            }
            Range::Namespace(namespaces) => {
                for namespace in namespaces {
                    self.link(node, MetaEdge::RangeNamespace, namespace.node())?;
                }
            }
            Range::Data { datatype, .. } => {
                let datatype = DatatypeRegistry::canonical_tag(&datatype);
                self.put(node, keys::RANGE_DATATYPE, Some(Value::from(datatype)))?;
                self.put(node, keys::RANGE_VALUES, Some(Value::List(literals)))?;
            }
            Range::DatatypeClass(primitive) => {
                self.put(node, keys::RANGE_PRIMITIVE, Some(Value::from(primitive.as_str())))?;
            }
            Range::RdfDatatype(datatype) => {
                let datatype = DatatypeRegistry::canonical_tag(&datatype);
                self.put(node, keys::RANGE_DATATYPE, Some(Value::from(datatype)))?;
            }
            Range::Resource(resource) => {
                self.put(node, keys::RANGE_RESOURCE, Some(Value::from(resource)))?;
            }
        }
        debug!(owner = %node, kind = kind.as_str(), "range stored");
        Ok(())
    }

    /// Remove the range of a restrictable, returning whether it had one.
    pub fn remove_range(&mut self, owner: impl Into<RestrictableId>) -> SchemaResult<bool> {
        let owner = owner.into();
        let schema = self.schema();
        schema.check_restrictable(owner)?;
        let had = schema.store.get_str(owner.node(), keys::RANGE_KIND)?.is_some();
        self.clear_range(owner)?;
        Ok(had)
    }

    /// Check a range against its owner and render data literals.
    fn validate_range(&self, owner: RestrictableId, range: &Range) -> SchemaResult<Vec<Value>> {
        let schema = self.schema();
        if range.is_datatype()
            && schema.constrainable_of(owner)?.kind() == ThingKind::RelationshipType
        {
            return Err(SchemaError::invalid_argument(format!(
                "relationship type {} only takes reference ranges",
                schema.display(schema.constrainable_of(owner)?.node())
            )));
        }

        match range {
            Range::Class(classes) => {
                for class in classes {
                    schema.check(*class)?;
                }
            }
            Range::InstanceEnumeration(instances) => {
                for instance in instances {
                    schema.expect_kind(*instance, NodeKind::Entity)?;
                }
            }
            Range::Namespace(namespaces) => {
                for namespace in namespaces {
                    schema.expect_kind(namespace.node(), NodeKind::Namespace)?;
                }
            }
            Range::Data { datatype, values } => {
                let registry = &self.model.config().datatypes;
                return values
                    .iter()
                    .map(|value| {
                        registry
                            .format(datatype, value)
                            .map(Value::String)
                            .map_err(|e| SchemaError::invalid_argument(e.to_string()))
                    })
                    .collect();
            }
            Range::RdfDatatype(datatype) => {
                if !self.model.config().datatypes.recognizes(datatype) {
                    return Err(SchemaError::invalid_argument(format!(
                        "unknown datatype '{}'",
                        datatype
                    )));
                }
            }
            Range::DatatypeClass(_) | Range::Resource(_) => {}
        }
        Ok(Vec::new())
    }

    fn clear_range(&mut self, owner: RestrictableId) -> SchemaResult<()> {
        let node = owner.node();
        for key in [
            keys::RANGE_KIND,
            keys::RANGE_DATATYPE,
            keys::RANGE_VALUES,
            keys::RANGE_PRIMITIVE,
            keys::RANGE_RESOURCE,
        ] {
            self.put(node, key, None)?;
        }
        for edge in [MetaEdge::RangeClass, MetaEdge::RangeInstance, MetaEdge::RangeNamespace] {
            self.unlink_all(node, edge, Direction::Outgoing)?;
        }
        Ok(())
    }
}
