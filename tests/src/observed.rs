//! What a step produced, in a shape assertions can compare.

use ontic_core::{NodeId, Value};
use ontic_schema::{
    ClassId, CollectionBehaviour, NamespaceId, PropertyId, Range, RelTypeId, RestrictionId,
};

/// The observable result of a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Observed {
    /// The step returned nothing of interest.
    Unit,
    /// A single scalar, `None` when the step found nothing.
    Value(Option<Value>),
    /// An ordered list of schema nodes.
    Nodes(Vec<NodeId>),
    /// Names of schema objects, in order.
    Names(Vec<String>),
    /// A range as stored on a restrictable.
    Range(Option<Range>),
}

impl Observed {
    /// Number of rows: nodes in a list, 1 for a present scalar or range.
    pub fn len(&self) -> usize {
        match self {
            Observed::Unit => 0,
            Observed::Value(value) => usize::from(value.is_some()),
            Observed::Nodes(nodes) => nodes.len(),
            Observed::Names(names) => names.len(),
            Observed::Range(range) => usize::from(range.is_some()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<()> for Observed {
    fn from(_: ()) -> Self {
        Observed::Unit
    }
}

impl From<Value> for Observed {
    fn from(value: Value) -> Self {
        Observed::Value(Some(value))
    }
}

impl From<Option<Value>> for Observed {
    fn from(value: Option<Value>) -> Self {
        Observed::Value(value)
    }
}

impl From<bool> for Observed {
    fn from(value: bool) -> Self {
        Observed::Value(Some(Value::Bool(value)))
    }
}

impl From<usize> for Observed {
    fn from(value: usize) -> Self {
        Observed::Value(Some(Value::Int(value as i64)))
    }
}

impl From<u64> for Observed {
    fn from(value: u64) -> Self {
        Observed::Value(Some(Value::Int(value as i64)))
    }
}

impl From<Option<u32>> for Observed {
    fn from(value: Option<u32>) -> Self {
        Observed::Value(value.map(Value::from))
    }
}

impl From<Option<CollectionBehaviour>> for Observed {
    fn from(value: Option<CollectionBehaviour>) -> Self {
        Observed::Value(value.map(|behaviour| Value::from(behaviour.as_str())))
    }
}

impl From<Option<Range>> for Observed {
    fn from(range: Option<Range>) -> Self {
        Observed::Range(range)
    }
}

impl From<Vec<String>> for Observed {
    fn from(names: Vec<String>) -> Self {
        Observed::Names(names)
    }
}

impl From<Vec<NodeId>> for Observed {
    fn from(nodes: Vec<NodeId>) -> Self {
        Observed::Nodes(nodes)
    }
}

macro_rules! observe_handles {
    ($($handle:ty),*) => {
        $(
            impl From<$handle> for Observed {
                fn from(handle: $handle) -> Self {
                    Observed::Value(Some(Value::NodeRef(handle.node())))
                }
            }

            impl From<Option<$handle>> for Observed {
                fn from(handle: Option<$handle>) -> Self {
                    Observed::Value(handle.map(|h| Value::NodeRef(h.node())))
                }
            }

            impl From<Vec<$handle>> for Observed {
                fn from(handles: Vec<$handle>) -> Self {
                    Observed::Nodes(handles.into_iter().map(|h| h.node()).collect())
                }
            }
        )*
    };
}

observe_handles!(ClassId, PropertyId, RelTypeId, NamespaceId, RestrictionId);
