//! Conflict checks for declarations and hierarchy edits.
//!
//! A constrainable key may be declared at most once along any
//! ancestor/descendant chain of containers. The checks here are read-only;
//! the mutating operations call them before writing.

use crate::error::{SchemaError, SchemaResult};
use crate::id::{ContainerId, Thing};
use crate::model::Schema;
use ontic_core::Direction;
use std::fmt;
use thiserror::Error;

/// What a container declares: a property by name, or a relationship type by
/// name and direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstrainableKey {
    Property(String),
    Relationship(String, Direction),
}

impl ConstrainableKey {
    pub fn property(name: impl Into<String>) -> Self {
        ConstrainableKey::Property(name.into())
    }

    pub fn relationship(name: impl Into<String>, direction: Direction) -> Self {
        ConstrainableKey::Relationship(name.into(), direction)
    }

    pub fn name(&self) -> &str {
        match self {
            ConstrainableKey::Property(name) | ConstrainableKey::Relationship(name, _) => name,
        }
    }
}

impl fmt::Display for ConstrainableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstrainableKey::Property(name) => write!(f, "property '{}'", name),
            ConstrainableKey::Relationship(name, direction) => {
                write!(f, "{} relationship '{}'", direction.as_str(), name)
            }
        }
    }
}

/// Why a declaration or super edge was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Conflict {
    #[error("making {sup} a super of {sub} would create a cycle")]
    Cycle { sub: String, sup: String },

    #[error("{container} already has {key} through {declarer}")]
    Inherited {
        container: String,
        declarer: String,
        key: ConstrainableKey,
    },

    #[error("{descendant}, a descendant of {container}, already declares {key}")]
    Descendant {
        container: String,
        descendant: String,
        key: ConstrainableKey,
    },
}

impl<'a> Schema<'a> {
    /// Check that `container` may declare `key`.
    ///
    /// Rejected when the container or one of its supers already declares the
    /// key, or when one of its subs does.
    pub fn can_add_constrainable(
        self,
        container: impl Into<ContainerId>,
        key: &ConstrainableKey,
    ) -> SchemaResult<()> {
        let container = container.into();
        self.check_container(container)?;
        if matches!(key, ConstrainableKey::Relationship(..)) && container.as_class().is_none() {
            return Err(SchemaError::invalid_argument(
                "only classes declare relationship types",
            ));
        }

        for declarer in self.container_chain(container)? {
            if self.declares_key(declarer, key) {
                return Err(Conflict::Inherited {
                    container: self.display(container.node()),
                    declarer: self.display(declarer.node()),
                    key: key.clone(),
                }
                .into());
            }
        }
        for descendant in self.container_subs(container)? {
            if self.declares_key(descendant, key) {
                return Err(Conflict::Descendant {
                    container: self.display(container.node()),
                    descendant: self.display(descendant.node()),
                    key: key.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Check that `sup` may become a direct super of `sub`.
    pub fn can_add_super_edge<T: Thing>(self, sub: T, sup: T) -> SchemaResult<()> {
        self.check(sub)?;
        self.check(sup)?;
        if sub == sup || self.is_subtype_of(sup, sub)? {
            return Err(Conflict::Cycle {
                sub: self.display(sub.node()),
                sup: self.display(sup.node()),
            }
            .into());
        }
        if self.is_subtype_of(sub, sup)? {
            return Ok(());
        }

        let (Some(sub), Some(sup)) = (sub.as_container(), sup.as_container()) else {
            return Ok(());
        };
        // Every key sub has, declared or inherited, must be declarable on sup.
        // A key both reach through a common ancestor clashes too.
        for declarer in self.container_chain(sub)? {
            for key in self.declared_keys(declarer)? {
                self.can_add_constrainable(sup, &key)?;
            }
        }

        // What sub is about to inherit must not be declared below it.
        let descendants = self.container_subs(sub)?;
        for declarer in &self.container_chain(sup)? {
            for key in self.declared_keys(*declarer)? {
                if let Some(descendant) = descendants.iter().find(|d| self.declares_key(**d, &key)) {
                    return Err(Conflict::Descendant {
                        container: self.display(sub.node()),
                        descendant: self.display(descendant.node()),
                        key,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}
