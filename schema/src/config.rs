//! Model configuration.

use ontic_datatype::DatatypeRegistry;

/// Configuration for a [`MetaModel`](crate::MetaModel).
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Maximum depth of hierarchy walks; a walk that needs to go deeper
    /// fails with an illegal state error
    pub walk_depth_limit: usize,
    /// Codecs used by data ranges
    pub datatypes: DatatypeRegistry,
    /// Require a constrainable to be in a container's domain before a
    /// restriction for the pair can be created
    pub strict_domain: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            walk_depth_limit: 1024,
            datatypes: DatatypeRegistry::xsd(),
            strict_domain: true,
        }
    }
}

impl ModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_walk_depth_limit(mut self, limit: usize) -> Self {
        self.walk_depth_limit = limit;
        self
    }

    pub fn with_datatypes(mut self, datatypes: DatatypeRegistry) -> Self {
        self.datatypes = datatypes;
        self
    }

    pub fn with_strict_domain(mut self, strict: bool) -> Self {
        self.strict_domain = strict;
        self
    }
}
