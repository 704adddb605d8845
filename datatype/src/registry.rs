//! Datatype tag -> codec registry.

use crate::codec::{BooleanCodec, DatatypeCodec, DecimalCodec, FloatCodec, IntegerCodec, StringCodec};
use crate::error::{CodecError, CodecResult};
use crate::temporal::{TemporalCodec, TemporalForm};
use ontic_core::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Base URI of the XML Schema datatypes.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// Short prefix accepted in place of [`XSD_NAMESPACE`].
pub const XSD_PREFIX: &str = "xsd:";

/// Maps datatype tags to codecs.
///
/// Cloning is cheap; codecs are shared.
#[derive(Clone)]
pub struct DatatypeRegistry {
    codecs: HashMap<String, Arc<dyn DatatypeCodec>>,
}

impl DatatypeRegistry {
    /// A registry with no codecs.
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// A registry with every built-in XSD codec.
    pub fn xsd() -> Self {
        let mut registry = Self::empty();
        registry.register_xsd(StringCodec::string());
        registry.register_xsd(StringCodec::normalized());
        registry.register_xsd(BooleanCodec);
        for codec in IntegerCodec::xsd_family() {
            registry.register_xsd(codec);
        }
        registry.register_xsd(FloatCodec::float());
        registry.register_xsd(FloatCodec::double());
        registry.register_xsd(DecimalCodec);
        for form in TemporalForm::ALL {
            registry.register_xsd(TemporalCodec::new(form));
        }
        registry
    }

    fn register_xsd(&mut self, codec: impl DatatypeCodec + 'static) {
        let tag = format!("{}{}", XSD_NAMESPACE, codec.name());
        self.codecs.insert(tag, Arc::new(codec));
    }

    /// Expand an `xsd:` prefixed tag to its full URI.
    pub fn canonical_tag(tag: &str) -> String {
        match tag.strip_prefix(XSD_PREFIX) {
            Some(local) => format!("{}{}", XSD_NAMESPACE, local),
            None => tag.to_string(),
        }
    }

    /// Register (or replace) a codec under `tag`.
    pub fn register(&mut self, tag: &str, codec: Arc<dyn DatatypeCodec>) {
        self.codecs.insert(Self::canonical_tag(tag), codec);
    }

    /// Builder form of [`DatatypeRegistry::register`].
    pub fn with_codec(mut self, tag: &str, codec: impl DatatypeCodec + 'static) -> Self {
        self.register(tag, Arc::new(codec));
        self
    }

    /// Returns true if a codec is registered for `tag`.
    pub fn recognizes(&self, tag: &str) -> bool {
        self.codecs.contains_key(&Self::canonical_tag(tag))
    }

    /// Get the codec for `tag`.
    pub fn codec(&self, tag: &str) -> CodecResult<&Arc<dyn DatatypeCodec>> {
        self.codecs
            .get(&Self::canonical_tag(tag))
            .ok_or_else(|| CodecError::UnknownDatatype(tag.to_string()))
    }

    /// Parse `text` as `tag`.
    pub fn parse(&self, tag: &str, text: &str) -> CodecResult<Value> {
        self.codec(tag)?.parse(text)
    }

    /// Format `value` as `tag`.
    pub fn format(&self, tag: &str, value: &Value) -> CodecResult<String> {
        self.codec(tag)?.format(value)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.codecs.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

impl Default for DatatypeRegistry {
    fn default() -> Self {
        Self::xsd()
    }
}

impl fmt::Debug for DatatypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatatypeRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}
