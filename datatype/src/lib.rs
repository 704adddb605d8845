//! Ontic Datatype Codecs
//!
//! Converts RDF literal text to and from [`Value`](ontic_core::Value)s for a
//! datatype tag. Tags are XML Schema datatypes, written either as full URIs
//! (`http://www.w3.org/2001/XMLSchema#string`) or `xsd:` prefixed.
//!
//! Dates and times decode to `Value::Timestamp` (milliseconds since the Unix
//! epoch, UTC).

mod codec;
mod error;
mod registry;
mod temporal;

pub use codec::{BooleanCodec, DatatypeCodec, DecimalCodec, FloatCodec, IntegerCodec, StringCodec, ValueKind};
pub use error::{CodecError, CodecResult};
pub use registry::{DatatypeRegistry, XSD_NAMESPACE, XSD_PREFIX};
pub use temporal::{TemporalCodec, TemporalForm};
