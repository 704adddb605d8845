//! Codec errors.

use thiserror::Error;

/// Errors raised while converting literals.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// No codec is registered for the tag.
    #[error("Unknown datatype: {0}")]
    UnknownDatatype(String),

    /// The literal text is not in the datatype's lexical space.
    #[error("Invalid {datatype} literal '{literal}': {reason}")]
    InvalidLiteral {
        datatype: String,
        literal: String,
        reason: String,
    },

    /// The value cannot be written as this datatype.
    #[error("Cannot format {value_type} value as {datatype}")]
    UnsupportedValue {
        datatype: String,
        value_type: String,
    },
}

impl CodecError {
    pub fn invalid_literal(
        datatype: impl Into<String>,
        literal: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidLiteral {
            datatype: datatype.into(),
            literal: literal.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported_value(datatype: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self::UnsupportedValue {
            datatype: datatype.into(),
            value_type: value_type.into(),
        }
    }
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
