//! Encoding errors.

use thiserror::Error;

/// Errors raised while turning typed values into GraphQL text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EncodeError {
    /// An associative map used a key that does not encode to a string.
    #[error("unsupported map key kind `{kind}`, must be of kind string")]
    UnsupportedMapKey {
        /// Kind of the offending key.
        kind: &'static str,
    },

    /// A named parameter resolved to no output at all.
    #[error("invalid input for `{name}` parameter: value encodes to nothing")]
    AbsentParameter {
        /// Parameter name.
        name: String,
    },

    /// A named parameter holds a value kind with no literal form.
    #[error("invalid input for `{name}` parameter: unsupported value kind `{kind}`")]
    UnsupportedParameter {
        /// Parameter name.
        name: String,
        /// Kind of the value.
        kind: &'static str,
    },

    /// A nested failure while encoding a named parameter.
    #[error("failed to encode `{name}` parameter: {source}")]
    Parameter {
        /// Parameter name.
        name: String,
        /// Underlying failure.
        #[source]
        source: Box<EncodeError>,
    },

    /// The selection walk exceeded the maximum depth, usually a self-referential shape.
    #[error("selection exceeds maximum depth at `{path}`")]
    SelectionTooDeep {
        /// Path at which the limit was hit.
        path: String,
    },

    /// Writing a string literal failed.
    #[error("failed to write string literal: {0}")]
    Literal(#[from] serde_json::Error),
}

impl EncodeError {
    /// Wraps this error with the parameter it occurred under.
    #[must_use]
    pub fn in_parameter(self, name: impl Into<String>) -> Self {
        match self {
            // Already names its parameter.
            Self::AbsentParameter { .. }
            | Self::UnsupportedParameter { .. }
            | Self::Parameter { .. } => self,
            other => Self::Parameter {
                name: name.into(),
                source: Box::new(other),
            },
        }
    }
}

/// Result alias for encoding operations.
pub type EncodeResult<T> = std::result::Result<T, EncodeError>;
