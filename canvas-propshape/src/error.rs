//! Error types for prop shape evaluation

use crate::shape::JsonSchemaType;
use thiserror::Error;

/// Result type for shape evaluation operations
pub type Result<T> = std::result::Result<T, ShapeError>;

/// Contract violations in shape evaluation.
///
/// Every variant indicates input that the upstream schema normalizer should
/// never have produced, or a call that the caller should never have made.
/// Expected outcomes ("no recommendation", "not yet supported") are not
/// errors; see `RequirementOutcome`.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// Shape constructed from a non-object JSON value
    #[error("prop shape must be a json object")]
    NotAnObject,

    /// Schema fragment without a `type` keyword
    #[error("prop shape is missing the 'type' keyword")]
    MissingType,

    /// `type` keyword with an unrecognized value
    #[error("unrecognized json-schema type: {value}")]
    UnknownType { value: String },

    /// A keyword whose value has the wrong JSON type
    #[error("keyword '{keyword}' must be {expected}")]
    KeywordShape { keyword: String, expected: String },

    /// `x-formatting-context` outside the block/inline vocabulary
    #[error("unknown x-formatting-context: {value}")]
    UnknownFormattingContext { value: String },

    /// Scalar requirement production called on a traversable shape
    #[error("requirements for '{ty}' shapes must be produced by the array/object resolution path")]
    TraversableRequirements { ty: JsonSchemaType },

    /// Media-typed URI prop without the mandatory scheme allow-list
    #[error("x-allowed-schemes is required when contentMediaType is {media_type}")]
    MissingAllowedSchemes { media_type: String },

    /// Array shape carrying a keyword outside the allowed set
    #[error("array shapes allow only 'type', 'items', and 'maxItems': found '{keyword}'")]
    UnexpectedArrayKeyword { keyword: String },

    /// `maxItems` below the minimum sensible array bound
    #[error("array maxItems must be at least 2: got {value}")]
    InvalidMaxItems { value: i64 },
}

impl ShapeError {
    pub(crate) fn keyword(keyword: impl Into<String>, expected: impl Into<String>) -> Self {
        ShapeError::KeywordShape {
            keyword: keyword.into(),
            expected: expected.into(),
        }
    }
}
