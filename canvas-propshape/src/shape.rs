//! The shape value and its classification.
//!
//! A [`PropShape`] is a normalized JSON-Schema fragment describing one
//! component prop, tagged with its primitive type. It is the input to both
//! producer operations: requirement production (here, since it dispatches on
//! the type tag) and storable-shape resolution (`storable`).

use crate::error::{Result, ShapeError};
use crate::format::StringFormat;
use crate::requirement::{
    anchor_pattern, DataTypeShapeRequirement, RequirementOutcome, StringSemantics,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use tracing::debug;

/// Schema keywords the engine reads.
pub(crate) mod keyword {
    pub const TYPE: &str = "type";
    pub const ENUM: &str = "enum";
    pub const PATTERN: &str = "pattern";
    pub const FORMAT: &str = "format";
    pub const MAX_LENGTH: &str = "maxLength";
    pub const MINIMUM: &str = "minimum";
    pub const MAXIMUM: &str = "maximum";
    pub const EXCLUSIVE_MINIMUM: &str = "exclusiveMinimum";
    pub const EXCLUSIVE_MAXIMUM: &str = "exclusiveMaximum";
    pub const MULTIPLE_OF: &str = "multipleOf";
    pub const CONTENT_MEDIA_TYPE: &str = "contentMediaType";
    pub const ITEMS: &str = "items";
    pub const MAX_ITEMS: &str = "maxItems";
    pub const REF: &str = "$ref";
    pub const X_REF: &str = "x-ref";
    pub const X_FORMATTING_CONTEXT: &str = "x-formatting-context";
    pub const X_ALLOWED_SCHEMES: &str = "x-allowed-schemes";
    pub const X_REQUIRED_VARIABLES: &str = "x-required-variables";
}

pub(crate) const TEXT_HTML: &str = "text/html";

/// The JSON-Schema primitive type of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonSchemaType {
    Boolean,
    String,
    Integer,
    Number,
    Array,
    Object,
}

impl JsonSchemaType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "boolean" => Some(JsonSchemaType::Boolean),
            "string" => Some(JsonSchemaType::String),
            "integer" => Some(JsonSchemaType::Integer),
            "number" => Some(JsonSchemaType::Number),
            "array" => Some(JsonSchemaType::Array),
            "object" => Some(JsonSchemaType::Object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JsonSchemaType::Boolean => "boolean",
            JsonSchemaType::String => "string",
            JsonSchemaType::Integer => "integer",
            JsonSchemaType::Number => "number",
            JsonSchemaType::Array => "array",
            JsonSchemaType::Object => "object",
        }
    }

    /// Whether values of this type are atomic. A boolean is always scalar
    /// and never iterable.
    pub fn is_scalar(&self) -> bool {
        match self {
            JsonSchemaType::Boolean
            | JsonSchemaType::String
            | JsonSchemaType::Integer
            | JsonSchemaType::Number => true,
            JsonSchemaType::Array | JsonSchemaType::Object => false,
        }
    }

    /// Whether values of this type contain nested values.
    pub fn is_traversable(&self) -> bool {
        !self.is_scalar()
    }
}

impl fmt::Display for JsonSchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `x-formatting-context` vocabulary for HTML string props.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormattingContext {
    Block,
    Inline,
}

impl FormattingContext {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "block" => Some(FormattingContext::Block),
            "inline" => Some(FormattingContext::Inline),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormattingContext::Block => "block",
            FormattingContext::Inline => "inline",
        }
    }
}

/// A normalized schema fragment describing one component prop.
///
/// Constructed once from the normalizer's output and consumed read-only; the
/// type tag is derived from the fragment's `type` keyword, so the two can
/// never disagree. Serializes as the raw schema object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct PropShape {
    ty: JsonSchemaType,
    schema: Map<String, Value>,
}

impl PropShape {
    pub fn new(schema: Map<String, Value>) -> Result<Self> {
        let ty = match schema.get(keyword::TYPE) {
            None => return Err(ShapeError::MissingType),
            Some(Value::String(raw)) => {
                JsonSchemaType::parse(raw).ok_or_else(|| ShapeError::UnknownType {
                    value: raw.clone(),
                })?
            }
            Some(_) => return Err(ShapeError::keyword(keyword::TYPE, "a string")),
        };
        Ok(PropShape { ty, schema })
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(schema) => Self::new(schema),
            _ => Err(ShapeError::NotAnObject),
        }
    }

    /// The primitive type this shape was classified as.
    pub fn json_schema_type(&self) -> JsonSchemaType {
        self.ty
    }

    pub fn schema(&self) -> &Map<String, Value> {
        &self.schema
    }

    /// Raw access to one schema keyword.
    pub fn keyword(&self, key: &str) -> Option<&Value> {
        self.schema.get(key)
    }

    /// Canonical JSON rendering of the schema (keys sorted), usable as a
    /// structural cache key.
    pub fn canonical_json(&self) -> String {
        Value::Object(self.schema.clone()).to_string()
    }

    // --- Typed keyword accessors ---

    pub(crate) fn str_keyword(&self, key: &str) -> Result<Option<&str>> {
        match self.schema.get(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value)),
            Some(_) => Err(ShapeError::keyword(key, "a string")),
        }
    }

    pub(crate) fn number_keyword(&self, key: &str) -> Result<Option<&Number>> {
        match self.schema.get(key) {
            None => Ok(None),
            Some(Value::Number(value)) => Ok(Some(value)),
            Some(_) => Err(ShapeError::keyword(key, "a number")),
        }
    }

    pub(crate) fn enum_values(&self) -> Result<Option<&Vec<Value>>> {
        match self.schema.get(keyword::ENUM) {
            None => Ok(None),
            Some(Value::Array(values)) => Ok(Some(values)),
            Some(_) => Err(ShapeError::keyword(keyword::ENUM, "an array")),
        }
    }

    pub(crate) fn string_list_keyword(&self, key: &str) -> Result<Option<Vec<String>>> {
        let Some(value) = self.schema.get(key) else {
            return Ok(None);
        };
        let Value::Array(values) = value else {
            return Err(ShapeError::keyword(key, "a list of strings"));
        };
        let mut out = Vec::with_capacity(values.len());
        for value in values {
            match value {
                Value::String(s) => out.push(s.clone()),
                _ => return Err(ShapeError::keyword(key, "a list of strings")),
            }
        }
        Ok(Some(out))
    }

    pub(crate) fn content_media_type(&self) -> Result<Option<&str>> {
        self.str_keyword(keyword::CONTENT_MEDIA_TYPE)
    }

    /// The reference keyword, under either of its normalized spellings.
    pub(crate) fn reference(&self) -> Result<Option<&str>> {
        if let Some(reference) = self.str_keyword(keyword::REF)? {
            return Ok(Some(reference));
        }
        self.str_keyword(keyword::X_REF)
    }

    /// The parsed `format` keyword. Unrecognized formats are ignorable
    /// annotations and read as absent.
    pub(crate) fn string_format(&self) -> Result<Option<StringFormat>> {
        let Some(raw) = self.str_keyword(keyword::FORMAT)? else {
            return Ok(None);
        };
        let parsed = StringFormat::parse(raw);
        if parsed.is_none() {
            debug!("ignoring unrecognized string format: {raw}");
        }
        Ok(parsed)
    }

    pub(crate) fn formatting_context_raw(&self) -> Result<Option<&str>> {
        self.str_keyword(keyword::X_FORMATTING_CONTEXT)
    }

    /// The formatting context, treating absence as block. Unknown values are
    /// a contract violation here; the storable resolver tolerates them.
    pub(crate) fn formatting_context(&self) -> Result<FormattingContext> {
        match self.formatting_context_raw()? {
            None => Ok(FormattingContext::Block),
            Some(raw) => {
                FormattingContext::parse(raw).ok_or_else(|| ShapeError::UnknownFormattingContext {
                    value: raw.to_string(),
                })
            }
        }
    }

    // --- Requirement production ---

    /// Produces the constraint set an existing structured-data field must
    /// satisfy to hold values of this shape.
    ///
    /// Only scalar shapes are in contract here; array and object shapes go
    /// through the storable resolution path, and passing one is a caller
    /// bug.
    pub fn to_data_type_shape_requirements(&self) -> Result<RequirementOutcome> {
        match self.ty {
            JsonSchemaType::Boolean => Ok(RequirementOutcome::Unconstrained),
            JsonSchemaType::String => self.string_requirements(),
            JsonSchemaType::Integer | JsonSchemaType::Number => self.numeric_requirements(),
            JsonSchemaType::Array | JsonSchemaType::Object => {
                Err(ShapeError::TraversableRequirements { ty: self.ty })
            }
        }
    }

    // First matching rule wins; the order is load-bearing (an HTML prop with
    // an enum is still an HTML prop).
    fn string_requirements(&self) -> Result<RequirementOutcome> {
        if self.content_media_type()? == Some(TEXT_HTML) {
            return self.html_requirements();
        }
        if let Some(choices) = self.enum_values()? {
            return Ok(RequirementOutcome::single(
                DataTypeShapeRequirement::Choice {
                    choices: choices.clone(),
                },
            ));
        }

        let format = self.string_format()?;
        let pattern = self.str_keyword(keyword::PATTERN)?;
        match (format, pattern) {
            (Some(format), Some(pattern)) => {
                let regex = RequirementOutcome::single(DataTypeShapeRequirement::Regex {
                    pattern: anchor_pattern(pattern),
                });
                Ok(format.to_data_type_shape_requirements(self)?.and(regex))
            }
            (None, Some(pattern)) => Ok(RequirementOutcome::single(
                DataTypeShapeRequirement::Regex {
                    pattern: anchor_pattern(pattern),
                },
            )),
            (Some(format), None) => format.to_data_type_shape_requirements(self),
            (None, None) => Ok(RequirementOutcome::single(
                DataTypeShapeRequirement::StringSemantics {
                    semantics: StringSemantics::Prose,
                },
            )),
        }
    }

    fn html_requirements(&self) -> Result<RequirementOutcome> {
        match self.formatting_context()? {
            FormattingContext::Block => Ok(RequirementOutcome::single(
                DataTypeShapeRequirement::StringSemantics {
                    semantics: StringSemantics::Markup,
                },
            )),
            FormattingContext::Inline => {
                debug!("inline formatting context is recognized but not yet supported");
                Ok(RequirementOutcome::NotYetSupported)
            }
        }
    }

    fn numeric_requirements(&self) -> Result<RequirementOutcome> {
        if let Some(choices) = self.enum_values()? {
            return Ok(RequirementOutcome::single(
                DataTypeShapeRequirement::Choice {
                    choices: choices.clone(),
                },
            ));
        }

        let min = self.number_keyword(keyword::MINIMUM)?;
        let max = self.number_keyword(keyword::MAXIMUM)?;
        if min.is_some() || max.is_some() {
            return Ok(RequirementOutcome::single(
                DataTypeShapeRequirement::Range {
                    min: min.cloned(),
                    max: max.cloned(),
                },
            ));
        }

        for key in [
            keyword::MULTIPLE_OF,
            keyword::EXCLUSIVE_MINIMUM,
            keyword::EXCLUSIVE_MAXIMUM,
        ] {
            if self.schema.contains_key(key) {
                debug!("numeric keyword '{key}' is recognized but not yet supported");
                return Ok(RequirementOutcome::NotYetSupported);
            }
        }

        Ok(RequirementOutcome::Unconstrained)
    }
}

impl TryFrom<Map<String, Value>> for PropShape {
    type Error = ShapeError;

    fn try_from(schema: Map<String, Value>) -> Result<Self> {
        PropShape::new(schema)
    }
}

impl From<PropShape> for Map<String, Value> {
    fn from(shape: PropShape) -> Self {
        shape.schema
    }
}
