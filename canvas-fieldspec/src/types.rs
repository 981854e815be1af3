//! Core vocabulary for describing provisionable field storage.
//!
//! These types carry no behavior of their own; they are the shared language
//! between the shape-evaluation engine (which recommends storage) and the
//! provisioning step (which creates it).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage-level settings, keyed by the names in [`storage_settings`].
pub type StorageSettings = IndexMap<String, serde_json::Value>;

/// Instance-level settings, keyed by the names in [`instance_settings`].
pub type InstanceSettings = IndexMap<String, serde_json::Value>;

/// Storage-level setting keys understood by provisioners.
pub mod storage_settings {
    /// Maximum character count for a short-text field.
    pub const MAX_LENGTH: &str = "max_length";

    /// Granularity of a date-time field: [`DATE`] or [`DATETIME`].
    pub const DATETIME_TYPE: &str = "datetime_type";
    pub const DATE: &str = "date";
    pub const DATETIME: &str = "datetime";

    /// Source of a list field's allowed values. The only recognized value is
    /// [`DYNAMIC`]: the provisioner wires the values up from the originating
    /// shape's enum at runtime instead of baking in a copy.
    pub const ALLOWED_VALUES: &str = "allowed_values";
    pub const DYNAMIC: &str = "dynamic";
}

/// Instance-level setting keys understood by provisioners.
pub mod instance_settings {
    /// Inclusive lower bound for a number widget.
    pub const MIN: &str = "min";

    /// Inclusive upper bound for a number widget.
    pub const MAX: &str = "max";

    /// Text format a text widget is restricted to.
    pub const TEXT_FORMAT: &str = "text_format";

    /// Whether a link widget accepts relative references (boolean).
    pub const RELATIVE_ALLOWED: &str = "relative_allowed";

    /// Space-separated file extensions a file widget accepts.
    pub const FILE_EXTENSIONS: &str = "file_extensions";
}

/// A concrete field storage type.
///
/// The list-* types store one of a fixed set of values; `image` and `file`
/// are composites backed by a referenced file entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Boolean,
    ShortText,
    LongText,
    ListText,
    ListInteger,
    ListFloat,
    Integer,
    Float,
    DateTime,
    Email,
    Link,
    Image,
    File,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::ShortText => "short-text",
            FieldType::LongText => "long-text",
            FieldType::ListText => "list-text",
            FieldType::ListInteger => "list-integer",
            FieldType::ListFloat => "list-float",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::DateTime => "date-time",
            FieldType::Email => "email",
            FieldType::Link => "link",
            FieldType::Image => "image",
            FieldType::File => "file",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The UI control used to author a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldWidget {
    Checkbox,
    /// Rich text editor restricted to a configured text format.
    Text,
    Textfield,
    Textarea,
    Select,
    Number,
    Datetime,
    Email,
    Link,
    Image,
    GenericFile,
}

impl FieldWidget {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldWidget::Checkbox => "checkbox",
            FieldWidget::Text => "text",
            FieldWidget::Textfield => "textfield",
            FieldWidget::Textarea => "textarea",
            FieldWidget::Select => "select",
            FieldWidget::Number => "number",
            FieldWidget::Datetime => "datetime",
            FieldWidget::Email => "email",
            FieldWidget::Link => "link",
            FieldWidget::Image => "image",
            FieldWidget::GenericFile => "generic-file",
        }
    }
}

impl fmt::Display for FieldWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many values a provisioned field may hold.
///
/// Serializes as the plain count (`1`, `5`, ...) or the string `"unlimited"`,
/// which is what provisioners consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "CardinalityRepr", try_from = "CardinalityRepr")]
pub enum Cardinality {
    /// Exactly one value.
    Single,
    /// Up to `N` values, `N >= 2`.
    Multiple(u32),
    /// No upper bound.
    Unlimited,
}

impl Cardinality {
    /// The value limit, or `None` when unlimited.
    pub fn limit(&self) -> Option<u32> {
        match self {
            Cardinality::Single => Some(1),
            Cardinality::Multiple(n) => Some(*n),
            Cardinality::Unlimited => None,
        }
    }

    pub fn is_multi_value(&self) -> bool {
        !matches!(self, Cardinality::Single)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Single => write!(f, "1"),
            Cardinality::Multiple(n) => write!(f, "{n}"),
            Cardinality::Unlimited => f.write_str("unlimited"),
        }
    }
}

/// Wire form of [`Cardinality`]: a count or the `"unlimited"` keyword.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CardinalityRepr {
    Count(u64),
    Keyword(String),
}

impl From<Cardinality> for CardinalityRepr {
    fn from(value: Cardinality) -> Self {
        match value {
            Cardinality::Single => CardinalityRepr::Count(1),
            Cardinality::Multiple(n) => CardinalityRepr::Count(u64::from(n)),
            Cardinality::Unlimited => CardinalityRepr::Keyword("unlimited".to_string()),
        }
    }
}

impl TryFrom<CardinalityRepr> for Cardinality {
    type Error = String;

    fn try_from(value: CardinalityRepr) -> Result<Self, Self::Error> {
        match value {
            CardinalityRepr::Count(0) => Err("cardinality must be at least 1".to_string()),
            CardinalityRepr::Count(1) => Ok(Cardinality::Single),
            CardinalityRepr::Count(n) => {
                let n = u32::try_from(n).map_err(|_| format!("cardinality {n} is out of range"))?;
                Ok(Cardinality::Multiple(n))
            }
            CardinalityRepr::Keyword(word) if word == "unlimited" => Ok(Cardinality::Unlimited),
            CardinalityRepr::Keyword(word) => Err(format!("unknown cardinality keyword: {word}")),
        }
    }
}
