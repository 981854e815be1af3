//! Requirement values produced for the field-instance matcher.
//!
//! A requirement is an atomic constraint an existing structured-data field
//! must satisfy for its values to be usable as this prop. The engine only
//! cites constraint kinds; the matcher implements the checks. Wire form is
//! the `{"kind": …, …params}` object consumed by the matcher.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Semantic class of an otherwise unconstrained string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringSemantics {
    /// HTML markup, authored through a rich-text pipeline.
    Markup,
    /// Free-form prose.
    Prose,
}

/// Capability a matched field's runtime value must implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuntimeCapability {
    DateTime,
    Uri,
}

/// An atomic, independently checkable constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DataTypeShapeRequirement {
    Email,
    Hostname,
    Uuid,
    Ip {
        version: u8,
    },
    /// The value must be one of the listed choices, carried verbatim from the
    /// schema's `enum`.
    Choice {
        choices: Vec<Value>,
    },
    /// Inclusive numeric bounds; at least one is present.
    Range {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<Number>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<Number>,
    },
    /// The value must match `pattern` in whole-value anchored form.
    Regex {
        pattern: String,
    },
    /// The field's runtime value type must implement a capability.
    PrimitiveType {
        target_interface: RuntimeCapability,
    },
    StringSemantics {
        semantics: StringSemantics,
    },
    /// The value's media type must match the declared `contentMediaType`.
    MediaType {
        accepted: String,
    },
    /// The value must be a valid URI, or URI reference when
    /// `relative_allowed`.
    Uri {
        relative_allowed: bool,
    },
    /// The value's URI scheme must be on the allow-list.
    AllowedSchemes {
        schemes: Vec<String>,
    },
    /// The value must be a URI template declaring the listed variables.
    UriTemplateWithVariables {
        required_variables: Vec<String>,
    },
}

impl DataTypeShapeRequirement {
    /// The constraint identifier cited to the matcher.
    pub fn kind(&self) -> &'static str {
        match self {
            DataTypeShapeRequirement::Email => "Email",
            DataTypeShapeRequirement::Hostname => "Hostname",
            DataTypeShapeRequirement::Uuid => "Uuid",
            DataTypeShapeRequirement::Ip { .. } => "Ip",
            DataTypeShapeRequirement::Choice { .. } => "Choice",
            DataTypeShapeRequirement::Range { .. } => "Range",
            DataTypeShapeRequirement::Regex { .. } => "Regex",
            DataTypeShapeRequirement::PrimitiveType { .. } => "PrimitiveType",
            DataTypeShapeRequirement::StringSemantics { .. } => "StringSemantics",
            DataTypeShapeRequirement::MediaType { .. } => "MediaType",
            DataTypeShapeRequirement::Uri { .. } => "Uri",
            DataTypeShapeRequirement::AllowedSchemes { .. } => "AllowedSchemes",
            DataTypeShapeRequirement::UriTemplateWithVariables { .. } => "UriTemplateWithVariables",
        }
    }

    /// The capability tag, for the requirements that carry one.
    pub fn target_interface(&self) -> Option<RuntimeCapability> {
        match self {
            DataTypeShapeRequirement::PrimitiveType { target_interface } => {
                Some(*target_interface)
            }
            _ => None,
        }
    }
}

/// An ordered, non-empty conjunction of requirements.
///
/// A candidate field satisfies the set only if it satisfies every element;
/// order affects which failure a matcher reports first, never the boolean
/// result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<DataTypeShapeRequirement>",
    into = "Vec<DataTypeShapeRequirement>"
)]
pub struct DataTypeShapeRequirements(Vec<DataTypeShapeRequirement>);

impl DataTypeShapeRequirements {
    pub fn iter(&self) -> std::slice::Iter<'_, DataTypeShapeRequirement> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: the set is non-empty by construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn as_slice(&self) -> &[DataTypeShapeRequirement] {
        &self.0
    }

    /// Appends a requirement, keeping evaluation order.
    pub fn and(mut self, requirement: DataTypeShapeRequirement) -> Self {
        self.0.push(requirement);
        self
    }
}

impl From<DataTypeShapeRequirement> for DataTypeShapeRequirements {
    fn from(requirement: DataTypeShapeRequirement) -> Self {
        DataTypeShapeRequirements(vec![requirement])
    }
}

impl From<DataTypeShapeRequirements> for Vec<DataTypeShapeRequirement> {
    fn from(requirements: DataTypeShapeRequirements) -> Self {
        requirements.0
    }
}

impl TryFrom<Vec<DataTypeShapeRequirement>> for DataTypeShapeRequirements {
    type Error = String;

    fn try_from(requirements: Vec<DataTypeShapeRequirement>) -> Result<Self, Self::Error> {
        if requirements.is_empty() {
            return Err("requirement set cannot be empty".to_string());
        }
        Ok(DataTypeShapeRequirements(requirements))
    }
}

impl<'a> IntoIterator for &'a DataTypeShapeRequirements {
    type Item = &'a DataTypeShapeRequirement;
    type IntoIter = std::slice::Iter<'a, DataTypeShapeRequirement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Result of requirement production for a shape.
///
/// `Unconstrained` ("no constraint needed") and `NotYetSupported`
/// ("recognized but deliberately unimplemented") are distinct terminal
/// states: the first lets any field match, the second tells a caller to
/// report "not supported yet", and collapsing them would lose that.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum RequirementOutcome {
    Constraints {
        requirements: DataTypeShapeRequirements,
    },
    Unconstrained,
    NotYetSupported,
}

impl RequirementOutcome {
    pub fn single(requirement: DataTypeShapeRequirement) -> Self {
        RequirementOutcome::Constraints {
            requirements: requirement.into(),
        }
    }

    pub fn constraints(requirements: DataTypeShapeRequirements) -> Self {
        RequirementOutcome::Constraints { requirements }
    }

    /// Conjoins two outcomes, preserving order (`self` first).
    ///
    /// `Unconstrained` is the identity and `NotYetSupported` absorbs: a
    /// conjunction containing an unimplemented leg cannot be checked at all.
    pub fn and(self, other: RequirementOutcome) -> RequirementOutcome {
        match (self, other) {
            (RequirementOutcome::NotYetSupported, _) | (_, RequirementOutcome::NotYetSupported) => {
                RequirementOutcome::NotYetSupported
            }
            (RequirementOutcome::Unconstrained, other) => other,
            (outcome, RequirementOutcome::Unconstrained) => outcome,
            (
                RequirementOutcome::Constraints { requirements: left },
                RequirementOutcome::Constraints { requirements: right },
            ) => {
                let mut combined = left;
                for requirement in &right {
                    combined = combined.and(requirement.clone());
                }
                RequirementOutcome::Constraints {
                    requirements: combined,
                }
            }
        }
    }

    pub fn is_not_yet_supported(&self) -> bool {
        matches!(self, RequirementOutcome::NotYetSupported)
    }

    pub fn is_unconstrained(&self) -> bool {
        matches!(self, RequirementOutcome::Unconstrained)
    }

    /// The requirement set, when the outcome carries one.
    pub fn requirements(&self) -> Option<&DataTypeShapeRequirements> {
        match self {
            RequirementOutcome::Constraints { requirements } => Some(requirements),
            RequirementOutcome::Unconstrained | RequirementOutcome::NotYetSupported => None,
        }
    }
}

/// Converts a schema `pattern` (unanchored by definition) to the whole-value
/// anchored form `^(?:pattern)$`.
///
/// The non-capturing group keeps alternations intact. Patterns already in
/// the anchored form are returned unchanged, so the conversion is
/// idempotent.
pub fn anchor_pattern(pattern: &str) -> String {
    if pattern.starts_with("^(?:") && pattern.ends_with(")$") {
        return pattern.to_string();
    }
    format!("^(?:{pattern})$")
}
