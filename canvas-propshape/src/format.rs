//! Interpretation of the JSON-Schema `format` keyword for string props.

use crate::error::{Result, ShapeError};
use crate::requirement::{
    DataTypeShapeRequirement, DataTypeShapeRequirements, RequirementOutcome, RuntimeCapability,
};
use crate::shape::{keyword, PropShape};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// The string formats the engine recognizes.
///
/// Every dispatch over this enum is exhaustive, so adding a format forces
/// each table to take a position on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StringFormat {
    DateTime,
    Date,
    Time,
    Duration,
    Email,
    IdnEmail,
    Hostname,
    IdnHostname,
    Ipv4,
    Ipv6,
    Uuid,
    Uri,
    UriReference,
    Iri,
    IriReference,
    UriTemplate,
    JsonPointer,
    RelativeJsonPointer,
    Regex,
}

/// Media-type families with dedicated handling in the URI rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MediaFamily {
    Image,
    Video,
}

/// Classifies a declared `contentMediaType`, accepting both the wildcard
/// (`image/*`) and concrete subtypes (`image/png`).
pub(crate) fn media_family(media_type: &str) -> Option<MediaFamily> {
    if media_type.starts_with("image/") {
        Some(MediaFamily::Image)
    } else if media_type.starts_with("video/") {
        Some(MediaFamily::Video)
    } else {
        None
    }
}

impl StringFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "date-time" => Some(StringFormat::DateTime),
            "date" => Some(StringFormat::Date),
            "time" => Some(StringFormat::Time),
            "duration" => Some(StringFormat::Duration),
            "email" => Some(StringFormat::Email),
            "idn-email" => Some(StringFormat::IdnEmail),
            "hostname" => Some(StringFormat::Hostname),
            "idn-hostname" => Some(StringFormat::IdnHostname),
            "ipv4" => Some(StringFormat::Ipv4),
            "ipv6" => Some(StringFormat::Ipv6),
            "uuid" => Some(StringFormat::Uuid),
            "uri" => Some(StringFormat::Uri),
            "uri-reference" => Some(StringFormat::UriReference),
            "iri" => Some(StringFormat::Iri),
            "iri-reference" => Some(StringFormat::IriReference),
            "uri-template" => Some(StringFormat::UriTemplate),
            "json-pointer" => Some(StringFormat::JsonPointer),
            "relative-json-pointer" => Some(StringFormat::RelativeJsonPointer),
            "regex" => Some(StringFormat::Regex),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StringFormat::DateTime => "date-time",
            StringFormat::Date => "date",
            StringFormat::Time => "time",
            StringFormat::Duration => "duration",
            StringFormat::Email => "email",
            StringFormat::IdnEmail => "idn-email",
            StringFormat::Hostname => "hostname",
            StringFormat::IdnHostname => "idn-hostname",
            StringFormat::Ipv4 => "ipv4",
            StringFormat::Ipv6 => "ipv6",
            StringFormat::Uuid => "uuid",
            StringFormat::Uri => "uri",
            StringFormat::UriReference => "uri-reference",
            StringFormat::Iri => "iri",
            StringFormat::IriReference => "iri-reference",
            StringFormat::UriTemplate => "uri-template",
            StringFormat::JsonPointer => "json-pointer",
            StringFormat::RelativeJsonPointer => "relative-json-pointer",
            StringFormat::Regex => "regex",
        }
    }

    /// For URI-family formats: whether the variant accepts relative
    /// references. The same answer feeds the `Uri` requirement parameter and
    /// the link-widget settings.
    pub(crate) fn relative_allowed(&self) -> bool {
        matches!(self, StringFormat::UriReference | StringFormat::IriReference)
    }

    /// Produces the requirements a format implies for values of `shape`.
    pub fn to_data_type_shape_requirements(&self, shape: &PropShape) -> Result<RequirementOutcome> {
        match self {
            StringFormat::DateTime | StringFormat::Date => Ok(RequirementOutcome::single(
                DataTypeShapeRequirement::PrimitiveType {
                    target_interface: RuntimeCapability::DateTime,
                },
            )),
            StringFormat::Email | StringFormat::IdnEmail => {
                Ok(RequirementOutcome::single(DataTypeShapeRequirement::Email))
            }
            StringFormat::Hostname | StringFormat::IdnHostname => Ok(RequirementOutcome::single(
                DataTypeShapeRequirement::Hostname,
            )),
            StringFormat::Ipv4 => Ok(RequirementOutcome::single(
                DataTypeShapeRequirement::Ip { version: 4 },
            )),
            StringFormat::Ipv6 => Ok(RequirementOutcome::single(
                DataTypeShapeRequirement::Ip { version: 6 },
            )),
            StringFormat::Uuid => Ok(RequirementOutcome::single(DataTypeShapeRequirement::Uuid)),
            StringFormat::Uri
            | StringFormat::UriReference
            | StringFormat::Iri
            | StringFormat::IriReference => self.uri_requirements(shape),
            StringFormat::UriTemplate => {
                match shape.string_list_keyword(keyword::X_REQUIRED_VARIABLES)? {
                    Some(required_variables) => Ok(RequirementOutcome::single(
                        DataTypeShapeRequirement::UriTemplateWithVariables { required_variables },
                    )),
                    None => {
                        debug!("uri-template without x-required-variables is not yet supported");
                        Ok(RequirementOutcome::NotYetSupported)
                    }
                }
            }
            StringFormat::Time
            | StringFormat::Duration
            | StringFormat::JsonPointer
            | StringFormat::RelativeJsonPointer
            | StringFormat::Regex => {
                debug!("format '{self}' is recognized but not yet supported");
                Ok(RequirementOutcome::NotYetSupported)
            }
        }
    }

    // IRI variants are a superset of their URI counterparts and share the
    // rule. Media-typed props must pin their schemes: no component prop may
    // blindly accept an arbitrary URI scheme.
    fn uri_requirements(&self, shape: &PropShape) -> Result<RequirementOutcome> {
        let relative_allowed = self.relative_allowed();

        if let Some(media_type) = shape.content_media_type()? {
            if media_family(media_type).is_some() {
                let schemes = shape
                    .string_list_keyword(keyword::X_ALLOWED_SCHEMES)?
                    .ok_or_else(|| ShapeError::MissingAllowedSchemes {
                        media_type: media_type.to_string(),
                    })?;
                let requirements: DataTypeShapeRequirements =
                    DataTypeShapeRequirement::MediaType {
                        accepted: media_type.to_string(),
                    }
                    .into();
                let requirements = requirements
                    .and(DataTypeShapeRequirement::Uri { relative_allowed })
                    .and(DataTypeShapeRequirement::AllowedSchemes { schemes })
                    .and(DataTypeShapeRequirement::PrimitiveType {
                        target_interface: RuntimeCapability::Uri,
                    });
                return Ok(RequirementOutcome::constraints(requirements));
            }
        }

        let requirements: DataTypeShapeRequirements = DataTypeShapeRequirement::PrimitiveType {
            target_interface: RuntimeCapability::Uri,
        }
        .into();
        let mut requirements = requirements.and(DataTypeShapeRequirement::Uri { relative_allowed });
        if let Some(schemes) = shape.string_list_keyword(keyword::X_ALLOWED_SCHEMES)? {
            requirements = requirements.and(DataTypeShapeRequirement::AllowedSchemes { schemes });
        }
        Ok(RequirementOutcome::constraints(requirements))
    }
}

impl fmt::Display for StringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
