//! Storable shape resolution: what storage to provision for a shape.
//!
//! Where requirement production asks "does existing data match?", this asks
//! "what should we build so a human can author a value?". The answer cites
//! the `canvas-fieldspec` vocabulary and is consumed by an external
//! provisioning step; nothing here mutates storage.

use crate::catalog::{CompositeShape, CompositeShapeCatalog, IMAGE_SHAPE_NAME, VIDEO_SHAPE_NAME};
use crate::error::{Result, ShapeError};
use crate::format::{media_family, MediaFamily, StringFormat};
use crate::shape::{keyword, FormattingContext, JsonSchemaType, PropShape, TEXT_HTML};
use canvas_fieldspec::{
    instance_settings, storage_settings, Cardinality, FieldType, FieldTypePropExpression,
    FieldWidget, InstanceSettings, StorageSettings,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// The schema pattern recognized as "any character, including newlines".
pub const ANY_CHARS_PATTERN: &str = r"[\s\S]*";

/// The one file extension video composites accept.
pub const VIDEO_FILE_EXTENSION: &str = "mp4";

/// A storage recommendation for one prop: field type and value property,
/// widget, cardinality, and settings.
///
/// Always "what to build", never "what exists"; provisioning it is the
/// caller's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorablePropShape {
    /// The shape this recommendation was derived from.
    pub shape: PropShape,
    /// Where the prop value lives inside the provisioned field.
    pub field_type_prop: FieldTypePropExpression,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_widget: Option<FieldWidget>,
    pub cardinality: Cardinality,
    #[serde(skip_serializing_if = "StorageSettings::is_empty", default)]
    pub field_storage_settings: StorageSettings,
    #[serde(skip_serializing_if = "InstanceSettings::is_empty", default)]
    pub field_instance_settings: InstanceSettings,
}

impl StorablePropShape {
    pub fn new(shape: PropShape, field_type_prop: FieldTypePropExpression) -> Self {
        StorablePropShape {
            shape,
            field_type_prop,
            field_widget: None,
            cardinality: Cardinality::Single,
            field_storage_settings: StorageSettings::new(),
            field_instance_settings: InstanceSettings::new(),
        }
    }

    pub fn with_widget(mut self, widget: FieldWidget) -> Self {
        self.field_widget = Some(widget);
        self
    }

    pub fn with_storage_setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.field_storage_settings.insert(key.into(), value);
        self
    }

    pub fn with_instance_setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.field_instance_settings.insert(key.into(), value);
        self
    }

    /// The field type at the root of the prop expression.
    pub fn field_type(&self) -> FieldType {
        self.field_type_prop.field_type()
    }
}

impl PropShape {
    /// Resolves the storage recommendation for this shape.
    ///
    /// `Ok(None)` means Canvas has no good authoring UX for the shape; that
    /// is a normal outcome, not a failure. Errors are reserved for fragments
    /// the upstream normalizer should never have produced.
    pub fn compute_storable_prop_shape(
        &self,
        catalog: &CompositeShapeCatalog,
    ) -> Result<Option<StorablePropShape>> {
        match self.json_schema_type() {
            JsonSchemaType::Boolean => Ok(Some(
                StorablePropShape::new(
                    self.clone(),
                    FieldTypePropExpression::value(FieldType::Boolean),
                )
                .with_widget(FieldWidget::Checkbox),
            )),
            JsonSchemaType::String => string_shape(self),
            JsonSchemaType::Integer => integer_shape(self),
            JsonSchemaType::Number => number_shape(self),
            JsonSchemaType::Array => array_shape(self, catalog),
            JsonSchemaType::Object => object_shape(self, catalog),
        }
    }
}

// --- Arrays ---

const ARRAY_KEYWORDS: [&str; 3] = [keyword::TYPE, keyword::ITEMS, keyword::MAX_ITEMS];

// Multi-value storage can cap the number of values and that is all:
// minItems has no representation (required-ness is the only way to say
// "non-empty"), so the producer strips it before we get here.
fn array_shape(
    shape: &PropShape,
    catalog: &CompositeShapeCatalog,
) -> Result<Option<StorablePropShape>> {
    for key in shape.schema().keys() {
        if !ARRAY_KEYWORDS.contains(&key.as_str()) {
            return Err(ShapeError::UnexpectedArrayKeyword {
                keyword: key.clone(),
            });
        }
    }

    let cardinality = match shape.number_keyword(keyword::MAX_ITEMS)? {
        None => Cardinality::Unlimited,
        Some(n) => {
            let value = n
                .as_i64()
                .ok_or_else(|| ShapeError::keyword(keyword::MAX_ITEMS, "an integer"))?;
            if value < 2 {
                return Err(ShapeError::InvalidMaxItems { value });
            }
            let value = u32::try_from(value)
                .map_err(|_| ShapeError::keyword(keyword::MAX_ITEMS, "an integer within range"))?;
            Cardinality::Multiple(value)
        }
    };

    let Some(items) = shape.keyword(keyword::ITEMS) else {
        debug!("array shape without items has no storable form");
        return Ok(None);
    };
    let item_shape = PropShape::from_value(items.clone())?;
    let Some(item_storable) = item_shape.compute_storable_prop_shape(catalog)? else {
        debug!("array items have no storable form");
        return Ok(None);
    };

    Ok(Some(StorablePropShape {
        shape: shape.clone(),
        cardinality,
        ..item_storable
    }))
}

// --- Strings ---

// First matching row wins, same order as requirement production where the
// two tables overlap.
fn string_shape(shape: &PropShape) -> Result<Option<StorablePropShape>> {
    if shape.content_media_type()? == Some(TEXT_HTML) {
        return html_string_shape(shape);
    }

    if shape.reference()?.is_some() {
        debug!("string props with a reference have no direct storable form");
        return Ok(None);
    }

    if let Some(choices) = shape.enum_values()? {
        let has_empty_choice = choices
            .iter()
            .any(|choice| matches!(choice, Value::String(s) if s.is_empty()));
        if has_empty_choice {
            debug!("enum containing the empty string has no storable form");
            return Ok(None);
        }
        return Ok(Some(list_shape(shape, FieldType::ListText)));
    }

    if let Some(format) = shape.string_format()? {
        return format_string_shape(shape, format);
    }

    if let Some(pattern) = shape.str_keyword(keyword::PATTERN)? {
        if pattern == ANY_CHARS_PATTERN {
            return Ok(Some(
                StorablePropShape::new(
                    shape.clone(),
                    FieldTypePropExpression::value(FieldType::LongText),
                )
                .with_widget(FieldWidget::Textarea),
            ));
        }
        debug!("no field type stores pattern-constrained strings");
        return Ok(None);
    }

    let mut storable = StorablePropShape::new(
        shape.clone(),
        FieldTypePropExpression::value(FieldType::ShortText),
    )
    .with_widget(FieldWidget::Textfield);
    if let Some(max_length) = shape.number_keyword(keyword::MAX_LENGTH)? {
        storable = storable.with_storage_setting(
            storage_settings::MAX_LENGTH,
            Value::Number(max_length.clone()),
        );
    }
    Ok(Some(storable))
}

fn html_string_shape(shape: &PropShape) -> Result<Option<StorablePropShape>> {
    let context = match shape.formatting_context_raw()? {
        None => FormattingContext::Block,
        Some(raw) => match FormattingContext::parse(raw) {
            Some(context) => context,
            None => {
                debug!("formatting context '{raw}' has no storable form");
                return Ok(None);
            }
        },
    };

    let field_type = match context {
        FormattingContext::Block => FieldType::LongText,
        FormattingContext::Inline => FieldType::ShortText,
    };
    Ok(Some(
        StorablePropShape::new(shape.clone(), FieldTypePropExpression::value(field_type))
            .with_widget(FieldWidget::Text)
            .with_instance_setting(instance_settings::TEXT_FORMAT, json!(context.as_str())),
    ))
}

fn list_shape(shape: &PropShape, field_type: FieldType) -> StorablePropShape {
    StorablePropShape::new(shape.clone(), FieldTypePropExpression::value(field_type))
        .with_widget(FieldWidget::Select)
        .with_storage_setting(
            storage_settings::ALLOWED_VALUES,
            json!(storage_settings::DYNAMIC),
        )
}

fn format_string_shape(
    shape: &PropShape,
    format: StringFormat,
) -> Result<Option<StorablePropShape>> {
    if matches!(
        format,
        StringFormat::Uri | StringFormat::UriReference | StringFormat::Iri | StringFormat::IriReference
    ) {
        if let Some(media_type) = shape.content_media_type()? {
            match media_family(media_type) {
                Some(MediaFamily::Image) => {
                    // The string value is the image's URL, reached through
                    // the referenced file entity.
                    return Ok(Some(
                        StorablePropShape::new(
                            shape.clone(),
                            FieldTypePropExpression::reference(FieldType::Image, "entity", "uri"),
                        )
                        .with_widget(FieldWidget::Image),
                    ));
                }
                Some(MediaFamily::Video) => {
                    return Ok(Some(
                        StorablePropShape::new(
                            shape.clone(),
                            FieldTypePropExpression::reference(FieldType::File, "entity", "uri"),
                        )
                        .with_widget(FieldWidget::GenericFile)
                        .with_instance_setting(
                            instance_settings::FILE_EXTENSIONS,
                            json!(VIDEO_FILE_EXTENSION),
                        ),
                    ));
                }
                None => {}
            }
        }
    }

    match format {
        StringFormat::DateTime => Ok(Some(datetime_shape(shape, storage_settings::DATETIME))),
        StringFormat::Date => Ok(Some(datetime_shape(shape, storage_settings::DATE))),
        StringFormat::Email => Ok(Some(
            StorablePropShape::new(
                shape.clone(),
                FieldTypePropExpression::value(FieldType::Email),
            )
            .with_widget(FieldWidget::Email),
        )),
        StringFormat::Uri | StringFormat::UriReference => Ok(Some(
            StorablePropShape::new(
                shape.clone(),
                FieldTypePropExpression::prop(FieldType::Link, "uri"),
            )
            .with_widget(FieldWidget::Link)
            .with_instance_setting(
                instance_settings::RELATIVE_ALLOWED,
                json!(format.relative_allowed()),
            ),
        )),
        StringFormat::Iri | StringFormat::IriReference => {
            debug!("link storage holds URIs, not IRIs");
            Ok(None)
        }
        StringFormat::Time
        | StringFormat::Duration
        | StringFormat::IdnEmail
        | StringFormat::Hostname
        | StringFormat::IdnHostname
        | StringFormat::Ipv4
        | StringFormat::Ipv6
        | StringFormat::Uuid
        | StringFormat::UriTemplate
        | StringFormat::JsonPointer
        | StringFormat::RelativeJsonPointer
        | StringFormat::Regex => {
            debug!("format '{format}' has no storable form");
            Ok(None)
        }
    }
}

fn datetime_shape(shape: &PropShape, granularity: &str) -> StorablePropShape {
    StorablePropShape::new(
        shape.clone(),
        FieldTypePropExpression::value(FieldType::DateTime),
    )
    .with_widget(FieldWidget::Datetime)
    .with_storage_setting(storage_settings::DATETIME_TYPE, json!(granularity))
}

// --- Numerics ---

fn integer_shape(shape: &PropShape) -> Result<Option<StorablePropShape>> {
    if shape.reference()?.is_some() {
        debug!("integer props with a reference have no storable form");
        return Ok(None);
    }
    if shape.enum_values()?.is_some() {
        return Ok(Some(list_shape(shape, FieldType::ListInteger)));
    }

    let (min, max) = integer_bounds(shape)?;
    Ok(Some(numeric_shape(
        shape,
        FieldType::Integer,
        min.map(|v| json!(v)),
        max.map(|v| json!(v)),
    )))
}

fn number_shape(shape: &PropShape) -> Result<Option<StorablePropShape>> {
    if shape.reference()?.is_some() {
        debug!("number props with a reference have no storable form");
        return Ok(None);
    }
    if shape.enum_values()?.is_some() {
        return Ok(Some(list_shape(shape, FieldType::ListFloat)));
    }

    let (min, max) = float_bounds(shape)?;
    Ok(Some(numeric_shape(
        shape,
        FieldType::Float,
        min.map(|v| json!(v)),
        max.map(|v| json!(v)),
    )))
}

fn numeric_shape(
    shape: &PropShape,
    field_type: FieldType,
    min: Option<Value>,
    max: Option<Value>,
) -> StorablePropShape {
    let mut storable =
        StorablePropShape::new(shape.clone(), FieldTypePropExpression::value(field_type))
            .with_widget(FieldWidget::Number);
    if let Some(min) = min {
        storable = storable.with_instance_setting(instance_settings::MIN, min);
    }
    if let Some(max) = max {
        storable = storable.with_instance_setting(instance_settings::MAX, max);
    }
    storable
}

// Exclusive bounds shift by one; when both forms are present the tighter
// bound wins.
fn integer_bounds(shape: &PropShape) -> Result<(Option<i64>, Option<i64>)> {
    let minimum = int_keyword(shape, keyword::MINIMUM)?;
    let exclusive_minimum =
        int_keyword(shape, keyword::EXCLUSIVE_MINIMUM)?.map(|v| v.saturating_add(1));
    let min = match (minimum, exclusive_minimum) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };

    let maximum = int_keyword(shape, keyword::MAXIMUM)?;
    let exclusive_maximum =
        int_keyword(shape, keyword::EXCLUSIVE_MAXIMUM)?.map(|v| v.saturating_sub(1));
    let max = match (maximum, exclusive_maximum) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };

    Ok((min, max))
}

// Floats shift to the next representable value instead of a whole step.
fn float_bounds(shape: &PropShape) -> Result<(Option<f64>, Option<f64>)> {
    let minimum = float_keyword(shape, keyword::MINIMUM)?;
    let exclusive_minimum = float_keyword(shape, keyword::EXCLUSIVE_MINIMUM)?.map(f64::next_up);
    let min = match (minimum, exclusive_minimum) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };

    let maximum = float_keyword(shape, keyword::MAXIMUM)?;
    let exclusive_maximum = float_keyword(shape, keyword::EXCLUSIVE_MAXIMUM)?.map(f64::next_down);
    let max = match (maximum, exclusive_maximum) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };

    Ok((min, max))
}

fn int_keyword(shape: &PropShape, key: &str) -> Result<Option<i64>> {
    match shape.number_keyword(key)? {
        None => Ok(None),
        Some(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| ShapeError::keyword(key, "an integer")),
    }
}

fn float_keyword(shape: &PropShape, key: &str) -> Result<Option<f64>> {
    match shape.number_keyword(key)? {
        None => Ok(None),
        Some(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| ShapeError::keyword(key, "a number")),
    }
}

// --- Objects ---

fn object_shape(
    shape: &PropShape,
    catalog: &CompositeShapeCatalog,
) -> Result<Option<StorablePropShape>> {
    let Some(reference) = shape.reference()? else {
        debug!("object shapes without a reference have no storable form");
        return Ok(None);
    };
    let Some(composite) = catalog.resolve(reference) else {
        debug!("unresolvable composite reference: {reference}");
        return Ok(None);
    };

    match composite.name() {
        IMAGE_SHAPE_NAME => Ok(Some(image_shape(shape, composite))),
        VIDEO_SHAPE_NAME => Ok(Some(video_shape(shape))),
        other => {
            debug!("composite shape '{other}' has no storable mapping");
            Ok(None)
        }
    }
}

fn image_shape(shape: &PropShape, composite: &CompositeShape) -> StorablePropShape {
    let props = composite.property_names().map(|name| {
        let expression = if name == "src" {
            // src is the referenced file's URL, not a column on the field
            FieldTypePropExpression::reference(FieldType::Image, "entity", "uri")
        } else {
            FieldTypePropExpression::prop(FieldType::Image, name)
        };
        (name.to_string(), expression)
    });
    StorablePropShape::new(
        shape.clone(),
        FieldTypePropExpression::object(FieldType::Image, props),
    )
    .with_widget(FieldWidget::Image)
}

fn video_shape(shape: &PropShape) -> StorablePropShape {
    // The video mapping is fixed: src only, no alt/width/height.
    let props = [(
        "src".to_string(),
        FieldTypePropExpression::reference(FieldType::File, "entity", "uri"),
    )];
    StorablePropShape::new(
        shape.clone(),
        FieldTypePropExpression::object(FieldType::File, props),
    )
    .with_widget(FieldWidget::GenericFile)
    .with_instance_setting(
        instance_settings::FILE_EXTENSIONS,
        json!(VIDEO_FILE_EXTENSION),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::IMAGE_SHAPE_REF;
    use serde_json::json;

    fn shape(value: Value) -> PropShape {
        PropShape::from_value(value).unwrap()
    }

    fn resolve(value: Value) -> Option<StorablePropShape> {
        shape(value)
            .compute_storable_prop_shape(&CompositeShapeCatalog::builtin())
            .unwrap()
    }

    fn resolve_err(value: Value) -> ShapeError {
        shape(value)
            .compute_storable_prop_shape(&CompositeShapeCatalog::builtin())
            .unwrap_err()
    }

    #[test]
    fn test_boolean_becomes_checkbox() {
        let storable = resolve(json!({"type": "boolean"})).unwrap();
        assert_eq!(storable.field_type(), FieldType::Boolean);
        assert_eq!(storable.field_widget, Some(FieldWidget::Checkbox));
        assert_eq!(storable.cardinality, Cardinality::Single);
        assert!(storable.field_storage_settings.is_empty());
        assert!(storable.field_instance_settings.is_empty());
    }

    #[test]
    fn test_html_block_becomes_long_text() {
        for schema in [
            json!({"type": "string", "contentMediaType": "text/html"}),
            json!({"type": "string", "contentMediaType": "text/html", "x-formatting-context": "block"}),
        ] {
            let storable = resolve(schema).unwrap();
            assert_eq!(storable.field_type(), FieldType::LongText);
            assert_eq!(storable.field_widget, Some(FieldWidget::Text));
            assert_eq!(
                storable.field_instance_settings.get("text_format"),
                Some(&json!("block"))
            );
        }
    }

    #[test]
    fn test_html_inline_becomes_short_text() {
        let storable = resolve(json!({
            "type": "string",
            "contentMediaType": "text/html",
            "x-formatting-context": "inline",
        }))
        .unwrap();
        assert_eq!(storable.field_type(), FieldType::ShortText);
        assert_eq!(storable.field_widget, Some(FieldWidget::Text));
        assert_eq!(
            storable.field_instance_settings.get("text_format"),
            Some(&json!("inline"))
        );
    }

    #[test]
    fn test_html_unknown_context_has_no_storable_form() {
        assert!(resolve(json!({
            "type": "string",
            "contentMediaType": "text/html",
            "x-formatting-context": "footnote",
        }))
        .is_none());
    }

    #[test]
    fn test_referenced_strings_have_no_storable_form() {
        assert!(resolve(json!({"type": "string", "$ref": "urn:defs:slug"})).is_none());
        assert!(resolve(json!({"type": "string", "x-ref": "urn:defs:slug"})).is_none());
    }

    #[test]
    fn test_enum_with_empty_string_has_no_storable_form() {
        assert!(resolve(json!({"type": "string", "enum": ["a", "b", ""]})).is_none());
    }

    #[test]
    fn test_string_enum_becomes_dynamic_select() {
        let storable = resolve(json!({"type": "string", "enum": ["draft", "published"]})).unwrap();
        assert_eq!(storable.field_type(), FieldType::ListText);
        assert_eq!(storable.field_widget, Some(FieldWidget::Select));
        assert_eq!(
            storable.field_storage_settings.get("allowed_values"),
            Some(&json!("dynamic"))
        );
    }

    #[test]
    fn test_date_formats_become_datetime_fields() {
        let datetime = resolve(json!({"type": "string", "format": "date-time"})).unwrap();
        assert_eq!(datetime.field_type(), FieldType::DateTime);
        assert_eq!(datetime.field_widget, Some(FieldWidget::Datetime));
        assert_eq!(
            datetime.field_storage_settings.get("datetime_type"),
            Some(&json!("datetime"))
        );

        let date = resolve(json!({"type": "string", "format": "date"})).unwrap();
        assert_eq!(
            date.field_storage_settings.get("datetime_type"),
            Some(&json!("date"))
        );
    }

    #[test]
    fn test_email_format_becomes_email_field() {
        let storable = resolve(json!({"type": "string", "format": "email"})).unwrap();
        assert_eq!(storable.field_type(), FieldType::Email);
        assert_eq!(storable.field_widget, Some(FieldWidget::Email));
    }

    #[test]
    fn test_uri_formats_become_link_fields() {
        let absolute = resolve(json!({"type": "string", "format": "uri"})).unwrap();
        assert_eq!(absolute.field_type(), FieldType::Link);
        assert_eq!(absolute.field_widget, Some(FieldWidget::Link));
        assert_eq!(
            absolute.field_instance_settings.get("relative_allowed"),
            Some(&json!(false))
        );

        let relative = resolve(json!({"type": "string", "format": "uri-reference"})).unwrap();
        assert_eq!(
            relative.field_instance_settings.get("relative_allowed"),
            Some(&json!(true))
        );
    }

    #[test]
    fn test_iri_formats_have_no_storable_form() {
        assert!(resolve(json!({"type": "string", "format": "iri"})).is_none());
        assert!(resolve(json!({"type": "string", "format": "iri-reference"})).is_none());
    }

    #[test]
    fn test_image_uri_strings_store_through_image_fields() {
        let storable = resolve(json!({
            "type": "string",
            "contentMediaType": "image/*",
            "format": "uri-reference",
            "x-allowed-schemes": ["http", "https"],
        }))
        .unwrap();
        assert_eq!(storable.field_type(), FieldType::Image);
        assert_eq!(storable.field_widget, Some(FieldWidget::Image));
        assert_eq!(
            storable.field_type_prop,
            FieldTypePropExpression::reference(FieldType::Image, "entity", "uri")
        );
    }

    #[test]
    fn test_video_uri_strings_store_through_file_fields() {
        let storable = resolve(json!({
            "type": "string",
            "contentMediaType": "video/*",
            "format": "uri",
        }))
        .unwrap();
        assert_eq!(storable.field_type(), FieldType::File);
        assert_eq!(storable.field_widget, Some(FieldWidget::GenericFile));
        assert_eq!(
            storable.field_instance_settings.get("file_extensions"),
            Some(&json!("mp4"))
        );
    }

    #[test]
    fn test_unstorable_formats_yield_none() {
        for format in ["time", "hostname", "uuid", "ipv4", "regex", "idn-email"] {
            assert!(
                resolve(json!({"type": "string", "format": format})).is_none(),
                "{format} should have no storable form"
            );
        }
    }

    #[test]
    fn test_any_chars_pattern_becomes_textarea() {
        let storable = resolve(json!({"type": "string", "pattern": "[\\s\\S]*"})).unwrap();
        assert_eq!(storable.field_type(), FieldType::LongText);
        assert_eq!(storable.field_widget, Some(FieldWidget::Textarea));
    }

    #[test]
    fn test_other_patterns_have_no_storable_form() {
        assert!(resolve(json!({"type": "string", "pattern": "[a-z]+"})).is_none());
    }

    #[test]
    fn test_max_length_becomes_textfield_setting() {
        let storable = resolve(json!({"type": "string", "maxLength": 255})).unwrap();
        assert_eq!(storable.field_type(), FieldType::ShortText);
        assert_eq!(storable.field_widget, Some(FieldWidget::Textfield));
        assert_eq!(
            storable.field_storage_settings.get("max_length"),
            Some(&json!(255))
        );
    }

    #[test]
    fn test_plain_string_becomes_unconstrained_textfield() {
        let storable = resolve(json!({"type": "string"})).unwrap();
        assert_eq!(storable.field_type(), FieldType::ShortText);
        assert_eq!(storable.field_widget, Some(FieldWidget::Textfield));
        assert!(storable.field_storage_settings.is_empty());
    }

    #[test]
    fn test_referenced_numerics_have_no_storable_form() {
        assert!(resolve(json!({"type": "integer", "$ref": "urn:defs:weight"})).is_none());
        assert!(resolve(json!({"type": "number", "$ref": "urn:defs:ratio"})).is_none());
    }

    #[test]
    fn test_numeric_enums_become_dynamic_selects() {
        let integers = resolve(json!({"type": "integer", "enum": [1, 2, 3]})).unwrap();
        assert_eq!(integers.field_type(), FieldType::ListInteger);
        assert_eq!(integers.field_widget, Some(FieldWidget::Select));

        let floats = resolve(json!({"type": "number", "enum": [0.5, 1.5]})).unwrap();
        assert_eq!(floats.field_type(), FieldType::ListFloat);
    }

    #[test]
    fn test_integer_bounds_become_number_widget_settings() {
        let storable = resolve(json!({"type": "integer", "minimum": 0, "maximum": 10})).unwrap();
        assert_eq!(storable.field_type(), FieldType::Integer);
        assert_eq!(storable.field_widget, Some(FieldWidget::Number));
        assert_eq!(
            storable.field_instance_settings.get("min"),
            Some(&json!(0))
        );
        assert_eq!(
            storable.field_instance_settings.get("max"),
            Some(&json!(10))
        );
    }

    #[test]
    fn test_exclusive_integer_bounds_shift_by_one() {
        let storable = resolve(json!({
            "type": "integer",
            "exclusiveMinimum": 0,
            "exclusiveMaximum": 10,
        }))
        .unwrap();
        assert_eq!(storable.field_instance_settings.get("min"), Some(&json!(1)));
        assert_eq!(storable.field_instance_settings.get("max"), Some(&json!(9)));
    }

    #[test]
    fn test_mixed_bounds_keep_the_tighter_one() {
        let storable = resolve(json!({
            "type": "integer",
            "minimum": 0,
            "exclusiveMinimum": 4,
        }))
        .unwrap();
        assert_eq!(storable.field_instance_settings.get("min"), Some(&json!(5)));
    }

    #[test]
    fn test_float_bounds_use_next_representable_values() {
        let storable = resolve(json!({"type": "number", "exclusiveMinimum": 1.0})).unwrap();
        assert_eq!(storable.field_type(), FieldType::Float);
        assert_eq!(
            storable.field_instance_settings.get("min"),
            Some(&json!(1.0_f64.next_up()))
        );

        let inclusive = resolve(json!({"type": "number", "minimum": 0.5})).unwrap();
        assert_eq!(
            inclusive.field_instance_settings.get("min"),
            Some(&json!(0.5))
        );
    }

    #[test]
    fn test_bare_numerics_become_unconstrained_number_widgets() {
        let integer = resolve(json!({"type": "integer"})).unwrap();
        assert_eq!(integer.field_type(), FieldType::Integer);
        assert!(integer.field_instance_settings.is_empty());

        let number = resolve(json!({"type": "number"})).unwrap();
        assert_eq!(number.field_type(), FieldType::Float);
    }

    #[test]
    fn test_image_composite_maps_all_sub_properties() {
        let storable = resolve(json!({
            "type": "object",
            "$ref": "json-schema-definitions://canvas.module/image",
        }))
        .unwrap();
        assert_eq!(storable.field_type(), FieldType::Image);
        assert_eq!(storable.field_widget, Some(FieldWidget::Image));

        let FieldTypePropExpression::ObjectProps { props, .. } = &storable.field_type_prop else {
            panic!("expected an object expression");
        };
        let names: Vec<&str> = props.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["src", "alt", "width", "height"]);
        assert_eq!(
            props.get("src"),
            Some(&FieldTypePropExpression::reference(
                FieldType::Image,
                "entity",
                "uri"
            ))
        );
        assert_eq!(
            props.get("alt"),
            Some(&FieldTypePropExpression::prop(FieldType::Image, "alt"))
        );
    }

    #[test]
    fn test_video_composite_maps_src_only() {
        let storable = resolve(json!({
            "type": "object",
            "$ref": "json-schema-definitions://canvas.module/video",
        }))
        .unwrap();
        assert_eq!(storable.field_type(), FieldType::File);
        assert_eq!(storable.field_widget, Some(FieldWidget::GenericFile));
        assert_eq!(
            storable.field_instance_settings.get("file_extensions"),
            Some(&json!("mp4"))
        );

        let FieldTypePropExpression::ObjectProps { props, .. } = &storable.field_type_prop else {
            panic!("expected an object expression");
        };
        let names: Vec<&str> = props.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["src"]);
    }

    #[test]
    fn test_unresolvable_objects_have_no_storable_form() {
        assert!(resolve(json!({"type": "object"})).is_none());
        assert!(resolve(json!({"type": "object", "$ref": "urn:unknown"})).is_none());

        let catalog = CompositeShapeCatalog::new().with_shape(
            "urn:example:banner",
            CompositeShape::new("banner").with_property("headline", json!({"type": "string"})),
        );
        let storable = shape(json!({"type": "object", "$ref": "urn:example:banner"}))
            .compute_storable_prop_shape(&catalog)
            .unwrap();
        assert!(storable.is_none());
    }

    #[test]
    fn test_composites_are_recognized_by_shape_name() {
        let catalog = CompositeShapeCatalog::new().with_shape(
            "urn:example:hero-image",
            CompositeShape::new("image")
                .with_property("src", json!({"type": "string", "format": "uri-reference"}))
                .with_property("alt", json!({"type": "string"})),
        );
        let storable = shape(json!({"type": "object", "$ref": "urn:example:hero-image"}))
            .compute_storable_prop_shape(&catalog)
            .unwrap()
            .unwrap();
        assert_eq!(storable.field_type(), FieldType::Image);

        let FieldTypePropExpression::ObjectProps { props, .. } = &storable.field_type_prop else {
            panic!("expected an object expression");
        };
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_array_sibling_keywords_are_hard_errors() {
        let err = resolve_err(json!({
            "type": "array",
            "items": {"type": "string"},
            "minItems": 1,
        }));
        assert!(matches!(
            err,
            ShapeError::UnexpectedArrayKeyword { keyword } if keyword == "minItems"
        ));
    }

    #[test]
    fn test_array_without_items_has_no_storable_form() {
        assert!(resolve(json!({"type": "array"})).is_none());
    }

    #[test]
    fn test_array_of_unstorable_items_has_no_storable_form() {
        assert!(resolve(json!({
            "type": "array",
            "items": {"type": "string", "pattern": "[a-z]+"},
        }))
        .is_none());
    }

    #[test]
    fn test_array_reuses_item_shape_with_cardinality() {
        let storable = resolve(json!({
            "type": "array",
            "items": {"type": "string", "format": "email"},
            "maxItems": 5,
        }))
        .unwrap();
        assert_eq!(storable.field_type(), FieldType::Email);
        assert_eq!(storable.field_widget, Some(FieldWidget::Email));
        assert_eq!(storable.cardinality, Cardinality::Multiple(5));
        assert_eq!(storable.shape.json_schema_type(), JsonSchemaType::Array);
    }

    #[test]
    fn test_array_without_max_items_is_unlimited() {
        let storable = resolve(json!({
            "type": "array",
            "items": {"type": "integer"},
        }))
        .unwrap();
        assert_eq!(storable.cardinality, Cardinality::Unlimited);
        assert_eq!(storable.field_type(), FieldType::Integer);
    }

    #[test]
    fn test_array_max_items_below_two_is_a_hard_error() {
        for max_items in [0_i64, 1] {
            let err = resolve_err(json!({
                "type": "array",
                "items": {"type": "string", "x-ref": "unknown"},
                "maxItems": max_items,
            }));
            assert!(matches!(err, ShapeError::InvalidMaxItems { value } if value == max_items));
        }
    }

    #[test]
    fn test_array_fractional_max_items_is_a_hard_error() {
        let err = resolve_err(json!({
            "type": "array",
            "items": {"type": "string"},
            "maxItems": 2.5,
        }));
        assert!(matches!(err, ShapeError::KeywordShape { .. }));
    }

    #[test]
    fn test_array_with_malformed_items_is_a_hard_error() {
        let err = resolve_err(json!({"type": "array", "items": "string"}));
        assert!(matches!(err, ShapeError::NotAnObject));
    }

    #[test]
    fn test_storable_shape_wire_form_skips_empty_settings() {
        let storable = resolve(json!({"type": "boolean"})).unwrap();
        let wire = serde_json::to_value(&storable).unwrap();
        assert_eq!(
            wire,
            json!({
                "shape": {"type": "boolean"},
                "field_type_prop": {"kind": "prop", "field_type": "boolean", "prop": "value"},
                "field_widget": "checkbox",
                "cardinality": 1,
            })
        );

        let back: StorablePropShape = serde_json::from_value(wire).unwrap();
        assert_eq!(back, storable);
    }

    #[test]
    fn test_image_ref_constant_matches_builtin_catalog() {
        let storable = resolve(json!({"type": "object", "$ref": IMAGE_SHAPE_REF})).unwrap();
        assert_eq!(storable.field_type(), FieldType::Image);
    }
}
