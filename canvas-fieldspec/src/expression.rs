//! Expressions locating where a prop value lives inside a provisioned field.

use crate::types::FieldType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A path from a field type to the storage slot(s) holding a prop value.
///
/// Scalar props use [`Prop`](FieldTypePropExpression::Prop) directly. Values
/// stored behind an entity reference (file-backed URLs) use
/// [`Reference`](FieldTypePropExpression::Reference). Composite shapes map
/// each of their sub-properties with
/// [`ObjectProps`](FieldTypePropExpression::ObjectProps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FieldTypePropExpression {
    /// A value property on the field itself: `field_type.prop`.
    Prop {
        field_type: FieldType,
        prop: String,
    },
    /// Follow the field's `reference` property to another entity, then read
    /// `prop` there: `field_type.reference->prop`.
    Reference {
        field_type: FieldType,
        reference: String,
        prop: String,
    },
    /// One expression per sub-property of a composite shape, in declaration
    /// order.
    ObjectProps {
        field_type: FieldType,
        props: IndexMap<String, FieldTypePropExpression>,
    },
}

impl FieldTypePropExpression {
    pub fn prop(field_type: FieldType, prop: impl Into<String>) -> Self {
        FieldTypePropExpression::Prop {
            field_type,
            prop: prop.into(),
        }
    }

    /// The conventional main value property.
    pub fn value(field_type: FieldType) -> Self {
        Self::prop(field_type, "value")
    }

    pub fn reference(
        field_type: FieldType,
        reference: impl Into<String>,
        prop: impl Into<String>,
    ) -> Self {
        FieldTypePropExpression::Reference {
            field_type,
            reference: reference.into(),
            prop: prop.into(),
        }
    }

    pub fn object(
        field_type: FieldType,
        props: impl IntoIterator<Item = (String, FieldTypePropExpression)>,
    ) -> Self {
        FieldTypePropExpression::ObjectProps {
            field_type,
            props: props.into_iter().collect(),
        }
    }

    /// The field type at the root of the expression.
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldTypePropExpression::Prop { field_type, .. } => *field_type,
            FieldTypePropExpression::Reference { field_type, .. } => *field_type,
            FieldTypePropExpression::ObjectProps { field_type, .. } => *field_type,
        }
    }
}

impl fmt::Display for FieldTypePropExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldTypePropExpression::Prop { field_type, prop } => {
                write!(f, "{field_type}.{prop}")
            }
            FieldTypePropExpression::Reference {
                field_type,
                reference,
                prop,
            } => write!(f, "{field_type}.{reference}->{prop}"),
            FieldTypePropExpression::ObjectProps { field_type, props } => {
                write!(f, "{field_type}{{")?;
                for (i, (name, expr)) in props.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {expr}")?;
                }
                f.write_str("}")
            }
        }
    }
}
