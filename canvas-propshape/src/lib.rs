//! Prop shape evaluation for component schemas
//!
//! `canvas-propshape` turns the JSON-Schema-flavored prop shapes declared by
//! components into storage decisions. A [`PropShape`] answers two questions:
//! which existing content can satisfy this prop (as a set of
//! [`DataTypeShapeRequirement`]s), and what field should be provisioned to
//! store a value for it (as a [`StorablePropShape`]).
//!
//! # Architecture
//!
//! - **Pure decision tables**: Both producers are deterministic functions of
//!   the shape; no I/O, no ambient state
//! - **Scalar core, traversable edges**: Strings, numbers, and booleans
//!   resolve directly; arrays wrap their item's resolution, objects resolve
//!   through a [`CompositeShapeCatalog`]
//! - **"Not yet supported" is an answer**: Recognized-but-unmapped inputs
//!   produce sentinels or `None`, never errors; errors are reserved for
//!   malformed shapes
//! - **Memoization on top**: [`ShapeEvaluator`] caches both producers keyed
//!   by canonical JSON

pub mod catalog;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod requirement;
pub mod shape;
pub mod storable;

pub use catalog::{CompositeShape, CompositeShapeCatalog, IMAGE_SHAPE_REF, VIDEO_SHAPE_REF};
pub use error::{Result, ShapeError};
pub use evaluator::ShapeEvaluator;
pub use format::StringFormat;
pub use requirement::{
    anchor_pattern, DataTypeShapeRequirement, DataTypeShapeRequirements, RequirementOutcome,
    RuntimeCapability, StringSemantics,
};
pub use shape::{FormattingContext, JsonSchemaType, PropShape};
pub use storable::{StorablePropShape, ANY_CHARS_PATTERN, VIDEO_FILE_EXTENSION};
