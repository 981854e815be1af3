//! The composite shape catalog: `$ref` URNs resolved to named object shapes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// URN of the canonical Canvas image composite.
pub const IMAGE_SHAPE_REF: &str = "json-schema-definitions://canvas.module/image";

/// URN of the canonical Canvas video composite.
pub const VIDEO_SHAPE_REF: &str = "json-schema-definitions://canvas.module/video";

/// Shape name the resolver recognizes as the image composite.
pub const IMAGE_SHAPE_NAME: &str = "image";

/// Shape name the resolver recognizes as the video composite.
pub const VIDEO_SHAPE_NAME: &str = "video";

/// A named object shape with a fixed set of sub-properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeShape {
    name: String,
    properties: IndexMap<String, Value>,
}

impl CompositeShape {
    pub fn new(name: impl Into<String>) -> Self {
        CompositeShape {
            name: name.into(),
            properties: IndexMap::new(),
        }
    }

    /// Declares a sub-property with its schema fragment, in declaration
    /// order.
    pub fn with_property(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &IndexMap<String, Value> {
        &self.properties
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}

/// An immutable, exact-match lookup table from `$ref` URNs to composite
/// shapes.
///
/// The catalog is plain data passed into the resolver by reference; there is
/// no process-wide registry, and a test can hand in any fake it likes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeShapeCatalog {
    shapes: IndexMap<String, CompositeShape>,
}

impl CompositeShapeCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog with the canonical Canvas composites registered.
    pub fn builtin() -> Self {
        let image = CompositeShape::new(IMAGE_SHAPE_NAME)
            .with_property("src", json!({"type": "string", "format": "uri-reference"}))
            .with_property("alt", json!({"type": "string"}))
            .with_property("width", json!({"type": "integer", "minimum": 0}))
            .with_property("height", json!({"type": "integer", "minimum": 0}));
        let video = CompositeShape::new(VIDEO_SHAPE_NAME)
            .with_property("src", json!({"type": "string", "format": "uri-reference"}));

        let catalog = Self::new()
            .with_shape(IMAGE_SHAPE_REF, image)
            .with_shape(VIDEO_SHAPE_REF, video);
        debug!(shapes = catalog.len(), "built-in composite catalog constructed");
        catalog
    }

    pub fn with_shape(mut self, urn: impl Into<String>, shape: CompositeShape) -> Self {
        self.shapes.insert(urn.into(), shape);
        self
    }

    /// Exact-match lookup. Unknown URNs are unresolvable, not errors.
    pub fn resolve(&self, urn: &str) -> Option<&CompositeShape> {
        self.shapes.get(urn)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
