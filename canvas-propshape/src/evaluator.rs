//! Memoized shape evaluation.

use crate::catalog::CompositeShapeCatalog;
use crate::error::Result;
use crate::requirement::RequirementOutcome;
use crate::shape::PropShape;
use crate::storable::StorablePropShape;
use dashmap::DashMap;
use tracing::trace;

/// Evaluates shapes with structural memoization.
///
/// The same schema fragment recurs across many components, and both producer
/// operations are pure, so results are cached keyed by the shape's canonical
/// JSON. Reads are lock-free; on a miss the outcome is computed outside the
/// map and published with insert-if-absent, so concurrent callers may race
/// the same key and losers simply discard their work. Hard errors are never
/// cached: they indicate upstream bugs, and recomputing keeps the
/// diagnostics close to the caller at fault.
#[derive(Debug)]
pub struct ShapeEvaluator {
    catalog: CompositeShapeCatalog,
    requirement_cache: DashMap<String, RequirementOutcome>,
    storable_cache: DashMap<String, Option<StorablePropShape>>,
}

impl ShapeEvaluator {
    pub fn new(catalog: CompositeShapeCatalog) -> Self {
        ShapeEvaluator {
            catalog,
            requirement_cache: DashMap::new(),
            storable_cache: DashMap::new(),
        }
    }

    /// An evaluator over the built-in composite catalog.
    pub fn with_builtin_catalog() -> Self {
        Self::new(CompositeShapeCatalog::builtin())
    }

    pub fn catalog(&self) -> &CompositeShapeCatalog {
        &self.catalog
    }

    /// Memoized requirement production. See
    /// [`PropShape::to_data_type_shape_requirements`].
    pub fn requirements(&self, shape: &PropShape) -> Result<RequirementOutcome> {
        let key = shape.canonical_json();
        if let Some(hit) = self.requirement_cache.get(&key) {
            trace!("requirement cache hit");
            return Ok(hit.clone());
        }

        let outcome = shape.to_data_type_shape_requirements()?;
        let published = self.requirement_cache.entry(key).or_insert(outcome);
        Ok(published.clone())
    }

    /// Memoized storable-shape resolution. See
    /// [`PropShape::compute_storable_prop_shape`].
    pub fn storable(&self, shape: &PropShape) -> Result<Option<StorablePropShape>> {
        let key = shape.canonical_json();
        if let Some(hit) = self.storable_cache.get(&key) {
            trace!("storable cache hit");
            return Ok(hit.clone());
        }

        let storable = shape.compute_storable_prop_shape(&self.catalog)?;
        let published = self.storable_cache.entry(key).or_insert(storable);
        Ok(published.clone())
    }

    /// Total cached evaluations across both caches.
    pub fn cache_size(&self) -> usize {
        self.requirement_cache.len() + self.storable_cache.len()
    }
}
