//! Normalized query input: filter tree, sort, projection, collation, and the
//! explicit plan-choice flags.

mod expr;
mod normalize;
mod shape;


///
/// Re-Exports
///
pub use expr::{
    CompareOp, ComparePredicate, Crs, GeoOp, GeometryKind, MatchExpr, NearPoint, NearVariant,
    SchemaKeyword, near_crs,
};
pub use normalize::normalize;
pub use shape::{
    Collation, MetaKind, ProjectionField, ProjectionKind, ProjectionSpec, SortField, SortOrder,
    SortSpec, collations_match,
};

use crate::value::Value;

///
/// NormalizedQuery
///
/// Canonical query shape handed to the eligibility filter and key encoder.
/// Immutable once built; the filter is normalized on construction.
///

#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedQuery {
    filter: MatchExpr,
    sort: SortSpec,
    projection: ProjectionSpec,
    collation: Option<Collation>,
    hint: Option<Value>,
    min: Option<Value>,
    max: Option<Value>,
    explain: bool,
}

impl NormalizedQuery {
    #[must_use]
    pub fn new(filter: MatchExpr) -> Self {
        Self {
            filter: normalize(&filter),
            sort: SortSpec::new(),
            projection: ProjectionSpec::new(),
            collation: None,
            hint: None,
            min: None,
            max: None,
            explain: false,
        }
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn with_projection(mut self, projection: ProjectionSpec) -> Self {
        self.projection = projection;
        self
    }

    #[must_use]
    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = Some(collation);
        self
    }

    #[must_use]
    pub fn with_hint(mut self, hint: Value) -> Self {
        self.hint = Some(hint);
        self
    }

    #[must_use]
    pub fn with_min(mut self, min: Value) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub fn with_max(mut self, max: Value) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use]
    pub const fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    #[must_use]
    pub const fn filter(&self) -> &MatchExpr {
        &self.filter
    }

    #[must_use]
    pub const fn sort(&self) -> &SortSpec {
        &self.sort
    }

    #[must_use]
    pub const fn projection(&self) -> &ProjectionSpec {
        &self.projection
    }

    #[must_use]
    pub const fn collation(&self) -> Option<&Collation> {
        self.collation.as_ref()
    }

    #[must_use]
    pub const fn hint(&self) -> Option<&Value> {
        self.hint.as_ref()
    }

    #[must_use]
    pub const fn min(&self) -> Option<&Value> {
        self.min.as_ref()
    }

    #[must_use]
    pub const fn max(&self) -> Option<&Value> {
        self.max.as_ref()
    }

    #[must_use]
    pub const fn is_explain(&self) -> bool {
        self.explain
    }
}
