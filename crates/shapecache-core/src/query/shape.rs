use crate::query::MatchExpr;
use derive_more::Deref;

///
/// MetaKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetaKind {
    TextScore,
    GeoNearDistance,
}

///
/// SortOrder
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortOrder {
    Asc,
    Desc,
    Meta(MetaKind),
}

///
/// SortField
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortField {
    pub path: String,
    pub order: SortOrder,
}

///
/// SortSpec
///
/// Ordered sort fields. Field order is semantic and part of the shape.
///

#[derive(Clone, Debug, Default, Deref, Eq, PartialEq)]
pub struct SortSpec(Vec<SortField>);

impl SortSpec {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn asc(self, path: impl Into<String>) -> Self {
        self.field(path, SortOrder::Asc)
    }

    #[must_use]
    pub fn desc(self, path: impl Into<String>) -> Self {
        self.field(path, SortOrder::Desc)
    }

    #[must_use]
    pub fn meta(self, path: impl Into<String>, kind: MetaKind) -> Self {
        self.field(path, SortOrder::Meta(kind))
    }

    #[must_use]
    pub fn field(mut self, path: impl Into<String>, order: SortOrder) -> Self {
        self.0.push(SortField {
            path: path.into(),
            order,
        });
        self
    }
}

///
/// ProjectionKind
///

#[derive(Clone, Debug, PartialEq)]
pub enum ProjectionKind {
    Include,
    Exclude,
    Slice { skip: Option<i64>, limit: i64 },
    ElemMatch(Box<MatchExpr>),
    Meta(MetaKind),
}

///
/// ProjectionField
///

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectionField {
    pub path: String,
    pub kind: ProjectionKind,
}

///
/// ProjectionSpec
///
/// Projection fields in the order the command gave them. Result field order
/// is not part of the cache contract, so key encoding sorts by path.
///

#[derive(Clone, Debug, Default, Deref, PartialEq)]
pub struct ProjectionSpec(Vec<ProjectionField>);

impl ProjectionSpec {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn include(self, path: impl Into<String>) -> Self {
        self.field(path, ProjectionKind::Include)
    }

    #[must_use]
    pub fn exclude(self, path: impl Into<String>) -> Self {
        self.field(path, ProjectionKind::Exclude)
    }

    #[must_use]
    pub fn field(mut self, path: impl Into<String>, kind: ProjectionKind) -> Self {
        self.0.push(ProjectionField {
            path: path.into(),
            kind,
        });
        self
    }
}

///
/// Collation
///
/// String comparison rules. The `simple` locale is binary comparison.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Collation {
    pub locale: String,
    pub strength: Option<u8>,
}

impl Collation {
    pub const SIMPLE_LOCALE: &'static str = "simple";

    #[must_use]
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            strength: None,
        }
    }

    #[must_use]
    pub fn simple() -> Self {
        Self::new(Self::SIMPLE_LOCALE)
    }

    #[must_use]
    pub const fn with_strength(mut self, strength: u8) -> Self {
        self.strength = Some(strength);
        self
    }

    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.locale == Self::SIMPLE_LOCALE
    }
}

/// Treat an absent collation as the simple one.
#[must_use]
pub fn collations_match(left: Option<&Collation>, right: Option<&Collation>) -> bool {
    let is_simple = |c: Option<&Collation>| c.is_none_or(Collation::is_simple);

    match (left, right) {
        (Some(a), Some(b)) if !a.is_simple() || !b.is_simple() => a == b,
        _ => is_simple(left) && is_simple(right),
    }
}
