use crate::value::Value;

///
/// MatchExpr
///
/// Canonical filter expression tree produced by the query normalizer.
/// Leaves carry a dotted field path and literal values; the literals only
/// matter to index compatibility checks, never to the shape itself.
///

#[derive(Clone, Debug, PartialEq)]
pub enum MatchExpr {
    And(Vec<Self>),
    Or(Vec<Self>),
    Nor(Vec<Self>),
    Not(Box<Self>),
    Compare(ComparePredicate),
    In {
        path: String,
        values: Vec<Value>,
    },
    Exists {
        path: String,
        exists: bool,
    },
    Regex {
        path: String,
        pattern: String,
        flags: String,
    },
    Mod {
        path: String,
        divisor: i64,
        remainder: i64,
    },
    Size {
        path: String,
        len: usize,
    },
    ElemMatchObject {
        path: String,
        child: Box<Self>,
    },
    ElemMatchValue {
        path: String,
        children: Vec<Self>,
    },
    Geo {
        path: String,
        op: GeoOp,
        geometry: GeometryKind,
    },
    GeoNear {
        path: String,
        variant: NearVariant,
        point: NearPoint,
    },
    Schema {
        path: String,
        keyword: SchemaKeyword,
    },
}

impl MatchExpr {
    /// The empty filter: matches every document.
    #[must_use]
    pub const fn empty() -> Self {
        Self::And(Vec::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::And(children) if children.is_empty())
    }

    #[must_use]
    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Eq, value)
    }

    #[must_use]
    pub fn lt(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Lt, value)
    }

    #[must_use]
    pub fn lte(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Lte, value)
    }

    #[must_use]
    pub fn gt(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Gt, value)
    }

    #[must_use]
    pub fn gte(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CompareOp::Gte, value)
    }

    #[must_use]
    pub fn compare(path: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare(ComparePredicate {
            path: path.into(),
            op,
            value: value.into(),
        })
    }

    #[must_use]
    pub fn in_(path: impl Into<String>, values: Vec<Value>) -> Self {
        Self::In {
            path: path.into(),
            values,
        }
    }

    #[must_use]
    pub fn exists(path: impl Into<String>, exists: bool) -> Self {
        Self::Exists {
            path: path.into(),
            exists,
        }
    }

    #[must_use]
    pub fn regex(
        path: impl Into<String>,
        pattern: impl Into<String>,
        flags: impl Into<String>,
    ) -> Self {
        Self::Regex {
            path: path.into(),
            pattern: pattern.into(),
            flags: flags.into(),
        }
    }

    #[must_use]
    pub fn geo(path: impl Into<String>, op: GeoOp, geometry: GeometryKind) -> Self {
        Self::Geo {
            path: path.into(),
            op,
            geometry,
        }
    }

    #[must_use]
    pub fn geo_near(path: impl Into<String>, variant: NearVariant, point: NearPoint) -> Self {
        Self::GeoNear {
            path: path.into(),
            variant,
            point,
        }
    }

    #[must_use]
    pub const fn and(children: Vec<Self>) -> Self {
        Self::And(children)
    }

    #[must_use]
    pub const fn or(children: Vec<Self>) -> Self {
        Self::Or(children)
    }

    #[must_use]
    pub const fn nor(children: Vec<Self>) -> Self {
        Self::Nor(children)
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Self) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Field path of a leaf or array node; `None` for logical nodes.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::And(_) | Self::Or(_) | Self::Nor(_) | Self::Not(_) => None,
            Self::Compare(cmp) => Some(&cmp.path),
            Self::In { path, .. }
            | Self::Exists { path, .. }
            | Self::Regex { path, .. }
            | Self::Mod { path, .. }
            | Self::Size { path, .. }
            | Self::ElemMatchObject { path, .. }
            | Self::ElemMatchValue { path, .. }
            | Self::Geo { path, .. }
            | Self::GeoNear { path, .. }
            | Self::Schema { path, .. } => Some(path),
        }
    }

    /// Whether this node is a leaf predicate (no child expressions).
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        !matches!(
            self,
            Self::And(_)
                | Self::Or(_)
                | Self::Nor(_)
                | Self::Not(_)
                | Self::ElemMatchObject { .. }
                | Self::ElemMatchValue { .. }
        )
    }
}

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    /// Stable two-character shape tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Lt => "lt",
            Self::Lte => "le",
            Self::Gt => "gt",
            Self::Gte => "ge",
        }
    }
}

///
/// ComparePredicate
///

#[derive(Clone, Debug, PartialEq)]
pub struct ComparePredicate {
    pub path: String,
    pub op: CompareOp,
    pub value: Value,
}

///
/// GeoOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GeoOp {
    Within,
    Intersects,
}

impl GeoOp {
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Within => "wi",
            Self::Intersects => "in",
        }
    }
}

///
/// Crs
/// Coordinate reference system implied by a geometry.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Crs {
    Flat,
    Sphere,
}

impl Crs {
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Flat => "fl",
            Self::Sphere => "sp",
        }
    }
}

///
/// GeometryKind
///
/// GeoJSON geometry types plus the legacy coordinate shapes.
/// Legacy shapes are planar except `$centerSphere`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    LegacyBox,
    LegacyCenter,
    LegacyCenterSphere,
    LegacyPolygon,
}

impl GeometryKind {
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Point => "pt",
            Self::LineString => "ln",
            Self::Polygon => "pl",
            Self::MultiPoint => "mt",
            Self::MultiLineString => "ml",
            Self::MultiPolygon => "my",
            Self::GeometryCollection => "gc",
            Self::LegacyBox => "bx",
            Self::LegacyCenter => "cr",
            Self::LegacyCenterSphere => "cs",
            Self::LegacyPolygon => "lp",
        }
    }

    #[must_use]
    pub const fn crs(self) -> Crs {
        match self {
            Self::LegacyBox | Self::LegacyCenter | Self::LegacyPolygon => Crs::Flat,
            _ => Crs::Sphere,
        }
    }
}

///
/// NearVariant
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NearVariant {
    Near,
    NearSphere,
    GeoNear,
}

impl NearVariant {
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Near | Self::GeoNear => "nr",
            Self::NearSphere => "ns",
        }
    }
}

///
/// NearPoint
/// How the centre point of a near query was expressed.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NearPoint {
    Legacy,
    GeoJson,
}

/// CRS of a near predicate: spherical for `$nearSphere` or a GeoJSON point.
#[must_use]
pub const fn near_crs(variant: NearVariant, point: NearPoint) -> Crs {
    match (variant, point) {
        (NearVariant::NearSphere, _) | (_, NearPoint::GeoJson) => Crs::Sphere,
        _ => Crs::Flat,
    }
}

///
/// SchemaKeyword
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SchemaKeyword {
    Type,
    MinLength,
    MaxLength,
    MinItems,
    MaxItems,
    UniqueItems,
}

impl SchemaKeyword {
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Type => "ty",
            Self::MinLength => "nl",
            Self::MaxLength => "xl",
            Self::MinItems => "ni",
            Self::MaxItems => "xi",
            Self::UniqueItems => "ui",
        }
    }
}
