//! Index metadata consumed by the key encoder: descriptors, the snapshot view
//! pushed in by the catalog, and per-index compatibility discriminators.

mod discriminator;
mod partial;


use crate::query::{Collation, MatchExpr};
use std::{
    fmt::{self, Display},
    sync::Arc,
};

///
/// CONSTANTS
///

/// Key-pattern component marking a wildcard index path.
pub const WILDCARD_COMPONENT: &str = "$**";

///
/// IndexDescriptor
///
/// Catalog notification describing one index. Only the properties that can
/// split a query shape into compatibility classes are carried here.
///

#[derive(Clone, Debug, PartialEq)]
pub struct IndexDescriptor {
    pub name: String,
    pub key_pattern: Vec<String>,
    pub multikey: bool,
    pub sparse: bool,
    pub unique: bool,
    pub partial_filter: Option<MatchExpr>,
    pub collation: Option<Collation>,
}

impl IndexDescriptor {
    #[must_use]
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        key_pattern: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            key_pattern: key_pattern.into_iter().map(Into::into).collect(),
            multikey: false,
            sparse: false,
            unique: false,
            partial_filter: None,
            collation: None,
        }
    }

    #[must_use]
    pub const fn sparse(mut self) -> Self {
        self.sparse = true;
        self
    }

    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    #[must_use]
    pub const fn multikey(mut self) -> Self {
        self.multikey = true;
        self
    }

    #[must_use]
    pub fn with_partial_filter(mut self, filter: MatchExpr) -> Self {
        self.partial_filter = Some(filter);
        self
    }

    #[must_use]
    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = Some(collation);
        self
    }

    /// Path prefix covered by a wildcard key pattern: `""` for `$**`,
    /// `"a.b"` for `a.b.$**`, `None` for ordinary indexes.
    #[must_use]
    pub fn wildcard_prefix(&self) -> Option<&str> {
        self.key_pattern.iter().find_map(|field| {
            if field == WILDCARD_COMPONENT {
                Some("")
            } else {
                field
                    .strip_suffix(WILDCARD_COMPONENT)
                    .and_then(|prefix| prefix.strip_suffix('.'))
            }
        })
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.wildcard_prefix().is_some()
    }

    #[must_use]
    pub fn has_non_simple_collation(&self) -> bool {
        self.collation.as_ref().is_some_and(|c| !c.is_simple())
    }

    /// Whether this index can place a predicate into its own compatibility
    /// class. Indexes without such properties never affect keys.
    #[must_use]
    pub fn discriminates(&self) -> bool {
        self.sparse
            || self.partial_filter.is_some()
            || self.has_non_simple_collation()
            || self.is_wildcard()
    }

    /// Whether `path` is one of this index's key fields, or falls under its
    /// wildcard prefix.
    #[must_use]
    pub fn covers_path(&self, path: &str) -> bool {
        if self.key_pattern.iter().any(|field| field == path) {
            return true;
        }

        self.wildcard_covers(path)
    }

    pub(crate) fn wildcard_covers(&self, path: &str) -> bool {
        match self.wildcard_prefix() {
            Some("") => true,
            Some(prefix) => {
                path == prefix
                    || path
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('.'))
            }
            None => false,
        }
    }
}

impl Display for IndexDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.key_pattern.join(", ");
        let mut flags = Vec::new();
        if self.unique {
            flags.push("unique");
        }
        if self.sparse {
            flags.push("sparse");
        }
        if self.multikey {
            flags.push("multikey");
        }
        if self.partial_filter.is_some() {
            flags.push("partial");
        }
        if self.has_non_simple_collation() {
            flags.push("collated");
        }

        if flags.is_empty() {
            write!(f, "{}({fields})", self.name)
        } else {
            write!(f, "{}({fields}) [{}]", self.name, flags.join(" "))
        }
    }
}

///
/// IndexCompatibilityView
///
/// Immutable snapshot of the discriminating indexes, in canonical name order.
/// Replaced wholesale on every catalog notification; never mutated.
///

#[derive(Clone, Debug, Default)]
pub struct IndexCompatibilityView {
    indexes: Vec<Arc<IndexDescriptor>>,
}

impl IndexCompatibilityView {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            indexes: Vec::new(),
        }
    }

    /// Build a view from a full catalog snapshot. Indexes that cannot
    /// discriminate are dropped; the rest are ordered by name so that marker
    /// bit positions do not depend on notification order.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = IndexDescriptor>) -> Self {
        let mut indexes: Vec<_> = entries
            .into_iter()
            .filter(IndexDescriptor::discriminates)
            .map(Arc::new)
            .collect();
        indexes.sort_by(|a, b| a.name.cmp(&b.name));
        indexes.dedup_by(|a, b| a.name == b.name);

        Self { indexes }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexDescriptor> {
        self.indexes.iter().map(AsRef::as_ref)
    }
}

pub(crate) use discriminator::write_markers;
