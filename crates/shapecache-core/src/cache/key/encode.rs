use crate::{
    cache::key::PlanCacheKey,
    index::{IndexCompatibilityView, write_markers},
    query::{
        Collation, MatchExpr, NormalizedQuery, ProjectionKind, ProjectionSpec, SortOrder,
        SortSpec, near_crs,
    },
};

///
/// CONSTANTS
///

const SORT_SECTION: char = '~';
const PROJECTION_SECTION: char = '|';
const CHILDREN_OPEN: char = '[';
const CHILDREN_CLOSE: char = ']';
const SEPARATOR: char = ',';
const SUFFIX: char = '/';
const ESCAPE: char = '\\';

///
/// Compute the plan cache key for a normalized query.
///
/// Layout: filter tree, then `~` sort section, then `|` projection section.
/// Each filter node emits a two-character tag, the escaped field path for
/// leaves, a `/` and the node-specific suffix (regex flags, geometry kind,
/// CRS) where the node has one, the index compatibility marker for leaves,
/// and bracketed children. Siblings are ordered by their full encoding.
///
/// Literal values never reach the output; they only influence the marker
/// bits through the compatibility view.
///
#[must_use]
pub fn compute_key(query: &NormalizedQuery, view: &IndexCompatibilityView) -> PlanCacheKey {
    let encoder = Encoder {
        view: Some(view),
        collation: query.collation(),
    };

    let mut out = String::with_capacity(64);
    encoder.encode_expr(query.filter(), &mut out);
    encode_sort(query.sort(), &mut out);
    encode_projection(query.projection(), &mut out);

    PlanCacheKey::from_encoded(out)
}

/// Literal-free, marker-free encoding used to order sibling predicates.
pub(crate) fn shape_sort_key(expr: &MatchExpr) -> String {
    let mut out = String::new();
    SHAPE_ONLY.encode_expr(expr, &mut out);
    out
}

///
/// Encoder
///

struct Encoder<'a> {
    view: Option<&'a IndexCompatibilityView>,
    collation: Option<&'a Collation>,
}

const SHAPE_ONLY: Encoder<'static> = Encoder {
    view: None,
    collation: None,
};

impl Encoder<'_> {
    fn encode_expr(&self, expr: &MatchExpr, out: &mut String) {
        match expr {
            MatchExpr::And(children) => {
                out.push_str("an");
                self.encode_children(children, out);
            }
            MatchExpr::Or(children) => {
                out.push_str("or");
                self.encode_children(children, out);
            }
            MatchExpr::Nor(children) => {
                out.push_str("nr");
                self.encode_children(children, out);
            }
            MatchExpr::Not(inner) => {
                out.push_str("nt");
                self.encode_children(std::slice::from_ref(inner.as_ref()), out);
            }

            MatchExpr::Compare(cmp) => self.encode_leaf(expr, cmp.op.tag(), &cmp.path, out),
            MatchExpr::In { path, .. } => self.encode_leaf(expr, "in", path, out),
            MatchExpr::Exists { path, exists } => {
                self.encode_leaf(expr, if *exists { "ex" } else { "nx" }, path, out);
            }
            MatchExpr::Regex { path, flags, .. } => {
                out.push_str("re");
                write_escaped(path, out);
                out.push(SUFFIX);
                write_regex_flags(flags, out);
                self.encode_markers(expr, out);
            }
            MatchExpr::Mod { path, .. } => self.encode_leaf(expr, "mo", path, out),
            MatchExpr::Size { path, .. } => self.encode_leaf(expr, "sz", path, out),
            MatchExpr::Geo { path, op, geometry } => {
                out.push_str("go");
                write_escaped(path, out);
                out.push(SUFFIX);
                out.push_str(op.tag());
                out.push_str(geometry.tag());
                out.push_str(geometry.crs().tag());
                self.encode_markers(expr, out);
            }
            MatchExpr::GeoNear {
                path,
                variant,
                point,
            } => {
                out.push_str("gn");
                write_escaped(path, out);
                out.push(SUFFIX);
                out.push_str(variant.tag());
                out.push_str(near_crs(*variant, *point).tag());
                self.encode_markers(expr, out);
            }
            MatchExpr::Schema { path, keyword } => {
                out.push_str("sc");
                write_escaped(path, out);
                out.push(SUFFIX);
                out.push_str(keyword.tag());
                self.encode_markers(expr, out);
            }

            // Element-match children use element-relative paths, which no
            // index discriminator is keyed on.
            MatchExpr::ElemMatchObject { path, child } => {
                out.push_str("eo");
                write_escaped(path, out);
                SHAPE_ONLY.encode_children(std::slice::from_ref(child.as_ref()), out);
            }
            MatchExpr::ElemMatchValue { path, children } => {
                out.push_str("ev");
                write_escaped(path, out);
                SHAPE_ONLY.encode_children(children, out);
            }
        }
    }

    fn encode_leaf(&self, expr: &MatchExpr, tag: &str, path: &str, out: &mut String) {
        out.push_str(tag);
        write_escaped(path, out);
        self.encode_markers(expr, out);
    }

    fn encode_markers(&self, expr: &MatchExpr, out: &mut String) {
        if let Some(view) = self.view {
            write_markers(view, expr, self.collation, out);
        }
    }

    fn encode_children(&self, children: &[MatchExpr], out: &mut String) {
        if children.is_empty() {
            return;
        }

        // Markers count toward sibling order, so order by the finished encoding.
        let mut encoded: Vec<String> = children
            .iter()
            .map(|child| {
                let mut child_out = String::new();
                self.encode_expr(child, &mut child_out);
                child_out
            })
            .collect();
        encoded.sort_unstable();

        out.push(CHILDREN_OPEN);
        for (idx, child) in encoded.iter().enumerate() {
            if idx > 0 {
                out.push(SEPARATOR);
            }
            out.push_str(child);
        }
        out.push(CHILDREN_CLOSE);
    }
}

fn encode_sort(sort: &SortSpec, out: &mut String) {
    if sort.is_empty() {
        return;
    }

    out.push(SORT_SECTION);
    for (idx, field) in sort.iter().enumerate() {
        if idx > 0 {
            out.push(SEPARATOR);
        }
        out.push(match field.order {
            SortOrder::Asc => 'a',
            SortOrder::Desc => 'd',
            SortOrder::Meta(_) => 't',
        });
        write_escaped(&field.path, out);
    }
}

fn encode_projection(projection: &ProjectionSpec, out: &mut String) {
    if projection.is_empty() {
        return;
    }

    let mut fields: Vec<_> = projection.iter().collect();
    fields.sort_by(|a, b| a.path.cmp(&b.path));

    out.push(PROJECTION_SECTION);
    for (idx, field) in fields.into_iter().enumerate() {
        if idx > 0 {
            out.push(SEPARATOR);
        }
        out.push(match field.kind {
            ProjectionKind::Include => 'i',
            ProjectionKind::Exclude => 'e',
            ProjectionKind::Slice { .. } => 's',
            ProjectionKind::ElemMatch(_) => 'm',
            ProjectionKind::Meta(_) => 't',
        });
        write_escaped(&field.path, out);
    }
}

// Flags alone determine planning behaviour; order and repeats do not.
fn write_regex_flags(flags: &str, out: &mut String) {
    let mut chars: Vec<char> = flags.chars().collect();
    chars.sort_unstable();
    chars.dedup();
    let normalized: String = chars.into_iter().collect();
    write_escaped(&normalized, out);
}

fn write_escaped(path: &str, out: &mut String) {
    for c in path.chars() {
        if matches!(c, ',' | '[' | ']' | '|' | '<' | '>' | '~' | SUFFIX | ESCAPE) {
            out.push(ESCAPE);
        }
        out.push(c);
    }
}
