use crate::{cache::shape_sort_key, query::MatchExpr};

///
/// Normalize a filter expression into a canonical, deterministic form.
///
/// Normalization guarantees:
/// - Logical equivalence is preserved
/// - Nested AND / OR nodes are flattened
/// - Single-child AND / OR nodes collapse into their child
/// - Double negation is eliminated
/// - Child predicates are deterministically ordered by shape
///
/// Note: children are ordered by their literal-free shape encoding, so two
/// filters that differ only in constants normalize to the same layout.
///
#[must_use]
pub fn normalize(expr: &MatchExpr) -> MatchExpr {
    match expr {
        MatchExpr::And(children) => normalize_and(children),
        MatchExpr::Or(children) => normalize_or(children),
        MatchExpr::Nor(children) => {
            let mut out: Vec<_> = children.iter().map(normalize).collect();
            sort_children(&mut out);
            MatchExpr::Nor(out)
        }
        MatchExpr::Not(inner) => normalize_not(inner),

        MatchExpr::ElemMatchObject { path, child } => MatchExpr::ElemMatchObject {
            path: path.clone(),
            child: Box::new(normalize(child)),
        },
        MatchExpr::ElemMatchValue { path, children } => {
            let mut out: Vec<_> = children.iter().map(normalize).collect();
            sort_children(&mut out);
            MatchExpr::ElemMatchValue {
                path: path.clone(),
                children: out,
            }
        }

        leaf => leaf.clone(),
    }
}

///
/// Normalize a NOT expression.
///
/// Eliminates double negation:
///     NOT (NOT x)  →  x
///
fn normalize_not(inner: &MatchExpr) -> MatchExpr {
    let normalized = normalize(inner);

    if let MatchExpr::Not(double) = normalized {
        return *double;
    }

    MatchExpr::Not(Box::new(normalized))
}

///
/// Normalize an AND expression.
///
/// Rules:
/// - AND(AND(a, b), c)   → AND(a, b, c)
/// - AND(AND(), x)       → x
/// - AND(x)              → x
///
fn normalize_and(children: &[MatchExpr]) -> MatchExpr {
    let mut out = Vec::new();

    for child in children {
        match normalize(child) {
            MatchExpr::And(grandchildren) => out.extend(grandchildren),
            other => out.push(other),
        }
    }

    if out.len() == 1 {
        return out.remove(0);
    }

    sort_children(&mut out);
    MatchExpr::And(out)
}

///
/// Normalize an OR expression.
///
/// Rules:
/// - OR(OR(a, b), c)    → OR(a, b, c)
/// - OR(AND(), x)       → AND()
/// - OR(x)              → x
///
fn normalize_or(children: &[MatchExpr]) -> MatchExpr {
    let mut out = Vec::new();

    for child in children {
        match normalize(child) {
            always if always.is_empty() => return MatchExpr::empty(),
            MatchExpr::Or(grandchildren) => out.extend(grandchildren),
            other => out.push(other),
        }
    }

    if out.len() == 1 {
        return out.remove(0);
    }

    sort_children(&mut out);
    MatchExpr::Or(out)
}

fn sort_children(children: &mut [MatchExpr]) {
    children.sort_by_cached_key(shape_sort_key);
}
