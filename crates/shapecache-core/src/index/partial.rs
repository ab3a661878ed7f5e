//! Conservative implication between a query leaf and a partial-index filter.
//!
//! Only top-level conjuncts of the filter are considered. An implication we
//! cannot prove counts as incompatible.

use crate::{
    query::{CompareOp, ComparePredicate, MatchExpr},
    value::{Value, strict_order_cmp},
};
use std::cmp::Ordering;

fn conjuncts(filter: &MatchExpr) -> &[MatchExpr] {
    match filter {
        MatchExpr::And(children) => children,
        other => std::slice::from_ref(other),
    }
}

/// Whether the filter constrains `path` through a top-level leaf conjunct.
pub(super) fn filter_mentions(filter: &MatchExpr, path: &str) -> bool {
    conjuncts(filter)
        .iter()
        .any(|conjunct| conjunct.is_leaf() && conjunct.path() == Some(path))
}

/// Whether every document matching `leaf` also satisfies each filter
/// conjunct on `path`.
pub(super) fn implies_filter(leaf: &MatchExpr, filter: &MatchExpr, path: &str) -> bool {
    conjuncts(filter)
        .iter()
        .filter(|conjunct| conjunct.is_leaf() && conjunct.path() == Some(path))
        .all(|conjunct| implies(leaf, conjunct))
}

fn implies(leaf: &MatchExpr, conjunct: &MatchExpr) -> bool {
    if leaf == conjunct {
        return true;
    }

    match (leaf, conjunct) {
        (MatchExpr::Compare(query), MatchExpr::Compare(bound)) => compare_implies(query, bound),
        (MatchExpr::In { values, .. }, MatchExpr::Compare(bound)) => {
            !values.is_empty() && values.iter().all(|value| satisfies(value, bound))
        }
        (MatchExpr::Compare(query), MatchExpr::In { values, .. }) => {
            query.op == CompareOp::Eq && values.contains(&query.value)
        }
        (MatchExpr::In { values: query, .. }, MatchExpr::In { values: allowed, .. }) => {
            !query.is_empty() && query.iter().all(|value| allowed.contains(value))
        }
        (_, MatchExpr::Exists { exists: true, .. }) => requires_presence(leaf),
        _ => false,
    }
}

// Does the single value `value` satisfy `bound`?
fn satisfies(value: &Value, bound: &ComparePredicate) -> bool {
    let Some(ord) = strict_order_cmp(value, &bound.value) else {
        return false;
    };

    match bound.op {
        CompareOp::Eq => ord == Ordering::Equal,
        CompareOp::Lt => ord == Ordering::Less,
        CompareOp::Lte => ord != Ordering::Greater,
        CompareOp::Gt => ord == Ordering::Greater,
        CompareOp::Gte => ord != Ordering::Less,
    }
}

fn compare_implies(query: &ComparePredicate, bound: &ComparePredicate) -> bool {
    if query.op == CompareOp::Eq {
        return satisfies(&query.value, bound);
    }

    let Some(ord) = strict_order_cmp(&query.value, &bound.value) else {
        return false;
    };

    match (query.op, bound.op) {
        // (v, ∞) ⊆ (c, ∞) and [c, ∞) when v >= c; [v, ∞) ⊆ (c, ∞) only when v > c.
        (CompareOp::Gt, CompareOp::Gt | CompareOp::Gte) | (CompareOp::Gte, CompareOp::Gte) => {
            ord != Ordering::Less
        }
        (CompareOp::Gte, CompareOp::Gt) => ord == Ordering::Greater,
        (CompareOp::Lt, CompareOp::Lt | CompareOp::Lte) | (CompareOp::Lte, CompareOp::Lte) => {
            ord != Ordering::Greater
        }
        (CompareOp::Lte, CompareOp::Lt) => ord == Ordering::Less,
        _ => false,
    }
}

// Leaves that can only match when the field is present.
fn requires_presence(leaf: &MatchExpr) -> bool {
    match leaf {
        MatchExpr::Compare(cmp) => !cmp.value.is_null(),
        MatchExpr::In { values, .. } => !values.is_empty() && !values.iter().any(Value::is_null),
        MatchExpr::Exists { exists, .. } => *exists,
        MatchExpr::Regex { .. }
        | MatchExpr::Mod { .. }
        | MatchExpr::Size { .. }
        | MatchExpr::Geo { .. }
        | MatchExpr::GeoNear { .. } => true,
        _ => false,
    }
}
