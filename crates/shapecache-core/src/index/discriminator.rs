use crate::{
    index::{IndexCompatibilityView, IndexDescriptor, partial},
    query::{Collation, CompareOp, MatchExpr, collations_match},
    value::Value,
};

///
/// Append the compatibility marker for one leaf predicate.
///
/// One bit per discriminating index that applies to the leaf's path, in view
/// order: `1` when the predicate's value space could be answered through the
/// index, `0` when it could not. Nothing is written when no index applies.
///
pub(crate) fn write_markers(
    view: &IndexCompatibilityView,
    leaf: &MatchExpr,
    collation: Option<&Collation>,
    out: &mut String,
) {
    let Some(path) = leaf.path() else {
        return;
    };

    let mut opened = false;
    for index in view.iter() {
        let Some(compatible) = classify(index, leaf, path, collation) else {
            continue;
        };
        if !opened {
            out.push('<');
            opened = true;
        }
        out.push(if compatible { '1' } else { '0' });
    }

    if opened {
        out.push('>');
    }
}

// Every applicable property must accept the leaf for the index to count as compatible.
fn classify(
    index: &IndexDescriptor,
    leaf: &MatchExpr,
    path: &str,
    collation: Option<&Collation>,
) -> Option<bool> {
    let mut applies = false;
    let mut compatible = true;

    if index.sparse && index.covers_path(path) {
        applies = true;
        compatible &= !can_match_null_or_missing(leaf);
    }

    if let Some(filter) = &index.partial_filter
        && partial::filter_mentions(filter, path)
    {
        applies = true;
        compatible &= partial::implies_filter(leaf, filter, path);
    }

    if index.has_non_simple_collation() && index.covers_path(path) {
        applies = true;
        compatible &= collation_compatible(leaf, index.collation.as_ref(), collation);
    }

    if index.wildcard_covers(path) {
        applies = true;
        compatible &= wildcard_compatible(leaf);
    }

    applies.then_some(compatible)
}

// Sparse indexes carry no keys for documents missing the field.
fn can_match_null_or_missing(leaf: &MatchExpr) -> bool {
    match leaf {
        MatchExpr::Compare(cmp) => {
            cmp.value.is_null() && matches!(cmp.op, CompareOp::Eq | CompareOp::Lte | CompareOp::Gte)
        }
        MatchExpr::In { values, .. } => values.iter().any(Value::is_null),
        MatchExpr::Exists { exists, .. } => !exists,
        _ => false,
    }
}

// Collated index keys cannot answer string comparisons made under another collation.
fn collation_compatible(
    leaf: &MatchExpr,
    index_collation: Option<&Collation>,
    query_collation: Option<&Collation>,
) -> bool {
    let has_text = match leaf {
        MatchExpr::Compare(cmp) => cmp.value.contains_text(),
        MatchExpr::In { values, .. } => values.iter().any(Value::contains_text),
        MatchExpr::Regex { .. } => return false,
        _ => false,
    };

    !has_text || collations_match(index_collation, query_collation)
}

// Wildcard indexes hold one key per leaf scalar, so whole objects and
// populated arrays cannot be matched for equality through them.
fn wildcard_compatible(leaf: &MatchExpr) -> bool {
    let blocks_equality = |value: &Value| value.is_document() || value.is_non_empty_list();

    match leaf {
        MatchExpr::Compare(cmp) if cmp.op == CompareOp::Eq => !blocks_equality(&cmp.value),
        MatchExpr::Compare(cmp) => !cmp.value.is_document(),
        MatchExpr::In { values, .. } => !values.iter().any(blocks_equality),
        MatchExpr::Exists { exists, .. } => *exists,
        _ => true,
    }
}
