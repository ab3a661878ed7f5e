use serde::Serialize;

///
/// IndexAssignment
///
/// Tag placed on a filter-tree node naming the index (and key position) the
/// node was answered through when the plan was built.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct IndexAssignment {
    pub index: String,
    pub position: usize,
    pub can_combine_bounds: bool,
}

///
/// PlanCacheIndexTree
///
/// Index-tag tree mirroring the shape of the normalized filter. Rebuilding a
/// runnable plan from it happens in the planner, against live query state.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PlanCacheIndexTree {
    pub assignment: Option<IndexAssignment>,
    pub children: Vec<Self>,
}

impl PlanCacheIndexTree {
    #[must_use]
    pub fn leaf(index: impl Into<String>, position: usize) -> Self {
        Self {
            assignment: Some(IndexAssignment {
                index: index.into(),
                position,
                can_combine_bounds: true,
            }),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub const fn node(children: Vec<Self>) -> Self {
        Self {
            assignment: None,
            children,
        }
    }

    /// Names of every index referenced by this tree, depth-first.
    #[must_use]
    pub fn indexes(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_indexes(&mut out);
        out
    }

    fn collect_indexes<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(assignment) = &self.assignment {
            out.push(&assignment.index);
        }
        for child in &self.children {
            child.collect_indexes(out);
        }
    }
}

///
/// SolutionKind
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum SolutionKind {
    UseIndexTags,
    CollectionScan,
    WholeIndexScan { index: String, direction: i8 },
}

///
/// SolutionCacheData
///
/// Lightweight cached-plan descriptor. The cache clones these out on lookup;
/// it never holds a runnable plan.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SolutionCacheData {
    pub kind: SolutionKind,
    pub tree: Option<PlanCacheIndexTree>,
}

impl SolutionCacheData {
    #[must_use]
    pub const fn index_tags(tree: PlanCacheIndexTree) -> Self {
        Self {
            kind: SolutionKind::UseIndexTags,
            tree: Some(tree),
        }
    }

    #[must_use]
    pub const fn collection_scan() -> Self {
        Self {
            kind: SolutionKind::CollectionScan,
            tree: None,
        }
    }

    #[must_use]
    pub fn whole_index_scan(index: impl Into<String>, direction: i8) -> Self {
        Self {
            kind: SolutionKind::WholeIndexScan {
                index: index.into(),
                direction,
            },
            tree: None,
        }
    }
}
