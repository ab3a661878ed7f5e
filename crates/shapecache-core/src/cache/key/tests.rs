use crate::{
    cache::key::{PlanCacheKey, compute_key},
    index::{IndexCompatibilityView, IndexDescriptor},
    query::{
        Collation, GeoOp, GeometryKind, MatchExpr, MetaKind, NearPoint, NearVariant,
        NormalizedQuery, ProjectionKind, ProjectionSpec, SchemaKeyword, SortSpec,
    },
    value::Value,
};
use proptest::prelude::*;

// ---- helpers -----------------------------------------------------------

fn key_of(query: &NormalizedQuery) -> PlanCacheKey {
    compute_key(query, &IndexCompatibilityView::empty())
}

fn encoded(filter: MatchExpr) -> String {
    key_of(&NormalizedQuery::new(filter)).as_str().to_string()
}

fn assert_key(query: &NormalizedQuery, expected: &str) {
    let key = key_of(query);
    assert_eq!(key.as_str(), expected, "unexpected plan cache key for {query:?}");
}

fn keyed_with(view: &IndexCompatibilityView, filter: MatchExpr) -> PlanCacheKey {
    compute_key(&NormalizedQuery::new(filter), view)
}

fn view(indexes: impl IntoIterator<Item = IndexDescriptor>) -> IndexCompatibilityView {
    IndexCompatibilityView::from_entries(indexes)
}

// ---- filter ------------------------------------------------------------

#[test]
fn key_encodes_filter_tree() {
    assert_eq!(encoded(MatchExpr::empty()), "an");
    assert_eq!(
        encoded(MatchExpr::or(vec![
            MatchExpr::eq("a", 1),
            MatchExpr::eq("b", 2)
        ])),
        "or[eqa,eqb]"
    );
    assert_eq!(
        encoded(MatchExpr::and(vec![
            MatchExpr::eq("a", 1),
            MatchExpr::eq("b", 1),
            MatchExpr::eq("c", 1),
        ])),
        "an[eqa,eqb,eqc]"
    );
    assert_eq!(
        encoded(MatchExpr::and(vec![
            MatchExpr::eq("a", 1),
            MatchExpr::eq("beqc", 1)
        ])),
        "an[eqa,eqbeqc]"
    );
    assert_eq!(encoded(MatchExpr::eq("ap1a", 1)), "eqap1a");
}

#[test]
fn key_is_independent_of_sibling_order() {
    let or = || {
        MatchExpr::or(vec![
            MatchExpr::eq("c", 1),
            MatchExpr::eq("a", 1),
            MatchExpr::eq("b", 1),
        ])
    };
    let forward = encoded(MatchExpr::and(vec![or(), MatchExpr::eq("d", 1)]));
    let backward = encoded(MatchExpr::and(vec![MatchExpr::eq("d", 1), or()]));

    assert_eq!(forward, "an[eqd,or[eqa,eqb,eqc]]");
    assert_eq!(forward, backward);
}

#[test]
fn key_encodes_each_operator_kind() {
    assert_eq!(encoded(MatchExpr::lt("a", 1)), "lta");
    assert_eq!(encoded(MatchExpr::lte("a", 1)), "lea");
    assert_eq!(encoded(MatchExpr::gt("a", 1)), "gta");
    assert_eq!(encoded(MatchExpr::gte("a", 1)), "gea");
    assert_eq!(
        encoded(MatchExpr::in_("a", vec![Value::Int(1), Value::Int(2)])),
        "ina"
    );
    assert_eq!(encoded(MatchExpr::exists("a", true)), "exa");
    assert_eq!(encoded(MatchExpr::exists("a", false)), "nxa");
    assert_eq!(encoded(MatchExpr::not(MatchExpr::eq("a", 1))), "nt[eqa]");
    assert_eq!(
        encoded(MatchExpr::nor(vec![MatchExpr::eq("b", 1), MatchExpr::eq("a", 1)])),
        "nr[eqa,eqb]"
    );
    assert_eq!(
        encoded(MatchExpr::ElemMatchObject {
            path: "a".to_string(),
            child: Box::new(MatchExpr::eq("x", 2)),
        }),
        "eoa[eqx]"
    );
    assert_eq!(
        encoded(MatchExpr::ElemMatchValue {
            path: "a".to_string(),
            children: vec![MatchExpr::lt("", 9), MatchExpr::gt("", 3)],
        }),
        "eva[gt,lt]"
    );
}

#[test]
fn key_collapses_single_child_or() {
    let query = NormalizedQuery::new(MatchExpr::or(vec![MatchExpr::eq("a", 1)]))
        .with_projection(ProjectionSpec::new().exclude("_id").include("a"));

    assert_key(&query, "eqa|e_id,ia");
}

// ---- sort / projection -------------------------------------------------

#[test]
fn key_encodes_sort_in_given_order() {
    assert_key(
        &NormalizedQuery::new(MatchExpr::empty()).with_sort(SortSpec::new().asc("a")),
        "an~aa",
    );
    assert_key(
        &NormalizedQuery::new(MatchExpr::empty()).with_sort(SortSpec::new().desc("a")),
        "an~da",
    );
    assert_key(
        &NormalizedQuery::new(MatchExpr::empty())
            .with_sort(SortSpec::new().meta("a", MetaKind::TextScore)),
        "an~ta",
    );
    assert_key(
        &NormalizedQuery::new(MatchExpr::eq("a", 1)).with_sort(SortSpec::new().asc("b")),
        "eqa~ab",
    );

    let ab = NormalizedQuery::new(MatchExpr::empty()).with_sort(SortSpec::new().asc("a").desc("b"));
    let ba = NormalizedQuery::new(MatchExpr::empty()).with_sort(SortSpec::new().desc("b").asc("a"));
    assert_key(&ab, "an~aa,db");
    assert_ne!(key_of(&ab), key_of(&ba));
}

#[test]
fn key_encodes_projection_by_path() {
    let base = || NormalizedQuery::new(MatchExpr::empty());

    assert_key(&base().with_projection(ProjectionSpec::new().include("a")), "an|ia");
    assert_key(&base().with_projection(ProjectionSpec::new().exclude("a")), "an|ea");
    assert_key(
        &base().with_projection(ProjectionSpec::new().field(
            "a",
            ProjectionKind::Slice {
                skip: Some(3),
                limit: 5,
            },
        )),
        "an|sa",
    );
    assert_key(
        &base().with_projection(
            ProjectionSpec::new().field("a", ProjectionKind::Meta(MetaKind::TextScore)),
        ),
        "an|ta",
    );
    assert_key(
        &NormalizedQuery::new(MatchExpr::eq("a", 1))
            .with_projection(ProjectionSpec::new().include("a.$")),
        "eqa|ia.$",
    );
}

#[test]
fn key_projection_is_order_insensitive() {
    let ab = NormalizedQuery::new(MatchExpr::empty())
        .with_projection(ProjectionSpec::new().include("a").include("b"));
    let ba = NormalizedQuery::new(MatchExpr::empty())
        .with_projection(ProjectionSpec::new().include("b").include("a"));

    assert_key(&ab, "an|ia,ib");
    assert_eq!(key_of(&ab), key_of(&ba));
}

// ---- escaping ----------------------------------------------------------

#[test]
fn key_escapes_delimiters_in_field_names() {
    let field = "a,[]~|<>/";

    assert_eq!(encoded(MatchExpr::eq(field, 1)), r"eqa\,\[\]\~\|\<\>\/");
    assert_key(
        &NormalizedQuery::new(MatchExpr::empty()).with_sort(SortSpec::new().asc(field)),
        r"an~aa\,\[\]\~\|\<\>\/",
    );
    assert_key(
        &NormalizedQuery::new(MatchExpr::empty())
            .with_projection(ProjectionSpec::new().include(field)),
        r"an|ia\,\[\]\~\|\<\>\/",
    );
    assert_eq!(encoded(MatchExpr::eq(r"a\b", 1)), r"eqa\\b");
}

#[test]
fn key_escaping_keeps_distinct_shapes_apart() {
    // Without escaping both would read "or[eqa,eqb]".
    let one_field = encoded(MatchExpr::or(vec![MatchExpr::eq("a,eqb", 1), MatchExpr::eq("c", 1)]));
    let two_fields = encoded(MatchExpr::or(vec![
        MatchExpr::eq("a", 1),
        MatchExpr::eq("b", 1),
        MatchExpr::eq("c", 1),
    ]));

    assert_ne!(one_field, two_fields);
}

#[test]
fn key_ignores_delimiters_in_literal_values() {
    assert_eq!(encoded(MatchExpr::eq("a", "foo,[]~|<>")), "eqa");
}

// ---- geo / regex -------------------------------------------------------

#[test]
fn key_distinguishes_legacy_and_geojson_geo_within() {
    let legacy = encoded(MatchExpr::geo("a", GeoOp::Within, GeometryKind::LegacyBox));
    let geojson = encoded(MatchExpr::geo("a", GeoOp::Within, GeometryKind::Polygon));

    assert_eq!(legacy, "goa/wibxfl");
    assert_eq!(geojson, "goa/wiplsp");
    assert_ne!(legacy, geojson);
}

#[test]
fn key_encodes_geo_near_variant_and_crs() {
    assert_eq!(
        encoded(MatchExpr::geo_near("a", NearVariant::Near, NearPoint::Legacy)),
        "gna/nrfl"
    );
    assert_eq!(
        encoded(MatchExpr::geo_near("a", NearVariant::NearSphere, NearPoint::Legacy)),
        "gna/nssp"
    );
    assert_eq!(
        encoded(MatchExpr::geo_near("a", NearVariant::GeoNear, NearPoint::GeoJson)),
        "gna/nrsp"
    );
}

#[test]
fn key_regex_depends_on_flags_only() {
    assert_eq!(encoded(MatchExpr::regex("a", "sometext", "")), "rea/");
    assert_eq!(encoded(MatchExpr::regex("a", "sometext", "s")), "rea/s");
    assert_eq!(encoded(MatchExpr::regex("a", "sometext", "ms")), "rea/ms");

    // flag order and repeats are normalized
    assert_eq!(encoded(MatchExpr::regex("a", "sometext", "im")), "rea/im");
    assert_eq!(encoded(MatchExpr::regex("a", "sometext", "mi")), "rea/im");
    assert_eq!(encoded(MatchExpr::regex("a", "sometext", "msm")), "rea/ms");

    // pattern text never reaches the key
    assert_eq!(
        encoded(MatchExpr::regex("a", "abc", "mi")),
        encoded(MatchExpr::regex("a", "efg", "mi"))
    );
    assert_eq!(
        encoded(MatchExpr::regex("a", "", "ms")),
        encoded(MatchExpr::regex("a", "___", "ms"))
    );
    assert_ne!(
        encoded(MatchExpr::regex("a", "sometext", "i")),
        encoded(MatchExpr::regex("a", "sometext", "m"))
    );
}

#[test]
fn key_regex_path_never_runs_into_flags() {
    assert_ne!(
        encoded(MatchExpr::regex("ai", "x", "")),
        encoded(MatchExpr::regex("a", "x", "i"))
    );
    assert_ne!(
        encoded(MatchExpr::regex("am", "x", "s")),
        encoded(MatchExpr::regex("a", "x", "ms"))
    );
    assert_eq!(encoded(MatchExpr::regex("a/i", "x", "")), r"rea\/i/");
    assert_eq!(encoded(MatchExpr::regex("a", "x", "/")), r"rea/\/");
}

#[test]
fn key_geo_path_never_runs_into_suffix() {
    assert_ne!(
        encoded(MatchExpr::geo("awi", GeoOp::Within, GeometryKind::LegacyBox)),
        encoded(MatchExpr::geo("a", GeoOp::Within, GeometryKind::LegacyBox))
    );
    assert_eq!(
        encoded(MatchExpr::geo("awibxfl", GeoOp::Intersects, GeometryKind::Point)),
        "goawibxfl/inptsp"
    );
}

#[test]
fn key_geo_near_path_never_runs_into_suffix() {
    assert_ne!(
        encoded(MatchExpr::geo_near("anr", NearVariant::Near, NearPoint::Legacy)),
        encoded(MatchExpr::geo_near("a", NearVariant::Near, NearPoint::Legacy))
    );
    assert_eq!(
        encoded(MatchExpr::geo_near("anrfl", NearVariant::NearSphere, NearPoint::GeoJson)),
        "gnanrfl/nssp"
    );
}

#[test]
fn key_schema_path_never_runs_into_keyword() {
    let schema = |path: &str, keyword: SchemaKeyword| {
        encoded(MatchExpr::Schema {
            path: path.to_string(),
            keyword,
        })
    };

    assert_eq!(schema("a", SchemaKeyword::Type), "sca/ty");
    assert_eq!(schema("aty", SchemaKeyword::MinLength), "scaty/nl");
    assert_ne!(
        schema("aty", SchemaKeyword::Type),
        schema("a", SchemaKeyword::Type)
    );
}

// ---- index compatibility ----------------------------------------------

#[test]
fn key_sparse_index_separates_null_equality() {
    let view = view([IndexDescriptor::new("a_1", ["a"]).sparse()]);

    let eq_number = keyed_with(&view, MatchExpr::eq("a", 0));
    let eq_string = keyed_with(&view, MatchExpr::eq("a", "x"));
    let eq_null = keyed_with(&view, MatchExpr::eq("a", Value::Null));

    assert_eq!(eq_number, eq_string);
    assert_eq!(eq_number.as_str(), "eqa<1>");
    assert_eq!(eq_null.as_str(), "eqa<0>");
    assert_ne!(eq_null, eq_number);

    let in_with_null = keyed_with(&view, MatchExpr::in_("a", vec![Value::Int(1), Value::Null]));
    let in_without_null = keyed_with(&view, MatchExpr::in_("a", vec![Value::Int(1)]));
    assert_ne!(in_with_null, in_without_null);

    assert_ne!(
        keyed_with(&view, MatchExpr::exists("a", true)).as_str(),
        "exa"
    );
}

#[test]
fn key_partial_index_separates_filter_subsets() {
    let view = view([
        IndexDescriptor::new("a_1", ["a"]).with_partial_filter(MatchExpr::gt("f", 0)),
    ]);

    let gt_negative_five = keyed_with(&view, MatchExpr::gt("f", -5));
    let gt_zero = keyed_with(&view, MatchExpr::gt("f", 0));
    let gt_five = keyed_with(&view, MatchExpr::gt("f", 5));

    assert_eq!(gt_zero, gt_five);
    assert_ne!(gt_negative_five, gt_zero);
    assert_eq!(gt_five.as_str(), "gtf<1>");
    assert_eq!(gt_negative_five.as_str(), "gtf<0>");

    // equality implies the bound when the value satisfies it
    assert_eq!(keyed_with(&view, MatchExpr::eq("f", 3)).as_str(), "eqf<1>");
    assert_eq!(keyed_with(&view, MatchExpr::eq("f", 0)).as_str(), "eqf<0>");

    // paths the filter never mentions are unaffected
    assert_eq!(keyed_with(&view, MatchExpr::gt("a", -5)).as_str(), "gta");
}

#[test]
fn key_collation_index_separates_string_bearing_values() {
    let collation = Collation::new("mock_reverse_string");
    let view = view([IndexDescriptor::new("a_1", ["a"]).with_collation(collation.clone())]);

    let contains_string = keyed_with(&view, MatchExpr::eq("a", "abc"));
    let contains_object = keyed_with(&view, MatchExpr::eq("a", Value::doc([("b", Value::text("abc"))])));
    let contains_array = keyed_with(
        &view,
        MatchExpr::eq("a", Value::List(vec![Value::text("abc"), Value::text("xyz")])),
    );
    let no_strings = keyed_with(&view, MatchExpr::eq("a", 5));
    let string_with_collation = compute_key(
        &NormalizedQuery::new(MatchExpr::eq("a", "abc")).with_collation(collation.clone()),
        &view,
    );

    assert_eq!(contains_string, contains_object);
    assert_eq!(contains_string, contains_array);
    assert_ne!(contains_string, no_strings);
    assert_eq!(no_strings, string_with_collation);

    let in_string = keyed_with(
        &view,
        MatchExpr::in_("a", vec![Value::Int(1), Value::text("abc"), Value::Int(2)]),
    );
    let in_no_strings = keyed_with(&view, MatchExpr::in_("a", vec![Value::Int(1), Value::Int(2)]));
    let in_string_with_collation = compute_key(
        &NormalizedQuery::new(MatchExpr::in_(
            "a",
            vec![Value::Int(1), Value::text("abc"), Value::Int(2)],
        ))
        .with_collation(collation),
        &view,
    );

    assert_ne!(in_string, in_no_strings);
    assert_eq!(in_no_strings, in_string_with_collation);
}

#[test]
fn key_collation_index_rejects_regex() {
    let view = view([IndexDescriptor::new("a_1", ["a"]).with_collation(Collation::new("fr"))]);

    assert_eq!(keyed_with(&view, MatchExpr::regex("a", "^x", "")).as_str(), "rea/<0>");
}

#[test]
fn key_simple_collation_index_does_not_discriminate() {
    let view = view([IndexDescriptor::new("a_1", ["a"]).with_collation(Collation::simple())]);

    assert!(view.is_empty());
    assert_eq!(keyed_with(&view, MatchExpr::eq("a", "abc")).as_str(), "eqa");
}

#[test]
fn key_wildcard_index_separates_object_and_array_equality() {
    let with_index = view([IndexDescriptor::new("a.$**_1", ["a.$**"])]);
    let without_index = IndexCompatibilityView::empty();

    let scalar = || MatchExpr::eq("a", "abcdef");
    let empty_array = || MatchExpr::eq("a", Value::List(vec![]));
    let object = || MatchExpr::eq("a", Value::doc([("b", Value::text("abc"))]));
    let array = || MatchExpr::eq("a", Value::List(vec![Value::Int(1), Value::Int(2)]));
    let array_with_object = || {
        MatchExpr::eq(
            "a",
            Value::List(vec![Value::Int(1), Value::doc([("b", Value::Int(1))])]),
        )
    };
    let empty_object = || MatchExpr::eq("a", Value::doc(Vec::<(String, Value)>::new()));
    let other_path = || MatchExpr::eq("b", 1234);

    assert_eq!(keyed_with(&with_index, scalar()), keyed_with(&with_index, empty_array()));

    assert_eq!(keyed_with(&without_index, scalar()), keyed_with(&without_index, object()));
    assert_ne!(keyed_with(&with_index, scalar()), keyed_with(&with_index, object()));

    assert_eq!(keyed_with(&with_index, object()), keyed_with(&with_index, array()));
    assert_eq!(keyed_with(&with_index, object()), keyed_with(&with_index, array_with_object()));
    assert_eq!(keyed_with(&with_index, object()), keyed_with(&with_index, empty_object()));

    assert_ne!(keyed_with(&without_index, scalar()), keyed_with(&without_index, other_path()));
    assert_ne!(keyed_with(&with_index, scalar()), keyed_with(&with_index, other_path()));
    assert_ne!(keyed_with(&with_index, object()), keyed_with(&with_index, other_path()));
}

#[test]
fn key_wildcard_index_traverses_nested_trees() {
    let with_index = view([IndexDescriptor::new("a.$**_1", ["a.$**"])]);
    let without_index = IndexCompatibilityView::empty();

    let allowed = || {
        MatchExpr::or(vec![
            MatchExpr::eq("a", 3),
            MatchExpr::gt("a", Value::List(vec![Value::Int(1), Value::Int(2)])),
        ])
    };
    let not_allowed = || {
        MatchExpr::or(vec![
            MatchExpr::eq("a", Value::doc([("someobject", Value::Int(1))])),
            MatchExpr::gt("a", Value::List(vec![Value::Int(1), Value::Int(2)])),
        ])
    };

    assert_eq!(keyed_with(&without_index, allowed()), keyed_with(&without_index, not_allowed()));
    assert_ne!(keyed_with(&with_index, allowed()), keyed_with(&with_index, not_allowed()));
}

#[test]
fn key_same_shape_siblings_order_by_marker() {
    let view = view([IndexDescriptor::new("a_1", ["a"]).sparse()]);
    let null = || MatchExpr::eq("a", Value::Null);
    let five = || MatchExpr::eq("a", 5);

    let null_first = keyed_with(&view, MatchExpr::or(vec![null(), five()]));
    let five_first = keyed_with(&view, MatchExpr::or(vec![five(), null()]));
    assert_eq!(null_first, five_first);
    assert_eq!(null_first.as_str(), "or[eqa<0>,eqa<1>]");

    let and_forward = keyed_with(
        &view,
        MatchExpr::and(vec![five(), MatchExpr::gt("b", 1), null()]),
    );
    let and_backward = keyed_with(
        &view,
        MatchExpr::and(vec![null(), MatchExpr::gt("b", 1), five()]),
    );
    assert_eq!(and_forward, and_backward);

    let nested_forward = keyed_with(
        &view,
        MatchExpr::nor(vec![MatchExpr::or(vec![five(), null()]), null()]),
    );
    let nested_backward = keyed_with(
        &view,
        MatchExpr::nor(vec![null(), MatchExpr::or(vec![null(), five()])]),
    );
    assert_eq!(nested_forward, nested_backward);
}

#[test]
fn key_marker_bits_follow_index_name_order() {
    let indexes = || {
        vec![
            IndexDescriptor::new("z_sparse", ["a"]).sparse(),
            IndexDescriptor::new("m_partial", ["b"]).with_partial_filter(MatchExpr::gt("a", 10)),
        ]
    };
    let forward = view(indexes());
    let reversed = view(indexes().into_iter().rev());

    // m_partial rejects a == null (not > 10); z_sparse rejects it too.
    assert_eq!(keyed_with(&forward, MatchExpr::eq("a", Value::Null)).as_str(), "eqa<00>");
    // a == 20 satisfies the partial filter and the sparse index.
    assert_eq!(keyed_with(&forward, MatchExpr::eq("a", 20)).as_str(), "eqa<11>");
    // a == 5 fails only the partial filter, which sorts first.
    assert_eq!(keyed_with(&reversed, MatchExpr::eq("a", 5)).as_str(), "eqa<01>");
}

#[test]
fn key_fingerprint_tracks_key_equality() {
    let first = key_of(&NormalizedQuery::new(MatchExpr::eq("a", 1)));
    let second = key_of(&NormalizedQuery::new(MatchExpr::eq("a", 99)));
    let other = key_of(&NormalizedQuery::new(MatchExpr::eq("b", 1)));

    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_ne!(first.fingerprint(), other.fingerprint());
    assert_eq!(first.fingerprint().as_hex().len(), 64);
    assert_eq!(first.fingerprint().short_hex().len(), 8);
}

// ---- properties --------------------------------------------------------

fn arb_literal() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        any::<bool>().prop_map(Value::Bool),
        (-1.0e9f64..1.0e9).prop_map(Value::Float),
    ]
}

fn shaped(a: Value, b: Value, c: Value, d: Value) -> MatchExpr {
    MatchExpr::and(vec![
        MatchExpr::or(vec![MatchExpr::eq("x", a), MatchExpr::gt("y", b)]),
        MatchExpr::in_("z", vec![c]),
        MatchExpr::lte("w.v", d),
        MatchExpr::regex("r", "pattern", "i"),
    ])
}

proptest! {
    #[test]
    fn key_stable_across_literals(
        left in prop::collection::vec(arb_literal(), 4),
        right in prop::collection::vec(arb_literal(), 4),
    ) {
        let indexes = view([
            IndexDescriptor::new("x_1", ["x"]).sparse(),
            IndexDescriptor::new("z_1", ["z"]).with_collation(Collation::new("de")),
            IndexDescriptor::new("w_1", ["w.v"]),
        ]);
        let [a, b, c, d] = <[Value; 4]>::try_from(left).expect("four literals");
        let [e, f, g, h] = <[Value; 4]>::try_from(right).expect("four literals");

        let sort = SortSpec::new().asc("y");
        let lhs = NormalizedQuery::new(shaped(a, b, c, d)).with_sort(sort.clone());
        let rhs = NormalizedQuery::new(shaped(e, f, g, h)).with_sort(sort);

        prop_assert_eq!(compute_key(&lhs, &indexes), compute_key(&rhs, &indexes));
    }
}
