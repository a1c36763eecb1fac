use facet_chart_rs::core::{
    CategorySpec, ColorRule, DimensionSpec, DimensionSpecs, DomainResolver, OrderPolicy, Palette,
    RangeScope, Record, Scalar, ScopePolicy, StackMode, ValueSpec,
};

/// Two scrolls x two facets with deliberately disjoint category sets, so
/// each scope combination produces a distinct domain.
fn matrix_fixture() -> Vec<Record> {
    let mut records = Vec::new();
    for (scroll, facet, cats) in [
        ("S1", "F1", ["a", "b"]),
        ("S1", "F2", ["c", "d"]),
        ("S2", "F1", ["e", "f"]),
        ("S2", "F2", ["g", "h"]),
    ] {
        for cat in cats {
            records.push(Record::from_pairs([
                ("scroll", Scalar::from(scroll)),
                ("facet", Scalar::from(facet)),
                ("cat", Scalar::from(cat)),
                ("val", Scalar::from(1.0)),
            ]));
        }
    }
    records
}

fn matrix_specs() -> DimensionSpecs {
    DimensionSpecs {
        scroll: DimensionSpec::for_column("scroll"),
        facet: DimensionSpec::for_column("facet"),
        category: CategorySpec::for_column("cat"),
        ..DimensionSpecs::default()
    }
}

fn resolve_with_scope(scroll_scope: ScopePolicy, facet_scope: ScopePolicy) -> Vec<Vec<Vec<String>>> {
    let records = matrix_fixture();
    let specs = matrix_specs();
    let value = ValueSpec {
        column: Some("val".to_owned()),
        scope: RangeScope::new(scroll_scope, facet_scope),
        ..ValueSpec::default()
    };
    let colors = ColorRule::default();
    let domains = DomainResolver::new(&records, &specs, &value, &colors, StackMode::Stacked)
        .resolve()
        .expect("resolve");

    domains
        .scrolls
        .iter()
        .map(|scroll| {
            scroll
                .facets
                .iter()
                .map(|facet| facet.categories.iter().map(Scalar::label).collect())
                .collect()
        })
        .collect()
}

#[test]
fn free_free_narrows_to_each_slice() {
    let cats = resolve_with_scope(ScopePolicy::Free, ScopePolicy::Free);
    assert_eq!(cats[0][0], vec!["a", "b"]);
    assert_eq!(cats[0][1], vec!["c", "d"]);
    assert_eq!(cats[1][0], vec!["e", "f"]);
    assert_eq!(cats[1][1], vec!["g", "h"]);
}

#[test]
fn fixed_scroll_free_facet_unions_across_scrolls() {
    let cats = resolve_with_scope(ScopePolicy::Fixed, ScopePolicy::Free);
    // Per facet, the union over both scrolls; identical for each scroll.
    assert_eq!(cats[0][0], vec!["a", "b", "e", "f"]);
    assert_eq!(cats[0][1], vec!["c", "d", "g", "h"]);
    assert_eq!(cats[1][0], cats[0][0]);
    assert_eq!(cats[1][1], cats[0][1]);
}

#[test]
fn free_scroll_fixed_facet_unions_across_facets() {
    let cats = resolve_with_scope(ScopePolicy::Free, ScopePolicy::Fixed);
    assert_eq!(cats[0][0], vec!["a", "b", "c", "d"]);
    assert_eq!(cats[0][1], cats[0][0]);
    assert_eq!(cats[1][0], vec!["e", "f", "g", "h"]);
    assert_eq!(cats[1][1], cats[1][0]);
}

#[test]
fn fixed_fixed_uses_the_whole_table() {
    let cats = resolve_with_scope(ScopePolicy::Fixed, ScopePolicy::Fixed);
    let full: Vec<String> = ["a", "b", "c", "d", "e", "f", "g", "h"]
        .iter()
        .map(|s| (*s).to_owned())
        .collect();
    for scroll in &cats {
        for facet in scroll {
            assert_eq!(*facet, full);
        }
    }
}

#[test]
fn all_four_combinations_differ_on_the_fixture() {
    let free_free = resolve_with_scope(ScopePolicy::Free, ScopePolicy::Free);
    let fixed_free = resolve_with_scope(ScopePolicy::Fixed, ScopePolicy::Free);
    let free_fixed = resolve_with_scope(ScopePolicy::Free, ScopePolicy::Fixed);
    let fixed_fixed = resolve_with_scope(ScopePolicy::Fixed, ScopePolicy::Fixed);

    let all = [&free_free, &fixed_free, &free_fixed, &fixed_fixed];
    for (i, lhs) in all.iter().enumerate() {
        for rhs in &all[i + 1..] {
            assert_ne!(lhs, rhs);
        }
    }
}

#[test]
fn alphabetical_descending_reverses_category_order() {
    let records = matrix_fixture();
    let mut specs = matrix_specs();
    specs.category.order = OrderPolicy::Alphabetical;
    specs.category.ascending = false;
    let value = ValueSpec {
        column: Some("val".to_owned()),
        ..ValueSpec::default()
    };
    let colors = ColorRule::default();
    let domains = DomainResolver::new(&records, &specs, &value, &colors, StackMode::Stacked)
        .resolve()
        .expect("resolve");

    let cats: Vec<String> = domains.scrolls[0].facets[0]
        .categories
        .iter()
        .map(Scalar::label)
        .collect();
    assert_eq!(cats, vec!["h", "g", "f", "e", "d", "c", "b", "a"]);
}

#[test]
fn numeric_categories_sort_numerically_not_lexically() {
    let mut records = Vec::new();
    for cat in [10.0, 2.0, 33.0, 4.0] {
        records.push(Record::from_pairs([
            ("cat", Scalar::from(cat)),
            ("val", Scalar::from(1.0)),
        ]));
    }
    let mut specs = DimensionSpecs {
        category: CategorySpec::for_column("cat"),
        ..DimensionSpecs::default()
    };
    specs.category.order = OrderPolicy::Alphabetical;
    let value = ValueSpec {
        column: Some("val".to_owned()),
        ..ValueSpec::default()
    };
    let colors = ColorRule::default();
    let domains = DomainResolver::new(&records, &specs, &value, &colors, StackMode::Stacked)
        .resolve()
        .expect("resolve");

    let cats: Vec<String> = domains.scrolls[0].facets[0]
        .categories
        .iter()
        .map(Scalar::label)
        .collect();
    assert_eq!(cats, vec!["2", "4", "10", "33"]);
}

#[test]
fn facet_membership_may_depend_on_scroll() {
    // S1 only ever sees F1; S2 sees F1 and F2.
    let mut records = vec![
        Record::from_pairs([
            ("scroll", Scalar::from("S1")),
            ("facet", Scalar::from("F1")),
            ("cat", Scalar::from("a")),
            ("val", Scalar::from(1.0)),
        ]),
    ];
    for facet in ["F1", "F2"] {
        records.push(Record::from_pairs([
            ("scroll", Scalar::from("S2")),
            ("facet", Scalar::from(facet)),
            ("cat", Scalar::from("a")),
            ("val", Scalar::from(1.0)),
        ]));
    }
    let specs = matrix_specs();
    let value = ValueSpec {
        column: Some("val".to_owned()),
        ..ValueSpec::default()
    };
    let colors = ColorRule::default();
    let domains = DomainResolver::new(&records, &specs, &value, &colors, StackMode::Stacked)
        .resolve()
        .expect("resolve");

    assert_eq!(domains.scrolls[0].facets.len(), 1);
    assert_eq!(domains.scrolls[1].facets.len(), 2);
}

#[test]
fn group_colors_follow_palette_positions() {
    let mut records = Vec::new();
    for group in ["g1", "g2", "g3"] {
        records.push(Record::from_pairs([
            ("cat", Scalar::from("x")),
            ("series", Scalar::from(group)),
            ("val", Scalar::from(1.0)),
        ]));
    }
    let specs = DimensionSpecs {
        category: CategorySpec::for_column("cat"),
        group: facet_chart_rs::core::GroupSpec {
            column: Some("series".to_owned()),
            ..facet_chart_rs::core::GroupSpec::default()
        },
        ..DimensionSpecs::default()
    };
    let value = ValueSpec {
        column: Some("val".to_owned()),
        ..ValueSpec::default()
    };
    let colors = ColorRule::default();
    let domains = DomainResolver::new(&records, &specs, &value, &colors, StackMode::Stacked)
        .resolve()
        .expect("resolve");

    let palette = Palette::Dashboard;
    for (index, group) in domains.groups.iter().enumerate() {
        assert_eq!(group.color, palette.color_at(index));
    }
}

#[test]
fn record_color_column_overrides_the_palette() {
    let records = vec![Record::from_pairs([
        ("cat", Scalar::from("x")),
        ("series", Scalar::from("g1")),
        ("val", Scalar::from(1.0)),
        ("fill", Scalar::from("#336699")),
    ])];
    let specs = DimensionSpecs {
        category: CategorySpec::for_column("cat"),
        group: facet_chart_rs::core::GroupSpec {
            column: Some("series".to_owned()),
            ..facet_chart_rs::core::GroupSpec::default()
        },
        ..DimensionSpecs::default()
    };
    let value = ValueSpec {
        column: Some("val".to_owned()),
        ..ValueSpec::default()
    };
    let colors = ColorRule {
        color_column: Some("fill".to_owned()),
        ..ColorRule::default()
    };
    let domains = DomainResolver::new(&records, &specs, &value, &colors, StackMode::Stacked)
        .resolve()
        .expect("resolve");

    let color = domains.groups[0].color;
    assert!((color.red - 51.0 / 255.0).abs() < 1e-9);
    assert!((color.green - 102.0 / 255.0).abs() < 1e-9);
    assert!((color.blue - 153.0 / 255.0).abs() < 1e-9);
}

#[test]
fn empty_table_keeps_unconfigured_singletons_and_empty_configured_domains() {
    let specs = matrix_specs();
    let value = ValueSpec {
        column: Some("val".to_owned()),
        ..ValueSpec::default()
    };
    let colors = ColorRule::default();
    let domains = DomainResolver::new(&[], &specs, &value, &colors, StackMode::Stacked)
        .resolve()
        .expect("resolve");

    // Configured scroll column with no rows: no scroll slices at all.
    assert!(domains.scrolls.is_empty());
    assert_eq!(domains.switchers.len(), 1);
    assert_eq!(domains.groups.len(), 1);
    assert_eq!(domains.cell_count(), 0);
}
