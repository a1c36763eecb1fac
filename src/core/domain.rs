use std::collections::HashMap;

use indexmap::IndexSet;

use crate::core::color::Color;
use crate::core::dimension::{
    ColorRule, DimensionSpecs, OrderPolicy, ScopePolicy, StackMode, ValueSpec,
};
use crate::core::types::{Record, Scalar, ScalarKey};
use crate::error::{ChartError, ChartResult};

/// Value-axis `[min, max]` for one (scroll, facet) slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }
}

/// One group-domain entry with its resolved display color.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupEntry {
    pub value: Scalar,
    pub color: Color,
}

/// One facet slice: its value, the category domain visible in it, and the
/// value-axis range that slice is drawn against.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetDomain {
    pub value: Scalar,
    pub categories: Vec<Scalar>,
    pub value_range: ValueRange,
}

/// One scroll slice with its (possibly scroll-dependent) facet domains.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollDomain {
    pub value: Scalar,
    pub facets: Vec<FacetDomain>,
}

/// Output of domain resolution: every dimension's ordered distinct values,
/// nested where membership depends on the enclosing dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDomains {
    pub scrolls: Vec<ScrollDomain>,
    pub switchers: Vec<Scalar>,
    pub groups: Vec<GroupEntry>,
}

impl ResolvedDomains {
    /// Number of cells a dense cube over these domains must contain.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let per_category = self.switchers.len() * self.groups.len();
        self.scrolls
            .iter()
            .flat_map(|scroll| scroll.facets.iter())
            .map(|facet| facet.categories.len() * per_category)
            .sum()
    }

    #[must_use]
    pub fn switcher_count(&self) -> usize {
        self.switchers.len()
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// Resolves the ordered distinct values of every faceting dimension from the
/// input table, honoring per-dimension ordering and fixed/free range scoping.
#[derive(Debug)]
pub struct DomainResolver<'a> {
    records: &'a [Record],
    specs: &'a DimensionSpecs,
    value: &'a ValueSpec,
    colors: &'a ColorRule,
    stack_mode: StackMode,
}

impl<'a> DomainResolver<'a> {
    #[must_use]
    pub fn new(
        records: &'a [Record],
        specs: &'a DimensionSpecs,
        value: &'a ValueSpec,
        colors: &'a ColorRule,
        stack_mode: StackMode,
    ) -> Self {
        Self {
            records,
            specs,
            value,
            colors,
            stack_mode,
        }
    }

    pub fn resolve(&self) -> ChartResult<ResolvedDomains> {
        let Some(category_column) = self.specs.category.column.as_deref() else {
            return Err(ChartError::InvalidConfig(
                "category axis column is required".to_owned(),
            ));
        };
        self.value.validate()?;

        let scroll_values = self.scroll_values();
        let mut scrolls = Vec::with_capacity(scroll_values.len());
        for scroll in scroll_values {
            let scroll_key = self.specs.scroll.column.as_deref().map(|_| scroll.key());
            let facets = self.facet_domains(category_column, scroll_key.as_ref())?;
            scrolls.push(ScrollDomain {
                value: scroll,
                facets,
            });
        }

        Ok(ResolvedDomains {
            scrolls,
            switchers: self.switcher_values(),
            groups: self.group_entries(),
        })
    }

    fn scroll_values(&self) -> Vec<Scalar> {
        let Some(column) = self.specs.scroll.column.as_deref() else {
            return vec![Scalar::Null];
        };
        let values = distinct(self.records.iter(), column);
        self.ordered(
            values,
            column,
            simple_order(&self.specs.scroll.order),
            self.specs.scroll.ascending,
        )
    }

    fn switcher_values(&self) -> Vec<Scalar> {
        let Some(column) = self.specs.switcher.column.as_deref() else {
            return vec![Scalar::Null];
        };
        let values = distinct(self.records.iter(), column);
        self.ordered(
            values,
            column,
            simple_order(&self.specs.switcher.order),
            self.specs.switcher.ascending,
        )
    }

    fn group_entries(&self) -> Vec<GroupEntry> {
        let Some(column) = self.specs.group.column.as_deref() else {
            return vec![GroupEntry {
                value: Scalar::Null,
                color: self.colors.group_color(0),
            }];
        };

        let values = distinct(self.records.iter(), column);
        let values = self.ordered(
            values,
            column,
            &self.specs.group.order,
            self.specs.group.ascending,
        );

        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let color = self
                    .record_color(column, &value)
                    .unwrap_or_else(|| self.colors.group_color(index));
                GroupEntry { value, color }
            })
            .collect()
    }

    /// First parseable per-record color for a group value, when a color
    /// column is configured.
    fn record_color(&self, group_column: &str, group_value: &Scalar) -> Option<Color> {
        let color_column = self.colors.color_column.as_deref()?;
        let group_key = group_value.key();
        self.records
            .iter()
            .filter(|record| record.get(group_column).key() == group_key)
            .find_map(|record| {
                let hex = record.get(color_column).as_text()?;
                Color::from_hex_str(hex).ok()
            })
    }

    fn facet_domains(
        &self,
        category_column: &str,
        scroll: Option<&ScalarKey>,
    ) -> ChartResult<Vec<FacetDomain>> {
        let facet_values = match self.specs.facet.column.as_deref() {
            Some(column) => {
                let matching = self
                    .records
                    .iter()
                    .filter(|record| matches_key(record, self.specs.scroll.column.as_deref(), scroll));
                let values = distinct(matching, column);
                self.ordered(
                    values,
                    column,
                    simple_order(&self.specs.facet.order),
                    self.specs.facet.ascending,
                )
            }
            None => vec![Scalar::Null],
        };

        let mut facets = Vec::with_capacity(facet_values.len());
        for facet in facet_values {
            let facet_key = self.specs.facet.column.as_deref().map(|_| facet.key());
            let categories = self.category_domain(category_column, scroll, facet_key.as_ref());
            let value_range = self.value_range(scroll, facet_key.as_ref())?;
            facets.push(FacetDomain {
                value: facet,
                categories,
                value_range,
            });
        }
        Ok(facets)
    }

    /// Category domain for one (scroll, facet) slice under the four-way
    /// range-scope matrix: a `free` scope narrows the record subset to the
    /// enclosing slice, a `fixed` scope widens it across all slices.
    fn category_domain(
        &self,
        column: &str,
        scroll: Option<&ScalarKey>,
        facet: Option<&ScalarKey>,
    ) -> Vec<Scalar> {
        let scope = self.value.scope;
        let scroll_filter = match scope.scroll_scope {
            ScopePolicy::Free => scroll,
            ScopePolicy::Fixed => None,
        };
        let facet_filter = match scope.facet_scope {
            ScopePolicy::Free => facet,
            ScopePolicy::Fixed => None,
        };

        let subset = self.records.iter().filter(|record| {
            matches_key(record, self.specs.scroll.column.as_deref(), scroll_filter)
                && matches_key(record, self.specs.facet.column.as_deref(), facet_filter)
        });
        let values = distinct(subset, column);
        self.ordered(
            values,
            column,
            &self.specs.category.order,
            self.specs.category.ascending,
        )
    }

    /// Value-axis range for one (scroll, facet) slice, under the same scope
    /// matrix as the category domain. Derived from the data envelope
    /// (stacked sums per category in stacked mode, raw values otherwise)
    /// unless the config pins explicit bounds.
    fn value_range(
        &self,
        scroll: Option<&ScalarKey>,
        facet: Option<&ScalarKey>,
    ) -> ChartResult<ValueRange> {
        let value_column = self
            .value
            .column
            .as_deref()
            .ok_or_else(|| ChartError::InvalidConfig("value axis column is required".to_owned()))?;

        let scope = self.value.scope;
        let scroll_filter = match scope.scroll_scope {
            ScopePolicy::Free => scroll,
            ScopePolicy::Fixed => None,
        };
        let facet_filter = match scope.facet_scope {
            ScopePolicy::Free => facet,
            ScopePolicy::Fixed => None,
        };

        let subset = self.records.iter().filter(|record| {
            matches_key(record, self.specs.scroll.column.as_deref(), scroll_filter)
                && matches_key(record, self.specs.facet.column.as_deref(), facet_filter)
        });

        let stacked = self.stack_mode == StackMode::Stacked && self.specs.group.column.is_some();
        let mut raw_min = f64::INFINITY;
        let mut raw_max = f64::NEG_INFINITY;
        // One stack exists per (scroll, facet, switcher, category); a fixed
        // scope widens which stacks are enveloped, never merges them.
        let mut sums: HashMap<[ScalarKey; 4], f64> = HashMap::new();

        for record in subset {
            let Some(value) = record.number(value_column) else {
                continue;
            };
            if !value.is_finite() {
                return Err(ChartError::InvalidData(format!(
                    "value column `{value_column}` contains a non-finite number"
                )));
            }
            raw_min = raw_min.min(value);
            raw_max = raw_max.max(value);
            if stacked {
                let key_of = |column: &Option<String>| {
                    column
                        .as_deref()
                        .map_or(ScalarKey::Null, |column| record.get(column).key())
                };
                let stack = [
                    key_of(&self.specs.scroll.column),
                    key_of(&self.specs.facet.column),
                    key_of(&self.specs.switcher.column),
                    key_of(&self.specs.category.column),
                ];
                *sums.entry(stack).or_insert(0.0) += value;
            }
        }

        if stacked {
            for sum in sums.values() {
                raw_min = raw_min.min(*sum);
                raw_max = raw_max.max(*sum);
            }
        }

        let (derived_min, derived_max) = if raw_min.is_finite() {
            (raw_min.min(0.0), raw_max)
        } else {
            // Empty slice: the range is unused (zero cells), keep a sane unit
            // interval so downstream math stays finite.
            (0.0, 1.0)
        };

        let min = self.value.min.unwrap_or(derived_min);
        let mut max = self.value.max.unwrap_or(derived_max);
        if max <= min {
            max = min + 1.0;
        }
        Ok(ValueRange { min, max })
    }

    /// Applies an ordering policy to a distinct value list.
    fn ordered(
        &self,
        mut values: Vec<Scalar>,
        column: &str,
        order: &OrderPolicy,
        ascending: bool,
    ) -> Vec<Scalar> {
        match order {
            OrderPolicy::Appearance => {}
            OrderPolicy::Alphabetical => {
                values.sort_by(Scalar::cmp_total);
            }
            OrderPolicy::ByColumn { column: aux } => {
                let mut sort_keys: HashMap<ScalarKey, Scalar> = HashMap::new();
                for record in self.records {
                    let key = record.get(column).key();
                    if key == ScalarKey::Null {
                        continue;
                    }
                    sort_keys
                        .entry(key)
                        .or_insert_with(|| record.get(aux).clone());
                }
                values.sort_by(|lhs, rhs| {
                    let lhs_key = sort_keys.get(&lhs.key()).unwrap_or(&Scalar::NULL);
                    let rhs_key = sort_keys.get(&rhs.key()).unwrap_or(&Scalar::NULL);
                    lhs_key.cmp_total(rhs_key)
                });
            }
        }
        if !ascending {
            values.reverse();
        }
        values
    }
}

/// Distinct non-null values of `column` in first-seen order.
fn distinct<'a>(records: impl Iterator<Item = &'a Record>, column: &str) -> Vec<Scalar> {
    let mut seen: IndexSet<ScalarKey> = IndexSet::new();
    let mut values = Vec::new();
    for record in records {
        let value = record.get(column);
        if value.is_null() {
            continue;
        }
        if seen.insert(value.key()) {
            values.push(value.clone());
        }
    }
    values
}

/// True when `record` matches `key` on `column`; an absent column or key
/// filter always matches.
fn matches_key(record: &Record, column: Option<&str>, key: Option<&ScalarKey>) -> bool {
    match (column, key) {
        (Some(column), Some(key)) => record.get(column).key() == *key,
        _ => true,
    }
}

/// Scroll/facet/switcher dimensions sort by appearance or value only; an
/// auxiliary sort column is a group-dimension concern.
fn simple_order(order: &OrderPolicy) -> &OrderPolicy {
    match order {
        OrderPolicy::ByColumn { .. } => &OrderPolicy::Appearance,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dimension::{CategorySpec, DimensionSpec, GroupSpec};

    fn record(scroll: &str, cat: &str, val: f64) -> Record {
        Record::from_pairs([
            ("scroll", Scalar::from(scroll)),
            ("cat", Scalar::from(cat)),
            ("val", Scalar::from(val)),
        ])
    }

    fn specs() -> DimensionSpecs {
        DimensionSpecs {
            scroll: DimensionSpec::for_column("scroll"),
            category: CategorySpec::for_column("cat"),
            ..DimensionSpecs::default()
        }
    }

    fn value_spec() -> ValueSpec {
        ValueSpec {
            column: Some("val".to_owned()),
            ..ValueSpec::default()
        }
    }

    #[test]
    fn unconfigured_dimensions_resolve_to_single_null() {
        let records = vec![record("A", "x", 1.0)];
        let specs = DimensionSpecs {
            category: CategorySpec::for_column("cat"),
            ..DimensionSpecs::default()
        };
        let value = value_spec();
        let colors = ColorRule::default();
        let resolver = DomainResolver::new(&records, &specs, &value, &colors, StackMode::Stacked);
        let domains = resolver.resolve().expect("resolve");

        assert_eq!(domains.scrolls.len(), 1);
        assert!(domains.scrolls[0].value.is_null());
        assert_eq!(domains.switchers, vec![Scalar::Null]);
        assert_eq!(domains.groups.len(), 1);
        assert!(domains.groups[0].value.is_null());
    }

    #[test]
    fn missing_category_column_is_a_config_error() {
        let records = vec![record("A", "x", 1.0)];
        let specs = DimensionSpecs::default();
        let value = value_spec();
        let colors = ColorRule::default();
        let resolver = DomainResolver::new(&records, &specs, &value, &colors, StackMode::Stacked);
        assert!(resolver.resolve().is_err());
    }

    #[test]
    fn fixed_scroll_scope_shares_categories_across_scrolls() {
        let records = vec![record("A", "x", 10.0), record("A", "y", 20.0), record("B", "x", 5.0)];
        let specs = specs();
        let value = value_spec();
        let colors = ColorRule::default();
        let resolver = DomainResolver::new(&records, &specs, &value, &colors, StackMode::Stacked);
        let domains = resolver.resolve().expect("resolve");

        for scroll in &domains.scrolls {
            let categories: Vec<_> = scroll.facets[0]
                .categories
                .iter()
                .map(Scalar::label)
                .collect();
            assert_eq!(categories, vec!["x", "y"]);
        }
    }

    #[test]
    fn free_scroll_scope_narrows_categories_per_scroll() {
        let records = vec![record("A", "x", 10.0), record("A", "y", 20.0), record("B", "x", 5.0)];
        let specs = specs();
        let value = ValueSpec {
            scope: crate::core::dimension::RangeScope::new(ScopePolicy::Free, ScopePolicy::Free),
            ..value_spec()
        };
        let colors = ColorRule::default();
        let resolver = DomainResolver::new(&records, &specs, &value, &colors, StackMode::Stacked);
        let domains = resolver.resolve().expect("resolve");

        let b_categories: Vec<_> = domains.scrolls[1].facets[0]
            .categories
            .iter()
            .map(Scalar::label)
            .collect();
        assert_eq!(b_categories, vec!["x"]);
    }

    #[test]
    fn group_order_by_auxiliary_column() {
        let mut records = Vec::new();
        for (group, rank, val) in [("beta", 2.0, 1.0), ("alpha", 3.0, 2.0), ("gamma", 1.0, 3.0)] {
            records.push(Record::from_pairs([
                ("cat", Scalar::from("x")),
                ("val", Scalar::from(val)),
                ("series", Scalar::from(group)),
                ("rank", Scalar::from(rank)),
            ]));
        }
        let specs = DimensionSpecs {
            category: CategorySpec::for_column("cat"),
            group: GroupSpec {
                column: Some("series".to_owned()),
                order: OrderPolicy::ByColumn {
                    column: "rank".to_owned(),
                },
                ascending: true,
            },
            ..DimensionSpecs::default()
        };
        let value = value_spec();
        let colors = ColorRule::default();
        let resolver = DomainResolver::new(&records, &specs, &value, &colors, StackMode::Stacked);
        let domains = resolver.resolve().expect("resolve");

        let order: Vec<_> = domains.groups.iter().map(|g| g.value.label()).collect();
        assert_eq!(order, vec!["gamma", "beta", "alpha"]);
    }

    #[test]
    fn stacked_range_covers_category_sums() {
        let mut records = Vec::new();
        for (group, val) in [("g1", 10.0), ("g2", 15.0)] {
            records.push(Record::from_pairs([
                ("cat", Scalar::from("x")),
                ("series", Scalar::from(group)),
                ("val", Scalar::from(val)),
            ]));
        }
        let specs = DimensionSpecs {
            category: CategorySpec::for_column("cat"),
            group: GroupSpec {
                column: Some("series".to_owned()),
                ..GroupSpec::default()
            },
            ..DimensionSpecs::default()
        };
        let value = value_spec();
        let colors = ColorRule::default();
        let resolver = DomainResolver::new(&records, &specs, &value, &colors, StackMode::Stacked);
        let domains = resolver.resolve().expect("resolve");

        let range = domains.scrolls[0].facets[0].value_range;
        assert_eq!(range.min, 0.0);
        assert_eq!(range.max, 25.0);
    }
}
