use std::collections::HashMap;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::core::color::Color;
use crate::core::dimension::{ColorRule, DimensionSpecs, OpacityRule, StackMode, ValueSpec};
use crate::core::domain::ResolvedDomains;
use crate::core::types::{Record, Scalar, ScalarKey};
use crate::error::{ChartError, ChartResult};

/// Structured cell identity: the five domain indices.
///
/// Carried on every cell so consumers never re-derive identity by parsing a
/// compound string id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub scroll: usize,
    pub facet: usize,
    pub switcher: usize,
    pub category: usize,
    pub group: usize,
}

/// One leaf of the cube: a (scroll, facet, switcher, category, group)
/// combination with its derived display fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub key: CellKey,
    /// Raw value of the matched record, `None` when no record matches.
    pub value: Option<f64>,
    /// Stack interval start (bottom for vertical charts, left for horizontal).
    pub bottom: f64,
    /// Stack interval end.
    pub top: f64,
    /// Interval-category span, when start/end columns are configured.
    pub category_span: Option<(f64, f64)>,
    pub color: Color,
    pub opacity: f64,
    /// Projected extra fields for downstream text/tooltip formatting.
    pub extras: IndexMap<String, Scalar>,
}

impl Cell {
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }
}

/// Dense five-dimensional cube in scroll → facet → switcher → category →
/// group iteration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cube {
    cells: Vec<Cell>,
}

impl Cube {
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells of one (scroll, switcher) slice, in cube order.
    ///
    /// Positional stability across re-slices is guaranteed: the same
    /// (facet, category, group) combination keeps its relative position for
    /// every switcher index.
    pub fn slice(&self, scroll: usize, switcher: usize) -> impl Iterator<Item = &Cell> {
        self.cells
            .iter()
            .filter(move |cell| cell.key.scroll == scroll && cell.key.switcher == switcher)
    }

    #[must_use]
    pub fn cell(&self, key: CellKey) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.key == key)
    }
}

/// Inputs for one cube build pass.
///
/// Everything is borrowed: the builder produces an owned [`Cube`] and holds
/// no state across builds.
#[derive(Debug)]
pub struct CubeBuilder<'a> {
    pub records: &'a [Record],
    pub domains: &'a ResolvedDomains,
    pub specs: &'a DimensionSpecs,
    pub value: &'a ValueSpec,
    pub colors: &'a ColorRule,
    pub opacity: &'a OpacityRule,
    pub extra_fields: &'a [String],
    pub stack_mode: StackMode,
}

/// Composite lookup key over the configured dimension columns.
type RecordKey = SmallVec<[ScalarKey; 5]>;

impl CubeBuilder<'_> {
    pub fn build(&self) -> ChartResult<Cube> {
        let value_column = self
            .value
            .column
            .as_deref()
            .ok_or_else(|| ChartError::InvalidConfig("value axis column is required".to_owned()))?;

        let index = self.index_records();
        let mut cells = Vec::with_capacity(self.domains.cell_count());

        for (scroll_idx, scroll) in self.domains.scrolls.iter().enumerate() {
            for (facet_idx, facet) in scroll.facets.iter().enumerate() {
                let axis_min = facet.value_range.min;
                for (switcher_idx, switcher) in self.domains.switchers.iter().enumerate() {
                    for (category_idx, category) in facet.categories.iter().enumerate() {
                        let mut bottom = axis_min;
                        for (group_idx, group) in self.domains.groups.iter().enumerate() {
                            let record = self
                                .lookup(
                                    &index,
                                    &scroll.value,
                                    &facet.value,
                                    switcher,
                                    category,
                                    &group.value,
                                )
                                .map(|record_idx| &self.records[record_idx]);

                            let value = record.and_then(|r| r.number(value_column));
                            if value.is_some_and(|v| !v.is_finite()) {
                                return Err(ChartError::InvalidData(format!(
                                    "value column `{value_column}` contains a non-finite number"
                                )));
                            }
                            let contribution = value.unwrap_or(0.0);
                            // Bars grow from a shared positive baseline even
                            // when the configured minimum is negative; the
                            // negative-minimum branch shifts each segment up
                            // by -axis_min.
                            let top = if axis_min >= 0.0 {
                                bottom + contribution
                            } else {
                                bottom + (contribution - axis_min)
                            };

                            cells.push(Cell {
                                key: CellKey {
                                    scroll: scroll_idx,
                                    facet: facet_idx,
                                    switcher: switcher_idx,
                                    category: category_idx,
                                    group: group_idx,
                                },
                                value,
                                bottom,
                                top,
                                category_span: self.category_span(record),
                                color: self.cell_color(record, group.color),
                                opacity: self.cell_opacity(record),
                                extras: self.cell_extras(record),
                            });

                            bottom = match self.stack_mode {
                                StackMode::Stacked => bottom + contribution,
                                StackMode::Grouped | StackMode::Overlay => axis_min,
                            };
                        }
                    }
                }
            }
        }

        Ok(Cube { cells })
    }

    /// Indexes records by their configured dimension columns; the first
    /// record wins when several map to the same combination.
    fn index_records(&self) -> HashMap<RecordKey, usize> {
        let mut index = HashMap::with_capacity(self.records.len());
        for (record_idx, record) in self.records.iter().enumerate() {
            let key = self.record_key_of(record);
            index.entry(key).or_insert(record_idx);
        }
        index
    }

    fn record_key_of(&self, record: &Record) -> RecordKey {
        self.dimension_columns()
            .map(|column| match column {
                Some(column) => record.get(column).key(),
                None => ScalarKey::Null,
            })
            .collect()
    }

    fn lookup(
        &self,
        index: &HashMap<RecordKey, usize>,
        scroll: &Scalar,
        facet: &Scalar,
        switcher: &Scalar,
        category: &Scalar,
        group: &Scalar,
    ) -> Option<usize> {
        let values = [scroll, facet, switcher, category, group];
        let key: RecordKey = self
            .dimension_columns()
            .zip(values)
            .map(|(column, value)| match column {
                Some(_) => value.key(),
                None => ScalarKey::Null,
            })
            .collect();
        index.get(&key).copied()
    }

    fn dimension_columns(&self) -> impl Iterator<Item = Option<&str>> {
        [
            self.specs.scroll.column.as_deref(),
            self.specs.facet.column.as_deref(),
            self.specs.switcher.column.as_deref(),
            self.specs.category.column.as_deref(),
            self.specs.group.column.as_deref(),
        ]
        .into_iter()
    }

    fn category_span(&self, record: Option<&Record>) -> Option<(f64, f64)> {
        let record = record?;
        let start_column = self.specs.category.start_column.as_deref()?;
        let end_column = self.specs.category.end_column.as_deref()?;
        match (record.number(start_column), record.number(end_column)) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    fn cell_color(&self, record: Option<&Record>, group_color: Color) -> Color {
        let from_column = self.colors.color_column.as_deref().and_then(|column| {
            let hex = record?.get(column).as_text()?;
            Color::from_hex_str(hex).ok()
        });
        from_column.unwrap_or(group_color)
    }

    fn cell_opacity(&self, record: Option<&Record>) -> f64 {
        let from_column = self.opacity.opacity_column.as_deref().and_then(|column| {
            let value = record?.number(column)?;
            value.is_finite().then(|| value.clamp(0.0, 1.0))
        });
        from_column.unwrap_or(self.opacity.base)
    }

    fn cell_extras(&self, record: Option<&Record>) -> IndexMap<String, Scalar> {
        self.extra_fields
            .iter()
            .map(|name| {
                let value = record.map_or(Scalar::Null, |r| r.get(name).clone());
                (name.clone(), value)
            })
            .collect()
    }
}
