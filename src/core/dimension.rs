use serde::{Deserialize, Serialize};

use crate::core::color::{Color, Palette};
use crate::error::{ChartError, ChartResult};

/// The five faceting dimensions a chart can be sliced along.
///
/// `Category` is the primary axis; the other four subdivide or multiplex
/// views of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    Scroll,
    Facet,
    Switcher,
    Group,
    Category,
}

impl Dimension {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::Facet => "facet",
            Self::Switcher => "switcher",
            Self::Group => "group",
            Self::Category => "category",
        }
    }
}

/// How the distinct values of one dimension are ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderPolicy {
    /// First-seen order in the input table.
    #[default]
    Appearance,
    /// Sorted by the dimension value itself (numeric or lexicographic).
    Alphabetical,
    /// Sorted by an auxiliary column's value per dimension value.
    ByColumn { column: String },
}

/// Faceting configuration for one of scroll/facet/switcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionSpec {
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub order: OrderPolicy,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

impl Default for DimensionSpec {
    fn default() -> Self {
        Self {
            column: None,
            order: OrderPolicy::Appearance,
            ascending: true,
        }
    }
}

impl DimensionSpec {
    #[must_use]
    pub fn for_column(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            ..Self::default()
        }
    }
}

/// Whether the category axis is numeric or categorical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryKind {
    #[default]
    Categorical,
    Numeric,
}

/// Category axis configuration.
///
/// Interval categories (histogram-style bins) carry start/end columns next
/// to the main category column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub start_column: Option<String>,
    #[serde(default)]
    pub end_column: Option<String>,
    #[serde(default)]
    pub kind: CategoryKind,
    #[serde(default)]
    pub order: OrderPolicy,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

impl Default for CategorySpec {
    fn default() -> Self {
        Self {
            column: None,
            start_column: None,
            end_column: None,
            kind: CategoryKind::Categorical,
            order: OrderPolicy::Appearance,
            ascending: true,
        }
    }
}

impl CategorySpec {
    #[must_use]
    pub fn for_column(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            ..Self::default()
        }
    }
}

/// Group axis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub order: OrderPolicy,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

impl Default for GroupSpec {
    fn default() -> Self {
        Self {
            column: None,
            order: OrderPolicy::Appearance,
            ascending: true,
        }
    }
}

/// The full five-dimension faceting specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DimensionSpecs {
    #[serde(default)]
    pub scroll: DimensionSpec,
    #[serde(default)]
    pub facet: DimensionSpec,
    #[serde(default)]
    pub switcher: DimensionSpec,
    #[serde(default)]
    pub group: GroupSpec,
    #[serde(default)]
    pub category: CategorySpec,
}

impl DimensionSpecs {
    /// All `(column, dimension)` pairs configured on any dimension,
    /// including auxiliary ordering columns.
    pub fn configured_columns(&self) -> Vec<(&str, Dimension)> {
        let mut columns = Vec::new();
        let pairs: [(&Option<String>, Dimension); 7] = [
            (&self.scroll.column, Dimension::Scroll),
            (&self.facet.column, Dimension::Facet),
            (&self.switcher.column, Dimension::Switcher),
            (&self.group.column, Dimension::Group),
            (&self.category.column, Dimension::Category),
            (&self.category.start_column, Dimension::Category),
            (&self.category.end_column, Dimension::Category),
        ];
        for (column, dimension) in pairs {
            if let Some(column) = column {
                columns.push((column.as_str(), dimension));
            }
        }
        if let OrderPolicy::ByColumn { column } = &self.group.order {
            columns.push((column.as_str(), Dimension::Group));
        }
        columns
    }
}

/// Shared-vs-per-slice policy for one enclosing dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ScopePolicy {
    /// One shared range/domain across all slices of the enclosing dimension.
    #[default]
    Fixed,
    /// Recomputed independently per slice.
    Free,
}

/// Value-axis scoping: `scroll_scope` and `facet_scope` are independent, and
/// all four combinations are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RangeScope {
    #[serde(default)]
    pub scroll_scope: ScopePolicy,
    #[serde(default)]
    pub facet_scope: ScopePolicy,
}

impl RangeScope {
    #[must_use]
    pub const fn new(scroll_scope: ScopePolicy, facet_scope: ScopePolicy) -> Self {
        Self {
            scroll_scope,
            facet_scope,
        }
    }
}

/// How bars for the groups of one category are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StackMode {
    #[default]
    Stacked,
    Grouped,
    Overlay,
}

/// Value-axis configuration: the measured column plus range policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ValueSpec {
    #[serde(default)]
    pub column: Option<String>,
    /// Explicit axis minimum; derived from data when absent.
    #[serde(default)]
    pub min: Option<f64>,
    /// Explicit axis maximum; derived from data when absent.
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub scope: RangeScope,
}

impl ValueSpec {
    pub fn validate(&self) -> ChartResult<()> {
        if self.column.is_none() {
            return Err(ChartError::InvalidConfig(
                "value axis column is required".to_owned(),
            ));
        }
        for (name, bound) in [("min", self.min), ("max", self.max)] {
            if bound.is_some_and(|b| !b.is_finite()) {
                return Err(ChartError::InvalidConfig(format!(
                    "value axis {name} must be finite"
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min >= max {
                return Err(ChartError::InvalidConfig(
                    "value axis min must be < max".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

/// How each cell's display color is resolved.
///
/// Precedence: per-record color column > palette by group position >
/// constant fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRule {
    #[serde(default)]
    pub color_column: Option<String>,
    /// `None` paints every group with the constant fallback.
    #[serde(default = "default_palette")]
    pub palette: Option<Palette>,
    #[serde(default = "default_fallback_color")]
    pub fallback: Color,
}

impl Default for ColorRule {
    fn default() -> Self {
        Self {
            color_column: None,
            palette: default_palette(),
            fallback: default_fallback_color(),
        }
    }
}

impl ColorRule {
    /// Palette-or-fallback color for a group position; the per-record color
    /// column is applied separately, closer to the data.
    #[must_use]
    pub fn group_color(&self, index: usize) -> Color {
        match self.palette {
            Some(palette) => palette.color_at(index),
            None => self.fallback,
        }
    }
}

/// How each cell's opacity is resolved: per-record column wins over the
/// configured constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpacityRule {
    #[serde(default)]
    pub opacity_column: Option<String>,
    #[serde(default = "default_base_opacity")]
    pub base: f64,
}

impl Default for OpacityRule {
    fn default() -> Self {
        Self {
            opacity_column: None,
            base: default_base_opacity(),
        }
    }
}

impl OpacityRule {
    pub fn validate(&self) -> ChartResult<()> {
        if !self.base.is_finite() || !(0.0..=1.0).contains(&self.base) {
            return Err(ChartError::InvalidConfig(
                "base opacity must be finite and in [0, 1]".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_ascending() -> bool {
    true
}

fn default_palette() -> Option<Palette> {
    Some(Palette::Dashboard)
}

fn default_fallback_color() -> Color {
    Color::rgb(0.267, 0.447, 0.769)
}

fn default_base_opacity() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_spec_requires_column() {
        assert!(ValueSpec::default().validate().is_err());

        let spec = ValueSpec {
            column: Some("val".to_owned()),
            ..ValueSpec::default()
        };
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn value_spec_rejects_inverted_bounds() {
        let spec = ValueSpec {
            column: Some("val".to_owned()),
            min: Some(10.0),
            max: Some(5.0),
            ..ValueSpec::default()
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn configured_columns_include_aux_order_column() {
        let specs = DimensionSpecs {
            group: GroupSpec {
                column: Some("series".to_owned()),
                order: OrderPolicy::ByColumn {
                    column: "series_rank".to_owned(),
                },
                ascending: true,
            },
            ..DimensionSpecs::default()
        };

        let columns = specs.configured_columns();
        assert!(columns.contains(&("series", Dimension::Group)));
        assert!(columns.contains(&("series_rank", Dimension::Group)));
    }
}
