use serde::{Deserialize, Serialize};

use crate::core::{CategoryKind, ColorRule, DimensionSpecs, OpacityRule, StackMode, ValueSpec};
use crate::error::{ChartError, ChartResult};
use crate::layout::{CanvasSpec, ChipStyle, TextStyles};

/// Public chart configuration.
///
/// Every option is enumerated here and defaulted exactly once, at this
/// boundary; downstream code never re-derives a default. The type is
/// serializable so host applications can persist/load chart setup without
/// inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetChartConfig {
    #[serde(default)]
    pub canvas: CanvasSpec,
    #[serde(default)]
    pub dimensions: DimensionSpecs,
    #[serde(default)]
    pub value: ValueSpec,
    #[serde(default)]
    pub stack_mode: StackMode,
    #[serde(default)]
    pub color: ColorRule,
    #[serde(default)]
    pub opacity: OpacityRule,
    /// Record columns copied onto every cell for text/tooltip formatting.
    #[serde(default)]
    pub extra_fields: Vec<String>,
    #[serde(default)]
    pub text: TextStyles,
    #[serde(default)]
    pub chips: ChipStyle,
    #[serde(default)]
    pub title: Option<String>,
}

impl Default for FacetChartConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSpec::default(),
            dimensions: DimensionSpecs::default(),
            value: ValueSpec::default(),
            stack_mode: StackMode::default(),
            color: ColorRule::default(),
            opacity: OpacityRule::default(),
            extra_fields: Vec::new(),
            text: TextStyles::default(),
            chips: ChipStyle::default(),
            title: None,
        }
    }
}

impl FacetChartConfig {
    /// Creates a minimal config over the two required axes.
    #[must_use]
    pub fn new(category_column: impl Into<String>, value_column: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.dimensions.category.column = Some(category_column.into());
        config.value.column = Some(value_column.into());
        config
    }

    /// Sets the canvas geometry.
    #[must_use]
    pub fn with_canvas(mut self, canvas: CanvasSpec) -> Self {
        self.canvas = canvas;
        self
    }

    /// Sets the chart title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the scroll dimension column.
    #[must_use]
    pub fn with_scroll_column(mut self, column: impl Into<String>) -> Self {
        self.dimensions.scroll.column = Some(column.into());
        self
    }

    /// Sets the facet dimension column.
    #[must_use]
    pub fn with_facet_column(mut self, column: impl Into<String>) -> Self {
        self.dimensions.facet.column = Some(column.into());
        self
    }

    /// Sets the switcher dimension column.
    #[must_use]
    pub fn with_switcher_column(mut self, column: impl Into<String>) -> Self {
        self.dimensions.switcher.column = Some(column.into());
        self
    }

    /// Sets the group dimension column.
    #[must_use]
    pub fn with_group_column(mut self, column: impl Into<String>) -> Self {
        self.dimensions.group.column = Some(column.into());
        self
    }

    /// Sets the stacking behavior.
    #[must_use]
    pub fn with_stack_mode(mut self, mode: StackMode) -> Self {
        self.stack_mode = mode;
        self
    }

    /// Sets the value-axis range policy and bounds.
    #[must_use]
    pub fn with_value_spec(mut self, value: ValueSpec) -> Self {
        self.value = value;
        self
    }

    /// Sets the color resolution rule.
    #[must_use]
    pub fn with_color(mut self, color: ColorRule) -> Self {
        self.color = color;
        self
    }

    /// Sets the opacity resolution rule.
    #[must_use]
    pub fn with_opacity(mut self, opacity: OpacityRule) -> Self {
        self.opacity = opacity;
        self
    }

    /// Sets the extra fields projected onto every cell.
    #[must_use]
    pub fn with_extra_fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets per-label-class text styles.
    #[must_use]
    pub fn with_text_styles(mut self, text: TextStyles) -> Self {
        self.text = text;
        self
    }

    /// Fail-fast structural validation; runs before any layout work.
    pub fn validate(&self) -> ChartResult<()> {
        self.canvas.validate()?;
        self.text.validate()?;
        self.value.validate()?;
        self.opacity.validate()?;
        self.color.fallback.validate().map_err(|_| {
            ChartError::InvalidConfig("fallback color channels must be in [0, 1]".to_owned())
        })?;
        if self.dimensions.category.column.is_none() {
            return Err(ChartError::InvalidConfig(
                "category axis column is required".to_owned(),
            ));
        }
        let category = &self.dimensions.category;
        if category.start_column.is_some() != category.end_column.is_some() {
            return Err(ChartError::InvalidConfig(
                "interval categories need both start and end columns".to_owned(),
            ));
        }
        if category.start_column.is_some() && category.kind != CategoryKind::Numeric {
            return Err(ChartError::InvalidConfig(
                "interval categories require the numeric category kind".to_owned(),
            ));
        }
        Ok(())
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}
