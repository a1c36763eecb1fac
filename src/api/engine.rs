use tracing::{debug, trace};

use crate::api::chart_config::FacetChartConfig;
use crate::core::cube::{Cube, CubeBuilder};
use crate::core::domain::{DomainResolver, ResolvedDomains};
use crate::core::types::{Record, Scalar};
use crate::error::{ChartError, ChartResult};
use crate::layout::frame::{LayoutFrame, LayoutLabels, build_layout_frame};
use crate::layout::text_metrics::TextMeasurer;
use crate::render::{ChartFrame, Renderer};

/// Everything derived from one build pass.
#[derive(Debug, Clone)]
struct BuiltState {
    domains: ResolvedDomains,
    cube: Cube,
    layout: LayoutFrame,
}

/// The engine boundary: validates configuration up front, owns the input
/// table, and turns both into [`ChartFrame`]s.
///
/// The only stateful interaction, switching the visible switcher slice,
/// re-slices the cached cube; it never re-resolves domains or re-scans the
/// table, so cell identities stay positionally stable.
#[derive(Debug)]
pub struct FacetChartEngine<M: TextMeasurer> {
    config: FacetChartConfig,
    measurer: M,
    records: Vec<Record>,
    state: Option<BuiltState>,
    active_switcher: usize,
}

impl<M: TextMeasurer + Sync> FacetChartEngine<M> {
    /// Creates an engine from validated configuration; configuration errors
    /// surface here, before any layout work.
    pub fn new(config: FacetChartConfig, measurer: M) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            measurer,
            records: Vec::new(),
            state: None,
            active_switcher: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &FacetChartConfig {
        &self.config
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn active_switcher(&self) -> usize {
        self.active_switcher
    }

    /// Replaces the input table and invalidates any built state.
    pub fn set_records(&mut self, records: Vec<Record>) {
        debug!(count = records.len(), "set records");
        self.records = records;
        self.state = None;
    }

    /// Runs the full pipeline: column checks, domain resolution, cube build,
    /// label layout. The result is cached for re-slicing.
    pub fn build(&mut self) -> ChartResult<ChartFrame> {
        self.validate_columns()?;

        let domains = DomainResolver::new(
            &self.records,
            &self.config.dimensions,
            &self.config.value,
            &self.config.color,
            self.config.stack_mode,
        )
        .resolve()?;

        let cube = CubeBuilder {
            records: &self.records,
            domains: &domains,
            specs: &self.config.dimensions,
            value: &self.config.value,
            colors: &self.config.color,
            opacity: &self.config.opacity,
            extra_fields: &self.config.extra_fields,
            stack_mode: self.config.stack_mode,
        }
        .build()?;

        let labels = self.layout_labels(&domains);
        let layout = build_layout_frame(
            &self.measurer,
            &self.config.canvas,
            &self.config.text,
            &self.config.chips,
            &labels,
        );

        debug!(
            cells = cube.len(),
            switchers = domains.switcher_count(),
            height = layout.total_height,
            "built chart frame"
        );

        self.active_switcher = self
            .active_switcher
            .min(domains.switcher_count().saturating_sub(1));
        self.state = Some(BuiltState {
            domains,
            cube,
            layout,
        });
        self.frame()
    }

    /// Assembles a frame from the cached build.
    pub fn frame(&self) -> ChartResult<ChartFrame> {
        let state = self.built_state()?;
        Ok(ChartFrame {
            domains: state.domains.clone(),
            cube: state.cube.clone(),
            layout: state.layout.clone(),
            active_switcher: self.active_switcher,
        })
    }

    /// Switches the visible switcher slice.
    ///
    /// Idempotent and side-effect-free with respect to cell identities: the
    /// cube is reused as built, only the active index changes.
    pub fn set_active_switcher(&mut self, index: usize) -> ChartResult<()> {
        let state = self.built_state()?;
        let count = state.domains.switcher_count();
        if index >= count {
            return Err(ChartError::InvalidData(format!(
                "switcher index {index} out of range 0..{count}"
            )));
        }
        trace!(index, "set active switcher");
        self.active_switcher = index;
        Ok(())
    }

    /// Switcher domain values, for wiring interaction handlers.
    pub fn switcher_values(&self) -> ChartResult<&[Scalar]> {
        Ok(&self.built_state()?.domains.switchers)
    }

    /// Renders the current frame into a backend.
    pub fn render_into(&self, renderer: &mut dyn Renderer) -> ChartResult<()> {
        renderer.render(&self.frame()?)
    }

    fn built_state(&self) -> ChartResult<&BuiltState> {
        self.state.as_ref().ok_or_else(|| {
            ChartError::InvalidData("chart frame not built yet; call build() first".to_owned())
        })
    }

    /// Fails fast when a configured column never appears in the table.
    ///
    /// Skipped for an empty table: an empty table is valid input producing
    /// an empty cube, not a configuration error.
    fn validate_columns(&self) -> ChartResult<()> {
        if self.records.is_empty() {
            return Ok(());
        }

        let mut required: Vec<(&str, &'static str)> = self
            .config
            .dimensions
            .configured_columns()
            .into_iter()
            .map(|(column, dimension)| (column, dimension.name()))
            .collect();
        if let Some(column) = self.config.value.column.as_deref() {
            required.push((column, "value"));
        }
        if let Some(column) = self.config.color.color_column.as_deref() {
            required.push((column, "color"));
        }
        if let Some(column) = self.config.opacity.opacity_column.as_deref() {
            required.push((column, "opacity"));
        }

        for (column, axis) in required {
            let present = self
                .records
                .iter()
                .any(|record| record.contains_column(column));
            if !present {
                return Err(ChartError::MissingColumn {
                    column: column.to_owned(),
                    axis,
                });
            }
        }
        Ok(())
    }

    /// Reduces the resolved domains to the label strings the layout needs.
    fn layout_labels(&self, domains: &ResolvedDomains) -> LayoutLabels {
        let switcher_labels = if self.config.dimensions.switcher.column.is_some() {
            domains.switchers.iter().map(Scalar::label).collect()
        } else {
            Vec::new()
        };
        let legend_labels = if self.config.dimensions.group.column.is_some() {
            domains
                .groups
                .iter()
                .map(|group| group.value.label())
                .collect()
        } else {
            Vec::new()
        };
        let facet_header_labels = domains
            .scrolls
            .iter()
            .map(|scroll| {
                if self.config.dimensions.facet.column.is_some() {
                    scroll
                        .facets
                        .iter()
                        .map(|facet| facet.value.label())
                        .collect()
                } else {
                    Vec::new()
                }
            })
            .collect();
        let category_tick_labels = domains
            .scrolls
            .iter()
            .map(|scroll| {
                scroll
                    .facets
                    .iter()
                    .map(|facet| facet.categories.iter().map(Scalar::label).collect())
                    .collect()
            })
            .collect();

        LayoutLabels {
            title: self.config.title.clone(),
            switcher_labels,
            legend_labels,
            facet_header_labels,
            category_tick_labels,
        }
    }
}
