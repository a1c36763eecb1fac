use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::layout::text_metrics::FontSpec;

/// Outer canvas margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 16.0,
            right: 16.0,
            bottom: 16.0,
            left: 16.0,
        }
    }
}

impl Margins {
    #[must_use]
    pub fn horizontal(self) -> f64 {
        self.left + self.right
    }

    #[must_use]
    pub fn vertical(self) -> f64 {
        self.top + self.bottom
    }
}

/// Canvas geometry: everything but the computed height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSpec {
    pub width: f64,
    #[serde(default)]
    pub margins: Margins,
    /// Height of one facet plot area.
    #[serde(default = "default_plot_height")]
    pub plot_height: f64,
    /// Horizontal gap between adjacent facet plots.
    #[serde(default = "default_facet_gap")]
    pub facet_gap: f64,
    /// Vertical gap between stacked layout blocks (title, chips, plots).
    #[serde(default = "default_block_gap")]
    pub block_gap: f64,
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self {
            width: 960.0,
            margins: Margins::default(),
            plot_height: default_plot_height(),
            facet_gap: default_facet_gap(),
            block_gap: default_block_gap(),
        }
    }
}

impl CanvasSpec {
    pub fn validate(&self) -> ChartResult<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ChartError::InvalidCanvas { width: self.width });
        }
        if self.width <= self.margins.horizontal() {
            return Err(ChartError::InvalidConfig(
                "canvas width must exceed horizontal margins".to_owned(),
            ));
        }
        for (name, value) in [
            ("plot height", self.plot_height),
            ("facet gap", self.facet_gap),
            ("block gap", self.block_gap),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }

    /// Usable width between the horizontal margins.
    #[must_use]
    pub fn plot_width(&self) -> f64 {
        self.width - self.margins.horizontal()
    }
}

/// Fonts per label class plus the shared line-height factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyles {
    #[serde(default = "default_title_font")]
    pub title: FontSpec,
    #[serde(default)]
    pub axis_tick: FontSpec,
    #[serde(default = "default_facet_header_font")]
    pub facet_header: FontSpec,
    #[serde(default)]
    pub legend: FontSpec,
    #[serde(default)]
    pub switcher: FontSpec,
    #[serde(default = "default_bar_label_font")]
    pub bar_label: FontSpec,
    /// Line height as a multiple of the font size.
    #[serde(default = "default_line_height_factor")]
    pub line_height_factor: f64,
}

impl Default for TextStyles {
    fn default() -> Self {
        Self {
            title: default_title_font(),
            axis_tick: FontSpec::default(),
            facet_header: default_facet_header_font(),
            legend: FontSpec::default(),
            switcher: FontSpec::default(),
            bar_label: default_bar_label_font(),
            line_height_factor: default_line_height_factor(),
        }
    }
}

impl TextStyles {
    pub fn validate(&self) -> ChartResult<()> {
        for (class, font) in [
            ("title", &self.title),
            ("axis tick", &self.axis_tick),
            ("facet header", &self.facet_header),
            ("legend", &self.legend),
            ("switcher", &self.switcher),
            ("bar label", &self.bar_label),
        ] {
            if !font.size.is_finite() || font.size <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "{class} font size must be finite and > 0"
                )));
            }
        }
        if !self.line_height_factor.is_finite() || self.line_height_factor < 1.0 {
            return Err(ChartError::InvalidConfig(
                "line height factor must be finite and >= 1".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn line_height(&self, font: &FontSpec) -> f64 {
        font.size * self.line_height_factor
    }
}

/// Geometry added around each packed chip (legend or switcher entry).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChipStyle {
    /// Horizontal padding added to every chip.
    #[serde(default = "default_chip_padding")]
    pub padding: f64,
    /// Extra width reserved per chip (color swatch, toggle affordance).
    #[serde(default = "default_chip_extra_width")]
    pub extra_width: f64,
}

impl Default for ChipStyle {
    fn default() -> Self {
        Self {
            padding: default_chip_padding(),
            extra_width: default_chip_extra_width(),
        }
    }
}

fn default_plot_height() -> f64 {
    320.0
}

fn default_facet_gap() -> f64 {
    24.0
}

fn default_block_gap() -> f64 {
    12.0
}

fn default_title_font() -> FontSpec {
    FontSpec::sized(16.0).bold()
}

fn default_facet_header_font() -> FontSpec {
    FontSpec::sized(13.0).bold()
}

fn default_bar_label_font() -> FontSpec {
    FontSpec::sized(10.0)
}

fn default_line_height_factor() -> f64 {
    1.25
}

fn default_chip_padding() -> f64 {
    12.0
}

fn default_chip_extra_width() -> f64 {
    16.0
}
