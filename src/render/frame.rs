use crate::core::cube::{Cell, Cube};
use crate::core::domain::ResolvedDomains;
use crate::error::{ChartError, ChartResult};
use crate::layout::frame::LayoutFrame;

/// Backend-agnostic output of one chart build pass: the resolved domains,
/// the dense data cube, the label layout, and the currently visible
/// switcher slice.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub domains: ResolvedDomains,
    pub cube: Cube,
    pub layout: LayoutFrame,
    pub active_switcher: usize,
}

impl ChartFrame {
    /// Cells of the visible (scroll, switcher) slice, in cube order.
    pub fn visible_cells(&self, scroll: usize) -> impl Iterator<Item = &Cell> {
        self.cube.slice(scroll, self.active_switcher)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.layout.canvas_width.is_finite() || self.layout.canvas_width <= 0.0 {
            return Err(ChartError::InvalidCanvas {
                width: self.layout.canvas_width,
            });
        }
        // A configured switcher column over an empty table resolves to zero
        // switchers; the frame is empty and index 0 stays legal.
        if self.domains.switcher_count() > 0 && self.active_switcher >= self.domains.switcher_count()
        {
            return Err(ChartError::InvalidData(format!(
                "active switcher index {} out of range 0..{}",
                self.active_switcher,
                self.domains.switcher_count()
            )));
        }
        if self.cube.len() != self.domains.cell_count() {
            return Err(ChartError::InvalidData(format!(
                "cube holds {} cells, domains require {}",
                self.cube.len(),
                self.domains.cell_count()
            )));
        }

        for cell in self.cube.cells() {
            cell.color.validate()?;
            if !cell.opacity.is_finite() || !(0.0..=1.0).contains(&cell.opacity) {
                return Err(ChartError::InvalidData(
                    "cell opacity must be finite and in [0, 1]".to_owned(),
                ));
            }
            if !cell.bottom.is_finite() || !cell.top.is_finite() {
                return Err(ChartError::InvalidData(
                    "cell stack interval must be finite".to_owned(),
                ));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cube.is_empty()
    }
}
