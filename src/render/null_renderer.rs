use crate::error::ChartResult;
use crate::render::{ChartFrame, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests can catch invalid geometry
/// before a real backend is introduced.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_cell_count: usize,
    pub last_visible_cell_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &ChartFrame) -> ChartResult<()> {
        frame.validate()?;
        self.last_cell_count = frame.cube.len();
        self.last_visible_cell_count = (0..frame.domains.scrolls.len())
            .map(|scroll| frame.visible_cells(scroll).count())
            .sum();
        Ok(())
    }
}
