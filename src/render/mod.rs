mod frame;
mod null_renderer;

pub use frame::ChartFrame;
pub use null_renderer::NullRenderer;

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic [`ChartFrame`] so
/// drawing code remains isolated from domain resolution and layout logic.
pub trait Renderer {
    fn render(&mut self, frame: &ChartFrame) -> ChartResult<()>;
}
