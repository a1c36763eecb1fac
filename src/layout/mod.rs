pub mod frame;
pub mod line_wrap;
pub mod row_pack;
mod split;
pub mod style;
pub mod text_metrics;

pub use frame::{ChipBlock, LayoutFrame, LayoutLabels, TextBlock, build_layout_frame};
pub use line_wrap::wrap;
pub use row_pack::{PackedItem, PackedRows, pack};
pub use style::{CanvasSpec, ChipStyle, Margins, TextStyles};
pub use text_metrics::{FontSpec, HeuristicTextMeasurer, TextMeasurer};
