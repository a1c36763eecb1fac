use crate::layout::line_wrap::wrap;
use crate::layout::row_pack::{PackedRows, pack};
use crate::layout::style::{CanvasSpec, ChipStyle, TextStyles};
use crate::layout::text_metrics::{FontSpec, TextMeasurer};

#[cfg(feature = "parallel-layout")]
use rayon::prelude::*;

/// One wrapped text block positioned inside the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    /// Widest measured line.
    pub width: f64,
    /// Top edge relative to the canvas top.
    pub y_offset: f64,
    pub height: f64,
}

/// A packed chip row block (legend or switcher) positioned inside the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ChipBlock {
    pub rows: PackedRows,
    pub y_offset: f64,
}

/// All label geometry the renderer needs, plus the computed canvas height.
///
/// Horizontal chip offsets are relative to the canvas center; text blocks
/// span the plot width. One scroll slice is visible at a time, so the body
/// height is the maximum over scroll slices.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutFrame {
    pub canvas_width: f64,
    pub plot_width: f64,
    /// Left edge of the plot area (the configured left margin).
    pub margin_left: f64,
    /// Horizontal gap between adjacent facet plots.
    pub facet_gap: f64,
    pub title: Option<TextBlock>,
    pub switcher_chips: Option<ChipBlock>,
    /// Facet header blocks, indexed `[scroll][facet]`.
    pub facet_headers: Vec<Vec<TextBlock>>,
    /// Header band height per scroll slice (max over its facet headers).
    pub header_heights: Vec<f64>,
    /// Category tick blocks below each facet plot, indexed
    /// `[scroll][facet][category]`.
    pub category_ticks: Vec<Vec<Vec<TextBlock>>>,
    /// Tick band height per scroll slice (max over its tick blocks).
    pub tick_heights: Vec<f64>,
    /// Top edge of the facet header band / plot body.
    pub body_y_offset: f64,
    pub plot_height: f64,
    pub legend_chips: Option<ChipBlock>,
    pub total_height: f64,
}

/// Label inputs for one layout pass, already reduced to plain strings.
#[derive(Debug, Clone, Default)]
pub struct LayoutLabels {
    pub title: Option<String>,
    pub switcher_labels: Vec<String>,
    pub legend_labels: Vec<String>,
    /// Facet header labels, indexed `[scroll][facet]`.
    pub facet_header_labels: Vec<Vec<String>>,
    /// Category tick labels, indexed `[scroll][facet][category]`.
    pub category_tick_labels: Vec<Vec<Vec<String>>>,
}

/// Assembles the vertical stack: title, switcher chips, facet header band +
/// plot body (tallest scroll slice wins), legend chips.
pub fn build_layout_frame<M>(
    measurer: &M,
    canvas: &CanvasSpec,
    text: &TextStyles,
    chips: &ChipStyle,
    labels: &LayoutLabels,
) -> LayoutFrame
where
    M: TextMeasurer + Sync,
{
    let plot_width = canvas.plot_width();
    let mut cursor = canvas.margins.top;

    let title = labels.title.as_deref().map(|title| {
        let block = wrap_block(measurer, title, plot_width, &text.title, text, cursor);
        cursor = block.y_offset + block.height + canvas.block_gap;
        block
    });

    let switcher_chips = pack_block(
        measurer,
        &labels.switcher_labels,
        canvas,
        &text.switcher,
        text,
        chips,
        &mut cursor,
    );

    let body_y_offset = cursor;
    let (facet_headers, header_heights) = facet_header_blocks(
        measurer,
        canvas,
        text,
        &labels.facet_header_labels,
        body_y_offset,
    );

    let (category_ticks, tick_heights) = category_tick_blocks(
        measurer,
        canvas,
        text,
        &labels.category_tick_labels,
        &header_heights,
        body_y_offset,
    );

    // The visible body band must fit the tallest scroll slice: its header
    // band, the plot, and its tick band.
    let slice_count = header_heights.len().max(tick_heights.len());
    let tallest_slice = (0..slice_count)
        .map(|slice| {
            header_heights.get(slice).copied().unwrap_or(0.0)
                + tick_heights.get(slice).copied().unwrap_or(0.0)
        })
        .fold(0.0, f64::max);
    cursor = body_y_offset + tallest_slice + canvas.plot_height + canvas.block_gap;

    let legend_chips = pack_block(
        measurer,
        &labels.legend_labels,
        canvas,
        &text.legend,
        text,
        chips,
        &mut cursor,
    );

    let total_height = cursor + canvas.margins.bottom;

    LayoutFrame {
        canvas_width: canvas.width,
        plot_width,
        margin_left: canvas.margins.left,
        facet_gap: canvas.facet_gap,
        title,
        switcher_chips,
        facet_headers,
        header_heights,
        category_ticks,
        tick_heights,
        body_y_offset,
        plot_height: canvas.plot_height,
        legend_chips,
        total_height,
    }
}

fn wrap_block<M: TextMeasurer + ?Sized>(
    measurer: &M,
    content: &str,
    max_width: f64,
    font: &FontSpec,
    text: &TextStyles,
    y_offset: f64,
) -> TextBlock {
    let lines = wrap(&measurer, content, max_width, font);
    let width = lines
        .iter()
        .map(|line| measurer.measure(line, font))
        .fold(0.0, f64::max);
    let height = lines.len() as f64 * text.line_height(font);
    TextBlock {
        lines,
        width,
        y_offset,
        height,
    }
}

fn pack_block<M: TextMeasurer + ?Sized>(
    measurer: &M,
    labels: &[String],
    canvas: &CanvasSpec,
    font: &FontSpec,
    text: &TextStyles,
    chips: &ChipStyle,
    cursor: &mut f64,
) -> Option<ChipBlock> {
    if labels.is_empty() {
        return None;
    }
    let rows = pack(
        &measurer,
        labels,
        canvas.plot_width(),
        chips.padding,
        chips.extra_width,
        font,
        text.line_height(font),
    );
    let block = ChipBlock {
        y_offset: *cursor,
        rows,
    };
    *cursor += block.rows.total_height + canvas.block_gap;
    Some(block)
}

/// Wraps every facet header to its facet's column width.
///
/// Headers across facets are independent, so the work parallelizes across
/// labels when the `parallel-layout` feature is enabled; results are joined
/// before any dependent vertical offset is computed.
fn facet_header_blocks<M>(
    measurer: &M,
    canvas: &CanvasSpec,
    text: &TextStyles,
    labels: &[Vec<String>],
    y_offset: f64,
) -> (Vec<Vec<TextBlock>>, Vec<f64>)
where
    M: TextMeasurer + Sync,
{
    let plot_width = canvas.plot_width();
    let font = &text.facet_header;

    let blocks: Vec<Vec<TextBlock>> = {
        let wrap_scroll = |scroll_labels: &Vec<String>| -> Vec<TextBlock> {
            let facet_count = scroll_labels.len().max(1) as f64;
            let facet_width =
                (plot_width - canvas.facet_gap * (facet_count - 1.0)) / facet_count;

            #[cfg(feature = "parallel-layout")]
            {
                scroll_labels
                    .par_iter()
                    .map(|label| wrap_block(measurer, label, facet_width, font, text, y_offset))
                    .collect()
            }

            #[cfg(not(feature = "parallel-layout"))]
            {
                scroll_labels
                    .iter()
                    .map(|label| wrap_block(measurer, label, facet_width, font, text, y_offset))
                    .collect()
            }
        };
        labels.iter().map(wrap_scroll).collect()
    };

    let heights = blocks
        .iter()
        .map(|scroll| scroll.iter().map(|block| block.height).fold(0.0, f64::max))
        .collect();
    (blocks, heights)
}

/// Wraps category tick labels to their band width, below each facet plot.
///
/// The tick band height is where wrap line counts feed back into vertical
/// space: a label that wraps to three lines grows the whole slice.
fn category_tick_blocks<M>(
    measurer: &M,
    canvas: &CanvasSpec,
    text: &TextStyles,
    labels: &[Vec<Vec<String>>],
    header_heights: &[f64],
    body_y_offset: f64,
) -> (Vec<Vec<Vec<TextBlock>>>, Vec<f64>)
where
    M: TextMeasurer + Sync,
{
    let plot_width = canvas.plot_width();
    let font = &text.axis_tick;

    let blocks: Vec<Vec<Vec<TextBlock>>> = labels
        .iter()
        .enumerate()
        .map(|(scroll_idx, facets)| {
            let header = header_heights.get(scroll_idx).copied().unwrap_or(0.0);
            let y_offset = body_y_offset + header + canvas.plot_height;
            let facet_count = facets.len().max(1) as f64;
            let facet_width = (plot_width - canvas.facet_gap * (facet_count - 1.0)) / facet_count;

            facets
                .iter()
                .map(|categories| {
                    let band_width = facet_width / categories.len().max(1) as f64;

                    #[cfg(feature = "parallel-layout")]
                    {
                        categories
                            .par_iter()
                            .map(|label| {
                                wrap_block(measurer, label, band_width, font, text, y_offset)
                            })
                            .collect()
                    }

                    #[cfg(not(feature = "parallel-layout"))]
                    {
                        categories
                            .iter()
                            .map(|label| {
                                wrap_block(measurer, label, band_width, font, text, y_offset)
                            })
                            .collect()
                    }
                })
                .collect()
        })
        .collect();

    let heights = blocks
        .iter()
        .map(|facets| {
            facets
                .iter()
                .flat_map(|facet| facet.iter())
                .map(|block| block.height)
                .fold(0.0, f64::max)
        })
        .collect();
    (blocks, heights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::text_metrics::HeuristicTextMeasurer;

    fn layout_with(labels: LayoutLabels) -> LayoutFrame {
        build_layout_frame(
            &HeuristicTextMeasurer,
            &CanvasSpec::default(),
            &TextStyles::default(),
            &ChipStyle::default(),
            &labels,
        )
    }

    #[test]
    fn empty_labels_still_reserve_the_plot_body() {
        let frame = layout_with(LayoutLabels::default());
        assert!(frame.title.is_none());
        assert!(frame.switcher_chips.is_none());
        assert!(frame.legend_chips.is_none());

        let canvas = CanvasSpec::default();
        let expected = canvas.margins.top
            + canvas.plot_height
            + canvas.block_gap
            + canvas.margins.bottom;
        assert!((frame.total_height - expected).abs() < 1e-9);
    }

    #[test]
    fn title_block_pushes_the_body_down() {
        let frame = layout_with(LayoutLabels {
            title: Some("Quarterly results".to_owned()),
            ..LayoutLabels::default()
        });
        let title = frame.title.expect("title block");
        assert!(title.height > 0.0);
        assert!(frame.body_y_offset > title.y_offset + title.height - 1e-9);
    }

    #[test]
    fn header_band_uses_the_tallest_scroll_slice() {
        let frame = layout_with(LayoutLabels {
            facet_header_labels: vec![
                vec!["short".to_owned()],
                vec!["a very long facet header that will surely wrap".to_owned()],
            ],
            ..LayoutLabels::default()
        });
        assert_eq!(frame.header_heights.len(), 2);
        assert!(frame.header_heights[1] >= frame.header_heights[0]);
    }

    #[test]
    fn wrapping_tick_labels_grow_the_body_band() {
        // Eight categories narrow each band enough that the long labels
        // wrap to several lines.
        let short = layout_with(LayoutLabels {
            category_tick_labels: vec![vec![(0..8).map(|i| format!("c{i}")).collect()]],
            ..LayoutLabels::default()
        });
        let long = layout_with(LayoutLabels {
            category_tick_labels: vec![vec![
                (0..8)
                    .map(|_| "first quarter of the fiscal year".to_owned())
                    .collect(),
            ]],
            ..LayoutLabels::default()
        });
        assert!(long.tick_heights[0] > short.tick_heights[0]);
        assert!(long.total_height > short.total_height);
    }

    #[test]
    fn tick_blocks_sit_below_their_facet_plot() {
        let frame = layout_with(LayoutLabels {
            facet_header_labels: vec![vec!["facet".to_owned()]],
            category_tick_labels: vec![vec![vec!["cat".to_owned()]]],
            ..LayoutLabels::default()
        });
        let tick = &frame.category_ticks[0][0][0];
        let expected = frame.body_y_offset + frame.header_heights[0] + frame.plot_height;
        assert!((tick.y_offset - expected).abs() < 1e-9);
    }

    #[test]
    fn legend_sits_below_the_plot_body() {
        let frame = layout_with(LayoutLabels {
            legend_labels: vec!["alpha".to_owned(), "beta".to_owned()],
            ..LayoutLabels::default()
        });
        let legend = frame.legend_chips.expect("legend block");
        assert!(legend.y_offset >= frame.body_y_offset + frame.plot_height);
    }
}
