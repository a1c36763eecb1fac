use crate::layout::split::assign_ideal_offsets;
use crate::layout::text_metrics::{FontSpec, TextMeasurer};

/// Placement of one packed item.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedItem {
    /// Index into the input item sequence.
    pub index: usize,
    pub row: usize,
    /// Left edge relative to the block's horizontal center.
    pub x_offset: f64,
    /// Top edge relative to the block's top.
    pub y_offset: f64,
    pub width: f64,
}

/// A packed block of inline items: one or more centered rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackedRows {
    pub items: Vec<PackedItem>,
    pub row_count: usize,
    pub total_height: f64,
    pub max_row_width: f64,
}

impl PackedRows {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Packs an ordered list of text items (legend entries, switcher labels)
/// into horizontally-centered rows not exceeding `max_width`.
///
/// Items may contain hard line breaks; an item's width is its widest
/// internal line plus `padding_per_item` and `extra_width_per_item` (swatch,
/// icon). When a single row overflows, the packer searches split counts over
/// the *item sequence* with the same ideal-offset assignment the line
/// wrapper uses, measured in cumulative item width. Rows are centered
/// independently; a row's height is the max internal line count among its
/// items times `line_height`. If no split count fits, the maximal split is
/// returned as a best effort.
pub fn pack(
    measurer: &dyn TextMeasurer,
    items: &[String],
    max_width: f64,
    padding_per_item: f64,
    extra_width_per_item: f64,
    font: &FontSpec,
    line_height: f64,
) -> PackedRows {
    if items.is_empty() {
        return PackedRows::default();
    }

    let widths: Vec<f64> = items
        .iter()
        .map(|item| natural_width(measurer, item, font) + padding_per_item + extra_width_per_item)
        .collect();
    let line_counts: Vec<usize> = items.iter().map(|item| item.lines().count().max(1)).collect();
    let total: f64 = widths.iter().sum();

    let row_ranges = if total <= max_width || items.len() == 1 {
        vec![0..items.len()]
    } else {
        split_into_rows(&widths, total, max_width)
    };

    let mut packed = PackedRows {
        items: Vec::with_capacity(items.len()),
        row_count: row_ranges.len(),
        total_height: 0.0,
        max_row_width: 0.0,
    };

    let mut y_offset = 0.0;
    for (row, range) in row_ranges.into_iter().enumerate() {
        let row_width: f64 = widths[range.clone()].iter().sum();
        let row_lines = line_counts[range.clone()]
            .iter()
            .copied()
            .max()
            .unwrap_or(1);
        let row_height = row_lines as f64 * line_height;

        let mut cursor = -row_width / 2.0;
        for index in range {
            packed.items.push(PackedItem {
                index,
                row,
                x_offset: cursor,
                y_offset,
                width: widths[index],
            });
            cursor += widths[index];
        }

        packed.max_row_width = packed.max_row_width.max(row_width);
        y_offset += row_height;
    }
    packed.total_height = y_offset;
    packed
}

/// Widest internal line of a (possibly multi-line) chip.
fn natural_width(measurer: &dyn TextMeasurer, item: &str, font: &FontSpec) -> f64 {
    item.lines()
        .map(|line| measurer.measure(line, font))
        .fold(0.0, f64::max)
}

/// Searches increasing split counts over the item sequence; returns the item
/// index ranges of the accepted rows.
fn split_into_rows(widths: &[f64], total: f64, max_width: f64) -> Vec<std::ops::Range<usize>> {
    // Gap g sits between items g-1 and g, at the cumulative width of the
    // items before it.
    let gaps: Vec<f64> = widths
        .iter()
        .take(widths.len() - 1)
        .scan(0.0, |cumulative, width| {
            *cumulative += width;
            Some(*cumulative)
        })
        .collect();

    for split_count in 1..=gaps.len() {
        let ideals: Vec<f64> = (1..=split_count)
            .map(|index| index as f64 * total / (split_count + 1) as f64)
            .collect();
        let chosen = assign_ideal_offsets(&ideals, &gaps);

        let mut ranges = Vec::with_capacity(split_count + 1);
        let mut start = 0usize;
        for &gap in &chosen {
            ranges.push(start..gap + 1);
            start = gap + 1;
        }
        ranges.push(start..widths.len());

        let widest: f64 = ranges
            .iter()
            .map(|range| widths[range.clone()].iter().sum())
            .fold(0.0, f64::max);
        if widest <= max_width || split_count == gaps.len() {
            return ranges;
        }
    }
    vec![0..widths.len()]
}
