use crate::layout::split::assign_ideal_offsets;
use crate::layout::text_metrics::{FontSpec, TextMeasurer};

/// Wraps `text` into lines that each measure at most `max_width`.
///
/// Hard line breaks are honored first; each segment is then wrapped
/// independently and the lines concatenated in order. Within a segment the
/// wrapper searches over split *counts*: `k = 1, 2, ...` equal-fraction
/// ideal offsets snapped to the nearest space (see `split`). The first `k`
/// whose every piece fits wins. When even `k = spaces` leaves an over-wide
/// piece, that split is returned as a best effort; a single unbreakable word
/// wider than `max_width` is the caller's overflow to tolerate.
///
/// The search is deterministic and intentionally not optimal: downstream
/// vertical space (axis heights, title blocks) depends on the exact number
/// of lines a given input produces.
pub fn wrap(
    measurer: &dyn TextMeasurer,
    text: &str,
    max_width: f64,
    font: &FontSpec,
) -> Vec<String> {
    text.split('\n')
        .flat_map(|segment| wrap_segment(measurer, segment, max_width, font))
        .collect()
}

fn wrap_segment(
    measurer: &dyn TextMeasurer,
    segment: &str,
    max_width: f64,
    font: &FontSpec,
) -> Vec<String> {
    if measurer.measure(segment, font) <= max_width {
        return vec![segment.to_owned()];
    }

    let chars: Vec<char> = segment.chars().collect();
    let spaces = interior_spaces(&chars);
    if spaces.is_empty() {
        // One unbreakable word; overflow is tolerated.
        return vec![segment.to_owned()];
    }

    let length = chars.len() as f64;
    let boundaries: Vec<f64> = spaces.iter().map(|&index| index as f64).collect();

    for split_count in 1..=spaces.len() {
        let ideals: Vec<f64> = (1..=split_count)
            .map(|index| index as f64 * length / (split_count + 1) as f64)
            .collect();
        let chosen = assign_ideal_offsets(&ideals, &boundaries);
        let pieces = slice_at_spaces(&chars, chosen.iter().map(|&index| spaces[index]));

        let all_fit = pieces
            .iter()
            .all(|piece| measurer.measure(piece, font) <= max_width);
        if all_fit || split_count == spaces.len() {
            return pieces;
        }
    }

    vec![segment.to_owned()]
}

/// Positions of space characters that have a character on both sides.
fn interior_spaces(chars: &[char]) -> Vec<usize> {
    if chars.len() < 3 {
        return Vec::new();
    }
    (1..chars.len() - 1)
        .filter(|&index| chars[index] == ' ')
        .collect()
}

/// Splits at the given space positions, dropping the space itself so that
/// rejoining the pieces with single spaces reproduces the segment.
fn slice_at_spaces(chars: &[char], splits: impl Iterator<Item = usize>) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0usize;
    for split in splits {
        pieces.push(chars[start..split].iter().collect());
        start = split + 1;
    }
    pieces.push(chars[start..].iter().collect());
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::text_metrics::HeuristicTextMeasurer;

    fn wrap_with(text: &str, max_width: f64) -> Vec<String> {
        let font = FontSpec::sized(10.0);
        wrap(&HeuristicTextMeasurer, text, max_width, &font)
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap_with("hello", 1000.0), vec!["hello"]);
    }

    #[test]
    fn hard_breaks_wrap_each_segment_independently() {
        let lines = wrap_with("first part\nsecond", 1000.0);
        assert_eq!(lines, vec!["first part", "second"]);
    }

    #[test]
    fn single_split_lands_near_the_middle() {
        // 6px per char; "aaa bbb ccc" is 66px wide, budget 45px forces one
        // split near char 5.5, snapping to the space at index 7.
        let lines = wrap_with("aaa bbb ccc", 45.0);
        assert_eq!(lines, vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn tighter_budget_escalates_to_more_splits() {
        // Budget 40px rejects the single-split "aaa bbb" piece (42px) and
        // falls through to two splits.
        let lines = wrap_with("aaa bbb ccc", 40.0);
        assert_eq!(lines, vec!["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn unbreakable_word_overflows_without_panic() {
        let lines = wrap_with("incomprehensibilities", 20.0);
        assert_eq!(lines, vec!["incomprehensibilities"]);
    }

    #[test]
    fn rejoining_lines_with_spaces_reproduces_the_segment() {
        let text = "the quick brown fox jumps over the lazy dog";
        let lines = wrap_with(text, 60.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn best_effort_split_at_max_k() {
        // Every word is wider than the budget; the wrapper still returns the
        // maximal split rather than failing.
        let lines = wrap_with("aaaaaaaa bbbbbbbb cccccccc", 30.0);
        assert_eq!(lines, vec!["aaaaaaaa", "bbbbbbbb", "cccccccc"]);
    }
}
