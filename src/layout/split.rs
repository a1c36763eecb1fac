//! Shared ideal-offset split assignment.
//!
//! Both the line wrapper and the row packer search over split *counts*: for
//! `k` splits they place `k` ideal offsets at equal fractions of the total
//! extent, then snap each ideal to the nearest available boundary (a space
//! character, or a gap between items). Keeping the assignment in one place
//! keeps the two searches from drifting apart.

/// Assigns each ideal offset to a distinct boundary index.
///
/// `boundaries` must be sorted ascending and `ideals.len() <= boundaries.len()`.
/// Boundaries are consumed left to right: each ideal picks the nearest unused
/// boundary at or after the previous pick, with exact-distance ties resolved
/// toward the earlier boundary. The selection window is capped so that one
/// boundary remains for every ideal still to be placed.
pub(crate) fn assign_ideal_offsets(ideals: &[f64], boundaries: &[f64]) -> Vec<usize> {
    debug_assert!(ideals.len() <= boundaries.len());

    let mut chosen = Vec::with_capacity(ideals.len());
    let mut next_free = 0usize;
    for (position, ideal) in ideals.iter().enumerate() {
        let remaining_after = ideals.len() - position - 1;
        let last_allowed = boundaries.len() - 1 - remaining_after;

        let mut best = next_free;
        let mut best_distance = (boundaries[next_free] - ideal).abs();
        for candidate in (next_free + 1)..=last_allowed {
            let distance = (boundaries[candidate] - ideal).abs();
            if distance < best_distance {
                best = candidate;
                best_distance = distance;
            }
        }

        chosen.push(best);
        next_free = best + 1;
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_split_picks_nearest_boundary() {
        let boundaries = [2.0, 5.0, 9.0];
        assert_eq!(assign_ideal_offsets(&[4.0], &boundaries), vec![1]);
        assert_eq!(assign_ideal_offsets(&[8.0], &boundaries), vec![2]);
    }

    #[test]
    fn exact_tie_prefers_the_earlier_boundary() {
        let boundaries = [2.0, 6.0];
        // Ideal 4.0 is equidistant from both; the earlier wins.
        assert_eq!(assign_ideal_offsets(&[4.0], &boundaries), vec![0]);
    }

    #[test]
    fn assignments_are_strictly_increasing() {
        let boundaries = [1.0, 2.0, 3.0, 10.0];
        // Both ideals are closest to boundary 2.0, but each pick consumes it.
        let chosen = assign_ideal_offsets(&[2.0, 2.1], &boundaries);
        assert_eq!(chosen, vec![1, 2]);
    }

    #[test]
    fn window_reserves_boundaries_for_later_ideals() {
        let boundaries = [1.0, 2.0, 3.0];
        // The first ideal would prefer the last boundary, but two more ideals
        // still need boundaries after it.
        let chosen = assign_ideal_offsets(&[3.0, 3.0, 3.0], &boundaries);
        assert_eq!(chosen, vec![0, 1, 2]);
    }
}
