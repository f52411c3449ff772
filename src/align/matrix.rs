//! Dynamic-programming matrix fill for affine-gap alignment.
//!
//! Three matrices are kept, all `(|A|+1) x (|B|+1)`, addressed `[x][y]`:
//!
//! - `match_scores[x][y]`: best score of an alignment of the length-`x` and
//!   length-`y` prefixes ending in a substitution column.
//! - `gap_a_scores[x][y]`: ending with a gap in the first sequence (the
//!   second sequence advances).
//! - `gap_b_scores[x][y]`: ending with a gap in the second sequence.
//!
//! Cells that cannot end in the corresponding column kind hold a floor
//! value: [`SCORE_MIN`] in global mode, `0` in local mode (where the floor
//! doubles as the Smith-Waterman reset). All penalty sums are computed in
//! `i64` and clamped back into `Score` range so the floor is never perturbed
//! into a valid-looking score.

use log::debug;

use super::AlignmentMode;
use crate::scoring::{Score, Scoring, SCORE_MIN};

/// Merge the three predecessor candidates for one cell.
#[inline]
fn combine(mode: AlignmentMode, a: i64, b: i64, c: i64) -> i64 {
    let best = a.max(b).max(c);
    match mode {
        AlignmentMode::Global => best,
        AlignmentMode::Local => best.max(0),
    }
}

/// Narrow an `i64` accumulator back to a stored score.
///
/// Saturates at the `Score` limits, so an unreachable cell plus a finite
/// penalty stays at the sentinel instead of wrapping.
#[inline]
fn narrow(value: i64) -> Score {
    value.clamp(i64::from(Score::MIN), i64::from(Score::MAX)) as Score
}

/// Reusable fill engine owning the three score matrices.
///
/// Buffers are sized to the next power of two above the required cell count
/// and never shrink, so repeated fills of similar dimensions allocate
/// nothing. One instance serves one alignment at a time; use one engine per
/// thread for parallel jobs.
#[derive(Debug, Default)]
pub struct Aligner {
    match_scores: Vec<Score>,
    gap_a_scores: Vec<Score>,
    gap_b_scores: Vec<Score>,
    capacity: usize,
    width: usize,
    height: usize,
}

impl Aligner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matrix width of the most recent fill (`|A| + 1`).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Matrix height of the most recent fill (`|B| + 1`).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Allocated cells per matrix.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Best score of prefixes ending in a substitution at `(x, y)`.
    #[inline]
    pub fn match_score(&self, x: usize, y: usize) -> Score {
        self.match_scores[y * self.width + x]
    }

    /// Best score of prefixes ending with a gap in the first sequence.
    #[inline]
    pub fn gap_a_score(&self, x: usize, y: usize) -> Score {
        self.gap_a_scores[y * self.width + x]
    }

    /// Best score of prefixes ending with a gap in the second sequence.
    #[inline]
    pub fn gap_b_score(&self, x: usize, y: usize) -> Score {
        self.gap_b_scores[y * self.width + x]
    }

    fn ensure_capacity(&mut self, cells: usize) {
        if cells > self.capacity {
            let capacity = cells.next_power_of_two();
            debug!("growing score matrices: {} -> {} cells", self.capacity, capacity);
            self.match_scores.resize(capacity, 0);
            self.gap_a_scores.resize(capacity, 0);
            self.gap_b_scores.resize(capacity, 0);
            self.capacity = capacity;
        }
    }

    /// Fill all three matrices for `seq_a` against `seq_b`.
    ///
    /// Total for any finite input; allocation failure is the only fatal
    /// condition and aborts the process like any other Rust allocation.
    pub fn fill(&mut self, seq_a: &[u8], seq_b: &[u8], scoring: &Scoring, mode: AlignmentMode) {
        let width = seq_a.len() + 1;
        let height = seq_b.len() + 1;
        self.ensure_capacity(width * height);
        self.width = width;
        self.height = height;

        debug!("fill: {}x{} cells, {:?} mode", width, height, mode);

        let floor: Score = match mode {
            AlignmentMode::Global => SCORE_MIN,
            AlignmentMode::Local => 0,
        };
        let open = i64::from(scoring.gap_open) + i64::from(scoring.gap_extend);
        let extend = i64::from(scoring.gap_extend);
        let cells = width * height;

        // Interior gaps banned: the whole matrix starts unreachable and the
        // trailing edge is refilled after the main loop.
        if scoring.no_gaps_in_a {
            self.gap_a_scores[..cells].fill(floor);
        }
        if scoring.no_gaps_in_b {
            self.gap_b_scores[..cells].fill(floor);
        }

        self.match_scores[0] = 0;
        self.gap_a_scores[0] = 0;
        self.gap_b_scores[0] = 0;

        // First row: only a leading gap in B can reach (x, 0).
        for x in 1..width {
            self.match_scores[x] = floor;
            self.gap_a_scores[x] = floor;
            self.gap_b_scores[x] = if scoring.no_start_gap_penalty {
                0
            } else {
                narrow(i64::from(scoring.gap_open) + x as i64 * extend)
            };
        }

        // First column: only a leading gap in A can reach (0, y).
        for y in 1..height {
            let index = y * width;
            self.match_scores[index] = floor;
            self.gap_a_scores[index] = if scoring.no_start_gap_penalty {
                0
            } else {
                narrow(i64::from(scoring.gap_open) + y as i64 * extend)
            };
            self.gap_b_scores[index] = floor;
        }

        for y in 1..height {
            for x in 1..width {
                let (sub, is_match) = scoring.lookup(seq_a[x - 1], seq_b[y - 1]);
                let diag = (y - 1) * width + (x - 1);
                let cur = y * width + x;

                self.match_scores[cur] = if scoring.no_mismatches && !is_match {
                    floor
                } else {
                    narrow(
                        combine(
                            mode,
                            i64::from(self.match_scores[diag]),
                            i64::from(self.gap_a_scores[diag]),
                            i64::from(self.gap_b_scores[diag]),
                        ) + i64::from(sub),
                    )
                };

                if !scoring.no_gaps_in_a {
                    let src = (y - 1) * width + x;
                    let m = i64::from(self.match_scores[src]);
                    let ga = i64::from(self.gap_a_scores[src]);
                    let gb = i64::from(self.gap_b_scores[src]);
                    // Trailing edge of A: gap penalties waived under free
                    // end gaps, exactly as the traceback recomputes them.
                    self.gap_a_scores[cur] = if x == width - 1 && scoring.no_end_gap_penalty {
                        narrow(combine(mode, m, ga, gb))
                    } else {
                        narrow(combine(mode, m + open, ga + extend, gb + open))
                    };
                }

                if !scoring.no_gaps_in_b {
                    let src = y * width + (x - 1);
                    let m = i64::from(self.match_scores[src]);
                    let ga = i64::from(self.gap_a_scores[src]);
                    let gb = i64::from(self.gap_b_scores[src]);
                    self.gap_b_scores[cur] = if y == height - 1 && scoring.no_end_gap_penalty {
                        narrow(combine(mode, m, ga, gb))
                    } else {
                        narrow(combine(mode, m + open, ga + open, gb + extend))
                    };
                }
            }
        }

        // With interior gaps banned in A, a gap run is still allowed
        // strictly along the trailing column as an affine chain.
        if scoring.no_gaps_in_a && width > 1 {
            let x = width - 1;
            for y in 1..height {
                let src = (y - 1) * width + x;
                let cur = y * width + x;
                let m = i64::from(self.match_scores[src]);
                let ga = i64::from(self.gap_a_scores[src]);
                self.gap_a_scores[cur] = if scoring.no_end_gap_penalty {
                    narrow(combine(mode, m, ga, i64::from(floor)))
                } else {
                    narrow(combine(mode, m + open, ga + extend, i64::from(floor)))
                };
            }
        }

        if scoring.no_gaps_in_b && height > 1 {
            let y = height - 1;
            for x in 1..width {
                let src = y * width + (x - 1);
                let cur = y * width + x;
                let m = i64::from(self.match_scores[src]);
                let gb = i64::from(self.gap_b_scores[src]);
                self.gap_b_scores[cur] = if scoring.no_end_gap_penalty {
                    narrow(combine(mode, m, gb, i64::from(floor)))
                } else {
                    narrow(combine(mode, m + open, gb + extend, i64::from(floor)))
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_initialization() {
        let mut aligner = Aligner::new();
        let scoring = Scoring::new(1, -2, -4, -1);
        aligner.fill(b"ACG", b"AC", &scoring, AlignmentMode::Global);

        assert_eq!(aligner.width(), 4);
        assert_eq!(aligner.height(), 3);
        assert_eq!(aligner.match_score(0, 0), 0);
        assert_eq!(aligner.gap_a_score(0, 0), 0);
        assert_eq!(aligner.gap_b_score(0, 0), 0);

        // Along the first row only gap-in-B is reachable, with affine cost.
        for x in 1..aligner.width() {
            assert_eq!(aligner.match_score(x, 0), SCORE_MIN);
            assert_eq!(aligner.gap_a_score(x, 0), SCORE_MIN);
            assert_eq!(aligner.gap_b_score(x, 0), -4 - x as Score);
        }
        // Mirror along the first column.
        for y in 1..aligner.height() {
            assert_eq!(aligner.match_score(0, y), SCORE_MIN);
            assert_eq!(aligner.gap_b_score(0, y), SCORE_MIN);
            assert_eq!(aligner.gap_a_score(0, y), -4 - y as Score);
        }
    }

    #[test]
    fn test_free_start_gap_boundary() {
        let mut aligner = Aligner::new();
        let mut scoring = Scoring::new(1, -2, -4, -1);
        scoring.no_start_gap_penalty = true;
        aligner.fill(b"ACG", b"AC", &scoring, AlignmentMode::Global);

        for x in 1..aligner.width() {
            assert_eq!(aligner.gap_b_score(x, 0), 0);
        }
        for y in 1..aligner.height() {
            assert_eq!(aligner.gap_a_score(0, y), 0);
        }
    }

    #[test]
    fn test_local_mode_uses_zero_floor() {
        let mut aligner = Aligner::new();
        let scoring = Scoring::new(1, -2, -4, -1);
        aligner.fill(b"AC", b"AC", &scoring, AlignmentMode::Local);

        assert_eq!(aligner.match_score(1, 0), 0);
        assert_eq!(aligner.gap_a_score(2, 0), 0);
        // Matching prefix accumulates positively as in global mode.
        assert_eq!(aligner.match_score(1, 1), 1);
        assert_eq!(aligner.match_score(2, 2), 2);
    }

    #[test]
    fn test_capacity_grows_monotonically() {
        let mut aligner = Aligner::new();
        let scoring = Scoring::default();

        aligner.fill(b"ACGT", b"ACG", &scoring, AlignmentMode::Global);
        let small = aligner.capacity();
        assert_eq!(small, (5 * 4usize).next_power_of_two());

        aligner.fill(b"ACGTACGTACGT", b"ACGTACGT", &scoring, AlignmentMode::Global);
        let large = aligner.capacity();
        assert!(large > small);

        // Shrinking dimensions keeps the larger buffers.
        aligner.fill(b"AC", b"A", &scoring, AlignmentMode::Global);
        assert_eq!(aligner.capacity(), large);
        assert_eq!(aligner.width(), 3);
        assert_eq!(aligner.height(), 2);
    }

    #[test]
    fn test_no_gaps_in_a_leaves_trailing_edge_open() {
        let mut aligner = Aligner::new();
        let mut scoring = Scoring::new(1, -2, -1, -1);
        scoring.no_gaps_in_a = true;
        aligner.fill(b"AC", b"ACG", &scoring, AlignmentMode::Global);

        // Interior gap-in-A cells are unreachable.
        assert_eq!(aligner.gap_a_score(1, 1), SCORE_MIN);
        assert_eq!(aligner.gap_a_score(1, 2), SCORE_MIN);
        // The trailing column still carries the affine chain once a
        // substitution column can feed it. At (2, 1) the chain has nothing
        // to open from (no substitution ends at (2, 0)), so it stays
        // unreachable; at (2, 2) it opens from match[2][1].
        assert_eq!(aligner.gap_a_score(2, 1), SCORE_MIN);
        assert!(aligner.gap_a_score(2, 2) > SCORE_MIN);
    }

    #[test]
    fn test_sentinel_not_perturbed_by_penalties() {
        let mut aligner = Aligner::new();
        // Large penalties: SCORE_MIN + open must not wrap into a valid score.
        let scoring = Scoring::new(1, -2, -1_000_000, -1_000_000);
        aligner.fill(b"A", b"A", &scoring, AlignmentMode::Global);

        assert_eq!(aligner.match_score(1, 1), 1);
        // Both gap matrices at (1, 1) source only unreachable or heavily
        // penalized predecessors and must stay far below any real score.
        assert!(aligner.gap_a_score(1, 1) <= -1_000_000);
        assert!(aligner.gap_b_score(1, 1) <= -1_000_000);
    }
}
