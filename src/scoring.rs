//! Scoring configuration for pairwise alignment.
//!
//! A [`Scoring`] bundles the substitution lookup (match/mismatch defaults
//! plus optional per-pair overrides), the affine gap penalties and the
//! behavioral flags. One instance must be used unmodified across a fill and
//! its traceback; the traceback recomputes local penalties through the same
//! lookup instead of storing them.

use rustc_hash::FxHashMap;

/// Stored score type for matrix cells and alignment results.
pub type Score = i32;

/// Sentinel marking an unreachable dynamic-programming state.
///
/// Penalty arithmetic is carried out in `i64` and clamped back into `Score`
/// range, so `SCORE_MIN` plus any finite penalty still compares below every
/// reachable score and is never mistaken for a valid transition.
pub const SCORE_MIN: Score = Score::MIN;

/// Substitution scores, gap penalties and alignment flags.
///
/// Gap penalties are signed and typically zero or negative: opening a gap
/// costs `gap_open + gap_extend`, each further extension `gap_extend`.
#[derive(Debug, Clone)]
pub struct Scoring {
    /// Penalty added once when a gap is opened.
    pub gap_open: Score,
    /// Penalty added for every gap column, including the opening one.
    pub gap_extend: Score,
    /// Substitution score for identical symbols.
    pub match_score: Score,
    /// Substitution score for differing symbols.
    pub mismatch_score: Score,
    /// Compare symbols without ASCII case folding.
    pub case_sensitive: bool,
    /// Forbid substitution columns between differing symbols.
    pub no_mismatches: bool,
    /// Forbid gaps in the first sequence except at its start/end.
    pub no_gaps_in_a: bool,
    /// Forbid gaps in the second sequence except at its start/end.
    pub no_gaps_in_b: bool,
    /// Leading gaps are free (semi-global alignment).
    pub no_start_gap_penalty: bool,
    /// Trailing gaps are free (semi-global alignment).
    pub no_end_gap_penalty: bool,
    substitutions: FxHashMap<(u8, u8), Score>,
}

impl Default for Scoring {
    fn default() -> Self {
        Self::new(1, -2, -4, -1)
    }
}

impl Scoring {
    /// Create a scoring scheme with all flags off.
    pub fn new(match_score: Score, mismatch_score: Score, gap_open: Score, gap_extend: Score) -> Self {
        Self {
            gap_open,
            gap_extend,
            match_score,
            mismatch_score,
            case_sensitive: false,
            no_mismatches: false,
            no_gaps_in_a: false,
            no_gaps_in_b: false,
            no_start_gap_penalty: false,
            no_end_gap_penalty: false,
            substitutions: FxHashMap::default(),
        }
    }

    /// Override the substitution score for one symbol pair.
    ///
    /// The override is symmetric and is also registered case-folded so that
    /// it stays visible under case-insensitive lookup.
    pub fn add_substitution(&mut self, a: u8, b: u8, score: Score) {
        self.substitutions.insert((a, b), score);
        self.substitutions.insert((b, a), score);
        let (la, lb) = (a.to_ascii_lowercase(), b.to_ascii_lowercase());
        self.substitutions.insert((la, lb), score);
        self.substitutions.insert((lb, la), score);
    }

    /// Substitution score and match flag for one symbol pair.
    ///
    /// Case folding, when enabled, happens here and nowhere else; the matrix
    /// engine and the traceback treat the lookup as a black box.
    #[inline]
    pub fn lookup(&self, a: u8, b: u8) -> (Score, bool) {
        let (a, b) = if self.case_sensitive {
            (a, b)
        } else {
            (a.to_ascii_lowercase(), b.to_ascii_lowercase())
        };
        let is_match = a == b;
        if !self.substitutions.is_empty() {
            if let Some(&score) = self.substitutions.get(&(a, b)) {
                return (score, is_match);
            }
        }
        if is_match {
            (self.match_score, true)
        } else {
            (self.mismatch_score, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_match_mismatch() {
        let scoring = Scoring::new(2, -3, -5, -1);
        assert_eq!(scoring.lookup(b'A', b'A'), (2, true));
        assert_eq!(scoring.lookup(b'A', b'C'), (-3, false));
    }

    #[test]
    fn test_lookup_case_folding() {
        let mut scoring = Scoring::new(1, -1, 0, -1);
        assert_eq!(scoring.lookup(b'a', b'A'), (1, true));

        scoring.case_sensitive = true;
        assert_eq!(scoring.lookup(b'a', b'A'), (-1, false));
    }

    #[test]
    fn test_substitution_override_is_symmetric() {
        let mut scoring = Scoring::new(1, -1, 0, -1);
        scoring.add_substitution(b'A', b'G', 0);

        assert_eq!(scoring.lookup(b'A', b'G'), (0, false));
        assert_eq!(scoring.lookup(b'G', b'A'), (0, false));
        // Case-insensitive lookup still sees the override.
        assert_eq!(scoring.lookup(b'g', b'a'), (0, false));
        // Unrelated pairs fall back to the defaults.
        assert_eq!(scoring.lookup(b'A', b'C'), (-1, false));
    }

    #[test]
    fn test_override_keeps_match_flag() {
        let mut scoring = Scoring::new(1, -1, 0, -1);
        scoring.add_substitution(b'A', b'A', 5);
        assert_eq!(scoring.lookup(b'A', b'A'), (5, true));
    }
}
