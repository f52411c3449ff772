//! Traceback: reconstruct an optimal alignment from filled matrices.
//!
//! The walk starts at a terminal cell, repeatedly recomputes the local
//! penalty the same way the forward fill did, and moves to the predecessor
//! whose stored score plus that penalty reproduces the current score.
//! Candidates are tested in a fixed priority order (gap-in-A, gap-in-B,
//! then match) which doubles as the tie-break between equally optimal
//! paths. The terminal cell itself is chosen by consulting matrices in the
//! order match, gap-in-A, gap-in-B (and, for local mode, scanning cells in
//! storage order: `y` outer, `x` inner); the first strict maximum wins.

use log::trace;

use super::matrix::Aligner;
use super::result::{Alignment, GAP};
use super::AlignmentMode;
use crate::error::AlignmentError;
use crate::scoring::{Score, Scoring};

/// Which matrix the walk currently sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracebackState {
    /// Substitution column: both sequences advance.
    Match,
    /// Gap in the first sequence: only the second advances.
    GapA,
    /// Gap in the second sequence: only the first advances.
    GapB,
}

/// Terminal cell and state for a global alignment: always `(|A|, |B|)`, in
/// whichever matrix holds the maximum there. Requires a prior
/// [`Aligner::fill`].
pub fn global_entry(aligner: &Aligner) -> (TracebackState, usize, usize, Score) {
    debug_assert!(
        aligner.width() > 0 && aligner.height() > 0,
        "entry selection requires a filled matrix"
    );
    let x = aligner.width() - 1;
    let y = aligner.height() - 1;
    let mut matrix = TracebackState::Match;
    let mut score = aligner.match_score(x, y);
    if aligner.gap_a_score(x, y) > score {
        matrix = TracebackState::GapA;
        score = aligner.gap_a_score(x, y);
    }
    if aligner.gap_b_score(x, y) > score {
        matrix = TracebackState::GapB;
        score = aligner.gap_b_score(x, y);
    }
    (matrix, x, y, score)
}

/// Terminal cell and state for a local alignment: the maximum over all
/// three matrices and all cells, first occurrence in scan order.
pub fn local_entry(aligner: &Aligner) -> (TracebackState, usize, usize, Score) {
    let mut best = (TracebackState::Match, 0, 0, 0);
    for y in 0..aligner.height() {
        for x in 0..aligner.width() {
            let candidates = [
                (TracebackState::Match, aligner.match_score(x, y)),
                (TracebackState::GapA, aligner.gap_a_score(x, y)),
                (TracebackState::GapB, aligner.gap_b_score(x, y)),
            ];
            for (matrix, score) in candidates {
                if score > best.3 {
                    best = (matrix, x, y, score);
                }
            }
        }
    }
    best
}

/// One backward step: apply the inverse of the forward recurrence.
///
/// Requires `*x > 0 && *y > 0`. On success the state, coordinates and
/// running score identify the predecessor; failure means no candidate
/// reproduces the score, which is a defect signal, not a recoverable
/// condition.
fn reverse_move(
    aligner: &Aligner,
    seq_a: &[u8],
    seq_b: &[u8],
    scoring: &Scoring,
    matrix: &mut TracebackState,
    x: &mut usize,
    y: &mut usize,
    score: &mut Score,
) -> Result<(), AlignmentError> {
    let (sub, _) = scoring.lookup(seq_a[*x - 1], seq_b[*y - 1]);
    let open = i64::from(scoring.gap_open) + i64::from(scoring.gap_extend);
    let extend = i64::from(scoring.gap_extend);
    let last_x = aligner.width() - 1;
    let last_y = aligner.height() - 1;

    // Candidate penalties per predecessor matrix, recomputed exactly as the
    // fill charged them, including the free-end-gap waiver on the trailing
    // edges.
    let (match_penalty, gap_a_penalty, gap_b_penalty) = match *matrix {
        TracebackState::Match => {
            let sub = i64::from(sub);
            *x -= 1;
            *y -= 1;
            (sub, sub, sub)
        }
        TracebackState::GapA => {
            let waived = scoring.no_end_gap_penalty && *x == last_x;
            *y -= 1;
            if waived {
                (0, 0, 0)
            } else {
                (open, extend, open)
            }
        }
        TracebackState::GapB => {
            let waived = scoring.no_end_gap_penalty && *y == last_y;
            *x -= 1;
            if waived {
                (0, 0, 0)
            } else {
                (open, open, extend)
            }
        }
    };

    let want = i64::from(*score);
    let gap_a_legal = !scoring.no_gaps_in_a || *x == 0 || *x == last_x;
    let gap_b_legal = !scoring.no_gaps_in_b || *y == 0 || *y == last_y;
    // Under no_mismatches the fill floors a match cell by that cell's own
    // column pair, so the candidate is gated by the pair at the predecessor
    // coordinates, not the column just stepped out of. Boundary match cells
    // are never valid predecessors.
    let match_legal = !scoring.no_mismatches
        || (*x > 0 && *y > 0 && scoring.lookup(seq_a[*x - 1], seq_b[*y - 1]).1);

    if gap_a_legal && i64::from(aligner.gap_a_score(*x, *y)) + gap_a_penalty == want {
        *matrix = TracebackState::GapA;
        *score = aligner.gap_a_score(*x, *y);
    } else if gap_b_legal && i64::from(aligner.gap_b_score(*x, *y)) + gap_b_penalty == want {
        *matrix = TracebackState::GapB;
        *score = aligner.gap_b_score(*x, *y);
    } else if match_legal && i64::from(aligner.match_score(*x, *y)) + match_penalty == want {
        *matrix = TracebackState::Match;
        *score = aligner.match_score(*x, *y);
    } else {
        return Err(AlignmentError::TracebackFailed {
            matrix: *matrix,
            x: *x,
            y: *y,
            score: *score,
        });
    }
    Ok(())
}

/// Walk back from the optimal terminal cell and emit the aligned strings
/// into `alignment`.
///
/// `seq_a`, `seq_b` and `scoring` must be the ones the matrices were filled
/// with; the walk recomputes penalties through the same lookup rather than
/// storing them.
pub fn reconstruct(
    aligner: &Aligner,
    seq_a: &[u8],
    seq_b: &[u8],
    scoring: &Scoring,
    mode: AlignmentMode,
    alignment: &mut Alignment,
) -> Result<(), AlignmentError> {
    let (mut matrix, mut x, mut y, entry_score) = match mode {
        AlignmentMode::Global => global_entry(aligner),
        AlignmentMode::Local => local_entry(aligner),
    };
    trace!("traceback entry: {:?} at ({}, {}) score {}", matrix, x, y, entry_score);

    let mut score = entry_score;
    alignment.begin(seq_a.len() + seq_b.len(), entry_score);

    loop {
        match mode {
            AlignmentMode::Global => {
                if x == 0 && y == 0 {
                    break;
                }
            }
            // Local alignments end where the running score resets to the
            // combine floor or a sequence runs out.
            AlignmentMode::Local => {
                if score <= 0 || x == 0 || y == 0 {
                    break;
                }
            }
        }

        // Leading overhang: once a coordinate hits 0 the remaining columns
        // are forced gaps, with no further matrix probing.
        if x == 0 {
            alignment.push_column(GAP, seq_b[y - 1]);
            y -= 1;
            continue;
        }
        if y == 0 {
            alignment.push_column(seq_a[x - 1], GAP);
            x -= 1;
            continue;
        }

        match matrix {
            TracebackState::Match => alignment.push_column(seq_a[x - 1], seq_b[y - 1]),
            TracebackState::GapA => alignment.push_column(GAP, seq_b[y - 1]),
            TracebackState::GapB => alignment.push_column(seq_a[x - 1], GAP),
        }
        reverse_move(aligner, seq_a, seq_b, scoring, &mut matrix, &mut x, &mut y, &mut score)?;
    }

    alignment.finish(x, y);
    Ok(())
}
