//! Alignment engine: matrix fill, traceback and result buffers.

pub mod matrix;
pub mod result;
pub mod traceback;

pub use matrix::Aligner;
pub use result::{Alignment, GAP};
pub use traceback::{reconstruct, TracebackState};

use crate::error::AlignmentError;
use crate::scoring::{Score, Scoring};

/// Alignment mode selected for one fill/traceback pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentMode {
    /// Needleman-Wunsch: the alignment spans both sequences end to end.
    Global,
    /// Smith-Waterman: the best-scoring subsequence pair, score floor 0.
    Local,
}

/// Optimal score of the most recent fill, without reconstructing a path.
pub fn optimal_score(aligner: &Aligner, mode: AlignmentMode) -> Score {
    let (_, _, _, score) = match mode {
        AlignmentMode::Global => traceback::global_entry(aligner),
        AlignmentMode::Local => traceback::local_entry(aligner),
    };
    score
}

/// Compute an optimal global alignment of `seq_a` against `seq_b`.
///
/// `aligner` and `alignment` are caller-owned and reusable; their buffers
/// grow monotonically across calls.
pub fn align_global(
    seq_a: &[u8],
    seq_b: &[u8],
    scoring: &Scoring,
    aligner: &mut Aligner,
    alignment: &mut Alignment,
) -> Result<(), AlignmentError> {
    aligner.fill(seq_a, seq_b, scoring, AlignmentMode::Global);
    reconstruct(aligner, seq_a, seq_b, scoring, AlignmentMode::Global, alignment)
}

/// Compute an optimal local alignment of `seq_a` against `seq_b`.
pub fn align_local(
    seq_a: &[u8],
    seq_b: &[u8],
    scoring: &Scoring,
    aligner: &mut Aligner,
    alignment: &mut Alignment,
) -> Result<(), AlignmentError> {
    aligner.fill(seq_a, seq_b, scoring, AlignmentMode::Local);
    reconstruct(aligner, seq_a, seq_b, scoring, AlignmentMode::Local, alignment)
}
