//! Pairwise sequence alignment under an affine gap penalty model.
//!
//! The crate computes optimal global (Needleman-Wunsch) and local
//! (Smith-Waterman) alignments between two byte sequences. Callers build a
//! [`Scoring`] configuration, then run [`align_global`] or [`align_local`]
//! against a reusable [`Aligner`] (the dynamic-programming matrices) and a
//! reusable [`Alignment`] (the reconstructed result). Both buffers grow
//! monotonically, so repeated calls of similar size allocate nothing.

pub mod align;
pub mod error;
pub mod scoring;

pub use align::{align_global, align_local, optimal_score, Aligner, Alignment, AlignmentMode, GAP};
pub use error::AlignmentError;
pub use scoring::{Score, Scoring, SCORE_MIN};
