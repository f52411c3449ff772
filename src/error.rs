//! Error taxonomy for the alignment engine.

use thiserror::Error;

use crate::align::traceback::TracebackState;
use crate::scoring::Score;

/// Errors surfaced by alignment reconstruction.
///
/// The forward fill is total for any finite input, so the only observable
/// failure is a traceback step where no predecessor cell reproduces the
/// current score. That must never happen in correct operation: it signals
/// either an integer overflow (sequences too long or scores too large for
/// the score width) or an engine defect, and is reported as a distinct
/// variant so callers and tests can assert on it specifically.
#[derive(Debug, Error)]
pub enum AlignmentError {
    #[error(
        "traceback failed in {matrix:?} at ({x}, {y}) with score {score}: \
         no predecessor reproduces the score; this can be caused by integer \
         overflow when sequences are long or scores are large"
    )]
    TracebackFailed {
        matrix: TracebackState,
        x: usize,
        y: usize,
        score: Score,
    },
}
