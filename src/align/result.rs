//! Reusable alignment result buffer.

use crate::scoring::Score;

/// Gap symbol used in reconstructed alignment strings.
pub const GAP: u8 = b'-';

/// A reconstructed pairwise alignment.
///
/// Holds two equal-length gap-padded strings, the optimal score and the
/// aligned region of each input. Created once and reused: each
/// reconstruction truncates and rewrites the buffers, whose capacity is
/// rounded up to the next power of two and never shrinks.
#[derive(Debug, Default)]
pub struct Alignment {
    result_a: Vec<u8>,
    result_b: Vec<u8>,
    score: Score,
    pos_a: usize,
    pos_b: usize,
    len_a: usize,
    len_b: usize,
}

impl Alignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with buffer space for alignments up to `length` columns.
    pub fn with_capacity(length: usize) -> Self {
        let mut alignment = Self::default();
        alignment.ensure_capacity(length);
        alignment
    }

    /// Grow both buffers to hold `length` columns, rounding the capacity up
    /// to the next power of two. Never shrinks.
    pub fn ensure_capacity(&mut self, length: usize) {
        let needed = length + 1;
        if needed > self.result_a.capacity() {
            let capacity = needed.next_power_of_two();
            self.result_a.reserve_exact(capacity - self.result_a.len());
            self.result_b.reserve_exact(capacity - self.result_b.len());
        }
    }

    /// Aligned first sequence, gap-padded.
    pub fn result_a(&self) -> &[u8] {
        &self.result_a
    }

    /// Aligned second sequence, gap-padded.
    pub fn result_b(&self) -> &[u8] {
        &self.result_b
    }

    /// Optimal alignment score.
    pub fn score(&self) -> Score {
        self.score
    }

    /// Start offset of the aligned region in the first sequence.
    pub fn pos_a(&self) -> usize {
        self.pos_a
    }

    /// Start offset of the aligned region in the second sequence.
    pub fn pos_b(&self) -> usize {
        self.pos_b
    }

    /// Symbols of the first sequence consumed by the alignment.
    pub fn len_a(&self) -> usize {
        self.len_a
    }

    /// Symbols of the second sequence consumed by the alignment.
    pub fn len_b(&self) -> usize {
        self.len_b
    }

    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.result_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.result_a.is_empty()
    }

    /// Allocated column capacity.
    pub fn capacity(&self) -> usize {
        self.result_a.capacity()
    }

    /// Truncate for a new reconstruction of at most `max_length` columns.
    pub(crate) fn begin(&mut self, max_length: usize, score: Score) {
        self.ensure_capacity(max_length);
        self.result_a.clear();
        self.result_b.clear();
        self.score = score;
        self.pos_a = 0;
        self.pos_b = 0;
        self.len_a = 0;
        self.len_b = 0;
    }

    /// Append one aligned column. Columns arrive in reverse order during
    /// the backward walk and are flipped by [`Alignment::finish`].
    pub(crate) fn push_column(&mut self, a: u8, b: u8) {
        self.result_a.push(a);
        self.result_b.push(b);
        if a != GAP {
            self.len_a += 1;
        }
        if b != GAP {
            self.len_b += 1;
        }
    }

    pub(crate) fn finish(&mut self, pos_a: usize, pos_b: usize) {
        self.result_a.reverse();
        self.result_b.reverse();
        self.pos_a = pos_a;
        self.pos_b = pos_b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_rounds_to_power_of_two() {
        let mut alignment = Alignment::new();
        alignment.ensure_capacity(9);
        assert_eq!(alignment.capacity(), 16);

        // Smaller requests keep the existing buffers.
        alignment.ensure_capacity(3);
        assert_eq!(alignment.capacity(), 16);

        alignment.ensure_capacity(16);
        assert_eq!(alignment.capacity(), 32);
    }

    #[test]
    fn test_reuse_truncates_previous_content() {
        let mut alignment = Alignment::new();
        alignment.begin(8, 5);
        alignment.push_column(b'A', b'A');
        alignment.push_column(b'C', GAP);
        alignment.finish(0, 0);
        assert_eq!(alignment.result_a(), b"CA");
        assert_eq!(alignment.result_b(), b"-A");
        assert_eq!(alignment.len_a(), 2);
        assert_eq!(alignment.len_b(), 1);

        let capacity = alignment.capacity();
        alignment.begin(4, 1);
        alignment.push_column(b'G', b'G');
        alignment.finish(2, 3);
        assert_eq!(alignment.result_a(), b"G");
        assert_eq!(alignment.score(), 1);
        assert_eq!(alignment.pos_a(), 2);
        assert_eq!(alignment.pos_b(), 3);
        assert_eq!(alignment.capacity(), capacity);
    }
}
