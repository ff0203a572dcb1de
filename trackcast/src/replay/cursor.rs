//! Circular read cursor over a track sequence.

/// Advancing read position into a fixed-length sequence.
///
/// The sequence itself never changes; the cursor is the only moving part.
/// It advances strictly in order and wraps after the last position, so a
/// sequence of length 1 stays pinned at position 0 forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackCursor {
    index: usize,
    len: usize,
}

impl TrackCursor {
    /// Create a cursor over a sequence of `len` samples.
    ///
    /// Sequences are validated non-empty at load, so `len` is at least 1.
    pub fn new(len: usize) -> Self {
        debug_assert!(len > 0, "cursor requires a non-empty sequence");
        Self { index: 0, len }
    }

    /// Current read position.
    pub fn current(&self) -> usize {
        self.index
    }

    /// Advance one position, wrapping after the last sample.
    ///
    /// Returns the new position.
    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.len;
        self.index
    }
}
