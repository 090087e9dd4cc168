//! Scrolling spectrum history
//!
//! Fixed-depth record of the most recent frames. Rows are stored in a ring
//! so pushing a frame never moves the others, but every read goes through
//! logical row order: oldest first, newest last.

/// Fixed-capacity grid of `width` x `depth` magnitudes
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    width: usize,
    depth: usize,
    cells: Vec<f32>,
    /// Physical row holding the oldest frame
    head: usize,
    /// Number of rows written so far (saturates at `depth`)
    filled: usize,
}

impl HistoryBuffer {
    /// Create an empty, zero-filled history
    pub fn new(width: usize, depth: usize) -> Self {
        Self {
            width,
            depth,
            cells: vec![0.0; width * depth],
            head: 0,
            filled: 0,
        }
    }

    /// Row width (bins per frame)
    pub fn width(&self) -> usize {
        self.width
    }

    /// Maximum number of retained frames
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of frames currently retained
    pub fn len(&self) -> usize {
        self.filled
    }

    /// Check if no frame has been pushed yet
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Check if the next push evicts the oldest frame
    pub fn is_full(&self) -> bool {
        self.filled == self.depth
    }

    /// Check whether the buffer matches the given dimensions
    pub fn has_dimensions(&self, width: usize, depth: usize) -> bool {
        self.width == width && self.depth == depth
    }

    /// Append `frame` as the newest row, evicting the oldest when full
    ///
    /// `frame` is truncated or zero-padded to the row width.
    pub fn push(&mut self, frame: &[f32]) {
        if self.depth == 0 || self.width == 0 {
            return;
        }

        let physical = if self.filled < self.depth {
            let row = (self.head + self.filled) % self.depth;
            self.filled += 1;
            row
        } else {
            let row = self.head;
            self.head = (self.head + 1) % self.depth;
            row
        };

        let start = physical * self.width;
        let dest = &mut self.cells[start..start + self.width];
        let copied = frame.len().min(self.width);
        dest[..copied].copy_from_slice(&frame[..copied]);
        dest[copied..].fill(0.0);
    }

    /// Retained frame `index`, 0 being the oldest
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.filled {
            return None;
        }
        let start = ((self.head + index) % self.depth) * self.width;
        Some(&self.cells[start..start + self.width])
    }

    /// Newest retained frame
    pub fn newest(&self) -> Option<&[f32]> {
        self.filled.checked_sub(1).and_then(|i| self.row(i))
    }

    /// Iterate retained frames, oldest first
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.filled).filter_map(move |i| self.row(i))
    }

    /// Flatten into `out` as a full `width` x `depth` row-major grid
    ///
    /// Rows not yet written are zero and sit above the retained frames, so
    /// the newest frame is always the last row.
    pub fn flatten_into(&self, out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.width * self.depth);

        let empty_rows = self.depth - self.filled;
        let split = empty_rows * self.width;
        out[..split].fill(0.0);

        for (dest, row) in out[split..].chunks_exact_mut(self.width.max(1)).zip(self.rows()) {
            dest.copy_from_slice(row);
        }
    }

    /// Forget all frames
    pub fn clear(&mut self) {
        self.cells.fill(0.0);
        self.head = 0;
        self.filled = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(history: &HistoryBuffer) -> Vec<Vec<f32>> {
        history.rows().map(|r| r.to_vec()).collect()
    }

    #[test]
    fn test_rows_keep_insertion_order() {
        let mut history = HistoryBuffer::new(4, 2);
        history.push(&[1.0, 2.0, 3.0, 4.0]);
        history.push(&[5.0, 6.0, 7.0, 8.0]);

        assert_eq!(
            rows(&history),
            vec![vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0]]
        );
    }

    #[test]
    fn test_oldest_row_is_evicted() {
        let mut history = HistoryBuffer::new(4, 2);
        history.push(&[1.0, 2.0, 3.0, 4.0]);
        history.push(&[5.0, 6.0, 7.0, 8.0]);
        history.push(&[9.0, 10.0, 11.0, 12.0]);

        assert!(history.is_full());
        assert_eq!(
            rows(&history),
            vec![vec![5.0, 6.0, 7.0, 8.0], vec![9.0, 10.0, 11.0, 12.0]]
        );

        let mut flat = vec![0.0; 8];
        history.flatten_into(&mut flat);
        assert_eq!(flat, vec![5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_only_last_depth_frames_survive() {
        let mut history = HistoryBuffer::new(1, 3);
        for i in 0..10 {
            history.push(&[i as f32]);
        }
        assert_eq!(rows(&history), vec![vec![7.0], vec![8.0], vec![9.0]]);
        assert_eq!(history.newest(), Some(&[9.0][..]));
    }

    #[test]
    fn test_partial_history_is_zero_padded_on_top() {
        let mut history = HistoryBuffer::new(2, 3);
        history.push(&[1.0, 2.0]);

        let mut flat = vec![-1.0; 6];
        history.flatten_into(&mut flat);
        assert_eq!(flat, vec![0.0, 0.0, 0.0, 0.0, 1.0, 2.0]);
        assert_eq!(history.len(), 1);
        assert!(history.row(1).is_none());
    }

    #[test]
    fn test_short_frames_are_padded() {
        let mut history = HistoryBuffer::new(3, 1);
        history.push(&[4.0, 5.0, 6.0]);
        history.push(&[1.0]);
        assert_eq!(history.row(0), Some(&[1.0, 0.0, 0.0][..]));
    }

    #[test]
    fn test_clear() {
        let mut history = HistoryBuffer::new(2, 2);
        history.push(&[1.0, 1.0]);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.newest(), None);
    }
}
