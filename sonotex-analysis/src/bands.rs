//! Bass / mid / treble aggregation over a spectrum frame

use std::ops::Range;

/// Fraction of the spectrum below which bins count as bass
pub const BASS_FRACTION: f32 = 0.25;
/// Fraction of the spectrum below which bins count as mid
pub const MID_FRACTION: f32 = 0.75;

/// Bin cutoffs splitting a spectrum of `len` bins into three bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BandCutoffs {
    /// First mid bin (end of bass range)
    pub bass: usize,
    /// First treble bin (end of mid range)
    pub mid: usize,
    /// Total number of bins
    pub len: usize,
}

impl BandCutoffs {
    /// Compute cutoffs for a spectrum of `len` bins
    pub fn new(len: usize) -> Self {
        Self {
            bass: (len as f32 * BASS_FRACTION).floor() as usize,
            mid: (len as f32 * MID_FRACTION).floor() as usize,
            len,
        }
    }

    pub fn bass_range(&self) -> Range<usize> {
        0..self.bass
    }

    pub fn mid_range(&self) -> Range<usize> {
        self.bass..self.mid
    }

    pub fn treble_range(&self) -> Range<usize> {
        self.mid..self.len
    }
}

/// Scalar summary of one spectrum frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BandSummary {
    /// Mean magnitude of the bass bins
    pub bass: f32,
    /// Mean magnitude of the mid bins
    pub mid: f32,
    /// Mean magnitude of the treble bins
    pub treble: f32,
    /// Sum over all bins
    pub sum: f32,
    /// Mean over all bins
    pub avg: f32,
}

impl BandSummary {
    /// Aggregate `frame` using precomputed cutoffs
    ///
    /// Bands with no bins (tiny spectra) report 0 instead of dividing by zero.
    pub fn compute(frame: &[f32], cutoffs: &BandCutoffs) -> Self {
        debug_assert_eq!(frame.len(), cutoffs.len);

        let (bass_sum, bass) = mean(&frame[cutoffs.bass_range()]);
        let (mid_sum, mid) = mean(&frame[cutoffs.mid_range()]);
        let (treble_sum, treble) = mean(&frame[cutoffs.treble_range()]);

        let sum = bass_sum + mid_sum + treble_sum;
        let avg = if frame.is_empty() {
            0.0
        } else {
            sum / frame.len() as f32
        };

        Self {
            bass,
            mid,
            treble,
            sum,
            avg,
        }
    }
}

/// Sum and mean of a slice, mean 0 when empty
fn mean(values: &[f32]) -> (f32, f32) {
    let sum: f32 = values.iter().sum();
    if values.is_empty() {
        (sum, 0.0)
    } else {
        (sum, sum / values.len() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutoffs_for_four_bins() {
        let cutoffs = BandCutoffs::new(4);
        assert_eq!(cutoffs.bass, 1);
        assert_eq!(cutoffs.mid, 3);
    }

    #[test]
    fn test_ranges_partition_spectrum() {
        for len in 0..300 {
            let cutoffs = BandCutoffs::new(len);
            let bass = cutoffs.bass_range();
            let mid = cutoffs.mid_range();
            let treble = cutoffs.treble_range();

            assert_eq!(bass.start, 0);
            assert_eq!(bass.end, mid.start);
            assert_eq!(mid.end, treble.start);
            assert_eq!(treble.end, len);
            assert!(bass.start <= bass.end && mid.start <= mid.end && treble.start <= treble.end);
            assert_eq!(bass.len() + mid.len() + treble.len(), len);
        }
    }

    #[test]
    fn test_summary_four_bins() {
        let frame = [1.0, 2.0, 3.0, 4.0];
        let summary = BandSummary::compute(&frame, &BandCutoffs::new(4));

        assert_eq!(summary.bass, 1.0);
        assert_eq!(summary.mid, 2.5);
        assert_eq!(summary.treble, 4.0);
        assert_eq!(summary.sum, 10.0);
        assert_eq!(summary.avg, 2.5);
    }

    #[test]
    fn test_sum_reconstructs_from_band_means() {
        let frame: Vec<f32> = (0..64).map(|i| (i as f32 * 0.37).sin().abs()).collect();
        let cutoffs = BandCutoffs::new(frame.len());
        let summary = BandSummary::compute(&frame, &cutoffs);

        let rebuilt = summary.bass * cutoffs.bass_range().len() as f32
            + summary.mid * cutoffs.mid_range().len() as f32
            + summary.treble * cutoffs.treble_range().len() as f32;

        assert!((rebuilt - summary.sum).abs() < 1e-4);
        assert!((summary.avg * 64.0 - summary.sum).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_bands_are_zero() {
        // 2 bins: bass cutoff 0, mid cutoff 1
        let summary = BandSummary::compute(&[3.0, 5.0], &BandCutoffs::new(2));
        assert_eq!(summary.bass, 0.0);
        assert_eq!(summary.mid, 3.0);
        assert_eq!(summary.treble, 5.0);
        assert_eq!(summary.sum, 8.0);
        assert_eq!(summary.avg, 4.0);

        // 1 bin: everything lands in treble
        let summary = BandSummary::compute(&[2.0], &BandCutoffs::new(1));
        assert_eq!(summary.bass, 0.0);
        assert_eq!(summary.mid, 0.0);
        assert_eq!(summary.treble, 2.0);
        assert!(summary.bass.is_finite() && summary.mid.is_finite());
    }

    #[test]
    fn test_empty_frame() {
        let summary = BandSummary::compute(&[], &BandCutoffs::new(0));
        assert_eq!(summary, BandSummary::default());
    }
}
