//! FFT-backed spectrum source for live or buffered audio

use crate::source::SpectrumSource;
use crate::window::WindowFunction;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::collections::VecDeque;
use std::sync::Arc;

/// Default number of retained samples per channel (enough for 8192 bins)
pub const DEFAULT_CAPACITY: usize = 16384;

/// Spectrum source computing magnitudes from recent time-domain samples
///
/// A request for N bins transforms the latest 2N samples of the channel;
/// the FFT is re-planned only when N changes.
/// If fewer samples have been pushed, the missing (older) part is treated
/// as silence.
pub struct FftSpectrum {
    channels: usize,
    capacity: usize,
    history: Vec<VecDeque<f32>>,
    fft: Option<Arc<dyn Fft<f32>>>,
    window: Option<(WindowFunction, Vec<f32>)>,
    /// Pre-allocated FFT buffer, resized only when the bin count changes
    fft_buffer: Vec<Complex<f32>>,
}

impl FftSpectrum {
    /// Create a source for interleaved audio with `channels` channels
    pub fn new(channels: usize) -> Self {
        Self::with_capacity(channels, DEFAULT_CAPACITY)
    }

    /// Create a source retaining at most `capacity` samples per channel
    ///
    /// Capacity is at least 1. Requests for more than `capacity / 2` bins
    /// see the missing samples as silence.
    pub fn with_capacity(channels: usize, capacity: usize) -> Self {
        let channels = channels.max(1);
        let capacity = capacity.max(1);
        Self {
            channels,
            capacity,
            history: (0..channels)
                .map(|_| VecDeque::with_capacity(capacity))
                .collect(),
            fft: None,
            window: None,
            fft_buffer: Vec::new(),
        }
    }

    /// Number of interleaved channels
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Samples currently retained per channel
    pub fn buffered(&self) -> usize {
        self.history.first().map_or(0, VecDeque::len)
    }

    /// Append interleaved samples
    ///
    /// A trailing partial frame is dropped.
    pub fn push_interleaved(&mut self, samples: &[f32]) {
        for frame in samples.chunks_exact(self.channels) {
            for (history, &sample) in self.history.iter_mut().zip(frame) {
                while history.len() >= self.capacity {
                    history.pop_front();
                }
                history.push_back(sample);
            }
        }
    }

    /// Drop all retained samples
    pub fn clear(&mut self) {
        for history in &mut self.history {
            history.clear();
        }
    }

    fn prepare(&mut self, fft_size: usize, window: WindowFunction) {
        if self.fft_buffer.len() != fft_size || self.fft.is_none() {
            let mut planner = FftPlanner::new();
            self.fft = Some(planner.plan_fft_forward(fft_size));
            self.fft_buffer = vec![Complex::new(0.0, 0.0); fft_size];
        }

        let stale = match &self.window {
            Some((kind, coefficients)) => *kind != window || coefficients.len() != fft_size,
            None => true,
        };
        if stale {
            self.window = Some((window, window.coefficients(fft_size)));
        }
    }
}

impl SpectrumSource for FftSpectrum {
    fn spectrum(&mut self, buffer: &mut [f32], channel: usize, window: WindowFunction) {
        let bins = buffer.len();
        if bins == 0 {
            return;
        }
        if channel >= self.channels {
            tracing::trace!(channel, channels = self.channels, "channel out of range");
            buffer.fill(0.0);
            return;
        }

        let fft_size = bins * 2;
        self.prepare(fft_size, window);

        let (Some(fft), Some((_, coefficients))) = (&self.fft, &self.window) else {
            buffer.fill(0.0);
            return;
        };

        // Latest `fft_size` samples, silence in front if we have fewer
        let history = &self.history[channel];
        let take = history.len().min(fft_size);
        let pad = fft_size - take;
        for slot in self.fft_buffer.iter_mut().take(pad) {
            *slot = Complex::new(0.0, 0.0);
        }
        for (i, &sample) in history.iter().skip(history.len() - take).enumerate() {
            let idx = pad + i;
            self.fft_buffer[idx] = Complex::new(sample * coefficients[idx], 0.0);
        }

        fft.process(&mut self.fft_buffer);

        // Amplitude-correct scaling: a full-scale sine reads ~1.0 in its bin.
        // DC has no mirrored negative-frequency half, so it only gets 1/sum.
        let window_sum: f32 = coefficients.iter().sum();
        let scale = if window_sum > 0.0 { 2.0 / window_sum } else { 0.0 };

        for (k, (out, c)) in buffer.iter_mut().zip(&self.fft_buffer).enumerate() {
            let bin_scale = if k == 0 { scale * 0.5 } else { scale };
            *out = c.norm() * bin_scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(bin: usize, fft_size: usize, amplitude: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * PI * bin as f32 * i as f32 / fft_size as f32).sin())
            .collect()
    }

    #[test]
    fn test_silence_gives_zero_spectrum() {
        let mut source = FftSpectrum::new(1);
        let mut buffer = [1.0; 16];
        source.spectrum(&mut buffer, 0, WindowFunction::BlackmanHarris);
        assert!(buffer.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_sine_peaks_in_its_bin() {
        let bins = 32;
        let mut source = FftSpectrum::new(1);
        source.push_interleaved(&sine(8, bins * 2, 0.5, bins * 2));

        let mut buffer = vec![0.0; bins];
        source.spectrum(&mut buffer, 0, WindowFunction::Rectangular);

        let peak = buffer
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(peak, Some(8));
        assert!((buffer[8] - 0.5).abs() < 1e-3, "peak = {}", buffer[8]);
        assert!(buffer.iter().all(|&m| m >= 0.0));
    }

    #[test]
    fn test_uses_latest_samples_only() {
        let bins = 16;
        let mut source = FftSpectrum::with_capacity(1, 64);
        // Loud old signal pushed out by silence
        source.push_interleaved(&sine(4, bins * 2, 1.0, 64));
        source.push_interleaved(&vec![0.0; 64]);

        let mut buffer = vec![0.0; bins];
        source.spectrum(&mut buffer, 0, WindowFunction::Hanning);
        assert!(buffer.iter().all(|&m| m.abs() < 1e-6));
        assert_eq!(source.buffered(), 64);
    }

    #[test]
    fn test_small_capacity_stays_bounded() {
        let mut source = FftSpectrum::with_capacity(1, 0);
        source.push_interleaved(&vec![0.5; 10_000]);
        assert_eq!(source.buffered(), 1);

        let mut source = FftSpectrum::with_capacity(2, 8);
        source.push_interleaved(&vec![0.25; 1_000]);
        assert_eq!(source.buffered(), 8);

        // Asking for more bins than retained samples still works
        let mut buffer = vec![0.0; 16];
        source.spectrum(&mut buffer, 1, WindowFunction::Rectangular);
        assert!(buffer.iter().all(|m| m.is_finite() && *m >= 0.0));
    }

    #[test]
    fn test_dc_reads_its_amplitude() {
        let bins = 16;
        let mut source = FftSpectrum::new(1);
        source.push_interleaved(&vec![0.5; bins * 2]);

        let mut buffer = vec![0.0; bins];
        source.spectrum(&mut buffer, 0, WindowFunction::Rectangular);
        assert!((buffer[0] - 0.5).abs() < 1e-4, "dc = {}", buffer[0]);
        assert!(buffer[1..].iter().all(|&m| m.abs() < 1e-4));
    }

    #[test]
    fn test_interleaved_channels_are_separated() {
        let bins = 16;
        let left = sine(2, bins * 2, 1.0, bins * 2);
        let interleaved: Vec<f32> = left.iter().flat_map(|&s| [s, 0.0]).collect();

        let mut source = FftSpectrum::new(2);
        source.push_interleaved(&interleaved);

        let mut buffer = vec![0.0; bins];
        source.spectrum(&mut buffer, 0, WindowFunction::Hamming);
        assert!(buffer[2] > 0.1);

        source.spectrum(&mut buffer, 1, WindowFunction::Hamming);
        assert!(buffer.iter().all(|&m| m.abs() < 1e-6));

        buffer.fill(3.0);
        source.spectrum(&mut buffer, 5, WindowFunction::Hamming);
        assert!(buffer.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_bin_count_can_change() {
        let mut source = FftSpectrum::new(1);
        source.push_interleaved(&sine(4, 64, 1.0, 256));

        let mut small = vec![0.0; 8];
        source.spectrum(&mut small, 0, WindowFunction::Blackman);
        let mut large = vec![0.0; 128];
        source.spectrum(&mut large, 0, WindowFunction::Blackman);

        assert_eq!(large.len(), 128);
        assert!(small.iter().chain(&large).all(|m| m.is_finite()));
    }
}
