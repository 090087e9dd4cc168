//! Spectrum sources - where magnitude frames come from

use crate::window::WindowFunction;

/// Producer of spectrum frames
///
/// The sampler hands over a buffer of the configured length and expects it
/// filled with non-negative magnitudes, lowest frequency first.
pub trait SpectrumSource: Send {
    /// Whether the source can currently produce data
    ///
    /// An unavailable source turns sampler ticks into no-ops.
    fn is_available(&self) -> bool {
        true
    }

    /// Fill `buffer` with `buffer.len()` magnitudes for `channel`
    fn spectrum(&mut self, buffer: &mut [f32], channel: usize, window: WindowFunction);
}

/// Fixed test signal: replays a list of frames in order, wrapping around
///
/// The window function and channel are ignored. Frames are truncated or
/// zero-padded to the requested length.
#[derive(Debug, Clone, Default)]
pub struct FrameSequence {
    frames: Vec<Vec<f32>>,
    next: usize,
    available: bool,
}

impl FrameSequence {
    /// Create a source replaying `frames`
    pub fn new(frames: Vec<Vec<f32>>) -> Self {
        Self {
            frames,
            next: 0,
            available: true,
        }
    }

    /// A source that always returns the same frame
    pub fn constant(frame: Vec<f32>) -> Self {
        Self::new(vec![frame])
    }

    /// Mark the source (un)available
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Number of frames served so far
    pub fn served(&self) -> usize {
        self.next
    }
}

impl SpectrumSource for FrameSequence {
    fn is_available(&self) -> bool {
        self.available
    }

    fn spectrum(&mut self, buffer: &mut [f32], _channel: usize, _window: WindowFunction) {
        if self.frames.is_empty() {
            buffer.fill(0.0);
            return;
        }

        let frame = &self.frames[self.next % self.frames.len()];
        let copied = frame.len().min(buffer.len());
        buffer[..copied].copy_from_slice(&frame[..copied]);
        buffer[copied..].fill(0.0);
        self.next += 1;
    }
}
