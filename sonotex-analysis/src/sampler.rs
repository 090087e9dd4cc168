//! Periodic spectrum sampler
//!
//! Pulls one frame from a [`SpectrumSource`] at a fixed cadence, derives the
//! band summary, scrolls the history and hands everything to the registered
//! distributors. Driven entirely by [`SpectrumSampler::tick`]; there is no
//! internal thread.

use crate::bands::{BandCutoffs, BandSummary};
use crate::distributor::{Distributor, DistributorId, SpectrumSample};
use crate::error::ConfigError;
use crate::history::HistoryBuffer;
use crate::image::SpectrumImage;
use crate::source::SpectrumSource;
use crate::window::WindowFunction;
use std::mem;

/// Default spectrum resolution
pub const DEFAULT_SAMPLE_COUNT: usize = 64;
/// Default number of retained frames
pub const DEFAULT_HISTORY_DEPTH: usize = 64;
/// Default sampling cadence in Hz
pub const DEFAULT_UPDATE_FREQUENCY_HZ: f32 = 60.0;

/// Sampler settings, applied on the next sample cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerConfig {
    /// Bins per frame (`N`)
    pub sample_count: usize,
    /// Retained frames (`H`)
    pub history_depth: usize,
    /// Sample cycles per second
    pub update_frequency_hz: f32,
    /// Window passed through to the source
    pub window: WindowFunction,
    /// Channel passed through to the source
    pub channel: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            history_depth: DEFAULT_HISTORY_DEPTH,
            update_frequency_hz: DEFAULT_UPDATE_FREQUENCY_HZ,
            window: WindowFunction::default(),
            channel: 0,
        }
    }
}

impl SamplerConfig {
    /// Check dimensions and cadence
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_count == 0 {
            return Err(ConfigError::ZeroSampleCount);
        }
        if self.history_depth == 0 {
            return Err(ConfigError::ZeroHistoryDepth);
        }
        if !self.update_frequency_hz.is_finite() || self.update_frequency_hz <= 0.0 {
            return Err(ConfigError::InvalidFrequency(self.update_frequency_hz));
        }
        Ok(())
    }

    /// Seconds between sample cycles
    pub fn period(&self) -> f32 {
        1.0 / self.update_frequency_hz
    }
}

/// Tick-driven spectrum sampler
pub struct SpectrumSampler {
    config: SamplerConfig,
    source: Option<Box<dyn SpectrumSource>>,
    distributors: Vec<(DistributorId, Box<dyn Distributor>)>,
    next_id: u64,

    /// Seconds until the next sample cycle
    countdown: f32,
    /// Last error logged, so each one is reported once
    reported_error: Option<ConfigError>,

    frame: Vec<f32>,
    cutoffs: BandCutoffs,
    bands: BandSummary,
    history: HistoryBuffer,
    current_image: SpectrumImage,
    history_image: SpectrumImage,
    samples_emitted: u64,
}

impl Default for SpectrumSampler {
    fn default() -> Self {
        Self::new(SamplerConfig::default())
    }
}

impl SpectrumSampler {
    /// Create a sampler without a source
    ///
    /// Buffers are allocated lazily on the first sample cycle.
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            config,
            source: None,
            distributors: Vec::new(),
            next_id: 0,
            countdown: 0.0,
            reported_error: None,
            frame: Vec::new(),
            cutoffs: BandCutoffs::default(),
            bands: BandSummary::default(),
            history: HistoryBuffer::new(0, 0),
            current_image: SpectrumImage::default(),
            history_image: SpectrumImage::default(),
            samples_emitted: 0,
        }
    }

    /// Create a sampler reading from `source`
    pub fn with_source(config: SamplerConfig, source: Box<dyn SpectrumSource>) -> Self {
        let mut sampler = Self::new(config);
        sampler.source = Some(source);
        sampler
    }

    // --- Configuration ---

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SamplerConfig) {
        self.config = config;
    }

    pub fn set_sample_count(&mut self, sample_count: usize) {
        self.config.sample_count = sample_count;
    }

    pub fn set_history_depth(&mut self, history_depth: usize) {
        self.config.history_depth = history_depth;
    }

    pub fn set_update_frequency(&mut self, hz: f32) {
        self.config.update_frequency_hz = hz;
    }

    pub fn set_window(&mut self, window: WindowFunction) {
        self.config.window = window;
    }

    pub fn set_channel(&mut self, channel: usize) {
        self.config.channel = channel;
    }

    /// Configuration error currently keeping the sampler inert
    pub fn config_error(&self) -> Option<ConfigError> {
        self.reported_error
    }

    // --- Source ---

    pub fn set_source(&mut self, source: Box<dyn SpectrumSource>) {
        self.source = Some(source);
    }

    /// Detach and return the current source
    pub fn clear_source(&mut self) -> Option<Box<dyn SpectrumSource>> {
        self.source.take()
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    // --- Distributors ---

    /// Register a distributor; it receives every sample after the current one
    pub fn subscribe(&mut self, distributor: Box<dyn Distributor>) -> DistributorId {
        let id = DistributorId(self.next_id);
        self.next_id += 1;
        self.distributors.push((id, distributor));
        id
    }

    /// Remove a distributor, returning it if it was registered
    pub fn unsubscribe(&mut self, id: DistributorId) -> Option<Box<dyn Distributor>> {
        let index = self.distributors.iter().position(|(d, _)| *d == id)?;
        Some(self.distributors.remove(index).1)
    }

    pub fn distributor_count(&self) -> usize {
        self.distributors.len()
    }

    // --- Output ---

    /// Band summary of the latest frame
    pub fn bands(&self) -> BandSummary {
        self.bands
    }

    /// Latest spectrum frame
    pub fn frame(&self) -> &[f32] {
        &self.frame
    }

    /// Band cutoffs for the current frame length
    pub fn cutoffs(&self) -> BandCutoffs {
        self.cutoffs
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn current_image(&self) -> &SpectrumImage {
        &self.current_image
    }

    pub fn history_image(&self) -> &SpectrumImage {
        &self.history_image
    }

    /// Number of sample cycles run so far
    pub fn samples_emitted(&self) -> u64 {
        self.samples_emitted
    }

    // --- Driving ---

    /// Advance the sampler clock by `elapsed_seconds`
    ///
    /// Runs a sample cycle when the countdown expires. Returns true if a
    /// sample was emitted.
    pub fn tick(&mut self, elapsed_seconds: f32) -> bool {
        if !self.ready() {
            return false;
        }

        self.countdown -= elapsed_seconds;
        if self.countdown > 0.0 {
            return false;
        }

        self.countdown = self.config.period();
        self.sample_cycle();
        true
    }

    /// Run a sample cycle immediately, restarting the countdown
    pub fn sample_now(&mut self) -> bool {
        if !self.ready() {
            return false;
        }

        self.countdown = self.config.period();
        self.sample_cycle();
        true
    }

    /// Discard frame, history and countdown, keeping config, source and
    /// distributors
    pub fn reset(&mut self) {
        self.countdown = 0.0;
        self.frame.clear();
        self.cutoffs = BandCutoffs::default();
        self.bands = BandSummary::default();
        self.history = HistoryBuffer::new(0, 0);
        self.current_image = SpectrumImage::default();
        self.history_image = SpectrumImage::default();
    }

    /// Source present and available, configuration valid
    fn ready(&mut self) -> bool {
        match &self.source {
            Some(source) if source.is_available() => {}
            _ => return false,
        }

        match self.config.validate() {
            Ok(()) => {
                if let Some(previous) = self.reported_error.take() {
                    tracing::info!(%previous, "sampler configuration valid again");
                }
                true
            }
            Err(error) => {
                let already_reported = self
                    .reported_error
                    .is_some_and(|r| mem::discriminant(&r) == mem::discriminant(&error));
                if !already_reported {
                    tracing::warn!(%error, "invalid sampler configuration, sampling paused");
                }
                self.reported_error = Some(error);
                false
            }
        }
    }

    fn sample_cycle(&mut self) {
        let n = self.config.sample_count;
        let h = self.config.history_depth;

        if self.frame.len() != n {
            self.frame = vec![0.0; n];
            self.cutoffs = BandCutoffs::new(n);
            tracing::debug!(
                sample_count = n,
                bass_cutoff = self.cutoffs.bass,
                mid_cutoff = self.cutoffs.mid,
                "spectrum frame resized"
            );
        }

        if let Some(source) = self.source.as_mut() {
            source.spectrum(&mut self.frame, self.config.channel, self.config.window);
        }

        if self.current_image.ensure_size(n, 1) {
            self.current_image.set_label(format!("AudioSpectrum{}", n));
        }
        if self.history_image.ensure_size(n, h) {
            self.history_image.set_label(format!("AudioSpectrumHistory{}", n));
        }
        if !self.history.has_dimensions(n, h) {
            self.history = HistoryBuffer::new(n, h);
            tracing::debug!(sample_count = n, history_depth = h, "spectrum history reset");
        }

        self.bands = BandSummary::compute(&self.frame, &self.cutoffs);
        self.current_image.write(&self.frame);
        self.history.push(&self.frame);
        self.history.flatten_into(self.history_image.pixels_mut());
        self.samples_emitted += 1;

        tracing::trace!(
            bass = self.bands.bass,
            mid = self.bands.mid,
            treble = self.bands.treble,
            sum = self.bands.sum,
            "spectrum sampled"
        );

        let sample = SpectrumSample {
            bands: self.bands,
            current: &self.current_image,
            history: &self.history_image,
        };
        for (_, distributor) in self.distributors.iter_mut() {
            distributor.on_sample(&sample);
        }
    }
}
