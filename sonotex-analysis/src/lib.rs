//! Spectrum sampling for Sonotex
//!
//! Turns a stream of spectrum frames into band summaries (bass, mid,
//! treble, sum, avg), a single-row spectrum image and a scrolling history
//! image, and forwards them to registered distributors.

mod bands;
mod distributor;
mod error;
mod fft;
mod history;
mod image;
mod sampler;
mod source;
mod window;

pub use bands::{BandCutoffs, BandSummary, BASS_FRACTION, MID_FRACTION};
pub use distributor::{Distributor, DistributorId, SpectrumSample};
pub use error::{ConfigError, WindowParseError};
pub use fft::{FftSpectrum, DEFAULT_CAPACITY};
pub use history::HistoryBuffer;
pub use image::SpectrumImage;
pub use sampler::{
    SamplerConfig, SpectrumSampler, DEFAULT_HISTORY_DEPTH, DEFAULT_SAMPLE_COUNT,
    DEFAULT_UPDATE_FREQUENCY_HZ,
};
pub use source::{FrameSequence, SpectrumSource};
pub use window::WindowFunction;
