//! Listeners receiving every emitted sample

use crate::bands::BandSummary;
use crate::image::SpectrumImage;

/// One emitted sample: band scalars plus read-only views of both images
#[derive(Debug, Clone, Copy)]
pub struct SpectrumSample<'a> {
    pub bands: BandSummary,
    /// Latest frame, `N x 1`
    pub current: &'a SpectrumImage,
    /// Scrolling history, `N x H`, newest row last
    pub history: &'a SpectrumImage,
}

impl SpectrumSample<'_> {
    pub fn bass(&self) -> f32 {
        self.bands.bass
    }

    pub fn mid(&self) -> f32 {
        self.bands.mid
    }

    pub fn treble(&self) -> f32 {
        self.bands.treble
    }

    pub fn sum(&self) -> f32 {
        self.bands.sum
    }

    pub fn avg(&self) -> f32 {
        self.bands.avg
    }

    /// Spectrum resolution (`N`)
    pub fn sample_count(&self) -> usize {
        self.current.width()
    }

    /// History depth (`H`)
    pub fn history_depth(&self) -> usize {
        self.history.height()
    }
}

/// Receiver of sampler output
///
/// Called synchronously from `SpectrumSampler::tick`; a slow distributor
/// stalls the tick.
pub trait Distributor: Send {
    fn on_sample(&mut self, sample: &SpectrumSample<'_>);
}

impl<F> Distributor for F
where
    F: FnMut(&SpectrumSample<'_>) + Send,
{
    fn on_sample(&mut self, sample: &SpectrumSample<'_>) {
        self(sample)
    }
}

/// Handle returned by `SpectrumSampler::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DistributorId(pub(crate) u64);
