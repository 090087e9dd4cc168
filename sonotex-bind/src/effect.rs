//! Effect-graph binding: spectrum and history images plus their dimensions

use sonotex_analysis::{Distributor, SpectrumImage, SpectrumSample};

/// Host effect graph exposing named, typed attributes
pub trait AttributeSink: Send {
    fn has_texture(&self, name: &str) -> bool;

    fn has_uint(&self, name: &str) -> bool;

    fn set_texture(&mut self, name: &str, image: &SpectrumImage);

    fn set_uint(&mut self, name: &str, value: u32);
}

/// Attribute names written by [`EffectGraphBinder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectGraphNames {
    /// Receives the spectrum resolution `N`
    pub count: String,
    /// Receives the history depth `H`
    pub history_count: String,
    /// Receives the current frame image
    pub texture: String,
    /// Receives the history image
    pub history: String,
}

impl Default for EffectGraphNames {
    fn default() -> Self {
        Self {
            count: "Count".to_string(),
            history_count: "Size".to_string(),
            texture: "SpectrumTexture".to_string(),
            history: "HistoryTexture".to_string(),
        }
    }
}

/// Forwards both images and their dimensions to an effect graph
///
/// Samples are skipped while the graph lacks any of the four attributes.
pub struct EffectGraphBinder<S> {
    names: EffectGraphNames,
    sink: S,
    /// Validity seen on the previous sample, for logging transitions
    last_valid: Option<bool>,
}

impl<S: AttributeSink> EffectGraphBinder<S> {
    /// Bind using the default attribute names
    pub fn new(sink: S) -> Self {
        Self::with_names(EffectGraphNames::default(), sink)
    }

    pub fn with_names(names: EffectGraphNames, sink: S) -> Self {
        Self {
            names,
            sink,
            last_valid: None,
        }
    }

    pub fn names(&self) -> &EffectGraphNames {
        &self.names
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Whether the sink exposes every attribute this binder writes
    pub fn is_valid(&self) -> bool {
        self.sink.has_texture(&self.names.texture)
            && self.sink.has_texture(&self.names.history)
            && self.sink.has_uint(&self.names.count)
            && self.sink.has_uint(&self.names.history_count)
    }

    /// Push `sample` into the sink; returns false if the sink was invalid
    pub fn apply(&mut self, sample: &SpectrumSample<'_>) -> bool {
        let valid = self.is_valid();
        if self.last_valid != Some(valid) {
            if valid {
                tracing::debug!(binder = %self, "effect graph binding active");
            } else {
                tracing::debug!(binder = %self, "effect graph is missing attributes, binding skipped");
            }
            self.last_valid = Some(valid);
        }
        if !valid {
            return false;
        }

        self.sink.set_texture(&self.names.texture, sample.current);
        self.sink.set_texture(&self.names.history, sample.history);
        self.sink.set_uint(&self.names.count, to_u32(sample.sample_count()));
        self.sink
            .set_uint(&self.names.history_count, to_u32(sample.history_depth()));
        true
    }
}

impl<S> std::fmt::Display for EffectGraphBinder<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Audio Spectrum: '{}' samples -> {} / {}",
            self.names.count, self.names.texture, self.names.history
        )
    }
}

impl<S: AttributeSink> Distributor for EffectGraphBinder<S> {
    fn on_sample(&mut self, sample: &SpectrumSample<'_>) {
        self.apply(sample);
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{PropertyMap, SharedPropertyMap};
    use sonotex_analysis::{FrameSequence, SamplerConfig, SpectrumSampler};

    fn exposed_map() -> SharedPropertyMap {
        let mut map = PropertyMap::new();
        map.expose_texture("SpectrumTexture")
            .expose_texture("HistoryTexture")
            .expose_uint("Count")
            .expose_uint("Size");
        SharedPropertyMap::new(parking_lot::Mutex::new(map))
    }

    fn sampler() -> SpectrumSampler {
        SpectrumSampler::with_source(
            SamplerConfig {
                sample_count: 4,
                history_depth: 3,
                ..SamplerConfig::default()
            },
            Box::new(FrameSequence::new(vec![
                vec![1.0, 2.0, 3.0, 4.0],
                vec![5.0, 6.0, 7.0, 8.0],
            ])),
        )
    }

    #[test]
    fn test_binds_images_and_counts() {
        let shared = exposed_map();
        let mut sampler = sampler();
        sampler.subscribe(Box::new(EffectGraphBinder::new(shared.clone())));

        sampler.tick(0.0);
        sampler.tick(1.0);

        let map = shared.lock();
        assert_eq!(map.uint("Count"), Some(4));
        assert_eq!(map.uint("Size"), Some(3));
        assert_eq!(
            map.texture("SpectrumTexture").map(|t| t.pixels().to_vec()),
            Some(vec![5.0, 6.0, 7.0, 8.0])
        );
        assert_eq!(
            map.texture("HistoryTexture").map(|t| t.pixels().to_vec()),
            Some(vec![
                0.0, 0.0, 0.0, 0.0, //
                1.0, 2.0, 3.0, 4.0, //
                5.0, 6.0, 7.0, 8.0,
            ])
        );
    }

    #[test]
    fn test_missing_attributes_skip_binding() {
        let mut map = PropertyMap::new();
        map.expose_texture("SpectrumTexture").expose_uint("Count");
        let shared = SharedPropertyMap::new(parking_lot::Mutex::new(map));

        let binder = EffectGraphBinder::new(shared.clone());
        assert!(!binder.is_valid());

        let mut sampler = sampler();
        sampler.subscribe(Box::new(binder));
        assert!(sampler.tick(0.0));
        assert!(shared.lock().is_empty());
    }

    #[test]
    fn test_custom_names() {
        let mut map = PropertyMap::new();
        map.expose_texture("a").expose_texture("b").expose_uint("n").expose_uint("h");

        let names = EffectGraphNames {
            count: "n".into(),
            history_count: "h".into(),
            texture: "a".into(),
            history: "b".into(),
        };
        let mut binder = EffectGraphBinder::with_names(names, map);

        let current = SpectrumImage::new("AudioSpectrum2", 2, 1);
        let history = SpectrumImage::new("AudioSpectrumHistory2", 2, 5);
        let sample = SpectrumSample {
            bands: Default::default(),
            current: &current,
            history: &history,
        };

        assert!(binder.apply(&sample));
        let map = binder.into_sink();
        assert_eq!(map.uint("n"), Some(2));
        assert_eq!(map.uint("h"), Some(5));
        assert_eq!(map.texture("b").map(SpectrumImage::height), Some(5));
    }

    #[test]
    fn test_display() {
        let binder = EffectGraphBinder::new(PropertyMap::new());
        assert_eq!(
            binder.to_string(),
            "Audio Spectrum: 'Count' samples -> SpectrumTexture / HistoryTexture"
        );
    }
}
