//! Material property binding

use sonotex_analysis::{Distributor, SpectrumImage, SpectrumSample};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sampler output that can be bound to a material property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Property {
    #[default]
    Bass,
    Mid,
    Treble,
    Sum,
    Avg,
    /// Current frame image (`N x 1`)
    Spectrum,
    /// History image (`N x H`)
    SpectrumHistory,
}

impl Property {
    pub const ALL: [Property; 7] = [
        Property::Bass,
        Property::Mid,
        Property::Treble,
        Property::Sum,
        Property::Avg,
        Property::Spectrum,
        Property::SpectrumHistory,
    ];

    /// Whether the property is bound as a texture rather than a float
    pub fn is_texture(self) -> bool {
        matches!(self, Property::Spectrum | Property::SpectrumHistory)
    }

    pub fn name(self) -> &'static str {
        match self {
            Property::Bass => "bass",
            Property::Mid => "mid",
            Property::Treble => "treble",
            Property::Sum => "sum",
            Property::Avg => "avg",
            Property::Spectrum => "spectrum",
            Property::SpectrumHistory => "spectrum_history",
        }
    }

    /// Scalar value of this property, `None` for image properties
    pub fn scalar(self, sample: &SpectrumSample<'_>) -> Option<f32> {
        match self {
            Property::Bass => Some(sample.bass()),
            Property::Mid => Some(sample.mid()),
            Property::Treble => Some(sample.treble()),
            Property::Sum => Some(sample.sum()),
            Property::Avg => Some(sample.avg()),
            Property::Spectrum | Property::SpectrumHistory => None,
        }
    }

    /// Image for this property, `None` for scalar properties
    pub fn image<'a>(self, sample: &SpectrumSample<'a>) -> Option<&'a SpectrumImage> {
        match self {
            Property::Spectrum => Some(sample.current),
            Property::SpectrumHistory => Some(sample.history),
            _ => None,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized property name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown property: {0}")]
pub struct PropertyParseError(pub String);

impl FromStr for Property {
    type Err = PropertyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "bass" => Ok(Property::Bass),
            "mid" => Ok(Property::Mid),
            "treble" => Ok(Property::Treble),
            "sum" => Ok(Property::Sum),
            "avg" | "average" => Ok(Property::Avg),
            "spectrum" => Ok(Property::Spectrum),
            "spectrum_history" | "spectrumhistory" | "history" => Ok(Property::SpectrumHistory),
            _ => Err(PropertyParseError(s.to_string())),
        }
    }
}

/// Host material that accepts named float and texture properties
pub trait MaterialSink: Send {
    fn set_float(&mut self, name: &str, value: f32);

    fn set_texture(&mut self, name: &str, image: &SpectrumImage);
}

/// Forwards one sampler property to a material on every sample
pub struct PropertyBinder<S> {
    property: Property,
    name: String,
    sink: S,
}

impl<S: MaterialSink> PropertyBinder<S> {
    /// Bind `property` to the material property called `name`
    pub fn new(property: Property, name: impl Into<String>, sink: S) -> Self {
        Self {
            property,
            name: name.into(),
            sink,
        }
    }

    pub fn property(&self) -> Property {
        self.property
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Push the bound property of `sample` into the sink
    pub fn apply(&mut self, sample: &SpectrumSample<'_>) {
        if let Some(value) = self.property.scalar(sample) {
            self.sink.set_float(&self.name, value);
        } else if let Some(image) = self.property.image(sample) {
            self.sink.set_texture(&self.name, image);
        }
    }
}

impl<S: MaterialSink> Distributor for PropertyBinder<S> {
    fn on_sample(&mut self, sample: &SpectrumSample<'_>) {
        self.apply(sample);
    }
}
