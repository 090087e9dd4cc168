//! Binders for Sonotex - forward sampler output to materials and effect graphs
//!
//! - `PropertyBinder`: one band value or image to one named material property
//! - `EffectGraphBinder`: both images plus their dimensions to an effect graph
//! - `PropertyMap`: in-memory sink usable by either binder

mod effect;
mod map;
mod property;

pub use effect::{AttributeSink, EffectGraphBinder, EffectGraphNames};
pub use map::{PropertyMap, PropertyValue, SharedPropertyMap};
pub use property::{MaterialSink, Property, PropertyBinder, PropertyParseError};
