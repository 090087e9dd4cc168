//! In-memory property store implementing both sink traits

use crate::effect::AttributeSink;
use crate::property::MaterialSink;
use parking_lot::Mutex;
use sonotex_analysis::SpectrumImage;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Value stored under a property name
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Float(f32),
    UInt(u32),
    /// Snapshot of the image at the time it was bound
    Texture(SpectrumImage),
}

/// Named property values, e.g. a material or effect-graph stand-in
///
/// Effect-graph binders only write attributes the map exposes; expose them
/// with [`PropertyMap::expose_texture`] and [`PropertyMap::expose_uint`].
/// Material writes are always accepted.
#[derive(Debug, Clone, Default)]
pub struct PropertyMap {
    values: HashMap<String, PropertyValue>,
    exposed_textures: HashSet<String>,
    exposed_uints: HashSet<String>,
    writes: u64,
}

/// Property map shared between the host and a boxed binder
pub type SharedPropertyMap = Arc<Mutex<PropertyMap>>;

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a texture attribute
    pub fn expose_texture(&mut self, name: impl Into<String>) -> &mut Self {
        self.exposed_textures.insert(name.into());
        self
    }

    /// Declare an unsigned integer attribute
    pub fn expose_uint(&mut self, name: impl Into<String>) -> &mut Self {
        self.exposed_uints.insert(name.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.values.get(name) {
            Some(PropertyValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn uint(&self, name: &str) -> Option<u32> {
        match self.values.get(name) {
            Some(PropertyValue::UInt(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn texture(&self, name: &str) -> Option<&SpectrumImage> {
        match self.values.get(name) {
            Some(PropertyValue::Texture(image)) => Some(image),
            _ => None,
        }
    }

    /// Number of stored properties
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Total number of writes since creation
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Stored property names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn store(&mut self, name: &str, value: PropertyValue) {
        self.writes += 1;
        match self.values.get_mut(name) {
            // Reuse the texture allocation when the size is unchanged
            Some(PropertyValue::Texture(existing)) => {
                if let PropertyValue::Texture(image) = &value {
                    if existing.width() == image.width() && existing.height() == image.height() {
                        existing.write(image.pixels());
                        existing.set_label(image.label());
                        return;
                    }
                }
                self.values.insert(name.to_string(), value);
            }
            Some(slot) => *slot = value,
            None => {
                self.values.insert(name.to_string(), value);
            }
        }
    }
}

impl MaterialSink for PropertyMap {
    fn set_float(&mut self, name: &str, value: f32) {
        self.store(name, PropertyValue::Float(value));
    }

    fn set_texture(&mut self, name: &str, image: &SpectrumImage) {
        self.store(name, PropertyValue::Texture(image.clone()));
    }
}

impl AttributeSink for PropertyMap {
    fn has_texture(&self, name: &str) -> bool {
        self.exposed_textures.contains(name)
    }

    fn has_uint(&self, name: &str) -> bool {
        self.exposed_uints.contains(name)
    }

    fn set_texture(&mut self, name: &str, image: &SpectrumImage) {
        self.store(name, PropertyValue::Texture(image.clone()));
    }

    fn set_uint(&mut self, name: &str, value: u32) {
        self.store(name, PropertyValue::UInt(value));
    }
}

impl<T: MaterialSink> MaterialSink for Arc<Mutex<T>> {
    fn set_float(&mut self, name: &str, value: f32) {
        self.lock().set_float(name, value);
    }

    fn set_texture(&mut self, name: &str, image: &SpectrumImage) {
        self.lock().set_texture(name, image);
    }
}

impl<T: AttributeSink> AttributeSink for Arc<Mutex<T>> {
    fn has_texture(&self, name: &str) -> bool {
        self.lock().has_texture(name)
    }

    fn has_uint(&self, name: &str) -> bool {
        self.lock().has_uint(name)
    }

    fn set_texture(&mut self, name: &str, image: &SpectrumImage) {
        self.lock().set_texture(name, image);
    }

    fn set_uint(&mut self, name: &str, value: u32) {
        self.lock().set_uint(name, value);
    }
}
