//! Single-channel float images handed to distributors

/// Row-major single-channel (R32F) image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectrumImage {
    label: String,
    width: usize,
    height: usize,
    pixels: Vec<f32>,
}

impl SpectrumImage {
    /// Create a zero-filled image
    pub fn new(label: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            label: label.into(),
            width,
            height,
            pixels: vec![0.0; width * height],
        }
    }

    /// Reallocate (zero-filled) unless the image already has these dimensions
    ///
    /// Returns true if the image was reallocated.
    pub fn ensure_size(&mut self, width: usize, height: usize) -> bool {
        if self.width == width && self.height == height && self.pixels.len() == width * height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0.0; width * height];
        true
    }

    /// Debug label, e.g. `AudioSpectrum64`
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels (`width * height`)
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// All pixels, row-major, top row first
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    /// Mutable pixel storage for in-place materialization
    pub fn pixels_mut(&mut self) -> &mut [f32] {
        &mut self.pixels
    }

    /// Pixel at column `x`, row `y`
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// One row of pixels
    pub fn row(&self, y: usize) -> Option<&[f32]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.pixels.get(start..start + self.width)
    }

    /// Copy `values` into the pixels, zero-filling any remainder
    pub fn write(&mut self, values: &[f32]) {
        let copied = values.len().min(self.pixels.len());
        self.pixels[..copied].copy_from_slice(&values[..copied]);
        self.pixels[copied..].fill(0.0);
    }

    /// Little-endian R32F bytes, ready for texture upload
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_le_bytes()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_image_is_zeroed() {
        let image = SpectrumImage::new("AudioSpectrum4", 4, 2);
        assert_eq!(image.len(), 8);
        assert!(image.pixels().iter().all(|&p| p == 0.0));
        assert_eq!(image.label(), "AudioSpectrum4");
    }

    #[test]
    fn test_ensure_size() {
        let mut image = SpectrumImage::new("x", 4, 1);
        image.write(&[1.0, 2.0, 3.0, 4.0]);

        assert!(!image.ensure_size(4, 1));
        assert_eq!(image.get(3, 0), Some(4.0));

        assert!(image.ensure_size(8, 2));
        assert_eq!(image.len(), 16);
        assert_eq!(image.get(3, 0), Some(0.0));
    }

    #[test]
    fn test_row_access() {
        let mut image = SpectrumImage::new("x", 2, 2);
        image.write(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(image.row(1), Some(&[3.0, 4.0][..]));
        assert_eq!(image.row(2), None);
        assert_eq!(image.get(2, 0), None);
    }

    #[test]
    fn test_le_bytes() {
        let mut image = SpectrumImage::new("x", 1, 1);
        image.write(&[1.0]);
        assert_eq!(image.to_le_bytes(), 1.0f32.to_le_bytes().to_vec());
    }
}
