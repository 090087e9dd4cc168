//! Window functions applied to time-domain samples before the FFT

use crate::error::WindowParseError;
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Window function passed through to the spectrum source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowFunction {
    /// No weighting
    Rectangular,
    /// Linear ramp up and down
    Triangle,
    Hamming,
    Hanning,
    Blackman,
    /// 4-term Blackman-Harris (lowest leakage, widest main lobe)
    #[default]
    BlackmanHarris,
}

impl WindowFunction {
    /// All window functions, in declaration order
    pub const ALL: [WindowFunction; 6] = [
        WindowFunction::Rectangular,
        WindowFunction::Triangle,
        WindowFunction::Hamming,
        WindowFunction::Hanning,
        WindowFunction::Blackman,
        WindowFunction::BlackmanHarris,
    ];

    /// Weight of sample `n` in a window of `len` samples
    pub fn coefficient(self, n: usize, len: usize) -> f32 {
        if len <= 1 {
            return 1.0;
        }
        let denom = (len - 1) as f32;
        let phase = 2.0 * PI * n as f32 / denom;

        match self {
            WindowFunction::Rectangular => 1.0,
            WindowFunction::Triangle => 1.0 - (2.0 * n as f32 / denom - 1.0).abs(),
            WindowFunction::Hamming => 0.54 - 0.46 * phase.cos(),
            WindowFunction::Hanning => 0.5 * (1.0 - phase.cos()),
            WindowFunction::Blackman => 0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos(),
            WindowFunction::BlackmanHarris => {
                0.35875 - 0.48829 * phase.cos() + 0.14128 * (2.0 * phase).cos()
                    - 0.01168 * (3.0 * phase).cos()
            }
        }
    }

    /// Pre-compute the full window for `len` samples
    pub fn coefficients(self, len: usize) -> Vec<f32> {
        (0..len).map(|n| self.coefficient(n, len)).collect()
    }

    /// Short lowercase name, as accepted by `FromStr`
    pub fn name(self) -> &'static str {
        match self {
            WindowFunction::Rectangular => "rectangular",
            WindowFunction::Triangle => "triangle",
            WindowFunction::Hamming => "hamming",
            WindowFunction::Hanning => "hanning",
            WindowFunction::Blackman => "blackman",
            WindowFunction::BlackmanHarris => "blackmanharris",
        }
    }
}

impl fmt::Display for WindowFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowFunction {
    type Err = WindowParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "rectangular" | "rect" | "none" => Ok(WindowFunction::Rectangular),
            "triangle" | "triangular" => Ok(WindowFunction::Triangle),
            "hamming" => Ok(WindowFunction::Hamming),
            "hanning" | "hann" => Ok(WindowFunction::Hanning),
            "blackman" => Ok(WindowFunction::Blackman),
            "blackmanharris" => Ok(WindowFunction::BlackmanHarris),
            _ => Err(WindowParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangular_is_flat() {
        let w = WindowFunction::Rectangular.coefficients(8);
        assert!(w.iter().all(|&c| c == 1.0));
    }

    #[test]
    fn test_tapered_windows_are_symmetric() {
        for window in WindowFunction::ALL {
            let w = window.coefficients(16);
            for i in 0..8 {
                assert!(
                    (w[i] - w[15 - i]).abs() < 1e-5,
                    "{} not symmetric at {}",
                    window,
                    i
                );
            }
        }
    }

    #[test]
    fn test_hanning_endpoints_and_peak() {
        let w = WindowFunction::Hanning.coefficients(9);
        assert!(w[0].abs() < 1e-6);
        assert!(w[8].abs() < 1e-6);
        assert!((w[4] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_sample_window() {
        for window in WindowFunction::ALL {
            assert_eq!(window.coefficient(0, 1), 1.0);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Blackman-Harris".parse::<WindowFunction>(), Ok(WindowFunction::BlackmanHarris));
        assert_eq!("hann".parse::<WindowFunction>(), Ok(WindowFunction::Hanning));
        assert_eq!("TRIANGLE".parse::<WindowFunction>(), Ok(WindowFunction::Triangle));
        assert!("kaiser".parse::<WindowFunction>().is_err());

        for window in WindowFunction::ALL {
            assert_eq!(window.name().parse::<WindowFunction>(), Ok(window));
        }
    }

    #[test]
    fn test_default_is_blackman_harris() {
        assert_eq!(WindowFunction::default(), WindowFunction::BlackmanHarris);
    }
}
