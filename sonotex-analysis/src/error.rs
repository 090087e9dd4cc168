//! Error types for spectrum sampling

use thiserror::Error;

/// Invalid sampler configuration
///
/// The sampler stays inert while its configuration is invalid and reports
/// each distinct error once.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("sample count must be at least 1")]
    ZeroSampleCount,
    #[error("history depth must be at least 1")]
    ZeroHistoryDepth,
    #[error("update frequency must be a positive number of hertz, got {0}")]
    InvalidFrequency(f32),
}

/// Unrecognized window function name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown window function: {0}")]
pub struct WindowParseError(pub String);
