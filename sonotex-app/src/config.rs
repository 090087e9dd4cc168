//! Configuration persistence for the sonotex binary
//!
//! Plain `key=value` lines; `#` starts a comment. Unknown keys are ignored
//! and unparsable values keep their default.

use sonotex_analysis::{SamplerConfig, WindowFunction};
use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Sampler settings
    pub sampler: SamplerConfig,
    /// Input device name, default device when unset
    pub device: Option<String>,
    /// Host frame rate driving `tick`
    pub fps: u32,
    /// Stop after this many seconds, run until killed when unset
    pub duration_secs: Option<f32>,
    /// Log a band summary every N samples (0 disables)
    pub log_every: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sampler: SamplerConfig::default(),
            device: None,
            fps: 60,
            duration_secs: None,
            log_every: 60,
        }
    }
}

impl Config {
    /// Load config from the default location
    ///
    /// Writes a default config there on first run. Returns the defaults if
    /// the file can't be read.
    pub fn load() -> Self {
        Self::load_or_init(&Self::config_path())
    }

    /// Load config from `path`, creating it with defaults if missing
    pub fn load_or_init(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                config
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let config = Self::default();
                match config.save_to(path) {
                    Ok(()) => tracing::info!(path = %path.display(), "wrote default config"),
                    Err(err) => {
                        tracing::warn!(path = %path.display(), %err, "failed to write default config")
                    }
                }
                config
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.serialize())
    }

    /// Run duration, `None` when unset or too large to represent
    pub fn run_duration(&self) -> Option<Duration> {
        self.duration_secs
            .and_then(|secs| Duration::try_from_secs_f32(secs).ok())
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sonotex")
            .join("config.txt")
    }

    /// Parse config from simple key=value format
    fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                tracing::warn!(line, "ignoring config line without '='");
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "sample_count" => parse_into(key, value, &mut config.sampler.sample_count),
                "history_depth" => parse_into(key, value, &mut config.sampler.history_depth),
                "update_frequency_hz" => {
                    parse_into(key, value, &mut config.sampler.update_frequency_hz)
                }
                "window" => parse_into::<WindowFunction>(key, value, &mut config.sampler.window),
                "channel" => parse_into(key, value, &mut config.sampler.channel),
                "device" => {
                    config.device = (!value.is_empty()).then(|| value.to_string());
                }
                "fps" => parse_into(key, value, &mut config.fps),
                "duration_secs" => {
                    let mut secs = 0.0f32;
                    parse_into(key, value, &mut secs);
                    let representable = Duration::try_from_secs_f32(secs).is_ok();
                    if secs > 0.0 && !representable {
                        tracing::warn!(key, value, "duration out of range, running until killed");
                    }
                    config.duration_secs = (secs > 0.0 && representable).then_some(secs);
                }
                "log_every" => parse_into(key, value, &mut config.log_every),
                _ => {} // Ignore unknown keys
            }
        }

        config
    }

    /// Serialize config to simple key=value format
    fn serialize(&self) -> String {
        let mut lines = vec![
            "# Sonotex Configuration".to_string(),
            format!("sample_count={}", self.sampler.sample_count),
            format!("history_depth={}", self.sampler.history_depth),
            format!("update_frequency_hz={}", self.sampler.update_frequency_hz),
            format!("window={}", self.sampler.window),
            format!("channel={}", self.sampler.channel),
            format!("fps={}", self.fps),
            format!("log_every={}", self.log_every),
        ];

        if let Some(ref device) = self.device {
            lines.push(format!("device={}", device));
        }
        if let Some(secs) = self.duration_secs {
            lines.push(format!("duration_secs={}", secs));
        }

        lines.join("\n")
    }
}

/// Parse `value` into `slot`, keeping the old value on failure
fn parse_into<T>(key: &str, value: &str, slot: &mut T)
where
    T: FromStr,
    T::Err: Display,
{
    match value.parse() {
        Ok(parsed) => *slot = parsed,
        Err(err) => tracing::warn!(key, value, %err, "invalid config value, keeping default"),
    }
}
