use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use wifi_signal::{buffer::MAX_SAMPLES, command, SourceKind};

pub const DEFAULT_CONFIG_PATH: &str = "wifi-snr.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub interval_ms: u64,
    pub max_samples: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            interval_ms: 100,
            max_samples: MAX_SAMPLES,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: Option<String>,
    pub program: String,
    pub args: Vec<String>,
    pub probe_args: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            kind: None,
            program: command::DEFAULT_PROGRAM.into(),
            args: command::DEFAULT_ARGS.iter().map(|s| s.to_string()).collect(),
            probe_args: command::DEFAULT_PROBE_ARGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SourceConfig {
    /// Configured source, or the platform default when none is set
    pub fn kind(&self) -> Result<SourceKind, Box<dyn Error>> {
        match &self.kind {
            Some(kind) => Ok(kind.parse::<SourceKind>()?),
            None if cfg!(target_os = "windows") => Ok(SourceKind::Native),
            None => Ok(SourceKind::Command),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub table: bool,
    pub document: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            table: true,
            document: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sampling: SamplingConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
}

impl Config {
    fn validate(mut self) -> Result<Self, Box<dyn Error>> {
        if self.sampling.interval_ms == 0 {
            return Err("sampling.interval_ms must be at least 1".into());
        }

        if self.sampling.max_samples == 0 {
            return Err("sampling.max_samples must be at least 1".into());
        }

        if self.sampling.max_samples > MAX_SAMPLES {
            log::warn!(
                "sampling.max_samples {} exceeds the limit, using {}",
                self.sampling.max_samples,
                MAX_SAMPLES
            );
            self.sampling.max_samples = MAX_SAMPLES;
        }

        self.source.kind()?;

        Ok(self)
    }
}

pub fn parse_config(text: &str) -> Result<Config, Box<dyn Error>> {
    let config: Config = toml::from_str(text)?;
    config.validate()
}

/// Loads configuration from `path`.
///
/// Without an explicit path the default file is read when present and
/// defaults are used otherwise. An explicit path must exist.
pub fn load_config(path: Option<&str>) -> Result<Config, Box<dyn Error>> {
    let path = match path {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => DEFAULT_CONFIG_PATH,
        None => return Config::default().validate(),
    };

    let s = fs::read_to_string(path)
        .map_err(|e| format!("could not read config file '{}': {}", path, e))?;

    parse_config(&s)
}
