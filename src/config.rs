//! User configuration file.
//!
//! Loaded from `~/.config/scriptlog/config.toml` (or the platform
//! equivalent). Every field is optional; missing fields take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::transcript::transforms::{FilterConfig, OverwritePolicy};
use crate::transcript::{
    parse_start, parse_time_zone, ConfigError, ExtractionMode, TranscriptConfig,
    DEFAULT_ABSOLUTE_FORMAT, DEFAULT_TAG,
};
use crate::typescript::TimingUnit;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub replay: ReplayConfig,
    pub filter: FilterConfig,
    pub extract: ExtractConfig,
}

/// Record formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Constant third column of every record
    pub tag: String,
    /// IANA zone for absolute timestamps (UTC when unset)
    pub time_zone: Option<String>,
    /// strftime format of the absolute timestamp
    pub absolute_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
            time_zone: None,
            absolute_format: DEFAULT_ABSOLUTE_FORMAT.to_string(),
        }
    }
}

/// Capture replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Decode `^[` and `^M` as written by `cat -v`
    pub caret_notation: bool,
    pub strip_control_sequences: bool,
    pub strip_carriage_return: bool,
    pub overwrite_policy: OverwritePolicy,
    pub timing_unit: TimingUnit,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            caret_notation: false,
            strip_control_sequences: true,
            strip_carriage_return: false,
            overwrite_policy: OverwritePolicy::default(),
            timing_unit: TimingUnit::default(),
        }
    }
}

/// What becomes a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub mode: ExtractionMode,
    pub prefix_prompt: bool,
    pub skip_leading_lines: usize,
    pub skip_until_marker: Option<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            mode: ExtractionMode::default(),
            prefix_prompt: true,
            skip_leading_lines: 0,
            skip_until_marker: None,
        }
    }
}

impl Config {
    /// Load from the default location, or defaults if no file exists.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("scriptlog").join("config.toml"))
    }

    /// Build the engine configuration.
    ///
    /// `start` is parsed in the configured zone; `None` means now.
    pub fn transcript(&self, start: Option<&str>) -> Result<TranscriptConfig, ConfigError> {
        let time_zone = match self.output.time_zone.as_deref() {
            Some(name) => parse_time_zone(name)?,
            None => chrono_tz::Tz::UTC,
        };
        let start = match start {
            Some(value) => parse_start(value, time_zone)?,
            None => Utc::now(),
        };

        Ok(TranscriptConfig {
            start,
            time_zone,
            absolute_format: self.output.absolute_format.clone(),
            tag: self.output.tag.clone(),
            caret_notation: self.replay.caret_notation,
            strip_control_sequences: self.replay.strip_control_sequences,
            strip_carriage_return: self.replay.strip_carriage_return,
            overwrite_policy: self.replay.overwrite_policy,
            timing_unit: self.replay.timing_unit,
            extraction_mode: self.extract.mode,
            prefix_prompt: self.extract.prefix_prompt,
            skip_leading_lines: self.extract.skip_leading_lines,
            skip_until_marker: self.extract.skip_until_marker.clone(),
            filters: self.filter.clone(),
        })
    }
}
