//! Configuration for the transcript pipeline.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::transforms::{CarriageReturn, FilterConfig, OverwritePolicy};
use crate::typescript::TimingUnit;

/// Default record tag.
pub const DEFAULT_TAG: &str = "AAAA";

/// Default strftime format of the absolute timestamp column.
pub const DEFAULT_ABSOLUTE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// What a surviving line turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMode {
    /// Every surviving line becomes a record
    #[default]
    FullLine,
    /// Only prompt + command lines become records; command output is dropped
    PromptCommand,
}

/// Configuration for one conversion run. Read-only to the pipeline.
#[derive(Debug, Clone)]
pub struct TranscriptConfig {
    /// Origin of the absolute timestamp column
    pub start: DateTime<Utc>,
    /// Zone the absolute timestamps are rendered in
    pub time_zone: Tz,
    /// strftime format of the absolute timestamp
    pub absolute_format: String,
    /// Constant third column of every record
    pub tag: String,
    /// Decode `^[` and `^M` caret notation before stripping
    pub caret_notation: bool,
    /// Remove ANSI/VT control sequences (off = pass raw bytes on to line cleanup)
    pub strip_control_sequences: bool,
    /// Drop `\r` instead of emulating the redraw
    pub strip_carriage_return: bool,
    /// Redraw emulation used when carriage returns are kept
    pub overwrite_policy: OverwritePolicy,
    /// Unit of the timing file's delay column
    pub timing_unit: TimingUnit,
    pub extraction_mode: ExtractionMode,
    /// In prompt-command mode, prefix each command with its prompt
    pub prefix_prompt: bool,
    /// Number of leading completed lines to discard unconditionally
    pub skip_leading_lines: usize,
    /// Discard lines up to and including the first containing this text
    pub skip_until_marker: Option<String>,
    pub filters: FilterConfig,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            start: Utc::now(),
            time_zone: Tz::UTC,
            absolute_format: DEFAULT_ABSOLUTE_FORMAT.to_string(),
            tag: DEFAULT_TAG.to_string(),
            caret_notation: false,
            strip_control_sequences: true,
            strip_carriage_return: false,
            overwrite_policy: OverwritePolicy::Merge,
            timing_unit: TimingUnit::Auto,
            extraction_mode: ExtractionMode::FullLine,
            prefix_prompt: true,
            skip_leading_lines: 0,
            skip_until_marker: None,
            filters: FilterConfig::default(),
        }
    }
}

impl TranscriptConfig {
    /// Carriage-return handling derived from the two CR settings.
    pub fn carriage_return(&self) -> CarriageReturn {
        if self.strip_carriage_return {
            CarriageReturn::Strip
        } else {
            CarriageReturn::Overwrite(self.overwrite_policy)
        }
    }
}
