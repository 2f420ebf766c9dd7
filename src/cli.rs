//! Command-line interface definition.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::Config;
use crate::transcript::transforms::{FilterConfig, OverwritePolicy};
use crate::transcript::ExtractionMode;
use crate::typescript::{default_timing_path, TimingUnit};

/// Version string: package version, build date and (outside release
/// builds) the short git SHA.
#[cfg(not(feature = "release"))]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SCRIPTLOG_BUILD_DATE"),
    ", ",
    env!("VERGEN_GIT_SHA"),
    ")"
);

#[cfg(feature = "release")]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SCRIPTLOG_BUILD_DATE"),
    ")"
);

/// Replay a script(1) typescript into a timestamped transcript.
///
/// Each surviving line of the session becomes one record:
/// `relative,absolute,tag,content`.
#[derive(Debug, Parser)]
#[command(name = "scriptlog", version = VERSION, about, long_about = None)]
pub struct Cli {
    /// Raw capture written by `script --timing=FILE CAPTURE`
    pub capture: PathBuf,

    /// Timing file [default: <CAPTURE>.timing]
    pub timing: Option<PathBuf>,

    /// Write records to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Append to the output file instead of truncating it
    #[arg(long, requires = "output")]
    pub append: bool,

    /// Session start (RFC 3339, or local 'YYYY/MM/DD HH:MM:SS') [default: now]
    #[arg(long, value_name = "TS")]
    pub start: Option<String>,

    /// IANA time zone for absolute timestamps and local start times
    #[arg(long, value_name = "ZONE")]
    pub tz: Option<String>,

    /// Tag written in the third column
    #[arg(long)]
    pub tag: Option<String>,

    /// strftime format of the absolute timestamp
    #[arg(long, value_name = "FMT")]
    pub time_format: Option<String>,

    /// Decode `^[` and `^M` caret notation (as written by `cat -v`)
    #[arg(long)]
    pub caret_notation: bool,

    /// Keep control sequences instead of stripping them
    #[arg(long)]
    pub raw: bool,

    /// Drop carriage returns instead of emulating the redraw
    #[arg(long)]
    pub strip_cr: bool,

    /// How a carriage return redraws the line
    #[arg(long, value_name = "POLICY", value_parser = parse_cr_policy)]
    pub cr_policy: Option<OverwritePolicy>,

    /// Unit of the timing file's delay column
    #[arg(long, value_name = "UNIT")]
    pub unit: Option<TimingUnit>,

    /// Only emit prompt + command lines
    #[arg(long)]
    pub commands_only: bool,

    /// With --commands-only, omit the prompt from each record
    #[arg(long)]
    pub no_prompt: bool,

    /// Discard the first N lines
    #[arg(long, value_name = "N")]
    pub skip_lines: Option<usize>,

    /// Discard lines up to and including the first containing TEXT
    #[arg(long, value_name = "TEXT")]
    pub skip_until: Option<String>,

    /// Disable all noise filters
    #[arg(long)]
    pub keep_noise: bool,

    /// Read settings from FILE instead of the default config
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn parse_cr_policy(value: &str) -> Result<OverwritePolicy, String> {
    match value {
        "merge" => Ok(OverwritePolicy::Merge),
        "last-segment" => Ok(OverwritePolicy::LastSegment),
        other => Err(format!("unknown policy '{}' (expected merge or last-segment)", other)),
    }
}

impl Cli {
    /// Timing path, defaulting to `<CAPTURE>.timing`.
    pub fn timing_path(&self) -> PathBuf {
        self.timing.clone().unwrap_or_else(|| default_timing_path(&self.capture))
    }

    /// Default log filter for the verbosity count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Apply command-line overrides on top of the file configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(tz) = &self.tz {
            config.output.time_zone = Some(tz.clone());
        }
        if let Some(tag) = &self.tag {
            config.output.tag = tag.clone();
        }
        if let Some(format) = &self.time_format {
            config.output.absolute_format = format.clone();
        }

        if self.caret_notation {
            config.replay.caret_notation = true;
        }
        if self.raw {
            config.replay.strip_control_sequences = false;
        }
        if self.strip_cr {
            config.replay.strip_carriage_return = true;
        }
        if let Some(policy) = self.cr_policy {
            config.replay.overwrite_policy = policy;
        }
        if let Some(unit) = self.unit {
            config.replay.timing_unit = unit;
        }

        if self.keep_noise {
            config.filter = FilterConfig::disabled();
        }

        if self.commands_only {
            config.extract.mode = ExtractionMode::PromptCommand;
        }
        if self.no_prompt {
            config.extract.prefix_prompt = false;
        }
        if let Some(n) = self.skip_lines {
            config.extract.skip_leading_lines = n;
        }
        if let Some(marker) = &self.skip_until {
            config.extract.skip_until_marker = Some(marker.clone());
        }
    }
}
