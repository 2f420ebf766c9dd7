//! Timing sidecar decoder.
//!
//! script(1) writes a companion `NAME.timing` file next to the raw capture.
//! Each meaningful line is `<delay> <byteCount>`: after waiting `delay`,
//! `byteCount` bytes of the capture were written to the terminal.

use std::fmt;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::transcript::{ConvertError, InputRole};

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Share of entries (numerator, denominator) that must look like integral
/// microsecond counts before [`TimingUnit::Auto`] switches to microseconds.
const MICROS_MAJORITY: (usize, usize) = (4, 5);

/// Smallest delay value treated as a plausible microsecond count.
const MICROS_THRESHOLD_SECS: u64 = 1_000;

/// One `(delay, byteCount)` pair from the sidecar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingEntry {
    /// Pause before the bytes were written
    pub delay: Duration,
    /// Number of capture bytes written after the pause
    pub byte_count: u64,
}

impl TimingEntry {
    pub fn new(delay: Duration, byte_count: u64) -> Self {
        Self { delay, byte_count }
    }

    /// Parse a single sidecar line.
    ///
    /// Returns `None` for blank lines, `#` comments and malformed lines.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let mut fields = line.split_whitespace();
        let delay = parse_delay(fields.next()?)?;
        let byte_count = parse_byte_count(fields.next()?)?;

        Some(Self { delay, byte_count })
    }
}

/// Unit of the delay column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingUnit {
    Seconds,
    Micros,
    /// Guess from the values (see [`TimingScript::detect_unit`])
    #[default]
    Auto,
}

impl FromStr for TimingUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "seconds" | "secs" | "s" => Ok(Self::Seconds),
            "micros" | "microseconds" | "us" => Ok(Self::Micros),
            "auto" => Ok(Self::Auto),
            other => Err(format!("unknown timing unit: {}", other)),
        }
    }
}

impl fmt::Display for TimingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds => write!(f, "seconds"),
            Self::Micros => write!(f, "micros"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

/// The decoded sidecar, in playback order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimingScript {
    entries: Vec<TimingEntry>,
    /// Number of lines that looked like data but failed to parse
    skipped: usize,
}

impl TimingScript {
    pub fn new(entries: Vec<TimingEntry>) -> Self {
        Self {
            entries,
            skipped: 0,
        }
    }

    /// Open and decode a sidecar file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|source| ConvertError::InputUnavailable {
            role: InputRole::Timing,
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse_reader(BufReader::new(file)).map_err(ConvertError::Read)
    }

    /// Decode a sidecar from any buffered reader.
    ///
    /// Lines are decoded lossily, so invalid UTF-8 only costs the line it
    /// appears on. Read errors are propagated.
    pub fn parse_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut script = Self::default();

        for (index, raw) in reader.split(b'\n').enumerate() {
            let raw = raw?;
            let line = String::from_utf8_lossy(&raw);
            script.push_line(index + 1, &line);
        }

        Ok(script)
    }

    /// Decode a sidecar held in memory.
    pub fn parse_str(content: &str) -> Self {
        let mut script = Self::default();
        for (index, line) in content.lines().enumerate() {
            script.push_line(index + 1, line);
        }
        script
    }

    fn push_line(&mut self, line_no: usize, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return;
        }

        match TimingEntry::parse_line(trimmed) {
            Some(entry) => self.entries.push(entry),
            None => {
                debug!(line = line_no, content = trimmed, "skipping malformed timing line");
                self.skipped += 1;
            }
        }
    }

    pub fn entries(&self) -> &[TimingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of malformed lines that were skipped while decoding.
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }

    /// Sum of all declared byte counts.
    pub fn total_bytes(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, e| acc.saturating_add(e.byte_count))
    }

    /// Guess the unit of the delay column.
    ///
    /// Picks microseconds when at least 80% of the delays are integral and
    /// at least 1000, which no realistic seconds-based recording produces.
    pub fn detect_unit(&self) -> TimingUnit {
        if self.entries.is_empty() {
            return TimingUnit::Seconds;
        }

        let micro_like = self
            .entries
            .iter()
            .filter(|e| e.delay.subsec_nanos() == 0 && e.delay.as_secs() >= MICROS_THRESHOLD_SECS)
            .count();

        let (num, den) = MICROS_MAJORITY;
        if micro_like * den >= self.entries.len() * num {
            TimingUnit::Micros
        } else {
            TimingUnit::Seconds
        }
    }

    /// Rescale all delays to seconds according to `unit` and return the entries.
    pub fn into_entries(self, unit: TimingUnit) -> Vec<TimingEntry> {
        let unit = match unit {
            TimingUnit::Auto => self.detect_unit(),
            other => other,
        };

        match unit {
            TimingUnit::Micros => {
                debug!("interpreting timing delays as microseconds");
                self.entries
                    .into_iter()
                    .map(|e| TimingEntry::new(e.delay / 1_000_000, e.byte_count))
                    .collect()
            }
            _ => self.entries,
        }
    }
}

/// Parse a non-negative decimal into a fixed-point duration.
///
/// Plain decimals are parsed exactly (digits past nanoseconds are
/// truncated); anything else, such as exponent notation, goes through `f64`.
fn parse_delay(field: &str) -> Option<Duration> {
    parse_fixed_point(field).or_else(|| {
        let value: f64 = field.parse().ok()?;
        if value.is_finite() && value >= 0.0 {
            Duration::try_from_secs_f64(value).ok()
        } else {
            None
        }
    })
}

fn parse_fixed_point(field: &str) -> Option<Duration> {
    let field = field.strip_prefix('+').unwrap_or(field);
    let (whole, frac) = match field.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (field, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let secs: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };

    let mut nanos: u64 = 0;
    let mut scale = NANOS_PER_SEC;
    for digit in frac.bytes().take(9) {
        scale /= 10;
        nanos += u64::from(digit - b'0') * scale;
    }

    Some(Duration::new(secs, nanos as u32))
}

/// Parse a byte count; decimal spellings are truncated.
fn parse_byte_count(field: &str) -> Option<u64> {
    if let Ok(count) = field.parse::<u64>() {
        return Some(count);
    }

    let value: f64 = field.parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value.trunc() as u64)
    } else {
        None
    }
}
