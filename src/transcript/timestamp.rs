//! Relative and absolute timestamp rendering.

use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use super::error::ConfigError;

/// Local formats accepted for a start time without an offset.
const LOCAL_START_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Renders elapsed playback time as record timestamps.
#[derive(Debug, Clone)]
pub struct Timestamps {
    start: DateTime<Utc>,
    time_zone: Tz,
    format: String,
}

impl Timestamps {
    pub fn new(
        start: DateTime<Utc>,
        time_zone: Tz,
        format: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidTimeFormat(format));
        }

        Ok(Self {
            start,
            time_zone,
            format,
        })
    }

    /// `HH:MM:SS` from whole elapsed seconds. Hours are not capped.
    pub fn relative(&self, elapsed: Duration) -> String {
        format_relative(elapsed)
    }

    /// Start instant plus `elapsed`, rendered in the configured zone.
    pub fn absolute(&self, elapsed: Duration) -> String {
        let instant = TimeDelta::from_std(elapsed)
            .ok()
            .and_then(|delta| self.start.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        // The format was validated in `new`
        instant
            .with_timezone(&self.time_zone)
            .format(&self.format)
            .to_string()
    }
}

pub fn format_relative(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Resolve an IANA zone name such as `Asia/Tokyo`.
pub fn parse_time_zone(name: &str) -> Result<Tz, ConfigError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ConfigError::UnknownTimeZone(name.to_string()))
}

/// Parse a start instant.
///
/// RFC 3339 values carry their own offset. Local values
/// (`YYYY/MM/DD HH:MM:SS` and ISO-like variants) are read in `zone`.
pub fn parse_start(value: &str, zone: Tz) -> Result<DateTime<Utc>, ConfigError> {
    let value = value.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    let naive = LOCAL_START_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| ConfigError::InvalidStart(value.to_string()))?;

    zone.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| ConfigError::NonexistentLocalTime {
            value: value.to_string(),
            zone: zone.name().to_string(),
        })
}
