//! Transcript conversion errors.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Which input a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRole {
    /// The raw terminal capture
    Capture,
    /// The timing sidecar
    Timing,
}

impl fmt::Display for InputRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capture => write!(f, "capture"),
            Self::Timing => write!(f, "timing file"),
        }
    }
}

/// Errors that abort a conversion.
///
/// Malformed timing lines, short captures and unterminated escape sequences
/// are recovered from locally and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Cannot open {role} {}: {source}", .path.display())]
    InputUnavailable {
        role: InputRole,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read input: {0}")]
    Read(#[source] io::Error),

    #[error("Failed to write transcript: {0}")]
    Write(#[source] io::Error),
}

/// Errors in the engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown time zone '{0}' (expected an IANA name such as 'Asia/Tokyo' or 'UTC')")]
    UnknownTimeZone(String),

    #[error("Cannot parse start time '{0}' (expected RFC 3339 or 'YYYY/MM/DD HH:MM:SS')")]
    InvalidStart(String),

    #[error("Start time '{value}' does not exist in time zone {zone}")]
    NonexistentLocalTime { value: String, zone: String },

    #[error("Invalid time format '{0}'")]
    InvalidTimeFormat(String),
}
