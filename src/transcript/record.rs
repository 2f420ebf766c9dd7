//! Output records.

use std::fmt;

/// Record terminator for the current platform.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// One transcript line: `relative,absolute,tag,content`.
///
/// Content is written as-is. It may contain commas and is not escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub relative: String,
    pub absolute: String,
    pub tag: String,
    pub content: String,
}

impl fmt::Display for OutputRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.relative, self.absolute, self.tag, self.content)
    }
}
