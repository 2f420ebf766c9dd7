//! Logical line assembly with backspace and carriage-return emulation.
//!
//! Terminal output redraws lines in place: shells echo backspaces while
//! editing, and progress bars return to column 0 with `\r` and draw again.
//! The assembler replays those two effects on the current line only and
//! hands out a finished line at every `\n`.

use serde::{Deserialize, Serialize};

/// How a carriage return rewrites the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverwritePolicy {
    /// Redraw from column 0 without erasing: a shorter redraw leaves the
    /// tail of the previous draw visible (`ABCDE` `\r` `XY` -> `XYCDE`)
    #[default]
    Merge,
    /// Keep only the text written after the last carriage return
    LastSegment,
}

/// Treatment of carriage returns in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarriageReturn {
    /// Emulate the redraw using the given policy
    Overwrite(OverwritePolicy),
    /// Drop carriage returns and keep everything
    Strip,
}

impl Default for CarriageReturn {
    fn default() -> Self {
        Self::Overwrite(OverwritePolicy::default())
    }
}

/// Builds logical lines from a stripped character stream.
///
/// The line under construction is kept as two parts: `drawn`, what earlier
/// redraws left on screen, and `segment`, the text written since the last
/// carriage return. They are merged on the next `\r` or `\n`.
#[derive(Debug, Default)]
pub struct LineAssembler {
    mode: CarriageReturn,
    drawn: String,
    segment: String,
    /// Whether the current line has content (drawn or pending)
    dirty: bool,
}

impl LineAssembler {
    pub fn new(mode: CarriageReturn) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Feed one character. Returns the completed line on `\n`.
    pub fn push(&mut self, c: char) -> Option<String> {
        match c {
            '\n' => return Some(self.take_line()),
            '\r' => match self.mode {
                CarriageReturn::Strip => {}
                CarriageReturn::Overwrite(policy) => self.carriage_return(policy),
            },
            '\x08' => {
                // At column 0 after a redraw there is nothing to delete
                self.segment.pop();
            }
            '\t' => self.write(c),
            c if c.is_control() => {}
            c => self.write(c),
        }
        None
    }

    /// Feed a run of text, appending completed lines to `lines`.
    pub fn feed(&mut self, text: &str, lines: &mut Vec<String>) {
        for c in text.chars() {
            if let Some(line) = self.push(c) {
                lines.push(line);
            }
        }
    }

    /// End of input: return the unterminated line, if it has any content.
    pub fn finish(&mut self) -> Option<String> {
        if self.dirty {
            let line = self.take_line();
            (!line.is_empty()).then_some(line)
        } else {
            None
        }
    }

    /// Text of the current line as it would be emitted now.
    pub fn current(&self) -> String {
        match self.mode {
            CarriageReturn::Overwrite(policy) => merge(&self.drawn, &self.segment, policy),
            CarriageReturn::Strip => self.segment.clone(),
        }
    }

    fn write(&mut self, c: char) {
        self.segment.push(c);
        self.dirty = true;
    }

    fn carriage_return(&mut self, policy: OverwritePolicy) {
        // A bare \r before \n (CRLF) must not wipe the line under LastSegment
        if self.segment.is_empty() {
            return;
        }
        self.drawn = merge(&self.drawn, &self.segment, policy);
        self.segment.clear();
    }

    fn take_line(&mut self) -> String {
        let line = self.current();
        self.drawn.clear();
        self.segment.clear();
        self.dirty = false;
        line
    }
}

/// Overwrite `drawn` from column 0 with `segment`.
fn merge(drawn: &str, segment: &str, policy: OverwritePolicy) -> String {
    if segment.is_empty() {
        return drawn.to_string();
    }

    match policy {
        OverwritePolicy::LastSegment => segment.to_string(),
        OverwritePolicy::Merge => {
            let width = segment.chars().count();
            let mut merged = segment.to_string();
            merged.extend(drawn.chars().skip(width));
            merged
        }
    }
}
