//! Streaming control-sequence stripper.
//!
//! A single-pass state machine that removes ANSI/VT control sequences (CSI,
//! OSC, DCS, PM, APC and two-character escapes) and passes everything else
//! through. The state lives in the stripper rather than in each call, so a
//! sequence split across any number of chunks is removed exactly as if it
//! had arrived in one piece.

const ESC: char = '\x1b';
const BEL: char = '\x07';

// 8-bit C1 introducers and string terminator
const C1_DCS: char = '\u{90}';
const C1_CSI: char = '\u{9b}';
const C1_ST: char = '\u{9c}';
const C1_OSC: char = '\u{9d}';
const C1_PM: char = '\u{9e}';
const C1_APC: char = '\u{9f}';

/// The string-type sequences, which run until a terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    /// Operating System Command (`ESC ]`)
    Osc,
    /// Device Control String (`ESC P`)
    Dcs,
    /// Privacy Message (`ESC ^`)
    Pm,
    /// Application Program Command (`ESC _`)
    Apc,
}

/// Stripper state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StripState {
    /// Passing text through
    #[default]
    Normal,
    /// Saw ESC, waiting for the byte that selects the sequence type
    SawEscape,
    /// Inside a Control Sequence, waiting for the final byte
    Csi,
    /// Inside a string sequence
    InString(StringKind),
    /// Saw ESC inside a string sequence; `\` completes the String Terminator
    AwaitingSt(StringKind),
}

/// Removes terminal control sequences from a character stream.
#[derive(Debug, Default)]
pub struct ControlStripper {
    state: StripState,
    /// Sequences removed so far
    stripped: usize,
}

impl ControlStripper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StripState {
        self.state
    }

    /// Number of control sequences removed so far.
    pub fn stripped_count(&self) -> usize {
        self.stripped
    }

    /// Feed the next piece of input, appending visible text to `out`.
    pub fn feed(&mut self, input: &str, out: &mut String) {
        for c in input.chars() {
            if let Some(visible) = self.advance(c) {
                out.push(visible);
            }
        }
    }

    /// Convenience wrapper around [`feed`](Self::feed) returning a new string.
    pub fn strip(&mut self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.feed(input, &mut out);
        out
    }

    /// Advance by one character, returning it if it is visible output.
    pub fn advance(&mut self, c: char) -> Option<char> {
        use StripState::*;

        match self.state {
            Normal => match c {
                ESC => {
                    self.state = SawEscape;
                    None
                }
                C1_CSI => self.enter(Csi),
                C1_OSC => self.enter(InString(StringKind::Osc)),
                C1_DCS => self.enter(InString(StringKind::Dcs)),
                C1_PM => self.enter(InString(StringKind::Pm)),
                C1_APC => self.enter(InString(StringKind::Apc)),
                _ => Some(c),
            },
            SawEscape => match c {
                '[' => self.enter(Csi),
                ']' => self.enter(InString(StringKind::Osc)),
                'P' => self.enter(InString(StringKind::Dcs)),
                '^' => self.enter(InString(StringKind::Pm)),
                '_' => self.enter(InString(StringKind::Apc)),
                _ => {
                    // Two-character escape (ESC 7, ESC =, ESC \ ...)
                    self.finish_sequence();
                    None
                }
            },
            Csi => {
                match c {
                    '\x40'..='\x7e' => self.finish_sequence(),
                    // Abort and start over, as a VT parser does
                    ESC => self.state = SawEscape,
                    _ => {}
                }
                None
            }
            InString(kind) => {
                match c {
                    BEL if kind == StringKind::Osc => self.finish_sequence(),
                    C1_ST => self.finish_sequence(),
                    ESC => self.state = AwaitingSt(kind),
                    _ => {}
                }
                None
            }
            AwaitingSt(kind) => {
                match c {
                    '\\' => self.finish_sequence(),
                    _ => self.state = InString(kind),
                }
                None
            }
        }
    }

    /// End of input. Returns `true` if an unterminated sequence was discarded.
    pub fn finish(&mut self) -> bool {
        let unterminated = self.state != StripState::Normal;
        self.state = StripState::Normal;
        unterminated
    }

    fn enter(&mut self, state: StripState) -> Option<char> {
        self.state = state;
        None
    }

    fn finish_sequence(&mut self) {
        self.state = StripState::Normal;
        self.stripped += 1;
    }
}
