//! Caret-notation decoding.
//!
//! Captures that went through `cat -v` or a similar pager spell control
//! characters out as text: ESC becomes `^[` and CR becomes `^M`. Turning
//! those two back into the real characters lets the stripper and line
//! assembler treat them like any other capture. Other caret pairs (`^C`,
//! `^D`) are usually echoed keystrokes and stay as they are.

const CARET: char = '^';

/// Decodes `^[` and `^M` back into ESC and CR, across chunk boundaries.
#[derive(Debug, Default)]
pub struct CaretDecoder {
    /// A `^` ended the previous piece
    pending_caret: bool,
}

impl CaretDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `input`, appending the result to `out`.
    pub fn feed(&mut self, input: &str, out: &mut String) {
        for c in input.chars() {
            if std::mem::take(&mut self.pending_caret) {
                match c {
                    '[' => {
                        out.push('\x1b');
                        continue;
                    }
                    'M' => {
                        out.push('\r');
                        continue;
                    }
                    _ => out.push(CARET),
                }
            }

            if c == CARET {
                self.pending_caret = true;
            } else {
                out.push(c);
            }
        }
    }

    /// End of input: a held `^` is plain text.
    pub fn finish(&mut self, out: &mut String) {
        if std::mem::take(&mut self.pending_caret) {
            out.push(CARET);
        }
    }
}
