//! Stream transforms applied to the capture between chunk supply and
//! classification.
//!
//! - [`decode`] - streaming UTF-8 decoding across chunk boundaries
//! - [`caret`] - optional `^[`/`^M` caret-notation decoding
//! - [`strip`] - control-sequence removal
//! - [`lines`] - logical line assembly with backspace/CR emulation
//! - [`filter`] - line-level noise filters
//! - [`prompt`] - shell prompt and command recognition

mod caret;
mod decode;
mod filter;
mod lines;
mod prompt;
mod strip;

pub use caret::CaretDecoder;
pub use decode::Utf8Decoder;
pub use filter::{FilterConfig, NoiseFilter, NoiseKind};
pub use lines::{CarriageReturn, LineAssembler, OverwritePolicy};
pub use prompt::{PromptLine, PromptMatcher};
pub use strip::{ControlStripper, StringKind, StripState};
