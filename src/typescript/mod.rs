//! script(1) typescript input formats.
//!
//! A recording made with `script --timing=NAME.timing NAME` consists of:
//! - `NAME`: the raw bytes written to the terminal (the capture)
//! - `NAME.timing`: `(delay, byteCount)` pairs describing replay pacing
//!
//! [`timing`] decodes the sidecar; [`chunks`] walks the capture in step with it.

mod chunks;
mod timing;

use std::path::{Path, PathBuf};

pub use chunks::{Chunk, ChunkSupplier, PlaybackClock, MAX_SLICE_BYTES};
pub use timing::{TimingEntry, TimingScript, TimingUnit};

/// Conventional sidecar path for a capture: `NAME` -> `NAME.timing`.
pub fn default_timing_path(capture: &Path) -> PathBuf {
    let mut name = capture.as_os_str().to_owned();
    name.push(".timing");
    PathBuf::from(name)
}
