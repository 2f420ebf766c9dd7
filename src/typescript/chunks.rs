//! Chunked capture playback.
//!
//! Pairs the raw capture with its timing entries: every entry advances the
//! playback clock by its delay and then releases its declared number of
//! bytes. Timestamps are charged per chunk, never per byte.

use std::collections::VecDeque;
use std::io::{self, Read};
use std::time::Duration;

use tracing::debug;

use super::timing::TimingEntry;

/// Largest slice handed out at once. Bigger declared chunks are split into
/// several slices that share one timestamp.
pub const MAX_SLICE_BYTES: usize = 64 * 1024;

/// Elapsed playback time plus the bytes still owed by the current entry.
///
/// `elapsed` only grows, and only when a new entry starts being consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackClock {
    elapsed: Duration,
    pending: u64,
}

impl PlaybackClock {
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Bytes of the current entry not yet read from the capture.
    pub fn pending(&self) -> u64 {
        self.pending
    }

    fn begin(&mut self, entry: &TimingEntry) {
        self.elapsed = self.elapsed.saturating_add(entry.delay);
        self.pending = entry.byte_count;
    }
}

/// A run of capture bytes and the elapsed time it is charged to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub elapsed: Duration,
    pub bytes: Vec<u8>,
}

/// Yields capture bytes in timing order.
pub struct ChunkSupplier<R> {
    reader: R,
    entries: VecDeque<TimingEntry>,
    clock: PlaybackClock,
    entries_consumed: usize,
    bytes_consumed: u64,
    capture_ended: bool,
}

impl<R: Read> ChunkSupplier<R> {
    pub fn new(entries: impl Into<VecDeque<TimingEntry>>, reader: R) -> Self {
        Self {
            reader,
            entries: entries.into(),
            clock: PlaybackClock::default(),
            entries_consumed: 0,
            bytes_consumed: 0,
            capture_ended: false,
        }
    }

    /// Produce the next chunk, or `None` once playback is over.
    ///
    /// Playback ends when the timing entries run out (remaining capture bytes
    /// have no timestamp and are left unread) or when the capture ends before
    /// an entry is satisfied. The short read in the latter case is still
    /// returned so its bytes are not lost.
    pub fn next_chunk(&mut self) -> io::Result<Option<Chunk>> {
        if self.capture_ended {
            return Ok(None);
        }

        if self.clock.pending == 0 {
            let Some(entry) = self.entries.pop_front() else {
                debug!(
                    entries = self.entries_consumed,
                    bytes = self.bytes_consumed,
                    "timing entries exhausted"
                );
                return Ok(None);
            };
            self.clock.begin(&entry);
            self.entries_consumed += 1;

            if entry.byte_count == 0 {
                return Ok(Some(Chunk {
                    elapsed: self.clock.elapsed,
                    bytes: Vec::new(),
                }));
            }
        }

        let want = self.clock.pending.min(MAX_SLICE_BYTES as u64);
        let mut bytes = Vec::with_capacity(want as usize);
        let read = (&mut self.reader).take(want).read_to_end(&mut bytes)? as u64;

        self.clock.pending -= read;
        self.bytes_consumed += read;

        if read < want {
            debug!(
                missing = self.clock.pending,
                remaining_entries = self.entries.len(),
                "capture ended before timing entries were satisfied"
            );
            self.capture_ended = true;
            self.clock.pending = 0;
        }

        Ok(Some(Chunk {
            elapsed: self.clock.elapsed,
            bytes,
        }))
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    /// Number of timing entries started so far.
    pub fn entries_consumed(&self) -> usize {
        self.entries_consumed
    }

    /// Number of capture bytes read so far.
    pub fn bytes_consumed(&self) -> u64 {
        self.bytes_consumed
    }

    /// Whether the capture ran out before the timing entries did.
    pub fn capture_ended_early(&self) -> bool {
        self.capture_ended
    }
}
