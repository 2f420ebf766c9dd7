//! Conversion orchestration.
//!
//! One pass over the capture: chunks are decoded, stripped and assembled
//! into lines as they arrive, and every line is classified and written
//! immediately. Only one slice and one line are ever held in memory.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

use tracing::debug;

use super::classify::Classifier;
use super::config::TranscriptConfig;
use super::error::{ConfigError, ConvertError, InputRole};
use super::record::{OutputRecord, LINE_ENDING};
use super::timestamp::Timestamps;
use super::transforms::{CaretDecoder, ControlStripper, LineAssembler, Utf8Decoder};
use crate::typescript::{ChunkSupplier, TimingScript, TimingUnit};

/// Summary of a finished conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Timing entries played back
    pub entries: usize,
    /// Malformed timing lines that were skipped
    pub skipped_timing_lines: usize,
    /// Capture bytes consumed
    pub bytes: u64,
    /// Logical lines assembled
    pub lines: usize,
    /// Records written
    pub records: usize,
    /// The capture ended before the timing entries did
    pub capture_ended_early: bool,
    /// Unit the delay column was read in
    pub unit: TimingUnit,
}

/// An opened capture and its decoded timing.
#[derive(Debug)]
pub struct Inputs {
    pub timing: TimingScript,
    pub capture: BufReader<File>,
}

impl Inputs {
    /// Open the capture and decode the timing file.
    pub fn open(capture: &Path, timing: &Path) -> Result<Self, ConvertError> {
        let capture_file = File::open(capture).map_err(|source| ConvertError::InputUnavailable {
            role: InputRole::Capture,
            path: capture.to_path_buf(),
            source,
        })?;
        let timing = TimingScript::load(timing)?;

        Ok(Self {
            timing,
            capture: BufReader::new(capture_file),
        })
    }
}

/// Converts a typescript capture and its timing into transcript records.
#[derive(Debug, Clone)]
pub struct Converter {
    config: TranscriptConfig,
    timestamps: Timestamps,
}

impl Converter {
    pub fn new(config: TranscriptConfig) -> Result<Self, ConfigError> {
        let timestamps =
            Timestamps::new(config.start, config.time_zone, config.absolute_format.clone())?;
        Ok(Self { config, timestamps })
    }

    pub fn config(&self) -> &TranscriptConfig {
        &self.config
    }

    /// Convert files on disk.
    ///
    /// Both inputs are opened before anything is written, so an unavailable
    /// input leaves the sink untouched.
    pub fn convert_files(
        &self,
        capture: &Path,
        timing: &Path,
        sink: impl Write,
    ) -> Result<ConvertStats, ConvertError> {
        let inputs = Inputs::open(capture, timing)?;
        self.convert(inputs.timing, inputs.capture, sink)
    }

    /// Replay `capture` against `timing`, writing one record per surviving line.
    pub fn convert(
        &self,
        timing: TimingScript,
        capture: impl Read,
        sink: impl Write,
    ) -> Result<ConvertStats, ConvertError> {
        let unit = match self.config.timing_unit {
            TimingUnit::Auto => timing.detect_unit(),
            unit => unit,
        };
        let mut stats = ConvertStats {
            skipped_timing_lines: timing.skipped_lines(),
            unit,
            ..ConvertStats::default()
        };
        debug!(
            entries = timing.len(),
            skipped = stats.skipped_timing_lines,
            %unit,
            "timing decoded"
        );

        let mut run = Run {
            converter: self,
            carets: self.config.caret_notation.then(CaretDecoder::new),
            stripper: self.config.strip_control_sequences.then(ControlStripper::new),
            assembler: LineAssembler::new(self.config.carriage_return()),
            classifier: Classifier::new(&self.config),
            sink: BufWriter::new(sink),
            text: String::new(),
            decoded: String::new(),
            visible: String::new(),
            lines: Vec::new(),
            stats: &mut stats,
        };

        let mut supplier = ChunkSupplier::new(timing.into_entries(unit), capture);
        let mut decoder = Utf8Decoder::new();
        let mut last_elapsed = Duration::ZERO;

        while let Some(chunk) = supplier.next_chunk().map_err(ConvertError::Read)? {
            last_elapsed = chunk.elapsed;
            decoder.decode(&chunk.bytes, &mut run.text);
            run.process(chunk.elapsed)?;
        }

        decoder.finish(&mut run.text);
        run.process(last_elapsed)?;
        run.finish(last_elapsed)?;
        run.sink.flush().map_err(ConvertError::Write)?;
        drop(run);

        stats.entries = supplier.entries_consumed();
        stats.bytes = supplier.bytes_consumed();
        stats.capture_ended_early = supplier.capture_ended_early();

        debug!(
            entries = stats.entries,
            bytes = stats.bytes,
            lines = stats.lines,
            records = stats.records,
            "conversion finished"
        );
        Ok(stats)
    }
}

/// Per-conversion state threaded through every chunk.
struct Run<'a, W: Write> {
    converter: &'a Converter,
    carets: Option<CaretDecoder>,
    stripper: Option<ControlStripper>,
    assembler: LineAssembler,
    classifier: Classifier,
    sink: BufWriter<W>,
    /// Decoded text of the current chunk
    text: String,
    /// Text after caret-notation decoding
    decoded: String,
    /// Text left after stripping
    visible: String,
    /// Lines completed by the current chunk
    lines: Vec<String>,
    stats: &'a mut ConvertStats,
}

impl<W: Write> Run<'_, W> {
    /// Push the decoded text through stripping and line assembly. Every line
    /// completed here is stamped with `elapsed`.
    fn process(&mut self, elapsed: Duration) -> Result<(), ConvertError> {
        if self.text.is_empty() {
            return Ok(());
        }

        if let Some(carets) = &mut self.carets {
            carets.feed(&self.text, &mut self.decoded);
            std::mem::swap(&mut self.text, &mut self.decoded);
            self.decoded.clear();
        }

        match &mut self.stripper {
            Some(stripper) => {
                stripper.feed(&self.text, &mut self.visible);
                self.assembler.feed(&self.visible, &mut self.lines);
                self.visible.clear();
            }
            None => self.assembler.feed(&self.text, &mut self.lines),
        }
        self.text.clear();

        let lines = std::mem::take(&mut self.lines);
        for line in &lines {
            self.emit(line, elapsed)?;
        }
        self.lines = lines;
        self.lines.clear();
        Ok(())
    }

    fn finish(&mut self, elapsed: Duration) -> Result<(), ConvertError> {
        // A held `^` is plain text once the capture ends
        if let Some(mut carets) = self.carets.take() {
            carets.finish(&mut self.text);
            self.process(elapsed)?;
        }

        if let Some(stripper) = &mut self.stripper {
            if stripper.finish() {
                debug!("discarded unterminated control sequence at end of capture");
            }
        }

        if let Some(line) = self.assembler.finish() {
            self.emit(&line, elapsed)?;
        }
        Ok(())
    }

    fn emit(&mut self, line: &str, elapsed: Duration) -> Result<(), ConvertError> {
        self.stats.lines += 1;

        let classification = self.classifier.classify(line);
        let Some(content) = classification.content(self.converter.config.prefix_prompt) else {
            return Ok(());
        };

        let timestamps = &self.converter.timestamps;
        let record = OutputRecord {
            relative: timestamps.relative(elapsed),
            absolute: timestamps.absolute(elapsed),
            tag: self.converter.config.tag.clone(),
            content,
        };

        write!(self.sink, "{record}{LINE_ENDING}").map_err(ConvertError::Write)?;
        self.stats.records += 1;
        Ok(())
    }
}
