//! scriptlog - turn script(1) typescripts into timestamped transcripts
//!
//! A typescript recorded with `script --timing=NAME.timing NAME` is replayed
//! chunk by chunk. Control sequences are stripped, backspace and
//! carriage-return redraws are emulated, noise lines are dropped, and every
//! remaining line is written as `relative,absolute,tag,content`.

pub mod cli;
pub mod config;
pub mod transcript;
pub mod typescript;

pub use config::Config;
pub use transcript::{
    Classification, Classifier, ConfigError, ConvertError, ConvertStats, Converter, ExtractionMode,
    InputRole, Inputs, OutputRecord, TranscriptConfig,
};
pub use typescript::{ChunkSupplier, TimingEntry, TimingScript, TimingUnit};
