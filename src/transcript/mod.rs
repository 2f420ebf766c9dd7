//! Transcript conversion engine.
//!
//! Turns a replayed typescript into line-oriented records of the form
//! `relative,absolute,tag,content`. The pipeline runs in a single pass:
//!
//! ```text
//! ChunkSupplier -> Utf8Decoder -> ControlStripper -> LineAssembler -> Classifier -> OutputRecord
//! ```
//!
//! # Module Structure
//!
//! - [`config`] - per-run engine configuration
//! - [`transforms`] - stream and line transforms
//! - [`classify`] - skip, noise and prompt classification
//! - [`timestamp`] - relative/absolute timestamp rendering
//! - [`converter`] - orchestration

mod classify;
mod config;
mod converter;
mod error;
mod record;
mod timestamp;
pub mod transforms;

pub use classify::{Classification, Classifier};
pub use config::{ExtractionMode, TranscriptConfig, DEFAULT_ABSOLUTE_FORMAT, DEFAULT_TAG};
pub use converter::{ConvertStats, Converter, Inputs};
pub use error::{ConfigError, ConvertError, InputRole};
pub use record::{OutputRecord, LINE_ENDING};
pub use timestamp::{format_relative, parse_start, parse_time_zone, Timestamps};
