//! Per-line classification.
//!
//! The classifier owns all cross-line state of a run: how many lines have
//! been seen, whether the skip marker is still pending, and the most recent
//! shell prompt. Each completed line is classified exactly once, in order.

use tracing::trace;

use super::config::{ExtractionMode, TranscriptConfig};
use super::transforms::{NoiseFilter, NoiseKind, PromptLine, PromptMatcher};

/// Outcome of classifying one logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Discarded by `skip_leading_lines` or `skip_until_marker`
    Skipped,
    /// Rejected by a noise filter
    Noise(NoiseKind),
    /// A bare prompt (prompt-command mode); updates the current prompt
    Prompt,
    /// A prompt followed by a command (prompt-command mode)
    Command { prompt: String, command: String },
    /// A line kept verbatim (full-line mode)
    Line(String),
    /// Neither prompt nor command (prompt-command mode)
    Discarded,
}

impl Classification {
    /// Record content for this line, if it produces a record.
    pub fn content(&self, prefix_prompt: bool) -> Option<String> {
        match self {
            Self::Line(line) => Some(line.clone()),
            Self::Command { prompt, command } if prefix_prompt => {
                Some(format!("{prompt}{command}"))
            }
            Self::Command { command, .. } => Some(command.clone()),
            _ => None,
        }
    }
}

/// Stateful line classifier for one conversion run.
#[derive(Debug)]
pub struct Classifier {
    mode: ExtractionMode,
    skip_leading_lines: usize,
    marker: Option<String>,
    noise: NoiseFilter,
    prompts: PromptMatcher,
    lines_seen: usize,
    awaiting_marker: bool,
    current_prompt: Option<String>,
}

impl Classifier {
    pub fn new(config: &TranscriptConfig) -> Self {
        // An empty marker would match the first line; treat it as unset
        let marker = config.skip_until_marker.clone().filter(|m| !m.is_empty());

        Self {
            mode: config.extraction_mode,
            skip_leading_lines: config.skip_leading_lines,
            awaiting_marker: marker.is_some(),
            marker,
            noise: NoiseFilter::new(config.filters.clone()),
            prompts: PromptMatcher::new(),
            lines_seen: 0,
            current_prompt: None,
        }
    }

    /// The prompt of the most recent prompt or command line.
    pub fn current_prompt(&self) -> Option<&str> {
        self.current_prompt.as_deref()
    }

    /// Number of completed lines classified so far.
    pub fn lines_seen(&self) -> usize {
        self.lines_seen
    }

    pub fn classify(&mut self, line: &str) -> Classification {
        let outcome = self.classify_inner(line);
        trace!(line = self.lines_seen, ?outcome, "classified");
        outcome
    }

    fn classify_inner(&mut self, line: &str) -> Classification {
        self.lines_seen += 1;

        if self.lines_seen <= self.skip_leading_lines {
            return Classification::Skipped;
        }

        if self.awaiting_marker {
            if let Some(marker) = &self.marker {
                if line.contains(marker.as_str()) {
                    self.awaiting_marker = false;
                }
            }
            return Classification::Skipped;
        }

        if let Some(kind) = self.noise.check(line) {
            return Classification::Noise(kind);
        }

        match self.mode {
            ExtractionMode::FullLine => Classification::Line(line.to_string()),
            ExtractionMode::PromptCommand => match self.prompts.parse(line) {
                Some(PromptLine::Prompt(prompt)) => {
                    self.current_prompt = Some(prompt);
                    Classification::Prompt
                }
                Some(PromptLine::Command { prompt, command }) => {
                    self.current_prompt = Some(prompt.clone());
                    Classification::Command { prompt, command }
                }
                None => Classification::Discarded,
            },
        }
    }
}
