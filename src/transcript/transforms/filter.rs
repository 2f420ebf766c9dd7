//! Line-level noise filters.
//!
//! A raw session is full of lines that carry no transcript value: login
//! banners, full-screen editor chrome, `~` filler rows and box-drawing
//! frames. Each filter looks at a trimmed copy of the line and can
//! independently disqualify it; the line itself is never modified.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Why a line was treated as noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseKind {
    /// Empty or whitespace-only
    Blank,
    /// Login banner, MOTD or script(1) start/end marker
    Banner,
    /// Full-screen editor mode or status line
    EditorStatus,
    /// Only filler characters (`~` rows of an editor)
    Fill,
    /// Dominated by box-drawing and block glyphs
    BoxDrawing,
}

/// Which filters are active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub blank_lines: bool,
    pub banners: bool,
    pub editor_status: bool,
    pub fill_lines: bool,
    pub box_drawing: bool,
    /// Share of box-drawing glyphs above which a line is dropped
    pub box_drawing_ratio: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            blank_lines: true,
            banners: true,
            editor_status: true,
            fill_lines: true,
            box_drawing: true,
            box_drawing_ratio: 0.3,
        }
    }
}

impl FilterConfig {
    /// Every filter switched off.
    pub fn disabled() -> Self {
        Self {
            blank_lines: false,
            banners: false,
            editor_status: false,
            fill_lines: false,
            box_drawing: false,
            ..Self::default()
        }
    }
}

const BANNER_PATTERN: &str = concat!(
    r"(?i)^(?:\[?BEGIN\s+TYPESCRIPT\]?|\[?END\s+TYPESCRIPT\]?",
    r"|script\s+(?:started|done)\s+on\b",
    r"|welcome\s+to\s+ubuntu|debian\s+gnu/linux",
    r"|documentation:|management:|support:|last\s+login:",
    r"|the\s+programs\s+included\s+with\s+the\s+debian",
    r"|\*\s+.+)",
);

const EDITOR_MODE_PATTERN: &str =
    r"(?:^|\s)--\s+(?:INSERT|REPLACE|VISUAL(?:\s+LINE|\s+BLOCK)?)\s+--(?:\s|$)";

const EDITOR_NEW_FILE_PATTERN: &str = r#"^"[^"]+"\s*\[(?:New File|New)\]$"#;

const EDITOR_FILE_STATS_PATTERN: &str =
    r#"^"[^"]+"\s*(?:\[[^\]]+\]\s*)?\d+L,\s*\d+B(?:\s+written)?$"#;

const FILL_PATTERN: &str = r"^[\s~]+$";

/// Applies the configured noise filters.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    config: FilterConfig,
    banner: Regex,
    editor_mode: Regex,
    editor_new_file: Regex,
    editor_file_stats: Regex,
    fill: Regex,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl NoiseFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            banner: Regex::new(BANNER_PATTERN).expect("banner pattern should be valid"),
            editor_mode: Regex::new(EDITOR_MODE_PATTERN)
                .expect("editor mode pattern should be valid"),
            editor_new_file: Regex::new(EDITOR_NEW_FILE_PATTERN)
                .expect("editor new-file pattern should be valid"),
            editor_file_stats: Regex::new(EDITOR_FILE_STATS_PATTERN)
                .expect("editor file-stats pattern should be valid"),
            fill: Regex::new(FILL_PATTERN).expect("fill pattern should be valid"),
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Classify `line`, returning the first matching kind of noise.
    pub fn check(&self, line: &str) -> Option<NoiseKind> {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return self.config.blank_lines.then_some(NoiseKind::Blank);
        }
        if self.config.banners && self.banner.is_match(trimmed) {
            return Some(NoiseKind::Banner);
        }
        if self.config.editor_status && self.is_editor_status(trimmed) {
            return Some(NoiseKind::EditorStatus);
        }
        if self.config.fill_lines && self.fill.is_match(trimmed) {
            return Some(NoiseKind::Fill);
        }
        if self.config.box_drawing
            && self.box_drawing_share(trimmed) > self.config.box_drawing_ratio
        {
            return Some(NoiseKind::BoxDrawing);
        }

        None
    }

    fn is_editor_status(&self, trimmed: &str) -> bool {
        self.editor_mode.is_match(trimmed)
            || self.editor_new_file.is_match(trimmed)
            || self.editor_file_stats.is_match(trimmed)
    }

    fn box_drawing_share(&self, trimmed: &str) -> f64 {
        let mut total = 0usize;
        let mut boxed = 0usize;
        for c in trimmed.chars() {
            total += 1;
            if is_box_drawing(c) {
                boxed += 1;
            }
        }

        if boxed == 0 {
            0.0
        } else {
            boxed as f64 / total as f64
        }
    }
}

/// Box Drawing (U+2500..U+257F) and Block Elements (U+2580..U+259F).
fn is_box_drawing(c: char) -> bool {
    ('\u{2500}'..='\u{259f}').contains(&c)
}
