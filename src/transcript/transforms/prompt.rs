//! Shell prompt and command recognition.
//!
//! Used to reduce a session to the commands that were run. A line is a
//! bare prompt when it ends in a prompt terminator followed by exactly one
//! space, and a prompt plus command when the terminator and whitespace are
//! followed by text.

use regex::Regex;

/// Prompt terminators: `$`, `#`, `>`, `%`, and case-insensitive `PS>` /
/// `mysql>` (which end in `>` but are listed for clarity).
const TERMINATOR: &str = r"(?:\$|#|>|%|(?i:PS>)|(?i:mysql>))";

/// A line recognised by [`PromptMatcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptLine {
    /// Only a prompt; the value ends with a single space
    Prompt(String),
    /// A prompt (ending with a space) followed by a trimmed command
    Command { prompt: String, command: String },
}

#[derive(Debug, Clone)]
pub struct PromptMatcher {
    prompt_only: Regex,
    with_command: Regex,
}

impl Default for PromptMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptMatcher {
    pub fn new() -> Self {
        let prompt_only = format!(r"^(.*{TERMINATOR} )$");
        // Lazy prefix: the first terminator followed by a command wins, so
        // `$ echo a > b` keeps the redirection in the command
        let with_command = format!(r"^(.*?{TERMINATOR}\s)(\S.*)$");

        Self {
            prompt_only: Regex::new(&prompt_only).expect("prompt pattern should be valid"),
            with_command: Regex::new(&with_command).expect("command pattern should be valid"),
        }
    }

    /// Recognise `line` as a prompt or a prompt plus command.
    pub fn parse(&self, line: &str) -> Option<PromptLine> {
        if self.prompt_only.is_match(line) {
            return Some(PromptLine::Prompt(line.to_string()));
        }

        let caps = self.with_command.captures(line)?;
        let prompt = ensure_trailing_space(&caps[1]);
        let command = caps[2].trim().to_string();

        if command.is_empty() {
            return None;
        }

        Some(PromptLine::Command { prompt, command })
    }
}

fn ensure_trailing_space(prompt: &str) -> String {
    if prompt.ends_with(' ') {
        prompt.to_string()
    } else {
        format!("{} ", prompt.trim_end())
    }
}
