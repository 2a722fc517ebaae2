//! Operator prompting.
//!
//! The negotiation algorithm talks to a [Prompt] collaborator instead of the
//! terminal directly, so it runs unchanged under tests and in
//! non-interactive mode.

use crate::error::Result;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Mutex;

/// A question/answer capability with a default per question
pub trait Prompt {
    /// Ask a yes/no question; empty input means the default
    fn confirm(&self, question: &str, default: bool) -> Result<bool>;

    /// Ask for a free-form value; empty input means the default
    fn input(&self, question: &str, default: &str) -> Result<String>;
}

/// Interactive prompt reading from stdin, blocking until the operator
/// answers
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        print!("{} ({}): ", question, hint);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let response = input.trim().to_lowercase();

        if response.is_empty() {
            return Ok(default);
        }
        Ok(response == "y" || response == "yes")
    }

    fn input(&self, question: &str, default: &str) -> Result<String> {
        if default.is_empty() {
            print!("{}: ", question);
        } else {
            print!("{} [{}]: ", question, default);
        }
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let response = input.trim();

        if response.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(response.to_string())
        }
    }
}

/// Non-interactive prompt answering every question with its default.
/// Used for `--non-interactive` and `--testing` runs.
pub struct PresetPrompt;

impl Prompt for PresetPrompt {
    fn confirm(&self, _question: &str, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn input(&self, _question: &str, default: &str) -> Result<String> {
        Ok(default.to_string())
    }
}

/// Scripted prompt for workflow tests: pops pre-loaded answers, falling
/// back to the default once the script runs dry.
pub struct ScriptedPrompt {
    confirms: Mutex<VecDeque<bool>>,
    inputs: Mutex<VecDeque<String>>,
}

impl ScriptedPrompt {
    pub fn new(confirms: Vec<bool>, inputs: Vec<&str>) -> Self {
        ScriptedPrompt {
            confirms: Mutex::new(confirms.into_iter().collect()),
            inputs: Mutex::new(inputs.into_iter().map(|s| s.to_string()).collect()),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, _question: &str, default: bool) -> Result<bool> {
        let answer = self
            .confirms
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front());
        Ok(answer.unwrap_or(default))
    }

    fn input(&self, _question: &str, default: &str) -> Result<String> {
        let answer = self
            .inputs
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front());
        Ok(answer.unwrap_or_else(|| default.to_string()))
    }
}
