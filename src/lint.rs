//! Commit message validation.
//!
//! A pure function over the candidate text: no file or repository access.
//! Rules run in a fixed order so every rejection names the rule that failed,
//! and the signed-off-by check runs before format checks so hook glue can
//! tell the two apart when deciding whether to cache the message.

use crate::domain::commit::COMMIT_TYPES;
use regex::Regex;
use thiserror::Error;

/// Advisory maximum line length. Overlong lines warn, never reject.
pub const MAX_LINE_LENGTH: usize = 100;

/// Reason a commit message was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LintError {
    #[error("commit message is empty")]
    EmptyMessage,

    #[error("missing Signed-off-by trailer")]
    MissingSignOff,

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("second line must be blank to separate header from body")]
    MissingSeparator,

    #[error("invalid footer entry: {0}")]
    InvalidFooter(String),
}

/// Validator options
#[derive(Debug, Clone, Default)]
pub struct LintOptions {
    /// Require a `Signed-off-by:` trailer
    pub require_signoff: bool,
}

/// Outcome of a successful validation
#[derive(Debug, Clone, Default)]
pub struct LintReport {
    /// Advisory findings (overlong lines); never cause rejection
    pub warnings: Vec<String>,
}

/// Remove comment lines (starting with `#`) from a candidate message.
pub fn strip_comments(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validate a candidate commit message against the message grammar.
pub fn lint_message(text: &str, opts: &LintOptions) -> Result<LintReport, LintError> {
    let stripped = strip_comments(text);
    let mut lines: Vec<&str> = stripped.lines().collect();

    // Leading and trailing blank lines carry no information
    while lines.first().map_or(false, |l| l.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().map_or(false, |l| l.trim().is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        return Err(LintError::EmptyMessage);
    }

    if opts.require_signoff
        && !lines
            .iter()
            .any(|line| line.trim_start().starts_with("Signed-off-by:"))
    {
        return Err(LintError::MissingSignOff);
    }

    check_header(lines[0])?;

    if lines.len() > 1 && !lines[1].trim().is_empty() {
        return Err(LintError::MissingSeparator);
    }

    check_footer(&lines)?;

    let warnings = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.chars().count() > MAX_LINE_LENGTH)
        .map(|(i, _)| {
            format!(
                "line {} exceeds {} characters (recommendation only)",
                i + 1,
                MAX_LINE_LENGTH
            )
        })
        .collect();

    Ok(LintReport { warnings })
}

/// Validate the `<type>(<scope>): <subject>` header line.
fn check_header(header: &str) -> Result<(), LintError> {
    let captures = Regex::new(r"^([^(:\s]+)(?:\(([^)]*)\))?: (.*)$")
        .ok()
        .and_then(|re| re.captures(header))
        .ok_or_else(|| {
            LintError::MalformedHeader(format!(
                "'{}' does not match '<type>(<scope>): <subject>'",
                header
            ))
        })?;

    let r#type = captures.get(1).map(|m| m.as_str()).unwrap_or("");
    let scope = captures.get(2).map(|m| m.as_str());
    let subject = captures.get(3).map(|m| m.as_str()).unwrap_or("");

    if !COMMIT_TYPES.contains(&r#type) {
        return Err(LintError::MalformedHeader(format!(
            "unknown type '{}' (expected one of: {})",
            r#type,
            COMMIT_TYPES.join(", ")
        )));
    }

    if let Some(scope) = scope {
        let single_word = Regex::new(r"^\w+$")
            .ok()
            .map_or(false, |re| re.is_match(scope));
        if scope != "*" && !single_word {
            return Err(LintError::MalformedHeader(format!(
                "scope '{}' must be a single word or '*'",
                scope
            )));
        }
    }

    if subject.is_empty() {
        return Err(LintError::MalformedHeader("empty subject".to_string()));
    }
    if subject.ends_with('.') {
        return Err(LintError::MalformedHeader(format!(
            "subject '{}' must not end with '.'",
            subject
        )));
    }
    if subject.chars().next().map_or(false, |c| c.is_uppercase()) {
        return Err(LintError::MalformedHeader(format!(
            "subject '{}' must not start with an uppercase letter",
            subject
        )));
    }

    Ok(())
}

/// Validate the footer block, if the message ends with one.
///
/// The footer is the last blank-line-separated block when its first line
/// opens with `[`. Every line of that block must start with a recognized
/// footer token.
fn check_footer(lines: &[&str]) -> Result<(), LintError> {
    let blocks: Vec<Vec<&str>> = lines
        .split(|line| line.trim().is_empty())
        .filter(|block| !block.is_empty())
        .map(|block| block.to_vec())
        .collect();

    if blocks.len() < 2 {
        return Ok(());
    }

    let last = match blocks.last() {
        Some(block) if block[0].starts_with('[') => block,
        _ => return Ok(()),
    };

    let token = Regex::new(r"^\[(CLOSE|KNOWN ISSUE|BREAKING CHANGES)(#[1-9][0-9]*)?\]").ok();
    for line in last {
        let matched = token.as_ref().map_or(false, |re| re.is_match(line));
        if !matched {
            return Err(LintError::InvalidFooter(line.to_string()));
        }
    }

    Ok(())
}
