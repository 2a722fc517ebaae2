//! Changelog generation and placeholder rewriting.
//!
//! Sections are first rendered under a provisional `Unreleased` heading and
//! the final release tag is substituted in afterwards, so the generation step
//! never needs to know which tag form (short or full) won uniqueness.

use crate::domain::commit::ParsedCommit;
use crate::error::Result;
use crate::git::CommitInfo;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

/// Provisional heading used until the release tag is known
pub const UNRELEASED_HEADING: &str = "## Unreleased";

/// Render one changelog section for the given commits, grouped by impact.
pub fn render_section(commits: &[CommitInfo]) -> String {
    let mut breaking = Vec::new();
    let mut features = Vec::new();
    let mut fixes = Vec::new();
    let mut other = Vec::new();

    for commit in commits {
        let parsed = ParsedCommit::parse(&commit.message);
        let scope = parsed
            .scope
            .as_deref()
            .map(|s| format!("**{}**: ", s))
            .unwrap_or_default();
        let entry = format!("- {}{} ({})", scope, parsed.description, commit.hash);

        if parsed.is_breaking_change {
            breaking.push(entry);
        } else {
            match parsed.r#type.as_str() {
                "feat" => features.push(entry),
                "fix" | "perf" => fixes.push(entry),
                _ => other.push(entry),
            }
        }
    }

    let mut out = format!("{}\n", UNRELEASED_HEADING);
    for (title, entries) in [
        ("### Breaking Changes", breaking),
        ("### Features", features),
        ("### Fixes", fixes),
        ("### Other", other),
    ] {
        if entries.is_empty() {
            continue;
        }
        out.push('\n');
        out.push_str(title);
        out.push('\n');
        for entry in entries {
            out.push_str(&entry);
            out.push('\n');
        }
    }
    out
}

/// Replace the first provisional heading with the final release tag and date.
pub fn finalize_placeholder(text: &str, tag: &str, date: NaiveDate) -> String {
    let heading = format!("## {} ({})", tag, date.format("%Y-%m-%d"));
    text.replacen(UNRELEASED_HEADING, &heading, 1)
}

/// Prepend a finalized section for `commits` to the changelog file.
///
/// Creates the file when absent. The previous content follows the new
/// section, separated by a blank line.
pub fn update_file(
    path: &Path,
    commits: &[CommitInfo],
    tag: &str,
    date: NaiveDate,
) -> Result<()> {
    let section = finalize_placeholder(&render_section(commits), tag, date);
    let existing = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let combined = if existing.trim().is_empty() {
        section
    } else {
        format!("{}\n{}", section, existing)
    };

    fs::write(path, combined)?;
    Ok(())
}
