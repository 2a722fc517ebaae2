//! Terminal output helpers shared by both binaries.

use crate::domain::version::Version;
use crate::git::CommitInfo;
use console::style;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), message);
}

/// Show the commits feeding the version negotiation, newest last.
pub fn display_commit_summary(commits: &[CommitInfo], since: Option<&str>) {
    match since {
        Some(tag) => println!(
            "\n{}",
            style(format!("Commits since tag '{}':", tag)).bold()
        ),
        None => println!("\n{}", style("Commits (no previous tag):").bold()),
    }

    for commit in commits.iter().take(10) {
        let first_line = commit.message.lines().next().unwrap_or("");
        let short: String = first_line.chars().take(60).collect();
        let abbrev: String = commit.hash.chars().take(7).collect();
        println!("  {} {}", style(abbrev).cyan(), short);
    }

    if commits.len() > 10 {
        println!("  ... and {} more commits", commits.len() - 10);
    }
}

/// Show old and new value side by side for one negotiated field.
pub fn display_field_change(name: &str, old: &str, new: &str) {
    if old == new {
        println!("  {:<6} {}", name, old);
    } else {
        println!(
            "  {:<6} {} {} {}",
            name,
            style(old).red(),
            style("->").dim(),
            style(new).green()
        );
    }
}

/// Full old vs new comparison ahead of the accept/override prompt.
pub fn display_proposed_version(old: &Version, new: &Version) {
    println!("\n{}", style("Proposed version change:").bold());
    display_field_change("major", &old.major.to_string(), &new.major.to_string());
    display_field_change("minor", &old.minor.to_string(), &new.minor.to_string());
    display_field_change("patch", &old.patch.to_string(), &new.patch.to_string());
    let old_tweak = old.tweak.as_ref().map(|t| t.to_string()).unwrap_or_default();
    let new_tweak = new.tweak.as_ref().map(|t| t.to_string()).unwrap_or_default();
    display_field_change("tweak", &old_tweak, &new_tweak);
}
