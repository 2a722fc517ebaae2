//! Version synchronization workflow.
//!
//! Drives one release negotiation end to end: load the anchored version
//! fields, confirm the branch, compute a candidate from conventional commit
//! history, let the operator accept or override it, then persist the file,
//! the changelog and the release commit/tag. A declined confirmation aborts
//! immediately; writes already applied stay applied.

use crate::changelog;
use crate::config::Config;
use crate::conventional;
use crate::domain::tag::ReleaseTag;
use crate::domain::tweak::Tweak;
use crate::domain::version::Version;
use crate::error::{RelsyncError, Result};
use crate::git::Repository;
use crate::prompt::Prompt;
use crate::ui;
use crate::vfile::VersionFile;
use chrono::NaiveDate;
use std::path::Path;

/// Immutable record of one negotiated version move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionChange {
    pub old: Version,
    pub new: Version,
}

impl VersionChange {
    /// Whether any field actually moved
    pub fn changed(&self) -> bool {
        self.old != self.new
    }
}

/// What one synchronizer run did
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub change: VersionChange,
    pub tag: Option<String>,
    pub wrote_version_file: bool,
    pub wrote_changelog: bool,
    pub committed: bool,
    pub tagged: bool,
}

/// Run the full synchronization workflow.
pub fn run_sync(
    config: &Config,
    repo: &dyn Repository,
    prompt: &dyn Prompt,
    quiet: bool,
    today: NaiveDate,
) -> Result<SyncOutcome> {
    let workdir = repo.workdir()?;
    config.validate_paths(&workdir)?;
    let labels = &config.tweak.labels;

    // Loaded
    let mut vfile = VersionFile::load(&config.version_file_path(), &config.anchors.as_map())?;
    let current = load_current_version(&vfile, labels)?;

    // BranchConfirmed
    let branch = repo.current_branch()?;
    if !prompt.confirm(&format!("Release from branch '{}'?", branch), true)? {
        return Err(RelsyncError::aborted(format!(
            "branch '{}' not confirmed",
            branch
        )));
    }

    // ChangelogPlanNegotiated
    let update_changelog = prompt.confirm(
        &format!("Update changelog '{}'?", config.changelog),
        config.defaults.update_changelog,
    )?;

    // AutoCandidateComputed
    let latest_tag = repo.latest_tag()?;
    let commits = repo.commits_since(latest_tag.as_deref())?;
    if !quiet {
        ui::display_commit_summary(&commits, latest_tag.as_deref());
    }

    let head_hash = repo.head_hash()?;
    let short_hash = &head_hash[..10.min(head_hash.len())];

    // An empty history gives nothing to derive a bump from; the candidate
    // stays where the file is and the run becomes a no-op.
    let candidate = if commits.is_empty() {
        current.clone()
    } else {
        let bump = conventional::determine_version_bump(&commits);
        let mut candidate = current.bump(&bump)?;
        let advanced = match &current.tweak {
            Some(tweak) => Some(tweak.advanced(today)?),
            None => None,
        };
        candidate.tweak = attach_hash(&current.tweak, advanced, short_hash);
        candidate
    };

    // UserOverrideOrAccepted
    if !quiet {
        ui::display_proposed_version(&current, &candidate);
    }
    let accepted = prompt.confirm(&format!("Accept computed version {}?", candidate), true)?;
    let negotiated = if accepted {
        candidate
    } else {
        override_fields(prompt, &candidate, &current.tweak, labels, short_hash)?
    };

    // Validated
    let rendered = negotiated.to_string();
    semver::Version::parse(&rendered).map_err(|e| {
        RelsyncError::version(format!(
            "'{}' is not a valid semantic version: {}",
            rendered, e
        ))
    })?;

    let change = VersionChange {
        old: current,
        new: negotiated,
    };

    let tag = if change.changed() {
        Some(ReleaseTag::select_unique(&change.new, &repo.list_tags()?)?)
    } else {
        if !quiet {
            ui::display_status("Version unchanged; nothing to release.");
        }
        None
    };

    // Persisted
    stage_fields(&mut vfile, &change, repo, short_hash)?;

    let wrote_version_file = if vfile.is_dirty() {
        let question = format!(
            "Update {} in '{}' for version {}?",
            vfile.dirty_fields().join(", "),
            config.version_file_path().display(),
            change.new
        );
        if !prompt.confirm(&question, true)? {
            return Err(RelsyncError::aborted("version file write declined"));
        }
        let wrote = vfile.save()?;
        if wrote && !quiet {
            ui::display_success(&format!(
                "Updated {}",
                config.version_file_path().display()
            ));
        }
        wrote
    } else {
        false
    };

    // ChangelogUpdated
    let mut wrote_changelog = false;
    if update_changelog {
        if let Some(tag) = &tag {
            changelog::update_file(&config.changelog_path(), &commits, &tag.name, today)?;
            wrote_changelog = true;
            if !quiet {
                ui::display_success(&format!("Updated {}", config.changelog_path().display()));
            }
        }
    }

    // CommitTagged
    let mut committed = false;
    let mut tagged = false;
    if let Some(tag) = &tag {
        let message = release_message(&tag.name, &config.changelog, latest_tag.as_deref());

        if prompt.confirm("Create release commit?", config.defaults.create_commit)? {
            let mut paths: Vec<&Path> = vec![Path::new(&config.version_file)];
            if wrote_changelog {
                paths.push(Path::new(&config.changelog));
            }
            repo.commit_paths(&paths, &message)?;
            committed = true;
            if !quiet {
                ui::display_success("Created release commit");
            }
        }

        if prompt.confirm(
            &format!("Create annotated tag '{}'?", tag.name),
            config.defaults.create_tag,
        )? {
            repo.create_annotated_tag(&tag.name, &message)?;
            tagged = true;
            if !quiet {
                ui::display_success(&format!("Created tag {}", tag.name));
            }
        }
    }

    Ok(SyncOutcome {
        change,
        tag: tag.map(|t| t.name),
        wrote_version_file,
        wrote_changelog,
        committed,
        tagged,
    })
}

/// Read the current version quadruple out of the loaded field map.
fn load_current_version(vfile: &VersionFile, labels: &[String]) -> Result<Version> {
    let major = parse_numeric_field(vfile, "major")?;
    let minor = parse_numeric_field(vfile, "minor")?;
    let patch = parse_numeric_field(vfile, "patch")?;

    let tweak = match vfile.get("tweak") {
        Some(value) if !value.is_empty() => Some(Tweak::parse(value, labels)?),
        _ => None,
    };

    Ok(Version::new(major, minor, patch).with_tweak(tweak))
}

fn parse_numeric_field(vfile: &VersionFile, name: &str) -> Result<u32> {
    let value = vfile.get_required(name)?;
    value.parse::<u32>().map_err(|_| {
        RelsyncError::version(format!(
            "field '{}' holds '{}', expected a non-negative integer",
            name, value
        ))
    })
}

/// Apply the hash-carry rule to a proposed tweak: a tweak whose label or
/// counter moved gets the current short commit hash appended; an unchanged
/// tweak keeps whatever hash it had. An explicitly supplied hash wins.
fn attach_hash(old: &Option<Tweak>, new: Option<Tweak>, short_hash: &str) -> Option<Tweak> {
    let mut new = new?;
    if new.hash.is_none() {
        new.hash = match old {
            Some(old) if !new.differs_from(old) => old.hash.clone(),
            _ => Some(short_hash.to_string()),
        };
    }
    Some(new)
}

/// Field-by-field override when the operator declines the computed
/// candidate. The tweak answer is revalidated against the configured label
/// vocabulary.
fn override_fields(
    prompt: &dyn Prompt,
    candidate: &Version,
    old_tweak: &Option<Tweak>,
    labels: &[String],
    short_hash: &str,
) -> Result<Version> {
    let major = parse_override(prompt.input("Major", &candidate.major.to_string())?, "major")?;
    let minor = parse_override(prompt.input("Minor", &candidate.minor.to_string())?, "minor")?;
    let patch = parse_override(prompt.input("Patch", &candidate.patch.to_string())?, "patch")?;

    let tweak_default = candidate
        .tweak
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_default();
    let answer = prompt.input("Tweak (empty for none)", &tweak_default)?;
    let tweak = if answer.is_empty() {
        None
    } else {
        Some(Tweak::parse(&answer, labels)?)
    };

    Ok(Version {
        major,
        minor,
        patch,
        tweak: attach_hash(old_tweak, tweak, short_hash),
    })
}

fn parse_override(answer: String, name: &str) -> Result<u32> {
    answer.trim().parse::<u32>().map_err(|_| {
        RelsyncError::version(format!(
            "{} override '{}' is not a non-negative integer",
            name, answer
        ))
    })
}

/// Stage the negotiated fields plus the repo-info fields into the field map.
/// Nothing is written here; [VersionFile::save] decides based on dirtiness.
fn stage_fields(
    vfile: &mut VersionFile,
    change: &VersionChange,
    repo: &dyn Repository,
    short_hash: &str,
) -> Result<()> {
    vfile.set("major", &change.new.major.to_string())?;
    vfile.set("minor", &change.new.minor.to_string())?;
    vfile.set("patch", &change.new.patch.to_string())?;

    let tweak_value = change
        .new
        .tweak
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_default();
    if vfile.get("tweak").is_some() {
        vfile.set("tweak", &tweak_value)?;
    } else if change.new.tweak != change.old.tweak {
        return Err(RelsyncError::vfile(
            "tweak changed but no tweak anchor matched the version file",
        ));
    }

    // Repo-info fields track the release being cut. A run that selects no
    // release must leave them alone, or the run stops being a no-op once the
    // previous release commit has moved HEAD.
    if change.changed() {
        if vfile.get("repo_url").is_some() {
            if let Some(url) = repo.remote_url("origin")? {
                vfile.set("repo_url", &url)?;
            }
        }
        if vfile.get("repo_hash").is_some() {
            vfile.set("repo_hash", short_hash)?;
        }
    }

    Ok(())
}

/// Compose the shared commit/tag message: header plus a body naming the
/// changelog and the previous tag as the history boundary.
fn release_message(tag: &str, changelog: &str, previous_tag: Option<&str>) -> String {
    format!(
        "chore(release): {}\n\nChangelog: {}\nPrevious tag: {}",
        tag,
        changelog,
        previous_tag.unwrap_or("(none)")
    )
}
