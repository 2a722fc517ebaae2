//! End-to-end synchronization runs against a mock repository and a real
//! anchored version file on disk.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use relsync::config::{AnchorsConfig, Config, DefaultsConfig, LintConfig, TweakConfig, Vcs};
use relsync::git::MockRepository;
use relsync::prompt::{PresetPrompt, ScriptedPrompt};
use relsync::sync::run_sync;
use relsync::RelsyncError;

const VERSION_FILE: &str = "RepoInfo.cc";

const VFILE_123: &str = r#"// Generated fields, edited in place by sync-release
const std::string RepoInfo::repoHash = "deadbeef00";
#define VERSION_MAJOR 1
#define VERSION_MINOR 2
#define VERSION_PATCH 3
"#;

const VFILE_130_SYNCED: &str = r#"// Generated fields, edited in place by sync-release
const std::string RepoInfo::repoHash = "ab12cd34ef";
#define VERSION_MAJOR 1
#define VERSION_MINOR 3
#define VERSION_PATCH 0
"#;

const VFILE_123_RC1: &str = r#"const std::string RepoInfo::repoHash = "deadbeef00";
#define VERSION_MAJOR 1
#define VERSION_MINOR 2
#define VERSION_PATCH 3
#define VERSION_TWEAK "rc.1"
"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
}

fn fixture(contents: &str) -> (TempDir, MockRepository) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(VERSION_FILE), contents).unwrap();
    let repo = MockRepository::new(dir.path());
    (dir, repo)
}

fn config(root: &Path, with_tweak: bool) -> Config {
    Config {
        repo_dir: root.to_string_lossy().to_string(),
        vcs: Vcs::Git,
        version_file: VERSION_FILE.to_string(),
        changelog: "CHANGELOG.md".to_string(),
        anchors: AnchorsConfig {
            major: "#define VERSION_MAJOR".to_string(),
            minor: "#define VERSION_MINOR".to_string(),
            patch: "#define VERSION_PATCH".to_string(),
            tweak: with_tweak.then(|| "#define VERSION_TWEAK".to_string()),
            repo_url: None,
            repo_hash: Some("RepoInfo::repoHash =".to_string()),
        },
        tweak: TweakConfig::default(),
        lint: LintConfig::default(),
        defaults: DefaultsConfig::default(),
    }
}

#[test]
fn test_feat_commit_releases_minor() {
    let (dir, mut repo) = fixture(VFILE_123);
    repo.add_commit("feat(parser): add incremental scan");
    repo.add_commit("fix: handle empty input");
    let config = config(dir.path(), false);

    let outcome = run_sync(&config, &repo, &PresetPrompt, true, today()).unwrap();

    assert_eq!(outcome.change.old.to_string(), "1.2.3");
    assert_eq!(outcome.change.new.to_string(), "1.3.0");
    assert_eq!(outcome.tag.as_deref(), Some("v1.3.0"));
    assert!(outcome.wrote_version_file);
    assert!(outcome.wrote_changelog);
    assert!(outcome.committed);
    assert!(outcome.tagged);

    let written = fs::read_to_string(dir.path().join(VERSION_FILE)).unwrap();
    assert!(written.contains("#define VERSION_MAJOR 1\n"));
    assert!(written.contains("#define VERSION_MINOR 3\n"));
    assert!(written.contains("#define VERSION_PATCH 0\n"));
    assert!(written.contains("RepoInfo::repoHash = \"ab12cd34ef\";\n"));

    let changelog = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
    assert!(changelog.starts_with("## v1.3.0 (2026-08-30)"));
    assert!(changelog.contains("- **parser**: add incremental scan"));

    assert_eq!(repo.created_tags(), vec!["v1.3.0".to_string()]);
    let messages = repo.commit_messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("chore(release): v1.3.0\n\n"));
    assert!(messages[0].contains("Previous tag: (none)"));
}

#[test]
fn test_second_run_with_no_new_commits_writes_nothing() {
    let (dir, mut repo) = fixture(VFILE_130_SYNCED);
    repo.add_tag("v1.3.0");
    let config = config(dir.path(), false);

    let before = fs::read_to_string(dir.path().join(VERSION_FILE)).unwrap();
    let outcome = run_sync(&config, &repo, &PresetPrompt, true, today()).unwrap();

    assert!(!outcome.change.changed());
    assert_eq!(outcome.tag, None);
    assert!(!outcome.wrote_version_file);
    assert!(!outcome.wrote_changelog);
    assert!(!outcome.committed);
    assert!(!outcome.tagged);

    let after = fs::read_to_string(dir.path().join(VERSION_FILE)).unwrap();
    assert_eq!(before, after);
    assert!(repo.created_tags().is_empty());
    assert!(repo.commit_messages().is_empty());
    assert!(!dir.path().join("CHANGELOG.md").exists());
}

#[test]
fn test_no_op_run_leaves_stale_repo_hash_alone() {
    // After a release the release commit itself moves HEAD, so the file's
    // recorded hash is one commit behind. A run that selects no release
    // must not touch it.
    let stale = VFILE_130_SYNCED.replace("ab12cd34ef", "deadbeef00");
    let (dir, mut repo) = fixture(&stale);
    repo.add_tag("v1.3.0");
    let config = config(dir.path(), false);

    let outcome = run_sync(&config, &repo, &PresetPrompt, true, today()).unwrap();

    assert_eq!(outcome.tag, None);
    assert!(!outcome.wrote_version_file);

    let after = fs::read_to_string(dir.path().join(VERSION_FILE)).unwrap();
    assert_eq!(after, stale);
    assert!(repo.created_tags().is_empty());
    assert!(repo.commit_messages().is_empty());
}

#[test]
fn test_tweak_advances_and_falls_back_to_full_tag() {
    let (dir, mut repo) = fixture(VFILE_123_RC1);
    repo.add_tag("v1.3.0");
    repo.add_commit("feat: another pass at the scanner");
    let config = config(dir.path(), true);

    let outcome = run_sync(&config, &repo, &PresetPrompt, true, today()).unwrap();

    // rc.1 -> rc.2, short tag v1.3.0 is taken, so the full form wins
    assert_eq!(outcome.change.new.to_string(), "1.3.0-rc.2+ab12cd34ef");
    assert_eq!(outcome.tag.as_deref(), Some("v1.3.0-rc.2+ab12cd34ef"));

    let written = fs::read_to_string(dir.path().join(VERSION_FILE)).unwrap();
    assert!(written.contains("#define VERSION_TWEAK \"rc.2+ab12cd34ef\"\n"));
    assert_eq!(
        repo.created_tags(),
        vec!["v1.3.0-rc.2+ab12cd34ef".to_string()]
    );
}

#[test]
fn test_override_replaces_computed_candidate() {
    let (dir, mut repo) = fixture(VFILE_123);
    repo.add_commit("fix: patch-level change");
    let config = config(dir.path(), false);

    // branch yes, changelog no, reject the candidate, then let the
    // remaining confirmations fall back to their defaults
    let prompt = ScriptedPrompt::new(vec![true, false, false], vec!["2", "0", "0", ""]);
    let outcome = run_sync(&config, &repo, &prompt, true, today()).unwrap();

    assert_eq!(outcome.change.new.to_string(), "2.0.0");
    assert_eq!(outcome.tag.as_deref(), Some("v2.0.0"));
    assert!(!outcome.wrote_changelog);
    assert!(outcome.committed);
    assert_eq!(repo.created_tags(), vec!["v2.0.0".to_string()]);
}

#[test]
fn test_declined_branch_aborts_before_any_write() {
    let (dir, mut repo) = fixture(VFILE_123);
    repo.add_commit("feat: never released");
    let config = config(dir.path(), false);

    let prompt = ScriptedPrompt::new(vec![false], vec![]);
    let err = run_sync(&config, &repo, &prompt, true, today()).unwrap_err();
    assert!(matches!(err, RelsyncError::Aborted(_)));

    let after = fs::read_to_string(dir.path().join(VERSION_FILE)).unwrap();
    assert_eq!(after, VFILE_123);
    assert!(repo.created_tags().is_empty());
}

#[test]
fn test_declined_write_aborts() {
    let (dir, mut repo) = fixture(VFILE_123);
    repo.add_commit("feat: held back");
    let config = config(dir.path(), false);

    // branch yes, changelog yes, accept candidate, decline the file write
    let prompt = ScriptedPrompt::new(vec![true, true, true, false], vec![]);
    let err = run_sync(&config, &repo, &prompt, true, today()).unwrap_err();
    assert!(matches!(err, RelsyncError::Aborted(_)));

    let after = fs::read_to_string(dir.path().join(VERSION_FILE)).unwrap();
    assert_eq!(after, VFILE_123);
    assert!(repo.commit_messages().is_empty());
}

#[test]
fn test_previous_tag_named_in_release_message() {
    let (dir, mut repo) = fixture(VFILE_123);
    repo.add_tag("v1.2.3");
    repo.add_commit("fix: follow-up");
    let config = config(dir.path(), false);

    let outcome = run_sync(&config, &repo, &PresetPrompt, true, today()).unwrap();
    assert_eq!(outcome.tag.as_deref(), Some("v1.2.4"));

    let messages = repo.commit_messages();
    assert!(messages[0].contains("Previous tag: v1.2.3"));
}
