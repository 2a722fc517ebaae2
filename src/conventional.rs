//! Version bump derivation from conventional commit history.

use crate::domain::commit::ParsedCommit;
use crate::domain::version::VersionBump;
use crate::git::CommitInfo;

/// Decide the bump for a release from the commits since the last tag.
///
/// Breaking markers (`break` type, `!`, `BREAKING CHANGE(S)`) force a major
/// bump, `feat` a minor one, `fix` (and fix-like types) a patch. With no
/// conventional signal at all the release still moves the patch number.
pub fn determine_version_bump(commits: &[CommitInfo]) -> VersionBump {
    let mut has_features = false;
    let mut has_fixes = false;

    for commit in commits {
        let parsed = ParsedCommit::parse(&commit.message);

        if parsed.is_breaking_change {
            return VersionBump::Major;
        }

        match parsed.r#type.as_str() {
            "feat" => has_features = true,
            "fix" | "perf" | "refactor" => has_fixes = true,
            _ => {}
        }
    }

    if has_features {
        VersionBump::Minor
    } else if has_fixes {
        VersionBump::Patch
    } else {
        VersionBump::Patch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(message: &str) -> CommitInfo {
        CommitInfo {
            hash: "ab12cd34ef".to_string(),
            message: message.to_string(),
            author: "A Dev".to_string(),
        }
    }

    #[test]
    fn test_feat_gives_minor() {
        let commits = vec![
            commit("feat: add new authentication system"),
            commit("fix: resolve login issue"),
        ];
        assert_eq!(determine_version_bump(&commits), VersionBump::Minor);
    }

    #[test]
    fn test_fix_gives_patch() {
        let commits = vec![commit("fix: resolve login issue"), commit("docs: typo")];
        assert_eq!(determine_version_bump(&commits), VersionBump::Patch);
    }

    #[test]
    fn test_breaking_gives_major() {
        let commits = vec![
            commit("feat: new api"),
            commit("break: remove old endpoint"),
        ];
        assert_eq!(determine_version_bump(&commits), VersionBump::Major);

        let commits = vec![commit("feat!: redesign everything")];
        assert_eq!(determine_version_bump(&commits), VersionBump::Major);

        let commits = vec![commit("fix: small thing\n\n[BREAKING CHANGES] wire format")];
        assert_eq!(determine_version_bump(&commits), VersionBump::Major);
    }

    #[test]
    fn test_no_signal_defaults_to_patch() {
        let commits = vec![commit("chore: bump deps"), commit("Update README")];
        assert_eq!(determine_version_bump(&commits), VersionBump::Patch);
    }

    #[test]
    fn test_empty_history_defaults_to_patch() {
        assert_eq!(determine_version_bump(&[]), VersionBump::Patch);
    }
}
