use crate::domain::tweak;
use crate::error::{RelsyncError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Version control system holding the synchronized files
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Vcs {
    Git,
    Svn,
    #[default]
    Auto,
}

/// Complete configuration for relsync.
///
/// `version_file` and the three version anchors are mandatory; everything
/// else has defaults.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_repo_dir")]
    pub repo_dir: String,

    #[serde(default)]
    pub vcs: Vcs,

    /// File carrying the anchored version fields
    pub version_file: String,

    #[serde(default = "default_changelog")]
    pub changelog: String,

    pub anchors: AnchorsConfig,

    #[serde(default)]
    pub tweak: TweakConfig,

    #[serde(default)]
    pub lint: LintConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

fn default_repo_dir() -> String {
    ".".to_string()
}

fn default_changelog() -> String {
    "CHANGELOG.md".to_string()
}

/// Anchor text locating each tracked value inside the version file.
///
/// The anchor is the literal text immediately preceding the value on its
/// line. major/minor/patch are required; the rest are tracked only when an
/// anchor is configured.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnchorsConfig {
    pub major: String,
    pub minor: String,
    pub patch: String,

    #[serde(default)]
    pub tweak: Option<String>,

    #[serde(default)]
    pub repo_url: Option<String>,

    #[serde(default)]
    pub repo_hash: Option<String>,
}

impl AnchorsConfig {
    /// Field-name to anchor-text map for the version file loader
    pub fn as_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("major".to_string(), self.major.clone());
        map.insert("minor".to_string(), self.minor.clone());
        map.insert("patch".to_string(), self.patch.clone());
        if let Some(anchor) = &self.tweak {
            map.insert("tweak".to_string(), anchor.clone());
        }
        if let Some(anchor) = &self.repo_url {
            map.insert("repo_url".to_string(), anchor.clone());
        }
        if let Some(anchor) = &self.repo_hash {
            map.insert("repo_hash".to_string(), anchor.clone());
        }
        map
    }
}

/// Tweak label vocabulary configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TweakConfig {
    #[serde(default = "tweak::default_labels")]
    pub labels: Vec<String>,
}

impl Default for TweakConfig {
    fn default() -> Self {
        TweakConfig {
            labels: tweak::default_labels(),
        }
    }
}

/// Commit message linter configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LintConfig {
    #[serde(default)]
    pub require_signoff: bool,

    /// Where to preserve a rejected message for reuse; caching is off when
    /// unset
    #[serde(default)]
    pub cache_file: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Default answers for the synchronizer's confirmation prompts, used
/// verbatim in non-interactive mode
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DefaultsConfig {
    #[serde(default = "default_true")]
    pub update_changelog: bool,

    #[serde(default = "default_true")]
    pub create_commit: bool,

    #[serde(default = "default_true")]
    pub create_tag: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            update_changelog: true,
            create_commit: true,
            create_tag: true,
        }
    }
}

impl Config {
    /// Path of the version file, relative paths resolved under `repo_dir`
    pub fn version_file_path(&self) -> PathBuf {
        Path::new(&self.repo_dir).join(&self.version_file)
    }

    /// Path of the changelog, relative paths resolved under `repo_dir`
    pub fn changelog_path(&self) -> PathBuf {
        Path::new(&self.repo_dir).join(&self.changelog)
    }

    /// Reject configurations pointing outside the repository.
    ///
    /// `workdir` is the root reported by the VCS. The configured repo_dir
    /// must resolve to it, and the version file (and changelog, when it
    /// already exists) must live underneath it.
    pub fn validate_paths(&self, workdir: &Path) -> Result<()> {
        let workdir = fs::canonicalize(workdir).map_err(|e| {
            RelsyncError::config(format!("cannot resolve '{}': {}", workdir.display(), e))
        })?;
        let repo_dir = fs::canonicalize(&self.repo_dir).map_err(|e| {
            RelsyncError::config(format!("cannot resolve repo_dir '{}': {}", self.repo_dir, e))
        })?;

        if repo_dir != workdir {
            return Err(RelsyncError::config(format!(
                "repository root mismatch: configured '{}', actual '{}'",
                repo_dir.display(),
                workdir.display()
            )));
        }

        let version_file = fs::canonicalize(self.version_file_path()).map_err(|_| {
            RelsyncError::config(format!(
                "version file not found: {}",
                self.version_file_path().display()
            ))
        })?;
        if !version_file.starts_with(&workdir) {
            return Err(RelsyncError::config(format!(
                "version file outside repository: {}",
                version_file.display()
            )));
        }

        let changelog = self.changelog_path();
        if changelog.exists() {
            let changelog = fs::canonicalize(&changelog)?;
            if !changelog.starts_with(&workdir) {
                return Err(RelsyncError::config(format!(
                    "changelog outside repository: {}",
                    changelog.display()
                )));
            }
        }

        Ok(())
    }
}

/// Locate and parse a configuration file, if one can be found.
///
/// Lookup order: explicit path (missing is an error), `./relsync.toml`,
/// then `relsync.toml` in the user config directory. `Ok(None)` means no
/// file was found anywhere.
pub fn discover_config(config_path: Option<&str>) -> Result<Option<Config>> {
    let path = if let Some(path) = config_path {
        let path = PathBuf::from(path);
        if !path.exists() {
            return Err(RelsyncError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        path
    } else if Path::new("./relsync.toml").exists() {
        PathBuf::from("./relsync.toml")
    } else if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("relsync.toml");
        if !path.exists() {
            return Ok(None);
        }
        path
    } else {
        return Ok(None);
    };

    let text = fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&text)
        .map_err(|e| RelsyncError::config(format!("{}: {}", path.display(), e)))?;
    Ok(Some(config))
}

/// Like [discover_config], but a missing configuration is fatal (the
/// synchronizer cannot run without anchors).
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    discover_config(config_path)?.ok_or_else(|| {
        RelsyncError::config("no relsync.toml found (searched ./ and the user config directory)")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
version_file = "src/RepoInfo.cc"

[anchors]
major = "VERSION_MAJOR"
minor = "VERSION_MINOR"
patch = "VERSION_PATCH"
"#;

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.repo_dir, ".");
        assert_eq!(config.vcs, Vcs::Auto);
        assert_eq!(config.changelog, "CHANGELOG.md");
        assert_eq!(config.anchors.tweak, None);
        assert!(config.defaults.update_changelog);
        assert!(!config.lint.require_signoff);
        assert_eq!(config.tweak.labels, tweak::default_labels());
    }

    #[test]
    fn test_parse_full_config() {
        let text = r#"
repo_dir = "/srv/app"
vcs = "git"
version_file = "RepoInfo.cc"
changelog = "docs/CHANGELOG.md"

[anchors]
major = "VS_MAJOR"
minor = "VS_MINOR"
patch = "VS_PATCH"
tweak = "VS_TWEAK"
repo_url = "VS_REPO_URL"

[tweak]
labels = ["pre", "alpha", "beta", "rc", "eol"]

[lint]
require_signoff = true
cache_file = ".git/relsync-last-msg"

[defaults]
update_changelog = false
"#;
        let config: Config = toml::from_str(text).unwrap();
        assert_eq!(config.vcs, Vcs::Git);
        assert_eq!(config.tweak.labels.len(), 5);
        assert!(config.lint.require_signoff);
        assert!(!config.defaults.update_changelog);
        assert!(config.defaults.create_commit);

        let map = config.anchors.as_map();
        assert_eq!(map.len(), 5);
        assert_eq!(map.get("repo_url"), Some(&"VS_REPO_URL".to_string()));
        assert!(!map.contains_key("repo_hash"));
    }

    #[test]
    fn test_missing_anchors_rejected() {
        let text = r#"version_file = "RepoInfo.cc""#;
        assert!(toml::from_str::<Config>(text).is_err());
    }

    #[test]
    fn test_vcs_svn_parses() {
        let text = format!("vcs = \"svn\"\n{}", MINIMAL);
        let config: Config = toml::from_str(&text).unwrap();
        assert_eq!(config.vcs, Vcs::Svn);
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let err = discover_config(Some("/no/such/relsync.toml")).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn test_validate_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir(root.join("src")).unwrap();
        std::fs::write(root.join("src/RepoInfo.cc"), "VERSION_MAJOR 1\n").unwrap();

        let mut config: Config = toml::from_str(MINIMAL).unwrap();
        config.repo_dir = root.to_string_lossy().to_string();
        assert!(config.validate_paths(root).is_ok());

        // version file outside the root
        let outside = tempfile::TempDir::new().unwrap();
        std::fs::write(outside.path().join("RepoInfo.cc"), "VERSION_MAJOR 1\n").unwrap();
        config.version_file = outside
            .path()
            .join("RepoInfo.cc")
            .to_string_lossy()
            .to_string();
        assert!(config.validate_paths(root).is_err());

        // mismatched repository root
        config.version_file = "src/RepoInfo.cc".to_string();
        config.repo_dir = outside.path().to_string_lossy().to_string();
        assert!(config.validate_paths(root).is_err());
    }
}
