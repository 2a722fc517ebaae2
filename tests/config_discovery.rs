//! Configuration lookup relative to the current working directory.
//!
//! These tests change the process cwd, so they are serialized.

use serial_test::serial;
use std::fs;
use tempfile::TempDir;

use relsync::config::{discover_config, load_config};

const MINIMAL: &str = r##"
version_file = "RepoInfo.cc"

[anchors]
major = "#define VERSION_MAJOR"
minor = "#define VERSION_MINOR"
patch = "#define VERSION_PATCH"
"##;

#[test]
#[serial]
fn test_discovers_local_relsync_toml() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("relsync.toml"), MINIMAL).unwrap();

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let found = discover_config(None);
    std::env::set_current_dir(previous).unwrap();

    let config = found.unwrap().expect("local relsync.toml should be found");
    assert_eq!(config.version_file, "RepoInfo.cc");
    assert_eq!(config.repo_dir, ".");
}

#[test]
#[serial]
fn test_explicit_path_wins_over_local_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("relsync.toml"), MINIMAL).unwrap();
    let other = dir.path().join("alt.toml");
    fs::write(&other, MINIMAL.replace("RepoInfo.cc", "Version.h")).unwrap();

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let found = load_config(other.to_str());
    std::env::set_current_dir(previous).unwrap();

    assert_eq!(found.unwrap().version_file, "Version.h");
}

#[test]
#[serial]
fn test_malformed_local_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("relsync.toml"), "version_file = [").unwrap();

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let result = discover_config(None);
    std::env::set_current_dir(previous).unwrap();

    assert!(result.is_err());
}
