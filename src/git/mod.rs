//! Git operations abstraction layer.
//!
//! The synchronizer consumes a [Repository] trait rather than git2 directly:
//! [repository::Git2Repository] is the real implementation, and
//! [mock::MockRepository] stands in for it under tests. Both tools are
//! single-threaded, so the trait carries no threading bounds.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Commit information for history analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// The commit hash (full hex)
    pub hash: String,
    /// The commit message
    pub message: String,
    /// The commit author
    pub author: String,
}

/// VCS operations the synchronizer depends on.
///
/// Read-only queries except for [Repository::commit_paths] and
/// [Repository::create_annotated_tag], which are the final persistence step.
pub trait Repository {
    /// Root of the working directory
    fn workdir(&self) -> Result<PathBuf>;

    /// Name of the currently checked-out branch
    fn current_branch(&self) -> Result<String>;

    /// Full hex hash of HEAD
    fn head_hash(&self) -> Result<String>;

    /// All tag names in the repository
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Most recent tag reachable from HEAD, if any
    fn latest_tag(&self) -> Result<Option<String>>;

    /// Commits from `tag` (exclusive) to HEAD, oldest first; the full
    /// history when `tag` is `None`
    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitInfo>>;

    /// URL of a named remote, `None` when the remote does not exist
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;

    /// Stage the given workdir-relative paths and create a commit on HEAD
    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<()>;

    /// Create an annotated tag on HEAD
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;
}
