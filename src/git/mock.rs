use crate::error::{RelsyncError, Result};
use crate::git::{CommitInfo, Repository};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Mock repository for testing without actual git operations.
///
/// Mutating operations (commit, tag) are recorded so tests can assert on
/// what the workflow would have written.
pub struct MockRepository {
    workdir: PathBuf,
    branch: String,
    head: String,
    tags: Mutex<Vec<String>>,
    latest_tag: Option<String>,
    commits: Vec<CommitInfo>,
    remote_url: Option<String>,
    commit_messages: Mutex<Vec<String>>,
}

impl MockRepository {
    /// Create a mock rooted at `workdir` with an empty history
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        MockRepository {
            workdir: workdir.into(),
            branch: "main".to_string(),
            head: "ab12cd34ef0000000000000000000000000000ff".to_string(),
            tags: Mutex::new(Vec::new()),
            latest_tag: None,
            commits: Vec::new(),
            remote_url: None,
            commit_messages: Mutex::new(Vec::new()),
        }
    }

    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.branch = branch.into();
    }

    pub fn set_head(&mut self, hash: impl Into<String>) {
        self.head = hash.into();
    }

    pub fn set_remote_url(&mut self, url: impl Into<String>) {
        self.remote_url = Some(url.into());
    }

    /// Add an existing tag; the most recently added one becomes the
    /// latest tag
    pub fn add_tag(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.latest_tag = Some(name.clone());
        if let Ok(mut tags) = self.tags.lock() {
            tags.push(name);
        }
    }

    /// Add a commit to the history since the latest tag
    pub fn add_commit(&mut self, message: impl Into<String>) {
        let n = self.commits.len() + 1;
        self.commits.push(CommitInfo {
            hash: format!("{:040x}", n),
            message: message.into(),
            author: "Test Author".to_string(),
        });
    }

    /// Tags created through the trait during the test
    pub fn created_tags(&self) -> Vec<String> {
        let latest = self.latest_tag.clone();
        self.tags
            .lock()
            .map(|tags| {
                tags.iter()
                    .filter(|t| Some(t.as_str()) != latest.as_deref())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Messages of commits created through the trait during the test
    pub fn commit_messages(&self) -> Vec<String> {
        self.commit_messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> Result<PathBuf> {
        Ok(self.workdir.clone())
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn head_hash(&self) -> Result<String> {
        Ok(self.head.clone())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.lock().map(|t| t.clone()).unwrap_or_default())
    }

    fn latest_tag(&self) -> Result<Option<String>> {
        Ok(self.latest_tag.clone())
    }

    fn commits_since(&self, _tag: Option<&str>) -> Result<Vec<CommitInfo>> {
        Ok(self.commits.clone())
    }

    fn remote_url(&self, _remote: &str) -> Result<Option<String>> {
        Ok(self.remote_url.clone())
    }

    fn commit_paths(&self, _paths: &[&Path], message: &str) -> Result<()> {
        self.commit_messages
            .lock()
            .map_err(|_| RelsyncError::config("mock lock poisoned"))?
            .push(message.to_string());
        Ok(())
    }

    fn create_annotated_tag(&self, name: &str, _message: &str) -> Result<()> {
        self.tags
            .lock()
            .map_err(|_| RelsyncError::config("mock lock poisoned"))?
            .push(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_basic() {
        let mut repo = MockRepository::new("/tmp/mock");
        repo.set_branch("develop");
        repo.add_commit("feat: first");

        assert_eq!(repo.current_branch().unwrap(), "develop");
        assert_eq!(repo.commits_since(None).unwrap().len(), 1);
        assert_eq!(repo.latest_tag().unwrap(), None);
    }

    #[test]
    fn test_mock_repository_tags() {
        let mut repo = MockRepository::new("/tmp/mock");
        repo.add_tag("v1.0.0");

        assert_eq!(repo.latest_tag().unwrap(), Some("v1.0.0".to_string()));
        assert!(repo.list_tags().unwrap().contains(&"v1.0.0".to_string()));

        repo.create_annotated_tag("v1.1.0", "release v1.1.0").unwrap();
        assert_eq!(repo.created_tags(), vec!["v1.1.0".to_string()]);
    }

    #[test]
    fn test_mock_repository_records_commits() {
        let repo = MockRepository::new("/tmp/mock");
        repo.commit_paths(&[Path::new("RepoInfo.cc")], "chore(release): v1.1.0")
            .unwrap();
        assert_eq!(repo.commit_messages(), vec!["chore(release): v1.1.0"]);
    }
}
