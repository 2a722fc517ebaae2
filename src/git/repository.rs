use crate::error::{RelsyncError, Result};
use crate::git::CommitInfo;
use git2::{ObjectType, Oid, Repository as Git2Repo};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn head_oid(&self) -> Result<Oid> {
        let head = self.repo.head()?;
        head.target()
            .ok_or_else(|| RelsyncError::config("HEAD is detached or invalid".to_string()))
    }

    /// Tag name per peeled commit OID, for both lightweight and annotated
    /// tags
    fn tag_oids(&self) -> Result<HashMap<Oid, String>> {
        let mut map = HashMap::new();
        for tag_name in self.repo.tag_names(None)?.iter().flatten() {
            if let Ok(reference) = self
                .repo
                .find_reference(&format!("refs/tags/{}", tag_name))
            {
                if let Ok(object) = reference.peel(ObjectType::Commit) {
                    map.insert(object.id(), tag_name.to_string());
                }
            }
        }
        Ok(map)
    }
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(|p| p.to_path_buf())
            .ok_or_else(|| RelsyncError::config("bare repositories are not supported"))
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        head.shorthand()
            .map(|s| s.to_string())
            .ok_or_else(|| RelsyncError::config("cannot determine current branch"))
    }

    fn head_hash(&self) -> Result<String> {
        Ok(self.head_oid()?.to_string())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;
        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn latest_tag(&self) -> Result<Option<String>> {
        let tag_oids = self.tag_oids()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(self.head_oid()?)?;

        for oid in revwalk {
            let oid = oid?;
            if let Some(tag_name) = tag_oids.get(&oid) {
                return Ok(Some(tag_name.clone()));
            }
        }

        Ok(None)
    }

    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitInfo>> {
        let stop_oid = match tag {
            Some(tag_name) => self
                .repo
                .find_reference(&format!("refs/tags/{}", tag_name))
                .ok()
                .and_then(|r| r.peel(ObjectType::Commit).ok())
                .map(|obj| obj.id()),
            None => None,
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(self.head_oid()?)?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid?;

            if Some(oid) == stop_oid {
                break;
            }

            let commit = self.repo.find_commit(oid)?;
            commits.push(CommitInfo {
                hash: oid.to_string(),
                message: commit.message().unwrap_or("(empty message)").to_string(),
                author: commit.author().name().unwrap_or("unknown").to_string(),
            });
        }

        // Chronological order, oldest first
        commits.reverse();
        Ok(commits)
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        match self.repo.find_remote(remote) {
            Ok(remote) => Ok(remote.url().map(|s| s.to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<()> {
        let mut index = self.repo.index()?;
        for path in paths {
            index.add_path(path)?;
        }
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.repo.signature()?;
        let parent = self.repo.head()?.peel_to_commit()?;

        self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;
        Ok(())
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        let head = self.repo.head()?.peel(ObjectType::Commit)?;
        let signature = self.repo.signature()?;
        self.repo
            .tag(name, &head, &signature, message, false)
            .map_err(|e| RelsyncError::tag(format!("cannot create tag '{}': {}", name, e)))?;
        Ok(())
    }
}
