//! Git repository operations

use std::path::Path;

use anyhow::{Context, Result};
use git2::{Repository, Revwalk, Sort};
use tracing::debug;

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open the repository rooted exactly at `path`.
    ///
    /// Parent directories are not searched, so a plain subdirectory of a
    /// working tree does not open as a repository.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::open(path)
            .with_context(|| format!("Failed to open git repository at {}", path.display()))?;

        Ok(Self { repo })
    }

    /// Get repository path (the `.git` directory)
    pub fn path(&self) -> &Path {
        self.repo.path()
    }

    /// Get access to the underlying git2::Repository
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Whether HEAD resolves to a commit. False for unborn branches.
    pub fn has_head(&self) -> bool {
        self.repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .is_ok()
    }

    /// Walk history reachable from HEAD, newest first.
    pub fn head_walk(&self) -> Result<Revwalk<'_>> {
        let mut walker = self.new_walk()?;
        walker.push_head().context("Failed to resolve HEAD")?;

        Ok(walker)
    }

    /// Walk history reachable from every reference and HEAD, newest first.
    pub fn all_refs_walk(&self) -> Result<Revwalk<'_>> {
        let mut walker = self.new_walk()?;

        let references = self
            .repo
            .references()
            .context("Failed to list repository references")?;
        for reference in references {
            let reference = reference.context("Failed to read reference")?;
            match reference.peel_to_commit() {
                Ok(commit) => walker
                    .push(commit.id())
                    .context("Failed to push reference onto revwalk")?,
                // Tags may point at trees or blobs
                Err(e) => debug!(
                    reference = reference.name().unwrap_or("<non-utf8>"),
                    "Skipping reference that does not peel to a commit: {e}"
                ),
            }
        }

        // A detached HEAD is not covered by any reference
        if let Err(e) = walker.push_head() {
            debug!(path = %self.path().display(), "HEAD not pushed onto revwalk: {e}");
        }

        Ok(walker)
    }

    fn new_walk(&self) -> Result<Revwalk<'_>> {
        let mut walker = self.repo.revwalk().context("Failed to create revwalk")?;
        walker
            .set_sorting(Sort::TIME)
            .context("Failed to set revwalk sorting")?;

        Ok(walker)
    }
}
