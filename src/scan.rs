//! Repository discovery.
//!
//! [`walk`] is a directory walker driven by a per-directory [`WalkAction`].
//! [`DirectoryScanner`] uses it to find repository roots, extract their
//! contributors and prune each repository's subtree so nested checkouts are
//! not reported twice.

use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::Path;

use anyhow::Result;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::DiggerError;
use crate::git::{ContributorExtractor, ContributorSet, GitRepository};
use crate::graph::ContributorGraph;

/// What the walker does after visiting a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Descend into the directory.
    Continue,
    /// Skip everything below the directory.
    Prune,
    /// Stop the walk.
    Abort,
}

/// Counters reported by [`walk`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Directories handed to the visitor.
    pub visited: usize,
    /// Entries skipped because the filesystem reported an error.
    pub errors: usize,
    /// Whether the visitor stopped the walk early.
    pub aborted: bool,
}

/// Walks directories under `root` in file-name order, root included.
///
/// Files are not visited. A symlink to a directory is visited but never
/// descended into, so [`WalkAction::Prune`] is a no-op for it. A root that
/// cannot be read fails the walk; unreadable entries below it are logged
/// and skipped.
pub fn walk<F>(root: &Path, mut visit: F) -> Result<WalkStats>
where
    F: FnMut(&Path) -> WalkAction,
{
    fs::metadata(root).map_err(|source| DiggerError::RootNotFound {
        path: root.to_path_buf(),
        source,
    })?;

    let mut stats = WalkStats::default();
    let mut entries = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = entries.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                let message = e.to_string();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other(message));
                return Err(DiggerError::RootNotFound {
                    path: root.to_path_buf(),
                    source,
                }
                .into());
            }
            Err(e) => {
                stats.errors += 1;
                warn!(path = ?e.path(), "Skipping unreadable entry: {e}");
                continue;
            }
        };

        let descends = entry.file_type().is_dir();
        let linked_dir = entry.path_is_symlink()
            && fs::metadata(entry.path()).is_ok_and(|meta| meta.is_dir());
        if !descends && !linked_dir {
            continue;
        }

        stats.visited += 1;
        match visit(entry.path()) {
            WalkAction::Continue => {}
            // Only pop what walkdir pushed; on a symlink this would drop the parent
            WalkAction::Prune if descends => entries.skip_current_dir(),
            WalkAction::Prune => {}
            WalkAction::Abort => {
                stats.aborted = true;
                break;
            }
        }
    }

    Ok(stats)
}

/// Finds repositories under a root and collects their contributors.
#[derive(Debug, Clone, Default)]
pub struct DirectoryScanner {
    extractor: ContributorExtractor,
    max_repos: Option<NonZeroUsize>,
}

impl DirectoryScanner {
    /// Creates a scanner that extracts with `extractor`.
    pub fn new(extractor: ContributorExtractor) -> Self {
        Self {
            extractor,
            max_repos: None,
        }
    }

    /// Stops the scan once this many repositories are recorded.
    pub fn with_max_repos(mut self, max_repos: Option<NonZeroUsize>) -> Self {
        self.max_repos = max_repos;
        self
    }

    /// Scans `root` and returns the repository to contributors mapping.
    pub fn scan(&self, root: &Path) -> Result<ContributorGraph> {
        let mut graph = ContributorGraph::new();

        let stats = walk(root, |path| self.visit(path, &mut graph))?;

        info!(
            root = %root.display(),
            directories = stats.visited,
            errors = stats.errors,
            repositories = graph.len(),
            aborted = stats.aborted,
            "Scan finished"
        );

        Ok(graph)
    }

    fn visit(&self, path: &Path, graph: &mut ContributorGraph) -> WalkAction {
        let Ok(repo) = GitRepository::open_at(path) else {
            return WalkAction::Continue;
        };

        let key = path.to_string_lossy().into_owned();
        let contributors = match self.extractor.extract(&repo) {
            Ok(contributors) => contributors,
            Err(e) => {
                warn!(repository = %key, "Contributor extraction abandoned: {e}");
                ContributorSet::new()
            }
        };

        debug!(repository = %key, contributors = contributors.len(), "Found repository");
        graph.record(key, contributors);

        if self
            .max_repos
            .is_some_and(|max| graph.len() >= max.get())
        {
            return WalkAction::Abort;
        }

        WalkAction::Prune
    }
}
