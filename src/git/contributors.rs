//! Contributor extraction from commit history.
//!
//! A contributor is the author email of a commit. Which commits count is
//! decided by a [`CommitPolicy`]: everything reachable from any reference
//! since a given day, or everything reachable from HEAD.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, warn};

use crate::error::DiggerError;
use crate::git::GitRepository;

/// Date format accepted for the since policy (day/month/year).
pub const SINCE_FORMAT: &str = "%d/%m/%Y";

/// Since date used when none is configured.
pub const DEFAULT_SINCE: &str = "02/01/2006";

/// Distinct author emails of one repository.
pub type ContributorSet = BTreeSet<String>;

/// Which commits contribute authors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Commits reachable from any reference, committed on or after the given
    /// `DD/MM/YYYY` day (UTC). The date is kept unparsed so that a bad value
    /// degrades each repository rather than the whole run.
    Since(String),
    /// Commits reachable from HEAD, no date filter.
    HeadOnly,
}

impl Default for CommitPolicy {
    fn default() -> Self {
        Self::Since(DEFAULT_SINCE.to_string())
    }
}

/// Parses a `DD/MM/YYYY` date.
pub fn parse_since(value: &str) -> Result<NaiveDate, DiggerError> {
    NaiveDate::parse_from_str(value.trim(), SINCE_FORMAT).map_err(|e| {
        DiggerError::InvalidSinceDate {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Collects author emails from a repository's history.
#[derive(Debug, Clone, Default)]
pub struct ContributorExtractor {
    policy: CommitPolicy,
}

impl ContributorExtractor {
    /// Creates an extractor for the given policy.
    pub fn new(policy: CommitPolicy) -> Self {
        Self { policy }
    }

    /// Collects the distinct author emails admitted by the policy.
    ///
    /// Only an unparsable since date is returned as an error. A log that
    /// cannot be opened yields an empty set, and a failure part way through
    /// the history keeps what was collected so far.
    pub fn extract(&self, repo: &GitRepository) -> Result<ContributorSet, DiggerError> {
        let mut contributors = ContributorSet::new();

        let (walk, since) = match &self.policy {
            CommitPolicy::Since(raw) => {
                let day = parse_since(raw)?;
                let since = day.and_time(NaiveTime::MIN).and_utc().timestamp();
                (repo.all_refs_walk(), Some(since))
            }
            CommitPolicy::HeadOnly => {
                if !repo.has_head() {
                    debug!(path = %repo.path().display(), "HEAD is unborn, no contributors");
                    return Ok(contributors);
                }
                (repo.head_walk(), None)
            }
        };

        let walk = match walk {
            Ok(walk) => walk,
            Err(e) => {
                warn!(path = %repo.path().display(), "Failed to open commit log: {e:#}");
                return Ok(contributors);
            }
        };

        let commits = walk.map(|oid| -> Result<AuthoredCommit, git2::Error> {
            let commit = repo.repository().find_commit(oid?)?;
            let authored = AuthoredCommit {
                email: String::from_utf8_lossy(commit.author().email_bytes()).into_owned(),
                seconds: commit.time().seconds(),
            };
            Ok(authored)
        });

        if let Err(e) = collect_authors(commits, since, &mut contributors) {
            warn!(
                path = %repo.path().display(),
                collected = contributors.len(),
                "Commit log iteration failed, keeping partial contributor set: {e}"
            );
        }

        debug!(
            path = %repo.path().display(),
            contributors = contributors.len(),
            "Extracted contributors"
        );

        Ok(contributors)
    }
}

/// The parts of a commit that decide contribution.
struct AuthoredCommit {
    email: String,
    seconds: i64,
}

/// Adds the authors of admitted commits until the log is exhausted or fails.
///
/// On failure the authors seen before the failing entry stay in `contributors`.
fn collect_authors<I>(
    commits: I,
    since: Option<i64>,
    contributors: &mut ContributorSet,
) -> Result<(), git2::Error>
where
    I: IntoIterator<Item = Result<AuthoredCommit, git2::Error>>,
{
    for commit in commits {
        let commit = commit?;
        if since.is_some_and(|since| commit.seconds < since) {
            continue;
        }
        contributors.insert(commit.email);
    }

    Ok(())
}
