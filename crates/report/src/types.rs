//! Shared value types for the weekly report domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! values with invariants (a window's start precedes its end, a record's stats
//! are attached at most once) and flow between the pipeline phases.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{CommitSha, Organization, RepositoryName};

/// Display format for dates shown to humans (e.g. `Oct 11 2026`).
const DISPLAY_DATE_FORMAT: &str = "%b %-d %Y";

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; serializes as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Formats the date part for humans, e.g. `Oct 11 2026`.
    pub fn display_date(self) -> String {
        self.0.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------

/// A half-open UTC interval `[start, end)` covering one calendar week.
///
/// Produced once per run by [`crate::week_window`] and consumed read-only by
/// the commit fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: Timestamp,
    end: Timestamp,
}

impl TimeWindow {
    /// Creates a window, returning `None` unless `start < end`.
    #[must_use]
    pub fn new(start: Timestamp, end: Timestamp) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// The seven-day window beginning at `start`.
    pub(crate) fn starting_week(start: Timestamp) -> Self {
        Self {
            start,
            end: Timestamp(start.0 + TimeDelta::days(7)),
        }
    }

    /// Inclusive lower bound.
    pub fn start(&self) -> Timestamp {
        self.start
    }

    /// Exclusive upper bound.
    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Returns `true` if `ts` falls inside `[start, end)`.
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start <= ts && ts < self.end
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} and {}",
            self.start.display_date(),
            self.end.display_date()
        )
    }
}

// ---------------------------------------------------------------------------
// Hosting API values
// ---------------------------------------------------------------------------

/// A repository visible to the authenticated caller within the organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub name: RepositoryName,
}

/// One page of a list call.
///
/// Only a single page is ever requested; `truncated` records whether the
/// remote signalled that more entries exist beyond it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub truncated: bool,
}

impl<T> Page<T> {
    /// A page holding every entry the remote has.
    pub fn complete(items: Vec<T>) -> Self {
        Self {
            items,
            truncated: false,
        }
    }
}

/// Parameters of a commit listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitQuery {
    pub owner: Organization,
    pub repo: RepositoryName,
    pub author: crate::AuthorLogin,
    pub window: TimeWindow,
}

/// A commit list entry as returned by the hosting API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommit {
    pub sha: CommitSha,
    /// Committer timestamp.
    pub date: Timestamp,
    /// Committer display name.
    pub name: String,
    pub message: String,
    pub url: String,
}

/// Outcome of listing a repository's commits.
///
/// A repository with no commits at all is reported by the remote as a failure
/// status (HTTP 409 on GitHub). Adapters translate that one condition into
/// [`CommitListing::Empty`] so the domain never inspects error types to
/// recover from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitListing {
    Commits(Page<RemoteCommit>),
    /// The repository has no commits yet.
    Empty,
}

/// Line-change statistics of a single commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitStats {
    pub additions: u64,
    pub deletions: u64,
    pub total: u64,
}

impl std::ops::Add for CommitStats {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            additions: self.additions.saturating_add(rhs.additions),
            deletions: self.deletions.saturating_add(rhs.deletions),
            total: self.total.saturating_add(rhs.total),
        }
    }
}

/// Commit detail returned by the hosting API's "get commit" call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitDetail {
    pub sha: CommitSha,
    pub stats: CommitStats,
}

// ---------------------------------------------------------------------------
// Report records
// ---------------------------------------------------------------------------

/// Identity of a commit within the organization.
///
/// SHAs are only unique within a repository, so the repository is part of the
/// key (forks and mirrors legitimately share commits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitKey {
    pub repo: RepositoryName,
    pub sha: CommitSha,
}

impl std::fmt::Display for CommitKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.repo, self.sha)
    }
}

/// One commit in the weekly report.
///
/// Created by the commit fetcher with `stats` absent; the enrichment phase
/// attaches `stats` exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub repo: RepositoryName,
    pub sha: CommitSha,
    pub date: Timestamp,
    pub name: String,
    pub message: String,
    pub url: String,
    pub stats: Option<CommitStats>,
}

impl CommitRecord {
    /// Builds an un-enriched record from a commit list entry.
    pub fn from_remote(repo: RepositoryName, commit: RemoteCommit) -> Self {
        Self {
            repo,
            sha: commit.sha,
            date: commit.date,
            name: commit.name,
            message: commit.message,
            url: commit.url,
            stats: None,
        }
    }

    /// Returns the merge identity of this record.
    pub fn key(&self) -> CommitKey {
        CommitKey {
            repo: self.repo.clone(),
            sha: self.sha.clone(),
        }
    }
}
