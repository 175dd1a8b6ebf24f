//! GitHub REST response bodies and their conversion into domain values.
//!
//! Only the fields the report reads are declared; serde ignores the rest.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use report::{
    CommitDetail, CommitSha, CommitStats, HostingError, RemoteCommit, RepositoryName,
    RepositoryRef, Timestamp,
};

/// Entry of `GET /orgs/{org}/repos`.
#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryEntry {
    pub name: String,
}

/// Entry of `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Deserialize)]
pub(crate) struct CommitEntry {
    pub sha: String,
    pub commit: GitCommit,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitCommit {
    pub message: String,
    pub committer: Option<GitSignature>,
    pub author: Option<GitSignature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitSignature {
    pub name: String,
    pub date: DateTime<Utc>,
}

/// Body of `GET /repos/{owner}/{repo}/commits/{ref}`.
#[derive(Debug, Deserialize)]
pub(crate) struct CommitDetailEntry {
    pub sha: String,
    pub stats: Option<StatsEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsEntry {
    pub additions: u64,
    pub deletions: u64,
    pub total: u64,
}

/// Error body GitHub attaches to non-success responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

fn sha(value: String) -> Result<CommitSha, HostingError> {
    CommitSha::new(value).ok_or_else(|| HostingError::Decode("commit without sha".into()))
}

impl TryFrom<RepositoryEntry> for RepositoryRef {
    type Error = HostingError;

    fn try_from(entry: RepositoryEntry) -> Result<Self, Self::Error> {
        let name = RepositoryName::new(entry.name)
            .ok_or_else(|| HostingError::Decode("repository without name".into()))?;
        Ok(RepositoryRef { name })
    }
}

impl TryFrom<CommitEntry> for RemoteCommit {
    type Error = HostingError;

    fn try_from(entry: CommitEntry) -> Result<Self, Self::Error> {
        let GitCommit {
            message,
            committer,
            author,
        } = entry.commit;
        let signature = committer.or(author).ok_or_else(|| {
            HostingError::Decode(format!("commit {} has no committer", entry.sha))
        })?;

        Ok(RemoteCommit {
            sha: sha(entry.sha)?,
            date: Timestamp::from_utc(signature.date),
            name: signature.name,
            message,
            url: entry.url,
        })
    }
}

impl TryFrom<CommitDetailEntry> for CommitDetail {
    type Error = HostingError;

    fn try_from(entry: CommitDetailEntry) -> Result<Self, Self::Error> {
        let stats = entry.stats.ok_or_else(|| {
            HostingError::Decode(format!("commit {} has no stats", entry.sha))
        })?;

        Ok(CommitDetail {
            sha: sha(entry.sha)?,
            stats: CommitStats {
                additions: stats.additions,
                deletions: stats.deletions,
                total: stats.total,
            },
        })
    }
}
