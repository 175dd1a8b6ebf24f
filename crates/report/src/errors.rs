//! Top-level error type for a report run.
//!
//! [`ReportError`] covers every condition that aborts a run. Failures of the
//! hosting API itself are described by [`crate::HostingError`] and wrapped
//! here together with the repository or commit they concern, so a diagnostic
//! is actionable without re-running with verbose logging.
//!
//! The one recoverable remote condition, an empty repository, is not an error
//! at all: it surfaces as [`crate::CommitListing::Empty`].

use thiserror::Error;

use crate::{CommitSha, HostingError, Organization, RepositoryName};

/// Errors that abort a report run.
///
/// Every variant is fatal: the run favours failing loudly over emitting a
/// silently incomplete weekly summary.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The configuration could not be read or is invalid.
    ///
    /// Produced at startup, before any network activity.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },

    /// The command line arguments are malformed.
    #[error("Invalid input: {message}")]
    Input {
        /// Description of the offending argument.
        message: String,
    },

    /// The hosting API rejected the configured credentials.
    #[error("Authentication rejected while {context}")]
    Auth {
        /// What the run was doing when the credentials were rejected.
        context: String,
        #[source]
        source: HostingError,
    },

    /// The organization's repositories could not be enumerated.
    #[error("Could not list repositories of organization '{organization}'")]
    RepositoryList {
        organization: Organization,
        #[source]
        source: HostingError,
    },

    /// Listing commits failed for a reason other than the repository being empty.
    #[error("Error while retrieving commits for repository '{repo}'")]
    RepoFetch {
        repo: RepositoryName,
        #[source]
        source: HostingError,
    },

    /// Fetching line-change statistics for a commit failed.
    #[error("Error while retrieving stats for commit {sha} in repository '{repo}'")]
    StatsFetch {
        repo: RepositoryName,
        sha: CommitSha,
        #[source]
        source: HostingError,
    },

    /// A record was left without stats after enrichment.
    #[error("No stats were merged for commit {sha} in repository '{repo}'")]
    StatsMissing { repo: RepositoryName, sha: CommitSha },

    /// A list call returned only the first page of a larger result.
    #[error("Results truncated by the remote while listing {scope}; the report would be incomplete")]
    Truncated {
        /// The organization or repository whose listing was truncated.
        scope: String,
    },

    /// The report could not be written.
    #[error("Could not write report: {message}")]
    Emit { message: String },
}

impl ReportError {
    /// Wraps a hosting failure, classifying credential rejection as [`ReportError::Auth`].
    pub(crate) fn from_hosting(
        source: HostingError,
        context: impl FnOnce() -> String,
        wrap: impl FnOnce(HostingError) -> ReportError,
    ) -> Self {
        if source.is_auth() {
            ReportError::Auth {
                context: context(),
                source,
            }
        } else {
            wrap(source)
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::Emit {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Emit {
            message: err.to_string(),
        }
    }
}
