//! Port traits implemented by infrastructure crates.
//!
//! The domain defines *what* it needs from the source-control host; the
//! `github` crate defines *how* to supply it. Transport, authentication
//! headers, and response parsing never leak into this crate.

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    CommitDetail, CommitListing, CommitQuery, CommitSha, Organization, Page, RepositoryName,
    RepositoryRef, Timestamp,
};

/// Failures reported by a [`HostingApi`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostingError {
    /// The remote rejected the credentials (bad, expired, or under-scoped token).
    #[error("credentials rejected (HTTP {status})")]
    Unauthorized { status: u16 },

    /// The remote's rate limit is exhausted.
    #[error("rate limit exceeded{}", .reset_at.as_ref().map(|t| format!(", resets at {t}")).unwrap_or_default())]
    RateLimited { reset_at: Option<Timestamp> },

    /// Any other non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl HostingError {
    /// Returns `true` if the remote rejected the caller's credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, HostingError::Unauthorized { .. })
    }
}

/// Read access to an organization's repositories and commits.
///
/// Implementations must be shareable across the concurrent branches of the
/// aggregation pipeline; every call is independent.
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Lists the repositories of `org` visible to the caller (single page).
    async fn list_repositories(&self, org: &Organization)
        -> Result<Page<RepositoryRef>, HostingError>;

    /// Lists commits matching `query` (single page).
    ///
    /// A repository without any commits is `Ok(CommitListing::Empty)`.
    async fn list_commits(&self, query: &CommitQuery) -> Result<CommitListing, HostingError>;

    /// Fetches one commit's detail, including its line-change statistics.
    async fn get_commit(
        &self,
        owner: &Organization,
        repo: &RepositoryName,
        sha: &CommitSha,
    ) -> Result<CommitDetail, HostingError>;
}
