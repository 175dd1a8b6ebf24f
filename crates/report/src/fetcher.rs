//! Per-repository commit retrieval.

use tracing::{debug, instrument};

use crate::{
    AuthorLogin, CommitListing, CommitQuery, CommitRecord, HostingApi, Organization, ReportError,
    RepositoryName, TimeWindow, TruncationPolicy,
};

/// Retrieves one author's commits in one repository within a week window.
///
/// Exactly one remote condition is tolerated: a repository that has no
/// commits yet yields an empty list. Every other failure is fatal and names
/// the repository.
pub struct CommitFetcher<'a> {
    api: &'a dyn HostingApi,
    truncation: TruncationPolicy,
}

impl<'a> CommitFetcher<'a> {
    pub fn new(api: &'a dyn HostingApi, truncation: TruncationPolicy) -> Self {
        Self { api, truncation }
    }

    /// Returns the author's commits in `repo`, in remote order, without stats.
    #[instrument(skip_all, fields(repo = %repo))]
    pub async fn fetch(
        &self,
        owner: &Organization,
        repo: &RepositoryName,
        author: &AuthorLogin,
        window: &TimeWindow,
    ) -> Result<Vec<CommitRecord>, ReportError> {
        let query = CommitQuery {
            owner: owner.clone(),
            repo: repo.clone(),
            author: author.clone(),
            window: *window,
        };

        let listing = self.api.list_commits(&query).await.map_err(|source| {
            ReportError::from_hosting(
                source,
                || format!("listing commits of '{repo}'"),
                |source| ReportError::RepoFetch {
                    repo: repo.clone(),
                    source,
                },
            )
        })?;

        match listing {
            CommitListing::Empty => {
                debug!("repository has no commits");
                Ok(Vec::new())
            }
            CommitListing::Commits(page) => {
                self.truncation
                    .check(page.truncated, || format!("commits of repository '{repo}'"))?;
                let outside = page
                    .items
                    .iter()
                    .filter(|commit| !window.contains(commit.date))
                    .count();
                if outside > 0 {
                    // The remote filters on commit date; authored dates may differ.
                    debug!(outside, "commits dated outside the window kept as listed");
                }
                debug!(count = page.items.len(), "fetched commits");
                Ok(page
                    .items
                    .into_iter()
                    .map(|commit| CommitRecord::from_remote(repo.clone(), commit))
                    .collect())
            }
        }
    }
}
