//! Repository discovery.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::{HostingApi, Organization, ReportError, RepositoryRef, TruncationPolicy};

/// Retrieves the set of repositories of an organization.
///
/// Runs a single list call per invocation and caches nothing, so every run
/// re-derives the set from the remote.
pub struct RepositoryLister<'a> {
    api: &'a dyn HostingApi,
    truncation: TruncationPolicy,
}

impl<'a> RepositoryLister<'a> {
    pub fn new(api: &'a dyn HostingApi, truncation: TruncationPolicy) -> Self {
        Self { api, truncation }
    }

    /// Lists the organization's repositories, without duplicates, in remote order.
    ///
    /// Any remote failure is fatal; the run cannot proceed without the
    /// repository set.
    #[instrument(skip_all, fields(org = %org))]
    pub async fn list(&self, org: &Organization) -> Result<Vec<RepositoryRef>, ReportError> {
        let page = self.api.list_repositories(org).await.map_err(|source| {
            ReportError::from_hosting(
                source,
                || format!("listing repositories of '{org}'"),
                |source| ReportError::RepositoryList {
                    organization: org.clone(),
                    source,
                },
            )
        })?;
        self.truncation
            .check(page.truncated, || format!("repositories of organization '{org}'"))?;

        let mut seen = HashSet::new();
        let repos: Vec<RepositoryRef> = page
            .items
            .into_iter()
            .filter(|repo| seen.insert(repo.name.clone()))
            .collect();

        debug!(count = repos.len(), "listed repositories");
        Ok(repos)
    }
}
