//! In-memory [`HostingApi`] used by the unit tests of this crate.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::{
    AuthorLogin, CommitDetail, CommitKey, CommitListing, CommitQuery, CommitSha, CommitStats,
    HostingApi, HostingError, Organization, Page, RemoteCommit, RepositoryName, RepositoryRef,
    TimeWindow, Timestamp,
};

pub(crate) fn org() -> Organization {
    Organization::new("acme").unwrap()
}

pub(crate) fn repo(name: &str) -> RepositoryName {
    RepositoryName::new(name).unwrap()
}

pub(crate) fn author() -> AuthorLogin {
    AuthorLogin::new("alice").unwrap()
}

pub(crate) fn window() -> TimeWindow {
    TimeWindow::new(
        Timestamp::from_utc(Utc.with_ymd_and_hms(2026, 10, 11, 0, 0, 0).unwrap()),
        Timestamp::from_utc(Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap()),
    )
    .unwrap()
}

pub(crate) fn remote_commit(sha: &str) -> RemoteCommit {
    RemoteCommit {
        sha: CommitSha::new(sha).unwrap(),
        date: Timestamp::from_utc(Utc.with_ymd_and_hms(2026, 10, 12, 9, 0, 0).unwrap()),
        name: "Alice".into(),
        message: format!("commit {sha}"),
        url: format!("https://api.github.com/repos/acme/commits/{sha}"),
    }
}

/// Scripted hosting API that records every request it receives.
#[derive(Default)]
pub(crate) struct StubHostingApi {
    repositories: Vec<RepositoryRef>,
    repository_failure: Option<HostingError>,
    repositories_truncated: bool,
    commits: HashMap<RepositoryName, Result<CommitListing, HostingError>>,
    details: HashMap<(String, String), Result<CommitDetail, HostingError>>,
    random_delays: bool,
    queries: Mutex<Vec<CommitQuery>>,
    detail_requests: Mutex<Vec<CommitKey>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubHostingApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_repositories<'s>(mut self, names: impl IntoIterator<Item = &'s str>) -> Self {
        self.repositories
            .extend(names.into_iter().map(|name| RepositoryRef { name: repo(name) }));
        self
    }

    pub(crate) fn fail_repository_listing(mut self, error: HostingError) -> Self {
        self.repository_failure = Some(error);
        self
    }

    pub(crate) fn truncate_repository_listing(mut self) -> Self {
        self.repositories_truncated = true;
        self
    }

    pub(crate) fn with_commits(
        self,
        name: &str,
        commits: impl IntoIterator<Item = RemoteCommit>,
    ) -> Self {
        let listing = CommitListing::Commits(Page::complete(commits.into_iter().collect()));
        self.set_listing(name, Ok(listing))
    }

    pub(crate) fn with_empty_repository(self, name: &str) -> Self {
        self.set_listing(name, Ok(CommitListing::Empty))
    }

    pub(crate) fn fail_commits(self, name: &str, error: HostingError) -> Self {
        self.set_listing(name, Err(error))
    }

    pub(crate) fn with_stats(self, name: &str, sha: &str, stats: CommitStats) -> Self {
        let detail = CommitDetail {
            sha: CommitSha::new(sha).unwrap(),
            stats,
        };
        self.with_detail(name, sha, detail)
    }

    pub(crate) fn with_detail(mut self, name: &str, sha: &str, detail: CommitDetail) -> Self {
        self.details
            .insert((name.to_string(), sha.to_string()), Ok(detail));
        self
    }

    pub(crate) fn fail_stats(mut self, name: &str, sha: &str, error: HostingError) -> Self {
        self.details
            .insert((name.to_string(), sha.to_string()), Err(error));
        self
    }

    /// Delays every response by 1–8 ms, varying per request.
    pub(crate) fn with_random_delays(mut self) -> Self {
        self.random_delays = true;
        self
    }

    pub(crate) fn commit_queries(&self) -> Vec<CommitQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub(crate) fn detail_requests(&self) -> Vec<CommitKey> {
        self.detail_requests.lock().unwrap().clone()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn set_listing(mut self, name: &str, listing: Result<CommitListing, HostingError>) -> Self {
        let name = repo(name);
        if !self.repositories.iter().any(|r| r.name == name) {
            self.repositories.push(RepositoryRef { name: name.clone() });
        }
        self.commits.insert(name, listing);
        self
    }

    async fn simulate_latency(&self, seed: &str) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if self.random_delays {
            let mut hasher = DefaultHasher::new();
            seed.hash(&mut hasher);
            let millis = hasher.finish() % 8 + 1;
            tokio::time::sleep(Duration::from_millis(millis)).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl HostingApi for StubHostingApi {
    async fn list_repositories(
        &self,
        _org: &Organization,
    ) -> Result<Page<RepositoryRef>, HostingError> {
        if let Some(error) = &self.repository_failure {
            return Err(error.clone());
        }
        Ok(Page {
            items: self.repositories.clone(),
            truncated: self.repositories_truncated,
        })
    }

    async fn list_commits(&self, query: &CommitQuery) -> Result<CommitListing, HostingError> {
        self.queries.lock().unwrap().push(query.clone());
        self.simulate_latency(query.repo.as_str()).await;

        self.commits
            .get(&query.repo)
            .cloned()
            .unwrap_or_else(|| {
                Err(HostingError::Status {
                    status: 404,
                    message: "Not Found".into(),
                })
            })
    }

    async fn get_commit(
        &self,
        _owner: &Organization,
        repo: &RepositoryName,
        sha: &CommitSha,
    ) -> Result<CommitDetail, HostingError> {
        self.detail_requests.lock().unwrap().push(CommitKey {
            repo: repo.clone(),
            sha: sha.clone(),
        });
        self.simulate_latency(&format!("{repo}/{sha}")).await;

        self.details
            .get(&(repo.to_string(), sha.to_string()))
            .cloned()
            .unwrap_or_else(|| {
                Err(HostingError::Status {
                    status: 422,
                    message: "No commit found for SHA".into(),
                })
            })
    }
}
