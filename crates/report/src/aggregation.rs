//! The fan-out/fan-in aggregation pipeline.
//!
//! A run proceeds in phases, each of which completes before the next begins:
//!
//! 1. **Fetch**: list the organization's repositories, then fetch the
//!    author's commits from every repository concurrently and flatten them
//!    (repository order, then remote order).
//! 2. **Index**: map each record's [`CommitKey`] to an empty stats slot.
//! 3. **Enrich**: fetch every commit's detail concurrently. Each branch
//!    returns its own `(key, stats)` pair; the pairs are merged into the
//!    index only after all branches have joined, so no branch mutates shared
//!    state.
//!
//! Both fan-out points are bounded by [`PipelineSettings::max_concurrency`].
//! Failure is fail-fast: the first failing branch ends its phase, in-flight
//! siblings are dropped, and no further requests are issued.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use futures::{stream, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument, warn};

use crate::{
    AuthorLogin, CommitFetcher, CommitKey, CommitRecord, CommitStats, HostingApi, HostingError,
    NoProgress, Organization, Phase, ProgressObserver, ReportError, RepositoryLister,
    RepositoryRef, TimeWindow,
};

/// Default number of requests allowed in flight at each fan-out point.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// What to do when a list call reports more results than fit on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TruncationPolicy {
    /// Abort the run with [`ReportError::Truncated`].
    #[default]
    Fail,
    /// Log a warning and continue with the first page.
    Warn,
}

impl TruncationPolicy {
    pub(crate) fn check(
        self,
        truncated: bool,
        scope: impl FnOnce() -> String,
    ) -> Result<(), ReportError> {
        if !truncated {
            return Ok(());
        }
        let scope = scope();
        match self {
            TruncationPolicy::Fail => Err(ReportError::Truncated { scope }),
            TruncationPolicy::Warn => {
                warn!(%scope, "listing truncated by the remote; using the first page only");
                Ok(())
            }
        }
    }
}

/// Tuning knobs for a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Maximum requests in flight per fan-out phase.
    pub max_concurrency: NonZeroUsize,
    pub truncation: TruncationPolicy,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_concurrency: NonZeroUsize::new(DEFAULT_MAX_CONCURRENCY)
                .unwrap_or(NonZeroUsize::MIN),
            truncation: TruncationPolicy::Fail,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Orchestrates repository listing, commit fetching, and stats enrichment.
pub struct AggregationPipeline<'a> {
    api: &'a dyn HostingApi,
    progress: &'a dyn ProgressObserver,
    settings: PipelineSettings,
}

impl<'a> AggregationPipeline<'a> {
    pub fn new(api: &'a dyn HostingApi, settings: PipelineSettings) -> Self {
        Self {
            api,
            progress: &NoProgress,
            settings,
        }
    }

    /// Routes progress notifications to `progress`.
    pub fn with_progress(mut self, progress: &'a dyn ProgressObserver) -> Self {
        self.progress = progress;
        self
    }

    /// Produces the author's fully enriched commits for `window`.
    ///
    /// Any fatal condition aborts the whole run; no partial list is returned.
    #[instrument(skip_all, fields(org = %owner, author = %author))]
    pub async fn run(
        &self,
        owner: &Organization,
        author: &AuthorLogin,
        window: &TimeWindow,
    ) -> Result<Vec<CommitRecord>, ReportError> {
        self.progress.phase(Phase::ListingRepositories);
        let repos = RepositoryLister::new(self.api, self.settings.truncation)
            .list(owner)
            .await?;

        let commits = self.fetch_commits(owner, &repos, author, window).await?;
        let commits = self.enrich(owner, commits).await?;

        info!(
            repositories = repos.len(),
            commits = commits.len(),
            "report assembled"
        );
        Ok(commits)
    }

    /// Phase 1: fetches commits from every repository and flattens them.
    pub async fn fetch_commits(
        &self,
        owner: &Organization,
        repos: &[RepositoryRef],
        author: &AuthorLogin,
        window: &TimeWindow,
    ) -> Result<Vec<CommitRecord>, ReportError> {
        self.progress.phase(Phase::FetchingCommits {
            repositories: repos.len(),
        });
        let fetcher = &CommitFetcher::new(self.api, self.settings.truncation);
        let progress = self.progress;

        // `buffered` keeps repository order regardless of completion order.
        let per_repo: Vec<Vec<CommitRecord>> = stream::iter(repos)
            .map(|repo| async move {
                let result = fetcher.fetch(owner, &repo.name, author, window).await;
                progress.item_done();
                result
            })
            .buffered(self.settings.max_concurrency.get())
            .try_collect()
            .await?;

        Ok(per_repo.into_iter().flatten().collect())
    }

    /// Phases 2 and 3: attaches stats to every record, merging by [`CommitKey`].
    ///
    /// The returned list has the same length and order as `commits`, and every
    /// element has `stats` set.
    pub async fn enrich(
        &self,
        owner: &Organization,
        mut commits: Vec<CommitRecord>,
    ) -> Result<Vec<CommitRecord>, ReportError> {
        self.progress.phase(Phase::FetchingStats {
            commits: commits.len(),
        });

        let mut index: HashMap<CommitKey, Option<CommitStats>> =
            commits.iter().map(|c| (c.key(), None)).collect();

        let keys: Vec<CommitKey> = commits.iter().map(CommitRecord::key).collect();
        let pairs: Vec<(CommitKey, CommitStats)> = stream::iter(keys)
            .map(|key| self.fetch_stats(owner, key))
            .buffer_unordered(self.settings.max_concurrency.get())
            .try_collect()
            .await?;

        for (key, stats) in pairs {
            match index.get_mut(&key) {
                Some(slot) => *slot = Some(stats),
                None => warn!(%key, "stats returned for a commit that was never requested"),
            }
        }

        for record in &mut commits {
            let stats = index
                .get(&record.key())
                .copied()
                .flatten()
                .ok_or_else(|| ReportError::StatsMissing {
                    repo: record.repo.clone(),
                    sha: record.sha.clone(),
                })?;
            record.stats = Some(stats);
        }
        Ok(commits)
    }

    async fn fetch_stats(
        &self,
        owner: &Organization,
        key: CommitKey,
    ) -> Result<(CommitKey, CommitStats), ReportError> {
        let wrap = |source: HostingError| {
            ReportError::from_hosting(
                source,
                || format!("fetching stats for {key}"),
                |source| ReportError::StatsFetch {
                    repo: key.repo.clone(),
                    sha: key.sha.clone(),
                    source,
                },
            )
        };

        let detail = self
            .api
            .get_commit(owner, &key.repo, &key.sha)
            .await
            .map_err(&wrap)?;
        if detail.sha != key.sha {
            return Err(wrap(HostingError::Decode(format!(
                "requested commit {} but received {}",
                key.sha, detail.sha
            ))));
        }

        debug!(%key, total = detail.stats.total, "fetched stats");
        self.progress.item_done();
        Ok((key, detail.stats))
    }
}
