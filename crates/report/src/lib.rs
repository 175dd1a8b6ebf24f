//! Core domain of the weekly commit report.
//!
//! Given an organization, an author, and a week, this crate discovers every
//! repository, fetches the author's commits from all of them concurrently, and
//! enriches each commit with line-change statistics. Infrastructure crates
//! implement the [`HostingApi`] port; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no HTTP dependencies.
//! It defines *what* is needed from the hosting API; the `github` crate
//! defines *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype names (`Organization`, `RepositoryName`, `CommitSha`, ...) |
//! | [`types`] | Value types (`TimeWindow`, `CommitRecord`, `CommitStats`, ...) |
//! | [`errors`] | [`ReportError`], the fatal error of a run |
//! | [`ports`] | [`HostingApi`] and [`HostingError`] |
//! | [`window`] | Sunday-to-Sunday UTC week arithmetic |
//! | [`lister`] | [`RepositoryLister`] |
//! | [`fetcher`] | [`CommitFetcher`] |
//! | [`aggregation`] | [`AggregationPipeline`], the fan-out/fan-in core |
//! | [`emitter`] | [`ReportEmitter`] |
//! | [`progress`] | [`ProgressObserver`] port |

pub mod aggregation;
pub mod emitter;
pub mod errors;
pub mod fetcher;
pub mod identifiers;
pub mod lister;
pub mod ports;
pub mod progress;
pub mod types;
pub mod window;

#[cfg(test)]
mod testing;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use aggregation::{
    AggregationPipeline, PipelineSettings, TruncationPolicy, DEFAULT_MAX_CONCURRENCY,
};
pub use emitter::{ReportEmitter, ReportFormat};
pub use errors::ReportError;
pub use fetcher::CommitFetcher;
pub use identifiers::{AuthorLogin, CommitSha, Organization, ReportRunId, RepositoryName};
pub use lister::RepositoryLister;
pub use ports::{HostingApi, HostingError};
pub use progress::{NoProgress, Phase, ProgressObserver};
pub use types::{
    CommitDetail, CommitKey, CommitListing, CommitQuery, CommitRecord, CommitStats, Page,
    RemoteCommit, RepositoryRef, TimeWindow, Timestamp,
};
pub use window::{week_of_year, week_window, WeekSelector};
