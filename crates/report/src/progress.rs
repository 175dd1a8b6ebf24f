//! Progress reporting port.
//!
//! The pipeline announces phase changes and completed work items; the binary
//! renders them (a terminal spinner), tests ignore them.

/// A stage of the aggregation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ListingRepositories,
    /// Fetching commits from `repositories` repositories.
    FetchingCommits { repositories: usize },
    /// Fetching stats for `commits` commits.
    FetchingStats { commits: usize },
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::ListingRepositories => write!(f, "listing repositories"),
            Phase::FetchingCommits { repositories } => {
                write!(f, "fetching commits from {repositories} repositories")
            }
            Phase::FetchingStats { commits } => write!(f, "fetching stats for {commits} commits"),
        }
    }
}

/// Receives progress notifications from the pipeline.
pub trait ProgressObserver: Send + Sync {
    /// A new phase has started.
    fn phase(&self, phase: Phase);

    /// One unit of work in the current phase has finished.
    fn item_done(&self) {}
}

/// Observer that discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn phase(&self, _phase: Phase) {}
}
