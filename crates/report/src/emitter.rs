//! Report serialization.

use std::collections::BTreeSet;
use std::io::Write;

use crate::{CommitRecord, CommitStats, ReportError};

const SHORT_SHA_LEN: usize = 7;

/// Output format of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Pretty-printed JSON array of commit records.
    #[default]
    Json,
    /// One human-readable block per commit followed by a totals line.
    Text,
}

/// Writes the final commit list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportEmitter {
    format: ReportFormat,
}

impl ReportEmitter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Serializes `commits` to `out`. Any write or encoding failure is fatal.
    pub fn emit<W: Write>(&self, commits: &[CommitRecord], out: &mut W) -> Result<(), ReportError> {
        match self.format {
            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, commits)?;
                writeln!(out)?;
            }
            ReportFormat::Text => write_text(commits, out)?,
        }
        out.flush()?;
        Ok(())
    }
}

fn write_text<W: Write>(commits: &[CommitRecord], out: &mut W) -> std::io::Result<()> {
    let mut totals = CommitStats {
        additions: 0,
        deletions: 0,
        total: 0,
    };

    for commit in commits {
        let sha = commit.sha.as_str();
        let short = sha.get(..SHORT_SHA_LEN).unwrap_or(sha);
        let stats = match commit.stats {
            Some(stats) => {
                totals = totals + stats;
                format!("+{} -{} ({})", stats.additions, stats.deletions, stats.total)
            }
            None => "no stats".to_string(),
        };

        writeln!(
            out,
            "{}  {}  {}  {}  {}",
            commit.repo, short, commit.date, commit.name, stats
        )?;
        writeln!(out, "    {}", commit.url)?;
        for line in commit.message.lines() {
            writeln!(out, "    {line}")?;
        }
        writeln!(out)?;
    }

    let repositories: BTreeSet<_> = commits.iter().map(|c| &c.repo).collect();
    writeln!(
        out,
        "{} commit{} in {} repositor{}: +{} -{} ({})",
        commits.len(),
        if commits.len() == 1 { "" } else { "s" },
        repositories.len(),
        if repositories.len() == 1 { "y" } else { "ies" },
        totals.additions,
        totals.deletions,
        totals.total
    )
}
