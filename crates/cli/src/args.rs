//! Command line surface.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use report::{AuthorLogin, ReportError, ReportFormat, WeekSelector};

/// Weekly commit report for one author across every repository of an organization.
#[derive(Debug, Parser)]
#[command(name = "weekly-report", version, about)]
pub struct Cli {
    /// Commit author to report on (GitHub login or commit email).
    #[arg(value_parser = parse_author)]
    pub author: AuthorLogin,

    /// Week relative to the current one: 0 is this week, -1 last week.
    #[arg(allow_negative_numbers = true)]
    pub week: i64,

    /// Interpret WEEK as a week number of the current year (1-53, weeks start on Sunday).
    #[arg(long)]
    pub week_of_year: bool,

    /// Path of the JSON configuration file.
    #[arg(long, env = "WEEKLY_REPORT_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// Report format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Format of diagnostic logs written to stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Do not show the progress spinner.
    #[arg(long)]
    pub no_progress: bool,
}

impl Cli {
    /// Interprets the WEEK argument.
    pub fn week_selector(&self) -> Result<WeekSelector, ReportError> {
        if !self.week_of_year {
            return Ok(WeekSelector::Offset(self.week));
        }
        match u32::try_from(self.week) {
            Ok(week @ 1..=53) => Ok(WeekSelector::WeekOfYear(week)),
            _ => Err(ReportError::Input {
                message: format!("week of year must be between 1 and 53, got {}", self.week),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Text => ReportFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

fn parse_author(value: &str) -> Result<AuthorLogin, String> {
    AuthorLogin::new(value.trim()).ok_or_else(|| "author must not be empty".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("weekly-report").chain(args.iter().copied()))
    }

    #[test]
    fn negative_offsets_are_accepted() {
        let cli = parse(&["alice", "-2"]).unwrap();
        assert_eq!(cli.week_selector().unwrap(), WeekSelector::Offset(-2));
    }

    #[test]
    fn non_numeric_week_is_rejected() {
        assert!(parse(&["alice", "last"]).is_err());
        assert!(parse(&["alice"]).is_err());
    }

    #[test]
    fn blank_author_is_rejected() {
        assert!(parse(&["  ", "0"]).is_err());
    }

    #[test]
    fn week_of_year_is_range_checked() {
        let cli = parse(&["alice", "12", "--week-of-year"]).unwrap();
        assert_eq!(cli.week_selector().unwrap(), WeekSelector::WeekOfYear(12));

        for week in ["0", "54", "-3"] {
            let cli = parse(&["alice", week, "--week-of-year"]).unwrap();
            assert!(matches!(
                cli.week_selector(),
                Err(ReportError::Input { .. })
            ));
        }
    }

    #[test]
    fn defaults() {
        let cli = parse(&["alice", "0"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.log_format, LogFormat::Text);
        assert!(!cli.no_progress);
    }
}
