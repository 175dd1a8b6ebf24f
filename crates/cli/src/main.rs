//! Weekly report CLI entry point.
//!
//! This binary is the composition root for the whole workspace. Responsibilities:
//!
//! 1. **Parse arguments**: author and week; malformed input fails before any
//!    network activity.
//! 2. **Load configuration**: read `config.json` and validate it.
//! 3. **Wire observability**: install the `tracing-subscriber` layer; every
//!    span and event emitted by the workspace flows through it.
//! 4. **Construct infrastructure**: create the [`GithubClient`] and inject it
//!    into the [`AggregationPipeline`].
//! 5. **Emit**: clear the progress spinner, then write the report to stdout.
//!
//! Exit codes: `0` on success, `1` on any fatal runtime error, `2` on invalid
//! input.

mod args;
mod config;
mod observability;
mod progress;

use std::io;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tracing::{debug, info_span, Instrument};

use github::{GithubClient, GithubClientConfig};
use report::{AggregationPipeline, ReportEmitter, ReportError, ReportRunId};

use crate::args::Cli;
use crate::config::Config;
use crate::progress::Spinner;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    observability::init(cli.log_format);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "weekly report failed");
            let code = exit_code(&err);
            eprintln!("error: {:#}", anyhow::Error::new(err));
            code
        }
    }
}

async fn run(cli: Cli) -> Result<(), ReportError> {
    let selector = cli.week_selector()?;
    let config = Config::load(&cli.config, std::env::var("GITHUB_TOKEN").ok())?;
    let window = selector.resolve(Utc::now());

    let client = GithubClient::new(GithubClientConfig {
        base_url: config.api_base_url.clone(),
        token: config.auth_token.clone(),
        timeout: config.request_timeout,
    })
    .map_err(|err| ReportError::Config {
        message: err.to_string(),
    })?;

    let run_id = ReportRunId::new_random();
    let span = info_span!("weekly_report", %run_id, author = %cli.author, week = %selector);

    let commits = async {
        let spinner = Spinner::start(
            format!(
                "Retrieving {}'s commits for week {} between {}",
                cli.author, selector, window
            ),
            !cli.no_progress,
        );
        AggregationPipeline::new(&client, config.pipeline)
            .with_progress(&spinner)
            .run(&config.organization, &cli.author, &window)
            .await
        // The spinner is dropped, and cleared, here on every path.
    }
    .instrument(span)
    .await?;

    ReportEmitter::new(cli.format.into()).emit(&commits, &mut io::stdout().lock())
}

fn exit_code(err: &ReportError) -> ExitCode {
    match err {
        ReportError::Input { .. } => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}
